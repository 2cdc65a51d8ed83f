//! Structural validation rules for skills.
//!
//! These rules check the directory layout and never read the parsed
//! frontmatter, so they still run when the frontmatter is malformed.

use std::path::Path;

use crate::core::identifier::{check_identifier, normalize_identifier};
use crate::core::skill::{
    ASSETS_DIR, ENTRYPOINT, EntryKind, FrontmatterState, REFERENCES_DIR, ResourceKind,
    SCRIPTS_DIR,
};
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{Issue, Location, RuleCategory, Severity};
use crate::lint::rule::{BoxedRule, ValidationRule};

const RESOURCE_DIRS: [&str; 3] = [SCRIPTS_DIR, REFERENCES_DIR, ASSETS_DIR];

fn is_entrypoint_variant(name: &str) -> bool {
    name != ENTRYPOINT && name.eq_ignore_ascii_case(ENTRYPOINT)
}

/// Rule that requires exactly one `SKILL.md` at the root.
pub struct EntrypointPresentRule;

impl ValidationRule for EntrypointPresentRule {
    fn id(&self) -> &'static str {
        "entrypoint-present"
    }

    fn name(&self) -> &'static str {
        "Entrypoint Present"
    }

    fn description(&self) -> &'static str {
        "The skill root must contain exactly one SKILL.md regular file"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        let skill = ctx.skill;

        match skill.entry(ENTRYPOINT).map(|e| e.kind) {
            Some(EntryKind::File) => {}
            Some(_) => issues.push(
                Issue::error(self.id(), format!("{ENTRYPOINT} must be a regular file"))
                    .at(Location::file(ENTRYPOINT)),
            ),
            None => issues.push(
                Issue::error(self.id(), format!("{ENTRYPOINT} is missing"))
                    .with_suggestion(format!(
                        "Create {ENTRYPOINT} with name and description frontmatter"
                    )),
            ),
        }

        for entry in skill
            .entries
            .iter()
            .filter(|e| e.is_top_level() && is_entrypoint_variant(&e.rel_path))
        {
            issues.push(
                Issue::error(
                    self.id(),
                    format!(
                        "'{}' looks like a second entrypoint; only {ENTRYPOINT} is recognized",
                        entry.rel_path
                    ),
                )
                .at(Location::file(&entry.rel_path))
                .with_suggestion(format!("Merge it into {ENTRYPOINT} and delete it")),
            );
        }

        issues
    }
}

/// Rule that forbids stray top-level files.
pub struct NoAuxiliaryFilesRule;

impl ValidationRule for NoAuxiliaryFilesRule {
    fn id(&self) -> &'static str {
        "no-auxiliary-files"
    }

    fn name(&self) -> &'static str {
        "No Auxiliary Files"
    }

    fn description(&self) -> &'static str {
        "Only SKILL.md, a license file and the scripts/, references/ and assets/ directories belong at the top level"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let allowed = &ctx.limits().allowed_top_level_files;
        let mut issues = Vec::new();

        for entry in ctx.skill.entries.iter().filter(|e| e.is_top_level()) {
            let name = entry.rel_path.as_str();
            if name.starts_with('.') || name == ENTRYPOINT || is_entrypoint_variant(name) {
                continue;
            }
            match entry.kind {
                EntryKind::File if !allowed.iter().any(|a| a == name) => issues.push(
                    Issue::error(
                        self.id(),
                        format!("auxiliary file '{name}' is not allowed at the top level"),
                    )
                    .at(Location::file(name))
                    .with_suggestion(
                        "Move documentation into references/ and link it from SKILL.md, or delete it",
                    ),
                ),
                EntryKind::Directory if !RESOURCE_DIRS.contains(&name) => issues.push(
                    Issue::warning(
                        self.id(),
                        format!("directory '{name}/' is not a recognized resource directory"),
                    )
                    .at(Location::file(name))
                    .with_suggestion("Use scripts/, references/ or assets/"),
                ),
                _ => {}
            }
        }

        issues
    }
}

/// Rule that rejects symbolic links anywhere in the tree.
pub struct NoSymlinksRule;

impl ValidationRule for NoSymlinksRule {
    fn id(&self) -> &'static str {
        "no-symlinks"
    }

    fn name(&self) -> &'static str {
        "No Symlinks"
    }

    fn description(&self) -> &'static str {
        "Skills own their files; symbolic links cannot be packaged"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        ctx.skill
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Symlink)
            .map(|e| {
                Issue::error(self.id(), format!("'{}' is a symbolic link", e.rel_path))
                    .at(Location::file(&e.rel_path))
                    .with_suggestion("Copy the target into the skill instead")
            })
            .collect()
    }
}

/// Rule that flags dot-files, which would be shipped in the archive.
pub struct HiddenFilesRule;

impl ValidationRule for HiddenFilesRule {
    fn id(&self) -> &'static str {
        "hidden-files"
    }

    fn name(&self) -> &'static str {
        "Hidden Files"
    }

    fn description(&self) -> &'static str {
        "Hidden files and directories are packaged like any other file"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        ctx.skill
            .entries
            .iter()
            .filter(|e| {
                let mut parts = e.rel_path.split('/').rev();
                let own_hidden = parts.next().is_some_and(|p| p.starts_with('.'));
                own_hidden && !parts.any(|p| p.starts_with('.'))
            })
            .map(|e| {
                Issue::warning(
                    self.id(),
                    format!("hidden entry '{}' will be included in the package", e.rel_path),
                )
                .at(Location::file(&e.rel_path))
                .with_suggestion("Delete it before packaging")
            })
            .collect()
    }
}

/// Rule that checks the directory name is a valid identifier.
pub struct NameFormatRule;

impl ValidationRule for NameFormatRule {
    fn id(&self) -> &'static str {
        "name-format"
    }

    fn name(&self) -> &'static str {
        "Name Format"
    }

    fn description(&self) -> &'static str {
        "Skill directory names are lowercase words separated by single hyphens"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let name = &ctx.skill.name;
        let Err(problem) = check_identifier(name) else {
            return vec![];
        };

        let mut issue = Issue::error(
            self.id(),
            format!("skill directory name '{name}' is invalid: {problem}"),
        );
        let suggestion = normalize_identifier(name);
        if !suggestion.is_empty() {
            issue = issue.with_suggestion(format!("Rename the directory to '{suggestion}'"));
        }
        vec![issue]
    }
}

/// Rule that caps the entrypoint length.
pub struct EntrypointLineLimitRule;

impl ValidationRule for EntrypointLineLimitRule {
    fn id(&self) -> &'static str {
        "entrypoint-line-limit"
    }

    fn name(&self) -> &'static str {
        "Entrypoint Line Limit"
    }

    fn description(&self) -> &'static str {
        "SKILL.md must stay under the configured line ceiling; split detail into references/"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let max = ctx.limits().max_entrypoint_lines;
        let Some(entrypoint) = &ctx.skill.entrypoint else {
            return vec![];
        };
        if entrypoint.line_count <= max {
            return vec![];
        }

        vec![
            Issue::error(
                self.id(),
                format!(
                    "{ENTRYPOINT} has {} lines, exceeding the ceiling of {max}",
                    entrypoint.line_count
                ),
            )
            .at(Location::line(ENTRYPOINT, max + 1))
            .with_suggestion("Move detailed sections into references/*.md and link them from SKILL.md"),
        ]
    }
}

/// Rule that checks scripts can run on their own.
pub struct ScriptExecutableRule;

impl ScriptExecutableRule {
    /// Interpreter named by a shebang line, if any.
    fn interpreter(shebang: &str) -> Option<(&str, Option<&str>)> {
        let rest = shebang.strip_prefix("#!")?.trim();
        let mut parts = rest.split_whitespace();
        let program = parts.next()?;
        let argument = parts.find(|p| !p.starts_with('-'));
        Some((program, argument))
    }
}

impl ValidationRule for ScriptExecutableRule {
    fn id(&self) -> &'static str {
        "script-executable"
    }

    fn name(&self) -> &'static str {
        "Script Executable"
    }

    fn description(&self) -> &'static str {
        "Files under scripts/ declare an interpreter and carry the executable bit"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();

        for resource in ctx.skill.resources_of(ResourceKind::Script) {
            let Some(entry) = ctx.skill.entry(&resource.rel_path) else {
                continue;
            };
            let location = Location::line(&entry.rel_path, 1);
            let first_line = entry.first_line.as_deref().unwrap_or("");

            match Self::interpreter(first_line) {
                None => issues.push(
                    Issue::error(
                        self.id(),
                        format!("script '{}' has no shebang line", entry.rel_path),
                    )
                    .at(location.clone())
                    .with_suggestion("Start the script with e.g. '#!/usr/bin/env python3'"),
                ),
                Some((program, argument)) if program.ends_with("/env") => {
                    if argument.is_none() {
                        issues.push(
                            Issue::error(
                                self.id(),
                                format!("script '{}' runs env without an interpreter", entry.rel_path),
                            )
                            .at(location.clone()),
                        );
                    }
                }
                Some((program, _)) => {
                    if program.starts_with('/') && !Path::new(program).exists() {
                        issues.push(
                            Issue::warning(
                                self.id(),
                                format!(
                                    "interpreter '{program}' for script '{}' was not found on this system",
                                    entry.rel_path
                                ),
                            )
                            .at(location.clone())
                            .with_suggestion("Use '#!/usr/bin/env <interpreter>' for portability"),
                        );
                    }
                }
            }

            if cfg!(unix) && !entry.executable {
                issues.push(
                    Issue::error(
                        self.id(),
                        format!("script '{}' is not executable", entry.rel_path),
                    )
                    .at(Location::file(&entry.rel_path))
                    .with_suggestion(format!("Run 'chmod +x {}'", entry.rel_path)),
                );
            }
        }

        issues
    }
}

/// Rule that reports frontmatter that could not be parsed.
///
/// Metadata rules are skipped by the engine in that case, so this is the only
/// issue raised about the frontmatter.
pub struct MalformedFrontmatterRule;

impl ValidationRule for MalformedFrontmatterRule {
    fn id(&self) -> &'static str {
        "malformed-frontmatter"
    }

    fn name(&self) -> &'static str {
        "Malformed Frontmatter"
    }

    fn description(&self) -> &'static str {
        "SKILL.md must start with a YAML mapping between two '---' lines"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let FrontmatterState::Malformed { message, line } = &ctx.skill.frontmatter else {
            return vec![];
        };
        let location = line.map_or_else(
            || Location::file(ENTRYPOINT),
            |line| Location::line(ENTRYPOINT, line),
        );
        vec![
            Issue::error(self.id(), format!("frontmatter could not be parsed: {message}"))
                .at(location)
                .with_suggestion("Start SKILL.md with '---', YAML 'name:' and 'description:' keys, then '---'"),
        ]
    }
}

pub fn structural_rules() -> Vec<BoxedRule> {
    vec![
        Box::new(EntrypointPresentRule),
        Box::new(NoAuxiliaryFilesRule),
        Box::new(NoSymlinksRule),
        Box::new(HiddenFilesRule),
        Box::new(NameFormatRule),
        Box::new(EntrypointLineLimitRule),
        Box::new(ScriptExecutableRule),
        Box::new(MalformedFrontmatterRule),
    ]
}
