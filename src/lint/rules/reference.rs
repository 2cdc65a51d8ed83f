//! Reference validation rules.
//!
//! `SKILL.md` and `references/` must close over each other: every relative
//! link in the body resolves to a file in the skill, and every reference
//! document is linked from the body.

use std::collections::BTreeSet;

use crate::core::markdown::{self, MarkdownLink};
use crate::core::skill::{ENTRYPOINT, EntryKind, Entrypoint, ResourceKind};
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{Issue, Location, RuleCategory, Severity};
use crate::lint::rule::{BoxedRule, ValidationRule};

/// Local links in the body, each paired with its normalized target.
///
/// A `None` target means the link escapes the skill root.
fn local_links(entrypoint: &Entrypoint) -> Vec<(MarkdownLink, Option<String>)> {
    markdown::links(&entrypoint.body, entrypoint.body_start_line)
        .into_iter()
        .filter(MarkdownLink::is_local)
        .filter(|link| !link.path_part().is_empty())
        .map(|link| {
            let normalized = markdown::normalize_relative(&link.decoded_path());
            (link, normalized)
        })
        .collect()
}

/// Rule that checks every relative link in the body resolves.
pub struct ReferenceLinksRule;

impl ValidationRule for ReferenceLinksRule {
    fn id(&self) -> &'static str {
        "reference-links"
    }

    fn name(&self) -> &'static str {
        "Reference Links"
    }

    fn description(&self) -> &'static str {
        "Relative links in SKILL.md must point at files inside the skill"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Reference
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(entrypoint) = &ctx.skill.entrypoint else {
            return vec![];
        };

        let mut seen = BTreeSet::new();
        let mut issues = Vec::new();

        for (link, normalized) in local_links(entrypoint) {
            let key = normalized.clone().unwrap_or_else(|| link.path_part().to_string());
            if !seen.insert(key) {
                continue;
            }
            let location = Location::line(ENTRYPOINT, link.line);

            match normalized {
                None => issues.push(
                    Issue::error(
                        self.id(),
                        format!("link '{}' points outside the skill directory", link.target),
                    )
                    .at(location)
                    .with_suggestion("Copy the document into references/ and link it relatively"),
                ),
                Some(path) => {
                    let kind = if path.is_empty() {
                        Some(EntryKind::Directory)
                    } else {
                        ctx.skill.entry(&path).map(|e| e.kind)
                    };
                    match kind {
                        // Symlinked targets are reported by `no-symlinks`.
                        Some(EntryKind::File | EntryKind::Symlink) => {}
                        Some(EntryKind::Directory) => issues.push(
                            Issue::error(
                                self.id(),
                                format!("link target '{}' is a directory, not a file", link.path_part()),
                            )
                            .at(location)
                            .with_suggestion("Link a document inside the directory instead"),
                        ),
                        None => issues.push(
                            Issue::error(
                                self.id(),
                                format!("link target '{}' does not exist", link.path_part()),
                            )
                            .at(location)
                            .with_suggestion(format!("Create '{path}' or fix the link")),
                        ),
                    }
                }
            }
        }

        issues
    }
}

/// Rule that checks every reference document is reachable from the body.
pub struct ReferenceOrphansRule;

impl ValidationRule for ReferenceOrphansRule {
    fn id(&self) -> &'static str {
        "reference-orphans"
    }

    fn name(&self) -> &'static str {
        "Reference Orphans"
    }

    fn description(&self) -> &'static str {
        "Every file under references/ must be linked from SKILL.md"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Reference
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(entrypoint) = &ctx.skill.entrypoint else {
            return vec![];
        };

        let linked: BTreeSet<String> = local_links(entrypoint)
            .into_iter()
            .filter_map(|(_, normalized)| normalized)
            .collect();

        ctx.skill
            .resources_of(ResourceKind::Reference)
            .filter(|r| !linked.contains(&r.rel_path))
            .map(|r| {
                Issue::error(
                    self.id(),
                    format!("reference '{}' is not linked from {ENTRYPOINT}", r.rel_path),
                )
                .at(Location::file(&r.rel_path))
                .with_suggestion(format!(
                    "Add a link such as [details]({}) to {ENTRYPOINT}, or delete the file",
                    r.rel_path
                ))
            })
            .collect()
    }
}

pub fn reference_rules() -> Vec<BoxedRule> {
    vec![Box::new(ReferenceLinksRule), Box::new(ReferenceOrphansRule)]
}
