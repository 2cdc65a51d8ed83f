//! Catalog of the agents and skills below a directory.
//!
//! Discovery is lenient: a `SKILL.md` whose frontmatter cannot be read, or
//! that has no `name`, is skipped rather than reported. Agent definitions
//! without a `description` are skipped the same way. Use `validate` for
//! diagnostics.

pub mod readme;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::core::frontmatter::{self, Frontmatter};
use crate::core::markdown::collapse_whitespace;
use crate::core::skill::ENTRYPOINT;
use crate::error::{Result, SkillpackError};
use crate::utils::format::{truncate_at_word, wrap_text};

/// Width used when extracting "Use when" clauses for display.
pub const CLAUSE_WIDTH: usize = 100;
/// Wrap width for descriptions in tree output.
pub const TREE_WRAP_WIDTH: usize = 60;
/// Agents directory looked up below the catalog root by default.
pub const DEFAULT_AGENTS_DIR: &str = "agents";

static USE_WHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)use when[^.]*\.").expect("use-when regex is valid"));

/// One discovered skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Description with line breaks folded into spaces.
    pub description: String,
    /// Path of the entrypoint document.
    pub path: PathBuf,
}

impl CatalogEntry {
    /// The "Use when ..." clause, truncated for display.
    #[must_use]
    pub fn use_when(&self) -> String {
        use_when_clause(&self.description, CLAUSE_WIDTH)
    }
}

/// One agent definition: a markdown file named after the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentEntry {
    /// File stem of the definition.
    pub name: String,
    pub description: String,
    /// Value of the `mode` frontmatter key, e.g. `primary` or `subagent`.
    pub mode: Option<String>,
    pub path: PathBuf,
}

impl AgentEntry {
    #[must_use]
    pub fn use_when(&self) -> String {
        use_when_clause(&self.description, CLAUSE_WIDTH)
    }

    fn label(&self) -> String {
        match &self.mode {
            Some(mode) => format!("{} ({mode})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Which halves of the catalog to collect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogScope {
    #[default]
    All,
    AgentsOnly,
    SkillsOnly,
}

impl CatalogScope {
    const fn agents(self) -> bool {
        !matches!(self, Self::SkillsOnly)
    }

    const fn skills(self) -> bool {
        !matches!(self, Self::AgentsOnly)
    }
}

/// Agents and skills found below a root directory, each sorted by name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub root: PathBuf,
    pub agents: Vec<AgentEntry>,
    pub skills: Vec<CatalogEntry>,
}

impl Catalog {
    /// Collect agents from `<root>/agents` and skills from below `root`.
    pub fn discover(root: &Path) -> Result<Self> {
        Self::discover_scoped(root, &root.join(DEFAULT_AGENTS_DIR), CatalogScope::All)
    }

    /// Collect the halves selected by `scope`.
    ///
    /// A missing agents directory yields no agents rather than an error.
    pub fn discover_scoped(root: &Path, agents_dir: &Path, scope: CatalogScope) -> Result<Self> {
        if !root.is_dir() {
            return Err(SkillpackError::NotASkillDirectory(root.to_path_buf()));
        }

        let agents = if scope.agents() {
            collect_agents(agents_dir)?
        } else {
            Vec::new()
        };
        let skills = if scope.skills() {
            collect_skills(root)?
        } else {
            Vec::new()
        };
        debug!(
            root = %root.display(),
            agents = agents.len(),
            skills = skills.len(),
            "catalog discovered"
        );

        Ok(Self {
            root: root.to_path_buf(),
            agents,
            skills,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len() + self.skills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.skills.is_empty()
    }

    /// Plain-text tree with an `Agents` and a `Skills` branch.
    ///
    /// Empty branches are left out.
    #[must_use]
    pub fn render_tree(&self, show_descriptions: bool) -> String {
        let label = self
            .root
            .file_name()
            .map_or_else(|| self.root.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mut lines = vec![label];

        if !self.agents.is_empty() {
            let last_group = self.skills.is_empty();
            let items = self.agents.iter().map(|a| (a.label(), a.use_when()));
            push_group(&mut lines, "Agents", last_group, items, show_descriptions);
        }
        if !self.skills.is_empty() {
            let items = self.skills.iter().map(|s| (s.name.clone(), s.use_when()));
            push_group(&mut lines, "Skills", true, items, show_descriptions);
        }

        lines.join("\n")
    }
}

fn push_group(
    lines: &mut Vec<String>,
    title: &str,
    last_group: bool,
    items: impl ExactSizeIterator<Item = (String, String)>,
    show_descriptions: bool,
) {
    let (branch, outer) = if last_group {
        ("└── ", "    ")
    } else {
        ("├── ", "│   ")
    };
    lines.push(format!("{branch}{title}"));

    let count = items.len();
    for (idx, (label, description)) in items.enumerate() {
        let (branch, indent) = if idx + 1 == count {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(format!("{outer}{branch}{label}"));
        if show_descriptions {
            for line in wrap_text(&description, TREE_WRAP_WIDTH) {
                lines.push(format!("{outer}{indent}{line}"));
            }
        }
    }
}

/// `*.md` files directly inside `agents_dir`.
fn collect_agents(agents_dir: &Path) -> Result<Vec<AgentEntry>> {
    if !agents_dir.is_dir() {
        debug!(dir = %agents_dir.display(), "no agents directory");
        return Ok(Vec::new());
    }

    let mut agents = Vec::new();
    for item in WalkDir::new(agents_dir).min_depth(1).max_depth(1) {
        let item = item?;
        let path = item.path();
        if !item.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some(fm) = read_frontmatter(path) else {
            continue;
        };
        let Some(description) = fm.description else {
            continue;
        };
        let mode = fm.extra.get("mode").and_then(|v| v.as_str()).map(str::to_string);
        agents.push(AgentEntry {
            name,
            description: description.trim().to_string(),
            mode,
            path: path.to_path_buf(),
        });
    }

    agents.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(agents)
}

/// Walk `root` for `*/SKILL.md` files.
///
/// A `SKILL.md` directly in `root` is ignored: it belongs to the root
/// itself, not to a skill below it.
fn collect_skills(root: &Path) -> Result<Vec<CatalogEntry>> {
    let mut skills = Vec::new();
    for item in WalkDir::new(root).min_depth(2).follow_links(false) {
        let item = item?;
        if !item.file_type().is_file() || item.file_name() != ENTRYPOINT {
            continue;
        }
        let Some(fm) = read_frontmatter(item.path()) else {
            continue;
        };
        let Some(name) = fm.name.filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        skills.push(CatalogEntry {
            name,
            description: collapse_whitespace(fm.description.as_deref().unwrap_or("")),
            path: item.path().to_path_buf(),
        });
    }

    skills.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(skills)
}

fn read_frontmatter(path: &Path) -> Option<Frontmatter> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping unreadable document");
            return None;
        }
    };
    let parsed = frontmatter::parse_document(&content).map(|(fm, _)| fm);
    if parsed.is_err() {
        debug!(path = %path.display(), "skipping document without frontmatter");
    }
    parsed.ok()
}

/// Extract the first "Use when ..." sentence of a description.
///
/// Falls back to the whole description when there is no such clause. The
/// result has whitespace collapsed and is cut at a word boundary.
#[must_use]
pub fn use_when_clause(description: &str, max_len: usize) -> String {
    let desc = collapse_whitespace(description);
    let clause = USE_WHEN_RE
        .find(&desc)
        .map_or(desc.as_str(), |m| m.as_str());
    truncate_at_word(clause, max_len)
}
