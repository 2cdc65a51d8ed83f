//! Keep a catalog tree embedded in a README up to date.
//!
//! The tree lives in a fenced block between two HTML comment markers:
//!
//! ````text
//! <!-- AGENTS-SKILLS-TREE:START -->
//! ```console
//! skills
//! └── Skills
//!     └── pdf-tools
//! ```
//! <!-- AGENTS-SKILLS-TREE:END -->
//! ````

use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, SkillpackError};

pub const TREE_START: &str = "<!-- AGENTS-SKILLS-TREE:START -->";
pub const TREE_END: &str = "<!-- AGENTS-SKILLS-TREE:END -->";

static TREE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!-- AGENTS-SKILLS-TREE:START -->\n```console\n(.*?)```\n<!-- AGENTS-SKILLS-TREE:END -->")
        .expect("tree block regex is valid")
});

/// Result of a README sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadmeSync {
    Updated,
    Unchanged,
}

/// The full marker block for `tree`.
#[must_use]
pub fn render_block(tree: &str) -> String {
    format!("{TREE_START}\n```console\n{}\n```\n{TREE_END}", tree.trim_end())
}

/// Replace the marker block in `content`, or `None` when there are no markers.
#[must_use]
pub fn replace_block(content: &str, tree: &str) -> Option<String> {
    let found = TREE_BLOCK_RE.find(content)?;
    let mut updated = String::with_capacity(content.len() + tree.len());
    updated.push_str(&content[..found.start()]);
    updated.push_str(&render_block(tree));
    updated.push_str(&content[found.end()..]);
    Some(updated)
}

/// Whether the embedded tree matches `tree`, ignoring surrounding whitespace.
pub fn is_current(content: &str, tree: &str, readme: &Path) -> Result<bool> {
    let captures = TREE_BLOCK_RE
        .captures(content)
        .ok_or_else(|| SkillpackError::ReadmeMarkersMissing(readme.to_path_buf()))?;
    Ok(captures[1].trim() == tree.trim())
}

/// Rewrite the marker block of `readme` with `tree`.
///
/// The file is replaced through a temp file in the same directory, and is not
/// touched when the block is already current.
pub fn sync(readme: &Path, tree: &str) -> Result<ReadmeSync> {
    let content = std::fs::read_to_string(readme)?;
    let updated = replace_block(&content, tree)
        .ok_or_else(|| SkillpackError::ReadmeMarkersMissing(readme.to_path_buf()))?;
    if updated == content {
        debug!(readme = %readme.display(), "readme tree already current");
        return Ok(ReadmeSync::Unchanged);
    }

    let dir = readme
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(updated.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(readme).map_err(|err| SkillpackError::Io(err.error))?;
    info!(readme = %readme.display(), "readme tree updated");
    Ok(ReadmeSync::Updated)
}

/// Fail with `ReadmeOutOfDate` unless the embedded tree matches `tree`.
pub fn check(readme: &Path, tree: &str) -> Result<()> {
    let content = std::fs::read_to_string(readme)?;
    if is_current(&content, tree, readme)? {
        Ok(())
    } else {
        Err(SkillpackError::ReadmeOutOfDate(readme.to_path_buf()))
    }
}
