//! The in-memory view of a skill directory.
//!
//! `SkillPackage::load` snapshots a directory tree once. Validation rules only
//! look at the snapshot, so a single run sees a consistent tree and never
//! touches the filesystem again.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use super::frontmatter::{self, Frontmatter};
use crate::error::{Result, SkillpackError};

/// File name of the entrypoint document.
pub const ENTRYPOINT: &str = "SKILL.md";
/// Directory holding executable helpers.
pub const SCRIPTS_DIR: &str = "scripts";
/// Directory holding documents loaded on demand.
pub const REFERENCES_DIR: &str = "references";
/// Directory holding opaque output material.
pub const ASSETS_DIR: &str = "assets";

/// Category of a bundled resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Script,
    Reference,
    Asset,
}

impl ResourceKind {
    /// Resource category for a path relative to the skill root, if any.
    #[must_use]
    pub fn for_path(rel_path: &str) -> Option<Self> {
        let (top, rest) = rel_path.split_once('/')?;
        if rest.is_empty() {
            return None;
        }
        match top {
            SCRIPTS_DIR => Some(Self::Script),
            REFERENCES_DIR => Some(Self::Reference),
            ASSETS_DIR => Some(Self::Asset),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script => write!(f, "script"),
            Self::Reference => write!(f, "reference"),
            Self::Asset => write!(f, "asset"),
        }
    }
}

/// A file owned by the skill under one of the resource directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub rel_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

/// One filesystem entry below the skill root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Path relative to the root, `/`-separated.
    pub rel_path: String,
    pub kind: EntryKind,
    /// Owner-executable bit; always false off unix.
    pub executable: bool,
    pub size: u64,
    /// First line of a regular file under `scripts/`, used for shebang checks.
    pub first_line: Option<String>,
}

impl Entry {
    /// Depth below the root; top-level entries have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.rel_path.split('/').count()
    }

    #[must_use]
    pub fn is_top_level(&self) -> bool {
        !self.rel_path.contains('/')
    }

    /// Final path component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.rel_path.rsplit('/').next().unwrap_or(&self.rel_path)
    }
}

/// Result of reading the entrypoint frontmatter.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontmatterState {
    /// The entrypoint does not exist or is not a regular file.
    Missing,
    Parsed(Frontmatter),
    Malformed { message: String, line: Option<usize> },
}

/// The parsed entrypoint document.
#[derive(Debug, Clone, PartialEq)]
pub struct Entrypoint {
    pub rel_path: String,
    pub raw: String,
    pub line_count: usize,
    pub body: String,
    /// 1-indexed file line where `body` starts.
    pub body_start_line: usize,
}

/// A candidate skill directory.
#[derive(Debug, Clone)]
pub struct SkillPackage {
    pub root: PathBuf,
    /// Directory base name.
    pub name: String,
    pub entrypoint: Option<Entrypoint>,
    pub frontmatter: FrontmatterState,
    /// Every entry below the root, sorted by relative path.
    pub entries: Vec<Entry>,
    pub resources: Vec<Resource>,
    /// Text of each reference document keyed by relative path.
    pub reference_texts: BTreeMap<String, String>,
}

impl SkillPackage {
    /// Snapshot the directory at `root`.
    ///
    /// Structural problems are recorded, not raised; this only fails when
    /// `root` is not a readable directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let meta = std::fs::metadata(root)
            .map_err(|_| SkillpackError::NotASkillDirectory(root.to_path_buf()))?;
        if !meta.is_dir() {
            return Err(SkillpackError::NotASkillDirectory(root.to_path_buf()));
        }
        let name = dir_name(root)?;

        let entries = scan_entries(root)?;
        let resources: Vec<Resource> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .filter_map(|e| {
                ResourceKind::for_path(&e.rel_path).map(|kind| Resource {
                    kind,
                    rel_path: e.rel_path.clone(),
                })
            })
            .collect();

        let mut reference_texts = BTreeMap::new();
        for resource in resources.iter().filter(|r| r.kind == ResourceKind::Reference) {
            let bytes = std::fs::read(root.join(&resource.rel_path))?;
            reference_texts.insert(
                resource.rel_path.clone(),
                String::from_utf8_lossy(&bytes).into_owned(),
            );
        }

        let entrypoint_is_file = entries
            .iter()
            .any(|e| e.rel_path == ENTRYPOINT && e.kind == EntryKind::File);
        let (entrypoint, frontmatter) = if entrypoint_is_file {
            read_entrypoint(&root.join(ENTRYPOINT))?
        } else {
            (None, FrontmatterState::Missing)
        };

        debug!(
            skill = %name,
            entries = entries.len(),
            resources = resources.len(),
            "loaded skill directory"
        );

        Ok(Self {
            root: root.to_path_buf(),
            name,
            entrypoint,
            frontmatter,
            entries,
            resources,
            reference_texts,
        })
    }

    /// Parsed frontmatter, if it could be read.
    #[must_use]
    pub const fn parsed_frontmatter(&self) -> Option<&Frontmatter> {
        match &self.frontmatter {
            FrontmatterState::Parsed(fm) => Some(fm),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_frontmatter_malformed(&self) -> bool {
        matches!(self.frontmatter, FrontmatterState::Malformed { .. })
    }

    /// Look up an entry by relative path.
    #[must_use]
    pub fn entry(&self, rel_path: &str) -> Option<&Entry> {
        self.entries
            .binary_search_by(|e| e.rel_path.as_str().cmp(rel_path))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Resources of one kind.
    pub fn resources_of(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    /// Regular files, in archive order.
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::File)
    }
}

fn dir_name(root: &Path) -> Result<String> {
    let resolved = if root.file_name().is_some() {
        root.to_path_buf()
    } else {
        std::fs::canonicalize(root)?
    };
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SkillpackError::NotASkillDirectory(root.to_path_buf()))
}

fn rel_string(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn scan_entries(root: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for item in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let item = item?;
        let Some(rel_path) = rel_string(root, item.path()) else {
            continue;
        };
        let file_type = item.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let metadata = item.metadata()?;
        let executable = kind == EntryKind::File && is_executable(&metadata);
        let first_line = if kind == EntryKind::File
            && ResourceKind::for_path(&rel_path) == Some(ResourceKind::Script)
        {
            read_first_line(item.path())?
        } else {
            None
        };
        entries.push(Entry {
            rel_path,
            kind,
            executable,
            size: if kind == EntryKind::File { metadata.len() } else { 0 },
            first_line,
        });
    }
    entries.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(entries)
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}

fn read_first_line(path: &Path) -> Result<Option<String>> {
    let bytes = std::fs::read(path)?;
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    Ok(text.lines().next().map(|l| l.trim_end().to_string()))
}

fn read_entrypoint(path: &Path) -> Result<(Option<Entrypoint>, FrontmatterState)> {
    let bytes = std::fs::read(path)?;
    let Ok(raw) = String::from_utf8(bytes) else {
        return Ok((
            None,
            FrontmatterState::Malformed {
                message: format!("{ENTRYPOINT} is not valid UTF-8"),
                line: None,
            },
        ));
    };
    let line_count = raw.lines().count();

    let (body, body_start_line, state) = match frontmatter::split_frontmatter(&raw) {
        Ok(doc) => {
            let state = match frontmatter::parse_yaml(&doc) {
                Ok(fm) => FrontmatterState::Parsed(fm),
                Err(err) => FrontmatterState::Malformed {
                    message: err.message,
                    line: err.line,
                },
            };
            (doc.body.to_string(), doc.body_start_line, state)
        }
        Err(err) => (
            raw.clone(),
            1,
            FrontmatterState::Malformed {
                message: err.message,
                line: err.line,
            },
        ),
    };

    Ok((
        Some(Entrypoint {
            rel_path: ENTRYPOINT.to_string(),
            raw,
            line_count,
            body,
            body_start_line,
        }),
        state,
    ))
}
