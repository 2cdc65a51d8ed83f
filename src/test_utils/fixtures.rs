use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Isolated skill directory inside a temp dir.
///
/// The skill lives at `<tempdir>/<name>`, so the directory name is the skill
/// name and the temp dir itself can be used as an output directory.
pub struct SkillFixture {
    pub temp_dir: TempDir,
    root: PathBuf,
}

impl SkillFixture {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join(name);
        std::fs::create_dir_all(&root).expect("Failed to create skill dir");
        println!("[FIXTURE] Created skill directory: {root:?}");
        Self { temp_dir, root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory next to the skill, usable as a package output dir.
    #[must_use]
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write a file relative to the skill root.
    pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Write a file and mark it executable on unix.
    pub fn write_script(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.write(relative_path, content);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to chmod script");
        }
        path
    }

    /// Write `SKILL.md` with the given frontmatter values and body.
    pub fn write_skill_md(&self, name: &str, description: &str, body: &str) -> PathBuf {
        let content = format!("---\nname: {name}\ndescription: {description}\n---\n{body}");
        self.write("SKILL.md", &content)
    }

    /// Write a skill that passes every rule without warnings.
    pub fn write_valid_skill(&self) -> PathBuf {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .expect("fixture root has a name");
        self.write(
            "references/guide.md",
            "# Guide\n\nDetailed notes that only matter for advanced cases.\n",
        );
        self.write_skill_md(
            &name,
            "Formats changelog entries. Use when the user asks to draft release notes.",
            "# Changelog Formatter\n\n## Purpose\n\nTurn commit summaries into release notes.\n\n## Usage\n\nRead [the guide](references/guide.md) for edge cases.\n",
        )
    }
}
