//! Skill scaffolding.
//!
//! `Scaffolder::create` lays down a skeleton that already satisfies every
//! structural rule. Only the description is left as a placeholder, so a fresh
//! skeleton fails validation on `description-placeholder` alone.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::core::frontmatter::Frontmatter;
use crate::core::identifier::Identifier;
use crate::core::skill::{ASSETS_DIR, ENTRYPOINT, REFERENCES_DIR, SCRIPTS_DIR, SkillPackage};
use crate::error::{Result, SkillpackError};

/// Description written into new skills; the author must replace it.
pub const PLACEHOLDER_DESCRIPTION: &str =
    "[TODO: Complete and informative explanation of what the skill does and when to use it.]";

const EXAMPLE_SCRIPT: &str = "example.py";
const EXAMPLE_REFERENCE: &str = "example.md";
const EXAMPLE_ASSET: &str = "example.txt";

/// Creates new skill directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct Scaffolder;

impl Scaffolder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Create `destination/<name>/` and return the loaded skeleton.
    ///
    /// Fails with `InvalidName` before touching the filesystem, and with
    /// `DestinationExists` if anything already occupies the target path.
    pub fn create(&self, name: &str, destination: &Path) -> Result<SkillPackage> {
        let identifier = Identifier::parse(name)?;
        let root = destination.join(identifier.as_str());

        fs::create_dir_all(destination)?;
        // The leaf is created exclusively; a concurrent creator gets AlreadyExists.
        match fs::create_dir(&root) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(SkillpackError::DestinationExists(root));
            }
            Err(err) => return Err(err.into()),
        }
        info!(skill = %identifier, path = %root.display(), "creating skill skeleton");

        write_file(&root, ENTRYPOINT, &entrypoint_template(&identifier)?)?;
        write_file(
            &root,
            &format!("{REFERENCES_DIR}/{EXAMPLE_REFERENCE}"),
            &reference_template(&identifier),
        )?;
        write_file(&root, &format!("{ASSETS_DIR}/{EXAMPLE_ASSET}"), ASSET_TEMPLATE)?;
        let script = write_file(&root, &format!("{SCRIPTS_DIR}/{EXAMPLE_SCRIPT}"), &script_template(&identifier))?;
        make_executable(&script)?;

        SkillPackage::load(&root)
    }
}

fn write_file(root: &Path, rel_path: &str, content: &str) -> Result<std::path::PathBuf> {
    let path = root.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    debug!(file = rel_path, bytes = content.len(), "wrote scaffold file");
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn title_case(identifier: &Identifier) -> String {
    identifier
        .as_str()
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn entrypoint_template(identifier: &Identifier) -> Result<String> {
    let frontmatter = Frontmatter {
        name: Some(identifier.to_string()),
        description: Some(PLACEHOLDER_DESCRIPTION.to_string()),
        ..Frontmatter::default()
    };
    let title = title_case(identifier);
    Ok(format!(
        "{frontmatter}\
# {title}

## Purpose

Replace this paragraph with the problem this skill solves.

## Workflow

1. Read the request and decide whether this skill applies.
2. Run `{SCRIPTS_DIR}/{EXAMPLE_SCRIPT}` for the deterministic steps.
3. Load [the example reference]({REFERENCES_DIR}/{EXAMPLE_REFERENCE}) only when deeper detail is needed.
4. Copy files from `{ASSETS_DIR}/` into the output when a template is required.

## Resources

- `{SCRIPTS_DIR}/`: executable helpers, run without loading them into context.
- `{REFERENCES_DIR}/`: documentation loaded on demand.
- `{ASSETS_DIR}/`: files used in the output, never read for instructions.
",
        frontmatter = frontmatter.render()?,
    ))
}

fn reference_template(identifier: &Identifier) -> String {
    format!(
        "# {} Reference

Detailed material that is too long for {ENTRYPOINT} belongs here.
Link every reference document from {ENTRYPOINT} so it can be found.
",
        title_case(identifier)
    )
}

fn script_template(identifier: &Identifier) -> String {
    format!(
        "#!/usr/bin/env python3
\"\"\"Example helper script for the {identifier} skill.

Replace with real automation or delete it.
\"\"\"


def main():
    print(\"Example script for {identifier}\")


if __name__ == \"__main__\":
    main()
"
    )
}

const ASSET_TEMPLATE: &str = "Placeholder asset. Replace with templates, images or other output files.\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::{ValidationConfig, ValidationEngine};
    use tempfile::TempDir;

    #[test]
    fn test_create_layout() {
        let temp = TempDir::new().unwrap();
        let skill = Scaffolder::new().create("pdf-tools", temp.path()).unwrap();

        assert_eq!(skill.name, "pdf-tools");
        for rel in [
            "SKILL.md",
            "scripts/example.py",
            "references/example.md",
            "assets/example.txt",
        ] {
            assert!(skill.entry(rel).is_some(), "missing {rel}");
        }
        let fm = skill.parsed_frontmatter().unwrap();
        assert_eq!(fm.name.as_deref(), Some("pdf-tools"));
        assert_eq!(fm.description.as_deref(), Some(PLACEHOLDER_DESCRIPTION));
        #[cfg(unix)]
        assert!(skill.entry("scripts/example.py").unwrap().executable);
    }

    #[test]
    fn test_fresh_skeleton_fails_only_on_placeholder() {
        let temp = TempDir::new().unwrap();
        let skill = Scaffolder::new().create("pdf-tools", temp.path()).unwrap();
        let report = ValidationEngine::standard(ValidationConfig::new()).validate(&skill);

        let rule_ids: Vec<&str> = report.issues.iter().map(|i| i.rule_id.as_str()).collect();
        assert_eq!(rule_ids, vec!["description-placeholder"], "{report:#?}");
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_invalid_name_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let err = Scaffolder::new().create("PDF Tools", temp.path()).unwrap_err();
        match err {
            SkillpackError::InvalidName { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("pdf-tools"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_existing_destination() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("pdf-tools")).unwrap();
        let err = Scaffolder::new().create("pdf-tools", temp.path()).unwrap_err();
        assert!(matches!(err, SkillpackError::DestinationExists(_)));
        assert_eq!(fs::read_dir(temp.path().join("pdf-tools")).unwrap().count(), 0);
    }

    #[test]
    fn test_title_case() {
        let id = Identifier::parse("pdf-tools-2").unwrap();
        assert_eq!(title_case(&id), "Pdf Tools 2");
    }
}
