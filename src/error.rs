//! Error types for skillpack.

use std::path::PathBuf;

use thiserror::Error;

use crate::lint::ValidationReport;

/// Process exit code for a run that surfaced `error`-severity issues.
pub const EXIT_VALIDATION: u8 = 1;
/// Process exit code for bad arguments or configuration.
pub const EXIT_USAGE: u8 = 2;
/// Process exit code for filesystem or archive failures.
pub const EXIT_IO: u8 = 3;
/// Process exit code when a destination already exists.
pub const EXIT_CONFLICT: u8 = 4;

#[derive(Error, Debug)]
pub enum SkillpackError {
    #[error("invalid skill name '{name}': {reason}")]
    InvalidName {
        name: String,
        reason: String,
        suggestion: Option<String>,
    },

    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("output archive already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("not a skill directory: {}", .0.display())]
    NotASkillDirectory(PathBuf),

    #[error("validation failed for '{}': {} error(s)", .0.skill, .0.error_count())]
    ValidationFailed(Box<ValidationReport>),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no AGENTS-SKILLS-TREE markers in {}", .0.display())]
    ReadmeMarkersMissing(PathBuf),

    #[error("catalog tree in {} is out of date", .0.display())]
    ReadmeOutOfDate(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("frontmatter serialization error: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}

impl SkillpackError {
    /// Exit code reported to the shell for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::ValidationFailed(_) | Self::ReadmeOutOfDate(_) => EXIT_VALIDATION,
            Self::InvalidName { .. }
            | Self::NotASkillDirectory(_)
            | Self::Config(_)
            | Self::ReadmeMarkersMissing(_) => EXIT_USAGE,
            Self::DestinationExists(_) | Self::OutputExists(_) => EXIT_CONFLICT,
            Self::Io(_)
            | Self::Archive(_)
            | Self::Walk(_)
            | Self::Serialization(_)
            | Self::Frontmatter(_) => EXIT_IO,
        }
    }

    /// Stable machine-readable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } => "invalid_name",
            Self::DestinationExists(_) => "destination_exists",
            Self::OutputExists(_) => "output_exists",
            Self::NotASkillDirectory(_) => "not_a_skill_directory",
            Self::ValidationFailed(_) => "validation_failed",
            Self::Config(_) => "config",
            Self::ReadmeMarkersMissing(_) => "readme_markers_missing",
            Self::ReadmeOutOfDate(_) => "readme_out_of_date",
            Self::Io(_) => "io",
            Self::Archive(_) => "archive",
            Self::Walk(_) => "walk",
            Self::Serialization(_) => "serialization",
            Self::Frontmatter(_) => "frontmatter",
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillpackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_category() {
        let validation = SkillpackError::ValidationFailed(Box::new(ValidationReport::new(
            "demo",
            PathBuf::from("demo"),
        )));
        let usage = SkillpackError::Config("bad".into());
        let io = SkillpackError::Io(std::io::Error::other("disk"));
        let conflict = SkillpackError::OutputExists(PathBuf::from("demo.skill"));

        let codes = [
            validation.exit_code(),
            usage.exit_code(),
            io.exit_code(),
            conflict.exit_code(),
        ];
        let mut unique = codes.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
        assert!(codes.iter().all(|code| *code != 0));
    }

    #[test]
    fn invalid_name_message_includes_reason() {
        let err = SkillpackError::InvalidName {
            name: "Foo_Bar".into(),
            reason: "uppercase letters are not allowed".into(),
            suggestion: Some("foo-bar".into()),
        };
        let text = err.to_string();
        assert!(text.contains("Foo_Bar"));
        assert!(text.contains("uppercase"));
        assert_eq!(err.code(), "invalid_name");
    }
}
