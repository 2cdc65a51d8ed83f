//! Skill packaging.
//!
//! Packaging validates first and fails closed: an archive is only written
//! for a skill with zero error-severity issues, and it only appears under its
//! final name once it is complete.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::archive::{self, ArchiveSummary};
use crate::core::skill::SkillPackage;
use crate::error::{Result, SkillpackError};
use crate::lint::{ValidationConfig, ValidationEngine};

/// Default archive extension.
pub const DEFAULT_EXTENSION: &str = "skill";

/// Packaging settings from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    /// Archive extension without the leading dot.
    pub extension: String,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl PackageSettings {
    /// `<name>.<extension>`
    #[must_use]
    pub fn archive_file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.extension.trim_start_matches('.'))
    }

    /// Reject extensions that cannot form `<name>.<extension>`.
    pub fn check(&self) -> Result<()> {
        let extension = self.extension.trim_start_matches('.');
        if extension.trim().is_empty() || extension.contains(['/', '\\']) {
            return Err(SkillpackError::Config(format!(
                "invalid package.extension '{}'",
                self.extension
            )));
        }
        Ok(())
    }
}

/// Where a packaging run is.
///
/// `Failed` means validation found errors; `Aborted` means writing the
/// archive failed. Neither leaves an archive behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagePhase {
    Pending,
    Validating,
    Failed,
    Archiving,
    Aborted,
    Sealed,
}

impl PackagePhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Aborted | Self::Sealed)
    }
}

impl fmt::Display for PackagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Validating => "validating",
            Self::Failed => "failed",
            Self::Archiving => "archiving",
            Self::Aborted => "aborted",
            Self::Sealed => "sealed",
        };
        f.write_str(s)
    }
}

/// A sealed archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutcome {
    pub skill: String,
    pub archive_path: PathBuf,
    pub file_count: usize,
    pub bytes: u64,
    pub sha256: String,
    /// Warning-severity issues that did not block packaging.
    pub warnings: usize,
}

/// Validates and archives skills.
pub struct Packager {
    engine: ValidationEngine,
    settings: PackageSettings,
}

impl Packager {
    #[must_use]
    pub fn new(config: ValidationConfig, settings: PackageSettings) -> Self {
        Self {
            engine: ValidationEngine::standard(config),
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &PackageSettings {
        &self.settings
    }

    /// Validate `root` and write `<output_dir>/<name>.<ext>`.
    pub fn package(&self, root: &Path, output_dir: &Path) -> Result<PackageOutcome> {
        self.package_traced(root, output_dir, |_| {})
    }

    /// Like [`Packager::package`], reporting every phase transition.
    pub fn package_traced(
        &self,
        root: &Path,
        output_dir: &Path,
        mut observe: impl FnMut(PackagePhase),
    ) -> Result<PackageOutcome> {
        let mut enter = |phase: PackagePhase| {
            info!(skill = %root.display(), phase = %phase, "package phase");
            observe(phase);
        };

        self.settings.check()?;

        enter(PackagePhase::Pending);
        let skill = SkillPackage::load(root)?;

        enter(PackagePhase::Validating);
        let report = self.engine.validate(&skill);
        if !report.is_packageable() {
            enter(PackagePhase::Failed);
            return Err(SkillpackError::ValidationFailed(Box::new(report)));
        }

        let target = output_dir.join(self.settings.archive_file_name(&skill.name));
        if target.symlink_metadata().is_ok() {
            enter(PackagePhase::Aborted);
            return Err(SkillpackError::OutputExists(target));
        }

        enter(PackagePhase::Archiving);
        match self.write(&skill, output_dir, &target) {
            Ok(summary) => {
                enter(PackagePhase::Sealed);
                Ok(PackageOutcome {
                    skill: skill.name,
                    archive_path: target,
                    file_count: summary.file_count,
                    bytes: summary.bytes,
                    sha256: summary.sha256,
                    warnings: report.warning_count(),
                })
            }
            Err(err) => {
                warn!(error = %err, "archive write failed");
                enter(PackagePhase::Aborted);
                Err(err)
            }
        }
    }

    fn write(&self, skill: &SkillPackage, output_dir: &Path, target: &Path) -> Result<ArchiveSummary> {
        std::fs::create_dir_all(output_dir)?;
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", skill.name))
            .suffix(".partial")
            .tempfile_in(output_dir)?;
        let (temp, summary) = archive::write_archive(skill, temp)?;
        archive::persist(temp, target)?;
        Ok(summary)
    }
}
