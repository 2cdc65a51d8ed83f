use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bundler::PackageSettings;
use crate::error::{Result, SkillpackError};
use crate::lint::{Severity, ValidationConfig};

/// File name of the per-project config in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".skillpack.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub package: PackageSettings,
}

impl Config {
    /// Defaults, then the global and project files (or one explicit file),
    /// then environment overrides.
    pub fn load(explicit_path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env_string("SKILLPACK_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                SkillpackError::Config(format!("config file not found: {}", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_dir.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides(env_string)?;
        config.check()?;

        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/skillpack/config.toml` or the platform equivalent.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skillpack/config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            SkillpackError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            SkillpackError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.validation {
            merge_validation(&mut self.validation, patch);
        }
        if let Some(patch) = patch.package {
            if let Some(extension) = patch.extension {
                self.package.extension = extension;
            }
        }
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("SKILLPACK_STRICT") {
            self.validation.strict = parse_bool(&value);
        }
        if let Some(value) = lookup("SKILLPACK_MAX_LINES") {
            self.validation.limits.max_entrypoint_lines = value.trim().parse().map_err(|err| {
                SkillpackError::Config(format!("invalid SKILLPACK_MAX_LINES value {value}: {err}"))
            })?;
        }
        if let Some(value) = lookup("SKILLPACK_ARCHIVE_EXTENSION") {
            self.package.extension = value.trim().to_string();
        }
        Ok(())
    }

    fn check(&self) -> Result<()> {
        let limits = &self.validation.limits;
        if limits.max_entrypoint_lines == 0 {
            return Err(SkillpackError::Config(
                "validation.limits.max_entrypoint_lines must be greater than zero".into(),
            ));
        }
        if limits.description_min_chars > limits.description_max_chars {
            return Err(SkillpackError::Config(format!(
                "validation.limits.description_min_chars ({}) exceeds description_max_chars ({})",
                limits.description_min_chars, limits.description_max_chars
            )));
        }
        self.package.check()
    }
}

fn merge_validation(config: &mut ValidationConfig, patch: ValidationPatch) {
    if let Some(strict) = patch.strict {
        config.strict = strict;
    }
    if let Some(rules) = patch.disabled_rules {
        config.disabled_rules.extend(rules);
    }
    if let Some(overrides) = patch.severity_overrides {
        config.severity_overrides.extend(overrides);
    }
    if let Some(limits) = patch.limits {
        let target = &mut config.limits;
        if let Some(v) = limits.description_min_chars {
            target.description_min_chars = v;
        }
        if let Some(v) = limits.description_max_chars {
            target.description_max_chars = v;
        }
        if let Some(v) = limits.context_cues {
            target.context_cues = v;
        }
        if let Some(v) = limits.max_entrypoint_lines {
            target.max_entrypoint_lines = v;
        }
        if let Some(v) = limits.duplicate_min_chars {
            target.duplicate_min_chars = v;
        }
        if let Some(v) = limits.allowed_frontmatter_keys {
            target.allowed_frontmatter_keys = v;
        }
        if let Some(v) = limits.allowed_top_level_files {
            target.allowed_top_level_files = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub validation: Option<ValidationPatch>,
    pub package: Option<PackagePatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ValidationPatch {
    pub strict: Option<bool>,
    pub disabled_rules: Option<Vec<String>>,
    pub severity_overrides: Option<BTreeMap<String, Severity>>,
    pub limits: Option<LimitsPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LimitsPatch {
    pub description_min_chars: Option<usize>,
    pub description_max_chars: Option<usize>,
    pub context_cues: Option<Vec<String>>,
    pub max_entrypoint_lines: Option<usize>,
    pub duplicate_min_chars: Option<usize>,
    pub allowed_frontmatter_keys: Option<Vec<String>>,
    pub allowed_top_level_files: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PackagePatch {
    pub extension: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
