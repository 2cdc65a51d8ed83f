//! Skill validation framework.
//!
//! This module provides the validator for skill directories:
//!
//! - `ValidationRule` trait for implementing validation rules
//! - `ValidationEngine` for running rules against a loaded `SkillPackage`
//! - `Issue` types for reporting problems with locations and suggestions
//! - `ValidationConfig` for configuring rule behavior and limits
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use skillpack::lint::{ValidationConfig, ValidationEngine};
//!
//! let engine = ValidationEngine::standard(ValidationConfig::default());
//! let report = engine.validate_path(Path::new("skills/pdf-tools"))?;
//!
//! for issue in report.errors() {
//!     eprintln!("{issue}");
//! }
//! # Ok::<(), skillpack::SkillpackError>(())
//! ```

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod rule;
pub mod rules;

pub use config::{ValidationConfig, ValidationContext, ValidationLimits};
pub use diagnostic::{Issue, Location, RuleCategory, Severity};
pub use engine::{RuleInfo, ValidationEngine, ValidationReport, validate};
pub use rule::{BoxedRule, ValidationRule};

pub use rules::{all_rules, metadata_rules, quality_rules, reference_rules, structural_rules};
