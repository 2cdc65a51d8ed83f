//! Built-in validation rules for skill directories.
//!
//! Rules are organized by category:
//!
//! - **Structural rules** (`structural`): directory layout, entrypoint, scripts
//! - **Reference rules** (`reference`): links between `SKILL.md` and `references/`
//! - **Metadata rules** (`metadata`): frontmatter fields and name identity
//! - **Quality rules** (`quality`): description content and writing style
//!
//! # Usage
//!
//! ```
//! use skillpack::lint::rules::all_rules;
//! use skillpack::lint::{ValidationConfig, ValidationEngine};
//!
//! let mut engine = ValidationEngine::new(ValidationConfig::default());
//! for rule in all_rules() {
//!     engine.register(rule);
//! }
//! assert!(!engine.rules().is_empty());
//! ```

pub mod metadata;
pub mod quality;
pub mod reference;
pub mod structural;

use crate::core::skill::{ENTRYPOINT, Entrypoint};
use crate::lint::rule::BoxedRule;

pub use metadata::{FrontmatterFieldsRule, NameMatchRule};
pub use quality::{
    DescriptionContextRule, DescriptionLengthRule, DescriptionPlaceholderRule,
    DuplicateContentRule, ImperativeVoiceRule, PurposeSectionRule,
};
pub use reference::{ReferenceLinksRule, ReferenceOrphansRule};
pub use structural::{
    EntrypointLineLimitRule, EntrypointPresentRule, HiddenFilesRule, MalformedFrontmatterRule,
    NameFormatRule, NoAuxiliaryFilesRule, NoSymlinksRule, ScriptExecutableRule,
};

/// Returns all structural validation rules.
pub fn structural_rules() -> Vec<BoxedRule> {
    structural::structural_rules()
}

/// Returns all reference validation rules.
pub fn reference_rules() -> Vec<BoxedRule> {
    reference::reference_rules()
}

/// Returns all metadata validation rules.
pub fn metadata_rules() -> Vec<BoxedRule> {
    metadata::metadata_rules()
}

/// Returns all quality validation rules.
pub fn quality_rules() -> Vec<BoxedRule> {
    quality::quality_rules()
}

/// Returns all built-in validation rules.
pub fn all_rules() -> Vec<BoxedRule> {
    let mut rules = structural_rules();
    rules.extend(reference_rules());
    rules.extend(metadata_rules());
    rules.extend(quality_rules());
    rules
}

/// Line of `key:` inside the frontmatter block, if present.
pub(crate) fn frontmatter_key_line(entrypoint: &Entrypoint, key: &str) -> Option<usize> {
    let prefix = format!("{key}:");
    entrypoint
        .raw
        .lines()
        .enumerate()
        .take(entrypoint.body_start_line.saturating_sub(1))
        .skip(1)
        .find(|(_, line)| line.starts_with(&prefix))
        .map(|(idx, _)| idx + 1)
}

/// Location of a frontmatter key, falling back to the first line.
pub(crate) fn frontmatter_location(
    entrypoint: Option<&Entrypoint>,
    key: &str,
) -> crate::lint::diagnostic::Location {
    let line = entrypoint
        .and_then(|e| frontmatter_key_line(e, key))
        .unwrap_or(1);
    crate::lint::diagnostic::Location::line(ENTRYPOINT, line)
}
