//! Validation rule trait.

use super::config::ValidationContext;
use super::diagnostic::{Issue, RuleCategory, Severity};

/// A validation rule that checks skills for issues.
///
/// Rules should be stateless and reusable. All state needed for validation
/// is passed through the `ValidationContext`.
pub trait ValidationRule: Send + Sync {
    /// Unique identifier for this rule (e.g., "name-match")
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Detailed description of what this rule checks
    fn description(&self) -> &'static str;

    /// Category this rule belongs to
    fn category(&self) -> RuleCategory;

    /// Default severity level
    fn default_severity(&self) -> Severity;

    /// Whether the rule reads parsed frontmatter.
    ///
    /// The engine skips these rules when the frontmatter is malformed.
    fn requires_metadata(&self) -> bool {
        false
    }

    /// Run the validation check
    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue>;
}

/// A boxed validation rule for dynamic dispatch
pub type BoxedRule = Box<dyn ValidationRule>;
