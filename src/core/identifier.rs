//! Skill identifiers.
//!
//! A skill name is lowercase ASCII words joined by single hyphens, e.g.
//! `pdf-tools` or `gh-actions-2`. The directory name and the frontmatter
//! `name` must both have this shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillpackError};

/// Maximum identifier length in characters.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Why a candidate string is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierProblem {
    Empty,
    TooLong(usize),
    Uppercase,
    Underscore,
    Whitespace,
    InvalidChar(char),
    LeadingOrTrailingHyphen,
    ConsecutiveHyphens,
}

impl fmt::Display for IdentifierProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name is empty"),
            Self::TooLong(len) => {
                write!(f, "name is {len} characters (maximum {MAX_IDENTIFIER_LEN})")
            }
            Self::Uppercase => write!(f, "uppercase letters are not allowed"),
            Self::Underscore => write!(f, "underscores are not allowed, use hyphens"),
            Self::Whitespace => write!(f, "spaces are not allowed, use hyphens"),
            Self::InvalidChar(c) => write!(f, "character '{c}' is not allowed"),
            Self::LeadingOrTrailingHyphen => write!(f, "name cannot start or end with a hyphen"),
            Self::ConsecutiveHyphens => write!(f, "name cannot contain consecutive hyphens"),
        }
    }
}

/// Check `candidate` against the identifier format.
pub fn check_identifier(candidate: &str) -> std::result::Result<(), IdentifierProblem> {
    if candidate.is_empty() {
        return Err(IdentifierProblem::Empty);
    }
    let len = candidate.chars().count();
    if len > MAX_IDENTIFIER_LEN {
        return Err(IdentifierProblem::TooLong(len));
    }
    for c in candidate.chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' => {}
            'A'..='Z' => return Err(IdentifierProblem::Uppercase),
            '_' => return Err(IdentifierProblem::Underscore),
            c if c.is_whitespace() => return Err(IdentifierProblem::Whitespace),
            c => return Err(IdentifierProblem::InvalidChar(c)),
        }
    }
    if candidate.starts_with('-') || candidate.ends_with('-') {
        return Err(IdentifierProblem::LeadingOrTrailingHyphen);
    }
    if candidate.contains("--") {
        return Err(IdentifierProblem::ConsecutiveHyphens);
    }
    Ok(())
}

/// Best-effort conversion of free text into an identifier.
///
/// Returns an empty string when nothing usable remains.
#[must_use]
pub fn normalize_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if out.chars().count() > MAX_IDENTIFIER_LEN {
        out = out.chars().take(MAX_IDENTIFIER_LEN).collect();
        while out.ends_with('-') {
            out.pop();
        }
    }
    out
}

/// A validated skill identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Parse an identifier, failing with `InvalidName` on a bad format.
    pub fn parse(raw: &str) -> Result<Self> {
        check_identifier(raw).map_err(|problem| {
            let suggestion = Some(normalize_identifier(raw)).filter(|s| {
                !s.is_empty() && s != raw && check_identifier(s).is_ok()
            });
            SkillpackError::InvalidName {
                name: raw.to_string(),
                reason: problem.to_string(),
                suggestion,
            }
        })?;
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = SkillpackError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_lowercase() {
        for ok in ["foo", "foo-bar", "pdf-2-text", "a1"] {
            assert!(check_identifier(ok).is_ok(), "{ok} should be valid");
        }
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(check_identifier(""), Err(IdentifierProblem::Empty));
        assert_eq!(check_identifier("Foo"), Err(IdentifierProblem::Uppercase));
        assert_eq!(check_identifier("foo_bar"), Err(IdentifierProblem::Underscore));
        assert_eq!(check_identifier("foo bar"), Err(IdentifierProblem::Whitespace));
        assert_eq!(check_identifier("foo.bar"), Err(IdentifierProblem::InvalidChar('.')));
        assert_eq!(
            check_identifier("-foo"),
            Err(IdentifierProblem::LeadingOrTrailingHyphen)
        );
        assert_eq!(
            check_identifier("foo--bar"),
            Err(IdentifierProblem::ConsecutiveHyphens)
        );
        let long = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        assert!(matches!(
            check_identifier(&long),
            Err(IdentifierProblem::TooLong(_))
        ));
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize_identifier("Foo Bar_baz"), "foo-bar-baz");
        assert_eq!(normalize_identifier("  --PDF  tools-- "), "pdf-tools");
        assert_eq!(normalize_identifier("___"), "");
    }

    #[test]
    fn parse_reports_suggestion() {
        let err = Identifier::parse("My_Skill").unwrap_err();
        match err {
            SkillpackError::InvalidName { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("my-skill"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identifier_deserializes_only_valid_names() {
        let ok: Identifier = serde_json::from_str("\"foo-bar\"").unwrap();
        assert_eq!(ok.as_str(), "foo-bar");
        assert!(serde_json::from_str::<Identifier>("\"Foo\"").is_err());
    }
}
