//! YAML frontmatter for `SKILL.md`.
//!
//! The entrypoint starts with a block delimited by `---` lines:
//!
//! ```text
//! ---
//! name: pdf-tools
//! description: Extract text from PDFs. Use when the user uploads a PDF.
//! ---
//! # PDF Tools
//! ```
//!
//! Everything after the closing delimiter is the markdown body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Delimiter line that opens and closes the frontmatter block.
pub const DELIMITER: &str = "---";

/// Parsed frontmatter fields.
///
/// Unknown keys are kept in `extra` in sorted order so that rendering is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Frontmatter {
    /// Serialize to a delimited block, including the trailing newline.
    pub fn render(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
    }
}

/// Why the frontmatter block could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterError {
    pub message: String,
    /// 1-indexed line in the entrypoint file, when known.
    pub line: Option<usize>,
}

impl FrontmatterError {
    fn new(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

/// An entrypoint document split into its two parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument<'a> {
    pub yaml: &'a str,
    pub body: &'a str,
    /// 1-indexed line of the first YAML line.
    pub yaml_start_line: usize,
    /// 1-indexed line of the first body line.
    pub body_start_line: usize,
}

/// Split raw text at the `---` delimiters.
pub fn split_frontmatter(content: &str) -> std::result::Result<SplitDocument<'_>, FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Err(FrontmatterError::new("document is empty", Some(1)));
    };
    if first.trim_end() != DELIMITER {
        return Err(FrontmatterError::new(
            "missing opening `---` frontmatter delimiter",
            Some(1),
        ));
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    let mut line_no = 1;
    for line in lines {
        line_no += 1;
        if line.trim_end() == DELIMITER {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Ok(SplitDocument {
                yaml,
                body,
                yaml_start_line: 2,
                body_start_line: line_no + 1,
            });
        }
        offset += line.len();
    }

    Err(FrontmatterError::new(
        "missing closing `---` frontmatter delimiter",
        Some(line_no),
    ))
}

/// Parse the YAML part of a split document.
pub fn parse_yaml(doc: &SplitDocument<'_>) -> std::result::Result<Frontmatter, FrontmatterError> {
    let locate = |err: &serde_yaml::Error| {
        err.location()
            .map(|loc| doc.yaml_start_line + loc.line().saturating_sub(1))
    };

    if doc.yaml.trim().is_empty() {
        return Err(FrontmatterError::new(
            "frontmatter block is empty",
            Some(doc.yaml_start_line),
        ));
    }

    let value: serde_yaml::Value = serde_yaml::from_str(doc.yaml)
        .map_err(|err| FrontmatterError::new(format!("invalid YAML: {err}"), locate(&err)))?;

    match value {
        serde_yaml::Value::Mapping(_) => {}
        serde_yaml::Value::Null => {
            return Err(FrontmatterError::new(
                "frontmatter block is empty",
                Some(doc.yaml_start_line),
            ));
        }
        _ => {
            return Err(FrontmatterError::new(
                "frontmatter must be a mapping of keys to values",
                Some(doc.yaml_start_line),
            ));
        }
    }

    serde_yaml::from_value(value).map_err(|err| {
        FrontmatterError::new(
            format!("invalid frontmatter field: {err}"),
            Some(doc.yaml_start_line),
        )
    })
}

/// Split and parse in one step, returning the frontmatter and the body.
pub fn parse_document(
    content: &str,
) -> std::result::Result<(Frontmatter, SplitDocument<'_>), FrontmatterError> {
    let doc = split_frontmatter(content)?;
    let frontmatter = parse_yaml(&doc)?;
    Ok((frontmatter, doc))
}
