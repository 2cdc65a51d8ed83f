use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use crate::error::{Result, SkillpackError};
use crate::lint::{Issue, Severity, ValidationReport};

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings: Vec::new(),
    }
}

/// Error envelope carrying a payload, e.g. the report that failed.
pub fn robot_error_with<T: Serialize>(
    code: impl Into<String>,
    message: impl Into<String>,
    data: T,
) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Error {
            code: code.into(),
            message: message.into(),
        },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings: Vec::new(),
    }
}

pub fn robot_error(
    code: impl Into<String>,
    message: impl Into<String>,
) -> RobotResponse<serde_json::Value> {
    robot_error_with(code, message, serde_json::Value::Null)
}

pub fn emit_robot<T: Serialize>(response: &RobotResponse<T>) -> Result<()> {
    emit_json(response)
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 12,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let padded = format!("{key:width$}", width = self.key_width);
        self.lines.push(format!("{} {value}", style(padded).dim()));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}

fn issue_line(issue: &Issue) -> String {
    let label = match issue.severity {
        Severity::Error => style("error").red().bold(),
        Severity::Warning => style("warning").yellow(),
    };
    format!(
        "  {label} {} {} {}",
        style(&issue.location).dim(),
        issue.message,
        style(format!("[{}]", issue.rule_id)).dim()
    )
}

/// Issues grouped by severity, errors first, followed by the summary line.
pub fn report_layout(report: &ValidationReport) -> HumanLayout {
    let mut layout = HumanLayout::new();
    let root = report.root.display().to_string();

    if report.issues.is_empty() {
        layout.push_line(format!("{} {}", style("✓").green(), style(&root).dim()));
    } else {
        let mark = if report.is_packageable() {
            style("!").yellow()
        } else {
            style("✗").red()
        };
        layout.push_line(format!("{mark} {}", style(&root).bold()));
    }

    for (severity, heading) in [(Severity::Error, "Errors"), (Severity::Warning, "Warnings")] {
        let group: Vec<&Issue> = report.issues.iter().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        layout.blank();
        layout.section(heading);
        for issue in group {
            layout.push_line(issue_line(issue));
            if let Some(suggestion) = &issue.suggestion {
                layout.push_line(format!("    {} {suggestion}", style("hint:").cyan()));
            }
        }
    }

    layout.blank();
    layout.push_line(report.summary());
    layout
}

/// Print a report the way the current mode expects.
///
/// A report with errors goes out as a robot error envelope, so callers only
/// need to return the error afterwards.
pub fn emit_report(robot: bool, report: &ValidationReport) -> Result<()> {
    if robot {
        if report.is_packageable() {
            emit_robot(&robot_ok(report))
        } else {
            let err = SkillpackError::ValidationFailed(Box::new(report.clone()));
            emit_robot(&robot_error_with(err.code(), err.to_string(), report))
        }
    } else {
        emit_human(report_layout(report));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Location;

    fn plain(layout: HumanLayout) -> String {
        console::strip_ansi_codes(&layout.build()).into_owned()
    }

    #[test]
    fn test_layout_builds_lines() {
        let mut layout = HumanLayout::new();
        layout.title("Title").kv("Key", "value").bullet("item");
        let text = plain(layout);
        assert!(text.starts_with("Title\n\n"));
        assert!(text.contains("Key          value"));
        assert!(text.ends_with("- item"));
    }

    #[test]
    fn test_report_layout_groups_by_severity() {
        let mut report = ValidationReport::new("demo", "demo");
        report.issues.push(
            Issue::warning("purpose-section", "no 'Purpose' section found").at(Location::file("SKILL.md")),
        );
        report.issues.push(
            Issue::error("name-match", "name differs")
                .at(Location::line("SKILL.md", 2))
                .with_suggestion("Rename"),
        );

        let text = plain(report_layout(&report));
        let errors = text.find("Errors").unwrap();
        let warnings = text.find("Warnings").unwrap();
        assert!(errors < warnings);
        assert!(text.contains("error SKILL.md:2 name differs [name-match]"));
        assert!(text.contains("hint: Rename"));
        assert!(text.ends_with("1 error(s), 1 warning(s)"));
    }

    #[test]
    fn test_robot_envelope() {
        let value = serde_json::to_value(robot_error("output_exists", "exists")).unwrap();
        assert_eq!(value["status"]["error"]["code"], "output_exists");
        assert!(value["data"].is_null());

        let value = serde_json::to_value(robot_ok(vec![1, 2])).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"][1], 2);
    }
}
