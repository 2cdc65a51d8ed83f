//! Each defect yields exactly one targeted diagnostic and no archive.

use super::fixture::E2EFixture;

const DESCRIPTION: &str =
    "Converts spreadsheets into CSV files. Use when the user uploads an Excel workbook.";

fn scaffold(fixture: &E2EFixture, name: &str) {
    fixture.assert_success(&fixture.run(&["init", name]), "init");
    fixture.fill_description(name, DESCRIPTION);
}

fn error_rules(json: &serde_json::Value) -> Vec<String> {
    json["data"]["issues"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["severity"] == "error")
        .map(|i| i["rule_id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_name_mismatch() {
    let mut fixture = E2EFixture::new("name_mismatch");
    scaffold(&fixture, "xlsx-to-csv");

    fixture.log_step("Rename directory without touching frontmatter");
    std::fs::rename(fixture.path("xlsx-to-csv"), fixture.path("sheet-export")).unwrap();

    let (code, json) = fixture.run_json(&["validate", "sheet-export"]);
    assert_eq!(code, Some(1));
    assert_eq!(error_rules(&json), vec!["name-match"]);
    let issue = &json["data"]["issues"][0];
    assert_eq!(issue["location"]["path"], "SKILL.md");
    assert_eq!(issue["location"]["line"], 2);
}

#[test]
fn test_dangling_reference_reported_once() {
    let mut fixture = E2EFixture::new("dangling_reference");
    scaffold(&fixture, "xlsx-to-csv");

    fixture.log_step("Link a missing reference twice");
    let content = fixture.read("xlsx-to-csv/SKILL.md");
    fixture.write(
        "xlsx-to-csv/SKILL.md",
        &format!(
            "{content}\nCheck [formulas](references/formulas.md) first.\n\nRead [formulas](references/formulas.md) again on failure.\n"
        ),
    );

    let (code, json) = fixture.run_json(&["validate", "xlsx-to-csv"]);
    assert_eq!(code, Some(1));
    assert_eq!(error_rules(&json), vec!["reference-links"]);
}

#[test]
fn test_failed_validation_writes_no_archive() {
    let mut fixture = E2EFixture::new("fail_closed");
    scaffold(&fixture, "xlsx-to-csv");

    fixture.log_step("Add a stray README");
    fixture.write("xlsx-to-csv/README.md", "# Notes\n");

    fixture.log_step("Package");
    let (code, json) = fixture.run_json(&["package", "xlsx-to-csv", "dist"]);
    assert_eq!(code, Some(1));
    assert_eq!(json["status"]["error"]["code"], "validation_failed");
    assert_eq!(error_rules(&json), vec!["no-auxiliary-files"]);

    let dist = fixture.path("dist");
    let written = std::fs::read_dir(&dist).map_or(0, Iterator::count);
    assert_eq!(written, 0, "nothing written to {}", dist.display());
}

#[test]
fn test_usage_errors() {
    let mut fixture = E2EFixture::new("usage_errors");

    fixture.log_step("Invalid name");
    let output = fixture.run(&["init", "PDF Tools"]);
    fixture.assert_exit(&output, 2, "invalid name");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pdf-tools"), "suggestion shown: {stderr}");
    assert!(!fixture.path("PDF Tools").exists());

    fixture.log_step("Missing skill directory");
    let output = fixture.run(&["validate", "missing"]);
    fixture.assert_exit(&output, 2, "missing directory");

    fixture.log_step("Existing destination");
    fixture.assert_success(&fixture.run(&["init", "demo-skill"]), "init");
    let output = fixture.run(&["init", "demo-skill"]);
    fixture.assert_exit(&output, 4, "existing destination");
}
