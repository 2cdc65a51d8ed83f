//! Scaffold, fix, validate, package and unpack a skill.

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use super::fixture::E2EFixture;

const DESCRIPTION: &str =
    "Extracts text and tables from PDF files. Use when the user asks to read or summarize a PDF.";

fn file_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            (rel, std::fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn test_fresh_scaffold_fails_on_placeholder_only() {
    let mut fixture = E2EFixture::new("fresh_scaffold");

    fixture.log_step("Create skill");
    let output = fixture.run(&["init", "pdf-tools"]);
    fixture.assert_success(&output, "init");
    assert!(fixture.path("pdf-tools/SKILL.md").is_file());

    fixture.log_step("Validate untouched skeleton");
    let (code, json) = fixture.run_json(&["validate", "pdf-tools"]);
    assert_eq!(code, Some(1));
    assert_eq!(json["status"]["error"]["code"], "validation_failed");
    let issues = json["data"]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1, "{json:#}");
    assert_eq!(issues[0]["rule_id"], "description-placeholder");
    assert_eq!(issues[0]["severity"], "error");
}

#[test]
fn test_package_then_refuse_overwrite() {
    let mut fixture = E2EFixture::new("package_twice");

    fixture.log_step("Create and describe skill");
    fixture.assert_success(&fixture.run(&["init", "pdf-tools"]), "init");
    fixture.fill_description("pdf-tools", DESCRIPTION);

    fixture.log_step("Validate");
    let output = fixture.run(&["validate", "pdf-tools"]);
    fixture.assert_success(&output, "validate");
    assert!(String::from_utf8_lossy(&output.stdout).contains("0 error(s), 0 warning(s)"));

    fixture.log_step("Package");
    let (code, json) = fixture.run_json(&["package", "pdf-tools", "dist"]);
    assert_eq!(code, Some(0), "{json:#}");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["skill"], "pdf-tools");
    assert_eq!(json["data"]["file_count"], 4);
    assert_eq!(json["data"]["sha256"].as_str().unwrap().len(), 64);
    let archive = fixture.path("dist/pdf-tools.skill");
    assert!(archive.is_file());
    let first = std::fs::read(&archive).unwrap();

    fixture.log_step("Package again into the same directory");
    let output = fixture.run(&["package", "pdf-tools", "dist"]);
    fixture.assert_exit(&output, 4, "second package");
    assert_eq!(std::fs::read(&archive).unwrap(), first, "existing archive untouched");

    let leftovers: Vec<_> = std::fs::read_dir(fixture.path("dist"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(leftovers, vec!["pdf-tools.skill".to_string()]);
}

#[test]
fn test_unpacked_archive_matches_source() {
    let mut fixture = E2EFixture::new("round_trip");

    fixture.log_step("Create, describe and extend skill");
    fixture.assert_success(&fixture.run(&["init", "pdf-tools"]), "init");
    fixture.fill_description("pdf-tools", DESCRIPTION);
    fixture.write("pdf-tools/assets/templates/report.txt", "Report template\n");
    fixture.write("pdf-tools/LICENSE.txt", "MIT\n");

    fixture.log_step("Package");
    let output = fixture.run(&["package", "pdf-tools", "dist"]);
    fixture.assert_success(&output, "package");

    fixture.log_step("Unpack and compare");
    let dest = fixture.path("unpacked");
    let extracted = skillpack::bundler::unpack(&fixture.path("dist/pdf-tools.skill"), &dest).unwrap();
    assert_eq!(extracted.len(), 6);

    let source = file_tree(&fixture.path("pdf-tools"));
    let unpacked = file_tree(&dest.join("pdf-tools"));
    assert_eq!(source, unpacked);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dest.join("pdf-tools/scripts/example.py"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn test_list_finds_packaged_skills() {
    let mut fixture = E2EFixture::new("list");

    fixture.log_step("Create two skills");
    for name in ["pdf-tools", "csv-tools"] {
        fixture.assert_success(&fixture.run(&["init", name, "--path", "skills"]), "init");
    }
    fixture.fill_description("skills/pdf-tools", DESCRIPTION);

    fixture.log_step("List as JSON");
    let (code, json) = fixture.run_json(&["list", "skills"]);
    assert_eq!(code, Some(0));
    let names: Vec<&str> = json["data"]["skills"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["csv-tools", "pdf-tools"]);
}
