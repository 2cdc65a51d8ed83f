//! An entrypoint over the line ceiling blocks packaging until the excess
//! moves into a linked reference.

use super::fixture::E2EFixture;

fn procedure_lines(count: usize) -> String {
    (1..=count)
        .map(|n| format!("Step {n} of the extraction procedure."))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_oversized_entrypoint_then_fix() {
    let mut fixture = E2EFixture::new("oversized_entrypoint");

    fixture.log_step("Create skill and grow SKILL.md past the ceiling");
    fixture.assert_success(&fixture.run(&["init", "big-skill"]), "init");
    fixture.fill_description(
        "big-skill",
        "Runs a long extraction procedure. Use when the user needs every step spelled out.",
    );
    let original = fixture.read("big-skill/SKILL.md");
    let grown = format!("{original}\n## Procedure\n\n{}\n", procedure_lines(600));
    fixture.write("big-skill/SKILL.md", &grown);

    fixture.log_step("Validate oversized entrypoint");
    let (code, json) = fixture.run_json(&["validate", "big-skill"]);
    assert_eq!(code, Some(1));
    let issues = json["data"]["issues"].as_array().unwrap();
    let oversized: Vec<_> = issues
        .iter()
        .filter(|i| i["rule_id"] == "entrypoint-line-limit")
        .collect();
    assert_eq!(oversized.len(), 1, "{json:#}");
    assert_eq!(oversized[0]["location"]["path"], "SKILL.md");
    assert_eq!(oversized[0]["location"]["line"], 501);

    fixture.log_step("Packaging is refused");
    let output = fixture.run(&["package", "big-skill", "dist"]);
    fixture.assert_exit(&output, 1, "package oversized");
    assert!(!fixture.path("dist/big-skill.skill").exists());

    fixture.log_step("Move the procedure into a reference");
    fixture.write(
        "big-skill/references/procedure.md",
        &format!("# Procedure\n\n{}\n", procedure_lines(600)),
    );
    fixture.write(
        "big-skill/SKILL.md",
        &format!("{original}\nFollow [the full procedure](references/procedure.md) step by step.\n"),
    );

    fixture.log_step("Validate and package");
    fixture.assert_success(&fixture.run(&["validate", "big-skill"]), "validate fixed");
    fixture.assert_success(&fixture.run(&["package", "big-skill", "dist"]), "package fixed");
    assert!(fixture.path("dist/big-skill.skill").is_file());
}
