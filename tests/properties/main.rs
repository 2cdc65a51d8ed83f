//! Property tests for identifiers, frontmatter and validation.

use std::collections::BTreeMap;

use proptest::prelude::*;
use skillpack::core::frontmatter::{Frontmatter, parse_document};
use skillpack::core::{check_identifier, normalize_identifier};
use skillpack::lint::{ValidationConfig, validate};
use tempfile::TempDir;

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}(-[a-z0-9]{1,8}){0,4}"
}

proptest! {
    #[test]
    fn normalized_names_are_valid_or_empty(raw in "\\PC{0,80}") {
        let normalized = normalize_identifier(&raw);
        prop_assert!(normalized.is_empty() || check_identifier(&normalized).is_ok(), "{normalized:?}");
    }

    #[test]
    fn normalizing_a_valid_name_is_identity(name in identifier_strategy()) {
        prop_assert!(check_identifier(&name).is_ok());
        prop_assert_eq!(normalize_identifier(&name), name);
    }

    #[test]
    fn frontmatter_render_parses_back(
        name in identifier_strategy(),
        description in "[A-Za-z][A-Za-z0-9 ,.:'#-]{0,119}",
        license in proptest::option::of("[A-Za-z0-9.-]{1,16}"),
    ) {
        let frontmatter = Frontmatter {
            name: Some(name),
            description: Some(description),
            license,
            extra: BTreeMap::new(),
        };
        let rendered = format!("{}# Body\n", frontmatter.render().unwrap());
        let (parsed, doc) = parse_document(&rendered).unwrap();
        prop_assert_eq!(parsed, frontmatter);
        prop_assert_eq!(doc.body, "# Body\n");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn validation_is_repeatable(
        name in identifier_strategy(),
        description in "[A-Za-z ,.]{0,200}",
        body_lines in proptest::collection::vec("[A-Za-z ]{0,40}", 0..20),
    ) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(&name);
        std::fs::create_dir(&root).unwrap();
        let frontmatter = Frontmatter {
            name: Some(name),
            description: Some(description),
            ..Frontmatter::default()
        };
        let content = format!("{}{}\n", frontmatter.render().unwrap(), body_lines.join("\n"));
        std::fs::write(root.join("SKILL.md"), content).unwrap();

        let config = ValidationConfig::new();
        let first = validate(&root, &config).unwrap();
        let second = validate(&root, &config).unwrap();
        prop_assert_eq!(first, second);
    }
}
