//! End-to-end tests for `stylistguild tags`.

use serde_json::json;
use std::fs;

mod fixtures;
use fixtures::*;

#[test]
fn test_tags_sort_rewrites_addon() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["tags", "sort", "--json"]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "tags sort should succeed. stderr: {}",
        stderr(&output)
    );
    let result = stdout_json(&output);
    assert_eq!(result["entries"], 2);
    assert_eq!(result["changed"], 2);

    let addon = catalog.read_json(&catalog.config.paths.addon);
    assert_eq!(addon[0]["tags"], json!(["dark", "minimalistic", "underrated_gems"]));
    assert_eq!(addon[1]["tags"], json!(["dark", "light"]));
    assert_eq!(addon[0]["screenshot-main"], "https://example.com/velvet.png");
}

#[test]
fn test_tags_sort_is_idempotent() {
    let catalog = TestCatalog::standard();
    let first = catalog.run(&["tags", "sort"]);
    assert_eq!(first.status.code(), Some(0), "stderr: {}", stderr(&first));
    let after_first = fs::read_to_string(&catalog.config.paths.addon).unwrap();

    let second = catalog.run(&["tags", "sort"]);
    assert_eq!(second.status.code(), Some(0));
    assert!(stdout(&second).contains("already sorted"));
    assert_eq!(
        fs::read_to_string(&catalog.config.paths.addon).unwrap(),
        after_first
    );
}

#[test]
fn test_tags_macros_defaults_and_file() {
    let catalog = TestCatalog::standard();

    let defaults = catalog.run(&["tags", "macros", "--json"]);
    assert_eq!(defaults.status.code(), Some(0), "stderr: {}", stderr(&defaults));
    let list = stdout_json(&defaults);
    assert!(list
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["shortcut"] == "m" && m["tag"] == "minimalistic"));

    write_json(&catalog.config.paths.macros, &json!({"cz": "cozy"}));
    let custom = catalog.run(&["tags", "macros", "--json"]);
    assert_eq!(stdout_json(&custom), json!([{"shortcut": "cz", "tag": "cozy"}]));
}

#[test]
fn test_tags_stats_text() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["tags", "stats", "--top", "1"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("4 unique tags, 5 usages across 2 entries"));
    assert!(text.contains("dark"));
    assert!(!text.contains("underrated_gems"));
}
