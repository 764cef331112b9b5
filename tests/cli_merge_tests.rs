//! End-to-end tests for `stylistguild merge`, `backup` and `import`.

use serde_json::json;
use std::fs;

mod fixtures;
use fixtures::*;

fn contributor_entry(repo: &str) -> serde_json::Value {
    json!({
        "repo": repo,
        "screenshot-main": "",
        "screenshots-side": [],
        "tags": ["dark", "retro"],
        "_author": "dana",
        "_created_at": "2025-01-01T10:00:00"
    })
}

#[test]
fn test_merge_archives_contributor_files() {
    let catalog = TestCatalog::standard();
    let contributor = catalog
        .root()
        .join("community-css-themes-tag-browser-dana.json");
    write_json(
        &contributor,
        &json!([contributor_entry("carol/80s-neon"), contributor_entry("bob/aurora")]),
    );

    let output = catalog.run(&["merge", "--yes", "--json"]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "merge should succeed. stderr: {}",
        stderr(&output)
    );

    let report = stdout_json(&output);
    assert_eq!(report["merged"], 1);
    assert_eq!(report["duplicates"], 1);
    assert_eq!(report["errors"], 0);
    assert_eq!(report["total_entries"], 3);

    let addon = catalog.read_json(&catalog.config.paths.addon);
    assert_eq!(addon[2]["repo"], "carol/80s-neon");
    assert_eq!(addon[2]["_author"], "dana");
    assert!(addon[2]["_merged_at"].is_string());

    assert!(!contributor.exists());
    assert!(catalog
        .root()
        .join("user_files_backup/community-css-themes-tag-browser-dana.json")
        .exists());

    let status = stdout_json(&catalog.run(&["status", "--json"]));
    assert_eq!(status["missing_count"], 0);
}

#[test]
fn test_merge_delete_and_unreadable_files() {
    let catalog = TestCatalog::standard();
    let good = catalog.root().join("community-css-themes-tag-browser-dana.json");
    let bad = catalog.root().join("community-css-themes-tag-browser-erin.json");
    write_json(&good, &json!([contributor_entry("carol/80s-neon")]));
    fs::write(&bad, "[ broken").unwrap();

    let output = catalog.run(&["merge", "--yes", "--delete", "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let report = stdout_json(&output);
    assert_eq!(report["merged"], 1);
    assert_eq!(report["errors"], 1);
    assert!(!good.exists());
    assert!(bad.exists(), "unreadable files stay in place");
}

#[test]
fn test_merge_with_only_duplicates_keeps_files() {
    let catalog = TestCatalog::standard();
    let contributor = catalog
        .root()
        .join("community-css-themes-tag-browser-dana.json");
    write_json(&contributor, &json!([contributor_entry("bob/aurora")]));
    let before = fs::read_to_string(&catalog.config.paths.addon).unwrap();

    let output = catalog.run(&["merge", "--yes", "--delete"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No new entries to merge"));

    assert!(contributor.exists(), "files stay when nothing was merged");
    assert_eq!(fs::read_to_string(&catalog.config.paths.addon).unwrap(), before);
}

#[test]
fn test_merge_without_contributor_files() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["merge", "--yes"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No contributor files found"));
}

#[test]
fn test_backup_create_list_restore() {
    let catalog = TestCatalog::standard();

    let create = catalog.run(&["backup", "create", "--label", "before-edit"]);
    assert_eq!(create.status.code(), Some(0), "stderr: {}", stderr(&create));

    let list = stdout_json(&catalog.run(&["backup", "list", "--json"]));
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["file_name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2, "backups: {names:?}");
    assert!(names.iter().all(|n| n.contains("before-edit")));

    let original = fs::read_to_string(&catalog.config.paths.addon).unwrap();
    fs::write(&catalog.config.paths.addon, "[]").unwrap();

    let restore = catalog.run(&["backup", "restore", "addon", "--yes"]);
    assert_eq!(restore.status.code(), Some(0), "stderr: {}", stderr(&restore));
    assert_eq!(
        fs::read_to_string(&catalog.config.paths.addon).unwrap(),
        original
    );
}

#[test]
fn test_backup_restore_without_backups_fails() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["backup", "restore", "official", "--yes"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Restore failed"));
}

#[test]
fn test_import_reports_changes() {
    let catalog = TestCatalog::standard();
    let upstream = catalog.root().join("upstream.json");
    write_json(
        &upstream,
        &json!([
            {"name": "Aurora", "author": "bob", "repo": "bob/aurora", "screenshot": "shot.png", "modes": ["dark", "light"]},
            {"name": "Zen", "author": "fay", "repo": "fay/zen", "screenshot": "zen.png", "modes": ["light"]}
        ]),
    );

    let output = catalog.run(&["import", upstream.to_str().unwrap(), "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let report = stdout_json(&output);
    assert_eq!(report["previous_count"], 3);
    assert_eq!(report["new_count"], 2);
    assert_eq!(report["added"], json!(["fay/zen"]));
    assert_eq!(report["orphaned"], json!(["alice/velvet-night"]));

    let official = catalog.read_json(&catalog.config.paths.official);
    assert_eq!(official.as_array().unwrap().len(), 2);
}

#[test]
fn test_import_missing_file_is_io_error() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["import", "does-not-exist.json"]);
    assert_eq!(output.status.code(), Some(2));
}
