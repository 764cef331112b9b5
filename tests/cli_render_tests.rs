//! End-to-end tests for `stylistguild render` and `lint`.

use std::fs;

mod fixtures;
use fixtures::*;

#[test]
fn test_render_offline_writes_pages() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["render", "--offline", "--json"]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "render should succeed. stderr: {}",
        stderr(&output)
    );

    let report = stdout_json(&output);
    assert_eq!(report["total"], 2);
    assert_eq!(report["successful"], 2);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["categories_updated"], 1);
    assert_eq!(report["index"]["pages"], 2);
    assert_eq!(report["index"]["total"], 3);

    let themes = &catalog.config.paths.themes_dir;
    let velvet = fs::read_to_string(themes.join("v/velvet-night.md")).unwrap();
    assert!(velvet.starts_with("---\n"));
    assert!(velvet.contains("title: Velvet Night"));
    assert!(velvet.contains("https://github.com/alice/velvet-night"));
    assert!(themes.join("a/aurora.md").exists());
}

#[test]
fn test_render_offline_updates_index_and_categories() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["render", "--offline"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Rendered 2/2 pages"));

    let index = fs::read_to_string(&catalog.config.paths.index_file).unwrap();
    assert!(index.contains("# Themes Index"));
    assert!(index.contains("## A"));
    assert!(index.contains("- [Aurora](./a/aurora.md)"));
    assert!(index.contains("- [Velvet Night](./v/velvet-night.md)"));
    assert!(!index.contains("categories.md"));

    let categories = fs::read_to_string(&catalog.config.paths.categories_file).unwrap();
    assert!(categories.contains("## Underrated Gems"));
    assert!(categories.contains("[Velvet Night](./v/velvet-night.md)"));
    assert!(!categories.contains("Aurora"));
}

#[test]
fn test_render_single_repo() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["render", "--offline", "--repo", "bob/aurora", "--json"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let report = stdout_json(&output);
    assert_eq!(report["total"], 1);
    assert_eq!(report["details"][0]["repo"], "bob/aurora");
    assert!(!catalog.config.paths.themes_dir.join("v/velvet-night.md").exists());
}

#[test]
fn test_render_unknown_repo_is_validation_error() {
    let catalog = TestCatalog::standard();

    let unknown = catalog.run(&["render", "--offline", "--repo", "nobody/nothing"]);
    assert_eq!(unknown.status.code(), Some(1));

    let malformed = catalog.run(&["render", "--offline", "--repo", "not-a-slug"]);
    assert_eq!(malformed.status.code(), Some(1));
}

#[test]
fn test_lint_clean_after_render() {
    let catalog = TestCatalog::standard();
    let render = catalog.run(&["render", "--offline"]);
    assert_eq!(render.status.code(), Some(0), "stderr: {}", stderr(&render));

    let output = catalog.run(&["lint", "--json"]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "Rendered docs should lint clean. stdout: {}",
        stdout(&output)
    );
    let report = stdout_json(&output);
    assert_eq!(report["files_checked"], 4);
    assert!(report["issues"].as_array().unwrap().is_empty());
}

#[test]
fn test_lint_reports_broken_links_and_frontmatter() {
    let catalog = TestCatalog::standard();
    let docs = &catalog.config.paths.docs;
    fs::create_dir_all(docs.join("guide")).unwrap();
    fs::write(
        docs.join("guide/start.md"),
        "---\ntitle: Start\n---\nSee [themes](../themes/missing.md) and [web](https://obsidian.md).\n",
    )
    .unwrap();
    fs::write(docs.join("guide/bare.md"), "# No frontmatter\n").unwrap();

    let output = catalog.run(&["lint", "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let report = stdout_json(&output);
    let kinds: Vec<&str> = report["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds.len(), 2, "issues: {kinds:?}");
    assert!(kinds.contains(&"missing_frontmatter"));
    assert!(kinds.contains(&"broken_link"));
}

#[test]
fn test_lint_without_docs_is_io_error() {
    let catalog = TestCatalog::standard();
    let output = catalog.run(&["lint"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Docs directory not found"));
}
