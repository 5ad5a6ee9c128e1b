//! End-to-end tests: refresh from a local schema document, then explore the
//! snapshot through the CLI.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

const LOCAL_CONFIG: &str = r#"
[sources]
default_version = "v1"

[[sources.versions]]
name = "v1"
location = "schemas/v1.xml"
"#;

fn fixture() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../metaexplorer-core/tests/fixtures/graph_metadata.xml");
    std::fs::read_to_string(&path).expect("Failed to read fixture")
}

/// A working directory with a local config pointing v1 at the fixture.
fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("schemas")).unwrap();
    std::fs::write(temp.path().join("schemas/v1.xml"), fixture()).unwrap();
    std::fs::create_dir_all(temp.path().join(".metaexplorer")).unwrap();
    std::fs::write(temp.path().join(".metaexplorer/config.toml"), LOCAL_CONFIG).unwrap();
    temp
}

/// Command running inside `dir` with `dir` as the home directory.
#[allow(deprecated)]
fn explorer(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("metaexplorer").expect("Failed to find metaexplorer binary");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("METAEXPLORER_CONFIG")
        .env_remove("METAEXPLORER_OUTPUT_DIR");
    cmd
}

fn refreshed_workspace() -> TempDir {
    let temp = workspace();
    explorer(temp.path())
        .args(["--quiet", "refresh", "--version", "v1"])
        .assert()
        .success();
    temp
}

// ============================================================================
// Refresh and Pages
// ============================================================================

#[test]
fn test_refresh_writes_snapshot() {
    let temp = refreshed_workspace();

    let snapshot = std::fs::read_to_string(temp.path().join("site/v1.js")).unwrap();
    assert!(snapshot.starts_with("const json = [{\"ItemType\" : \"EntitySet\""));
    assert!(snapshot.ends_with("];\n"));
}

#[test]
fn test_refresh_output_dir_override() {
    let temp = workspace();
    explorer(temp.path())
        .args(["-q", "--output-dir", "public", "refresh", "--version", "v1"])
        .assert()
        .success();

    assert!(temp.path().join("public/v1.js").exists());
    assert!(!temp.path().join("site").exists());
}

#[test]
fn test_refresh_unknown_version_fails() {
    let temp = workspace();
    explorer(temp.path())
        .args(["refresh", "--version", "gamma"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gamma"));
}

#[test]
fn test_refresh_missing_document_fails_without_artifact() {
    let temp = workspace();
    std::fs::remove_file(temp.path().join("schemas/v1.xml")).unwrap();

    explorer(temp.path())
        .args(["-q", "refresh", "--version", "v1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to refresh"));

    assert!(!temp.path().join("site/v1.js").exists());
}

#[test]
fn test_pages_writes_every_version() {
    let temp = workspace();
    explorer(temp.path())
        .args(["-q", "pages"])
        .assert()
        .success();

    let site = temp.path().join("site");
    assert!(site.join("main.css").exists());
    assert!(site.join("main.js").exists());
    for version in ["v1", "stagingv1", "cleanv1", "beta", "stagingbeta", "cleanbeta"] {
        assert!(site.join(format!("{}.html", version)).exists(), "{}", version);
    }

    let page = std::fs::read_to_string(site.join("v1.html")).unwrap();
    assert!(page.contains("<script src=\"v1.js\"></script>"));
    assert!(page.contains("<script src=\"main.js\"></script>"));
    assert!(page.contains("schemas/v1.xml"));
    // Nothing refreshed yet
    assert!(!page.contains("Last Updated"));
}

#[test]
fn test_pages_shows_earlier_refresh_time() {
    let temp = refreshed_workspace();
    assert!(temp.path().join("site/v1.refresh.json").exists());

    explorer(temp.path())
        .args(["-q", "pages"])
        .assert()
        .success();

    let site = temp.path().join("site");
    let v1 = std::fs::read_to_string(site.join("v1.html")).unwrap();
    assert!(v1.contains("Last Updated <time datetime=\""));
    let beta = std::fs::read_to_string(site.join("beta.html")).unwrap();
    assert!(!beta.contains("Last Updated"));
}

// ============================================================================
// Exploring
// ============================================================================

#[test]
fn test_search_text_output() {
    let temp = refreshed_workspace();
    explorer(temp.path())
        .args(["search", "message"])
        .assert()
        .success()
        .stdout(predicate::str::contains("message (EntityType)"))
        .stdout(predicate::str::contains("user (EntityType)"));
}

#[test]
fn test_search_json_output() {
    let temp = refreshed_workspace();
    let output = explorer(temp.path())
        .args(["search", "itemBody", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &hits[0];
    assert_eq!(first["item"]["Name"], "itemBody");
    assert_eq!(first["item"]["ItemType"], "ComplexType");
    assert_eq!(first["matched"][0], "Name");
}

#[test]
fn test_search_short_query_has_no_results() {
    let temp = refreshed_workspace();
    explorer(temp.path())
        .args(["search", "me", "--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_search_limit() {
    let temp = refreshed_workspace();
    explorer(temp.path())
        .args(["search", "user", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2. ").not());
}

#[test]
fn test_search_explicit_artifact() {
    let temp = refreshed_workspace();
    std::fs::rename(temp.path().join("site/v1.js"), temp.path().join("copy.js")).unwrap();

    explorer(temp.path())
        .args(["search", "bodyType", "--artifact", "copy.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bodyType (EnumType)"));
}

#[test]
fn test_search_without_snapshot_fails() {
    let temp = workspace();
    explorer(temp.path())
        .args(["search", "user"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("metaexplorer refresh"));
}

#[test]
fn test_lookup_is_exact() {
    let temp = refreshed_workspace();
    explorer(temp.path())
        .args(["lookup", "user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("user (EntityType)"))
        .stdout(predicate::str::contains("Base type: directoryObject"))
        .stdout(predicate::str::contains("messages: C(message) (navigation)"))
        .stdout(predicate::str::contains("users (EntitySet)").not());
}

#[test]
fn test_browse_type_fragment() {
    let temp = refreshed_workspace();
    explorer(temp.path())
        .args(["browse", "#type:user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>Graph Metadata Explorer (v1)</title>"))
        .stdout(predicate::str::contains("user : directoryObject"))
        .stdout(predicate::str::contains("href=\"beta.html#type:user\""))
        .stdout(predicate::str::contains("value=\"user\""))
        .stdout(predicate::str::contains("Last Updated <time datetime="));
}

#[test]
fn test_browse_input_updates_fragment() {
    let temp = refreshed_workspace();
    explorer(temp.path())
        .args(["browse", "--input", "bodyType", "--results-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<div class='EnumType card text-white mb-3 bg-dark'>"));
}

#[test]
fn test_browse_idle_page_has_no_results() {
    let temp = refreshed_workspace();
    explorer(temp.path())
        .args(["browse", "--results-only"])
        .assert()
        .success()
        .stdout(predicate::str::diff("\n"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_init_and_path() {
    let temp = TempDir::new().unwrap();

    explorer(temp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".metaexplorer"));
    assert!(temp.path().join(".metaexplorer/config.toml").exists());

    explorer(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Local:"))
        .stdout(predicate::str::contains("(exists)"));
}

#[test]
fn test_config_list_shows_sources() {
    let temp = workspace();
    explorer(temp.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[naming]"))
        .stdout(predicate::str::contains("namespace_prefix = \"microsoft.graph.\""));
}

#[test]
fn test_config_list_effective_toml() {
    let temp = workspace();
    explorer(temp.path())
        .args(["config", "list", "--effective"])
        .assert()
        .success()
        .stdout(predicate::str::contains("schemas/v1.xml"));
}
