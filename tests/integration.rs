use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn vsearch_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vsearch"))
}

const CONFIG: &str = r##"
[infrastructure]
managed = true
sphinx_templates = ["groups"]

[theme]
primary = "#336699"

[[record_types]]
key = "article"
api_type_key = "article"
dtype = 5
index = "KnowledgeArticle"
guid_offset = 5
guid_multiplier = 10
sub_key = "kb"
checkbox_label = "articles"
provider_group = "sphinx"
infrastructure_template = "knowledge"

[[record_types]]
key = "group"
api_type_key = "groups"
dtype = 6
index = "Group"
guid_offset = 6
guid_multiplier = 10
sub_key = "g"
checkbox_label = "groups"
provider_group = "sphinx"
infrastructure_template = "groups"
"##;

fn setup_test_env(content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let config_path = config_dir.join("vsearch.toml");
    fs::write(&config_path, content).unwrap();
    (tmp, config_path)
}

fn run_vsearch(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = vsearch_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run vsearch binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_types_lists_builtin_and_configured() {
    let (_tmp, config_path) = setup_test_env(CONFIG);

    let (stdout, stderr, success) = run_vsearch(&config_path, &["types"]);
    assert!(success, "types failed: stdout={}, stderr={}", stdout, stderr);
    for key in ["discussion", "comment", "article", "group"] {
        assert!(stdout.contains(key), "missing {} in {}", key, stdout);
    }
    assert!(stdout.contains("(KnowledgeArticle off)"));
    assert!(stdout.contains("discussion_d"));
}

#[test]
fn test_types_active_hides_suppressed() {
    let (_tmp, config_path) = setup_test_env(CONFIG);

    let (stdout, _, success) = run_vsearch(&config_path, &["types", "--active"]);
    assert!(success);
    assert!(stdout.contains("Group"));
    assert!(!stdout.contains("article"));
}

#[test]
fn test_resolve_guid() {
    let (_tmp, config_path) = setup_test_env(CONFIG);

    let (stdout, _, success) = run_vsearch(&config_path, &["resolve", "1231"]);
    assert!(success);
    assert_eq!(stdout.trim(), "discussion 123 (index: Discussion)");

    let (stdout, _, success) = run_vsearch(&config_path, &["resolve", "66", "--json"]);
    assert!(success);
    let view: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(view["record_type"], "group");
    assert_eq!(view["record_id"], 6);
}

#[test]
fn test_resolve_unknown_guid_fails() {
    let (_tmp, config_path) = setup_test_env(CONFIG);

    let (_, stderr, success) = run_vsearch(&config_path, &["resolve", "1239"]);
    assert!(!success);
    assert!(stderr.contains("does not match any record type"));
}

#[test]
fn test_incomplete_record_type_is_config_error() {
    let (_tmp, config_path) = setup_test_env("[[record_types]]\nkey = \"poll\"\n");

    let (_, stderr, success) = run_vsearch(&config_path, &["types"]);
    assert!(!success);
    assert!(stderr.contains("api_type_key"), "stderr: {}", stderr);
}

#[test]
fn test_missing_explicit_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_vsearch(&tmp.path().join("nope.toml"), &["types"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn test_header_layout_json() {
    let (_tmp, config_path) = setup_test_env(CONFIG);

    let (stdout, stderr, success) = run_vsearch(
        &config_path,
        &["header", "--mobile", "--title", "General", "--suggestions-open"],
    );
    assert!(success, "header failed: {}", stderr);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["scroll_offset"], 48);
    assert_eq!(report["state"]["suggestions_open"], true);
    assert_eq!(report["state"]["search_open"], false);
    assert_eq!(report["layout"]["right_wrapped"], true);
    assert_eq!(report["layout"]["left"][0]["widget"], "back_link");
    assert_eq!(report["layout"]["left"][1]["title"], "General");
}

#[test]
fn test_styles_use_theme() {
    let (_tmp, config_path) = setup_test_env(CONFIG);

    let (stdout, _, success) = run_vsearch(&config_path, &["styles"]);
    assert!(success);
    assert!(stdout.contains(".vanillaHeader-root {\n  background-color: #336699;"));
    assert!(stdout.contains("@media (max-width: 1200px)"));
    assert!(stdout.contains(".vanillaHeader-tabButton:focus {\n  color: #336699;\n}"));

    let (stdout, _, success) = run_vsearch(&config_path, &["styles", "--variables"]);
    assert!(success);
    let vars: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(vars["sizing"]["height"], 48.0);
    assert_eq!(vars["colors"]["bg"], "#336699");
}
