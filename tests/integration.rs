use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    return Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
}

fn dockref(dir: &Path, args: &[&str]) -> Output {
    return Command::new(env!("CARGO_BIN_EXE_dockref"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap();
}

fn stdout(output: &Output) -> String {
    return String::from_utf8_lossy(&output.stdout).into_owned();
}

fn stderr(output: &Output) -> String {
    return String::from_utf8_lossy(&output.stderr).into_owned();
}

/// Copy the multistage fixture into a fresh directory so `--write` can modify it.
fn multistage_copy() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(fixture("multistage").join("Dockerfile"), dir.path().join("Dockerfile")).unwrap();
    return dir;
}

#[test]
fn rename_prints_edits_without_writing() {
    let dir = multistage_copy();
    let before = std::fs::read_to_string(dir.path().join("Dockerfile")).unwrap();

    let output = dockref(dir.path(), &["rename", "Dockerfile", "2", "30", "dist"]);
    assert!(output.status.success(), "rename failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "Dockerfile:2:29-2:34 dist\nDockerfile:8:12-8:17 dist\n");

    let after = std::fs::read_to_string(dir.path().join("Dockerfile")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn rename_write_updates_every_occurrence() {
    let dir = multistage_copy();
    let output = dockref(dir.path(), &["rename", "Dockerfile", "8", "14", "compile", "--write"]);
    assert!(output.status.success(), "rename failed: {}", stderr(&output));
    assert!(stderr(&output).contains("Renamed 2 occurrences"));

    let written = std::fs::read_to_string(dir.path().join("Dockerfile")).unwrap();
    assert!(written.contains("FROM node:${NODE_VERSION} AS compile\n"));
    assert!(written.contains("COPY --from=compile /src/dist"));
    assert!(!written.contains("build /src"));
}

#[test]
fn rename_json_is_a_list_of_text_edits() {
    let output = dockref(&fixture("multistage"), &["rename", "Dockerfile", "1", "5", "NODE", "--json"]);
    assert!(output.status.success(), "rename failed: {}", stderr(&output));

    let edits: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let edits = edits.as_array().unwrap();
    assert_eq!(edits.len(), 2);
    assert_eq!(edits[0]["newText"], "NODE");
    assert_eq!(edits[1]["range"]["start"]["line"], 2);
    assert_eq!(edits[1]["range"]["start"]["character"], 12);
}

#[test]
fn references_lists_the_group() {
    let output = dockref(&fixture("multistage"), &["references", "Dockerfile", "2", "15"]);
    assert!(output.status.success(), "references failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "Dockerfile:1:4-1:16\nDockerfile:2:12-2:24\n");
}

#[test]
fn position_without_a_name_exits_one() {
    let output = dockref(&fixture("multistage"), &["rename", "Dockerfile", "3", "2", "x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("no stage or variable at 3:2"));
}

#[test]
fn line_past_end_exits_with_diagnostic() {
    let output = dockref(&fixture("multistage"), &["references", "Dockerfile", "99", "0"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Position Out Of Range"));
}

#[test]
fn missing_file_exits_with_diagnostic() {
    let output = dockref(&fixture("multistage"), &["symbols", "Nope.dockerfile"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("File Not Found"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = multistage_copy();
    std::fs::write(dir.path().join(".dockref.toml"), "unknown_key = 1\n").unwrap();

    let output = dockref(dir.path(), &["symbols", "Dockerfile"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Invalid `.dockref.toml`"));
}

#[test]
fn symbols_json_lists_directives_then_instructions() {
    let output = dockref(&fixture("multistage"), &["symbols", "Dockerfile", "--json"]);
    assert!(output.status.success(), "symbols failed: {}", stderr(&output));

    let symbols: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let names: Vec<_> = symbols
        .as_array()
        .unwrap()
        .iter()
        .map(|s| return s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["syntax", "ARG", "FROM", "WORKDIR", "COPY", "RUN", "FROM", "COPY"]);

    let syntax = &symbols[0];
    assert_eq!(syntax["kind"], 7);
    assert_eq!(syntax["location"]["range"]["start"]["character"], 2);
    assert_eq!(syntax["location"]["range"]["end"]["character"], 7);
    assert!(syntax["location"]["uri"].as_str().unwrap().starts_with("file://"));
    assert_eq!(symbols[1]["kind"], 12);
}

#[test]
fn scan_honors_config_excludes() {
    let output = dockref(&fixture("project"), &["scan", "--json"]);
    assert!(output.status.success(), "scan failed: {}", stderr(&output));

    let files: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let paths: Vec<_> = files
        .as_array()
        .unwrap()
        .iter()
        .map(|f| return f["path"].as_str().unwrap().replace('\\', "/"))
        .collect();
    assert_eq!(paths, ["Dockerfile", "services/api/Dockerfile.dev"]);

    let api_symbols = files[1]["symbols"].as_array().unwrap();
    assert_eq!(api_symbols[0]["name"], "escape");
    assert_eq!(api_symbols.len(), 4);
}

#[test]
fn scan_text_output_ends_with_count() {
    let output = dockref(&fixture("project"), &["scan"]);
    assert!(output.status.success(), "scan failed: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("  instruction FROM"));
    assert!(text.ends_with("2 build files\n"));
}
