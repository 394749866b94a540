//! Runs the `respecter` binary end to end.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("extract")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn respecter(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_respecter"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn run(ontology: &str, extra: &[&str]) -> Output {
    let ontology = fixture(ontology);
    let config = fixture("config.yaml");
    let mut args = vec![
        ontology.to_str().unwrap().to_string(),
        "--config".to_string(),
        config.to_str().unwrap().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    respecter(&args)
}

#[test]
fn prints_the_page_to_stdout() {
    let output = run("person.ttl", &[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("var respecConfig"));
    assert!(html.contains("<title>Test</title>"));
    assert!(html.contains(r#"<a href="http://www.w3.org/2001/XMLSchema#string">xsd:string</a>"#));
}

#[test]
fn writes_the_page_to_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("site").join("index.html");
    let output = run("person.ttl", &["--output", out.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Page saved to"));
    assert!(fs::read_to_string(&out).unwrap().contains("<section id=\"Person\">"));
}

#[test]
fn debug_saves_both_queries() {
    let dir = tempfile::tempdir().unwrap();
    let debug_dir = dir.path().join("debug");
    let output = run(
        "person.ttl",
        &["--debug", "--debug-dir", debug_dir.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let concepts = fs::read_to_string(debug_dir.join("sparql_query_file.sparql")).unwrap();
    assert!(concepts.contains("SELECT ?domain ?classLabel"));
    let enumerations =
        fs::read_to_string(debug_dir.join("sparql_enumerations_query.sparql")).unwrap();
    assert!(enumerations.contains("rdfs:subClassOf+ <https://example.com/EnumerationType>"));
}

#[test]
fn json_output_carries_the_records() {
    let output = run("enumerations.ttl", &["--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ontology"]["title"], "Palette");
    let groups = json["enumerations"].as_object().unwrap();
    assert_eq!(groups.len(), 1);
    let members = groups.values().next().unwrap()["Enumerations"].as_array().unwrap();
    assert_eq!(members.len(), 2);
}

#[test]
fn json_output_collapses_numbered_prefixes() {
    let ontology = fixture("schema_range.ttl");
    let output = respecter(&[ontology.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let range = json["properties"][0]["Range"].as_str().unwrap();
    assert!(range.contains(">schema:Person</a>"), "{range}");
    assert!(!range.contains("schema1:"));
}

#[test]
fn missing_metadata_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("index.html");
    let output = run("no_metadata.ttl", &["--output", out.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no ontology metadata"));
    assert!(!out.exists());
}

#[test]
fn missing_ontology_file_fails() {
    let output = run("does-not-exist.ttl", &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist.ttl"));
}

#[test]
fn invalid_config_fails_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "type: {}\npredicate: {}\nprefix: {}\n").unwrap();
    let ontology = fixture("person.ttl");
    let output = respecter(&[
        ontology.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("element `ontology` not found"));
}

#[test]
fn prints_version() {
    let output = respecter(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("respecter "));
}
