//! Tests for CLI input/output helpers

use erscribe_cli::{
    load_config, parse_schema, read_input, to_json, write_output, write_run_outputs, DIAGRAM_FILE,
    SCHEMA_FILE,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_read_input_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("requirements.txt");
    fs::write(&path, "Each order belongs to exactly one customer.").unwrap();
    assert_eq!(
        read_input(&path).unwrap(),
        "Each order belongs to exactly one customer."
    );
}

#[test]
fn test_read_input_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = read_input(&dir.path().join("nope.txt")).unwrap_err();
    assert!(err.to_string().contains("nope.txt"));
}

#[test]
fn test_write_output_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.mmd");
    write_output("erDiagram\n", Some(&path)).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "erDiagram\n");
}

#[test]
fn test_load_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("erscribe.toml");
    fs::write(&path, "[schema]\ndefault_name = \"Clinic\"\n").unwrap();
    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.schema.default_name, "Clinic");
    assert_eq!(config.diagram.max_entities, 20);
}

#[test]
fn test_load_config_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
}

#[test]
fn test_schema_json_round_trip() {
    let output = erscribe::run("Each order belongs to exactly one customer.");
    let json = to_json(&output.schema).unwrap();
    let parsed = parse_schema(&json).unwrap();
    assert_eq!(parsed, output.schema);
}

#[test]
fn test_parse_schema_rejects_garbage() {
    assert!(parse_schema("{\"tables\": 3}").is_err());
}

#[test]
fn test_write_run_outputs() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("nested").join("out");
    let output = erscribe::run(
        "A student enrolls in many courses and each course has many students.",
    );

    let artifacts = write_run_outputs(&output, &out_dir).unwrap();
    assert_eq!(artifacts.schema_path, out_dir.join(SCHEMA_FILE));
    assert_eq!(artifacts.diagram_path, out_dir.join(DIAGRAM_FILE));

    let schema: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&artifacts.schema_path).unwrap()).unwrap();
    assert_eq!(schema["version"], 1);
    let tables: Vec<&str> = schema["tables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert!(tables.contains(&"student_course"));

    let markup = fs::read_to_string(&artifacts.diagram_path).unwrap();
    assert!(markup.starts_with("erDiagram\n"));
    assert!(erscribe::validate(&markup).is_valid);
}
