use std::fs;
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

fn node<'a>(snapshot: &'a Value, id: &str) -> &'a Value {
    snapshot["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .find(|n| n["id"] == id)
        .unwrap_or_else(|| panic!("node {id} missing"))
}

#[test]
fn lays_out_json_fixture_to_file() {
    let output_dir = tempdir().expect("Failed to create temp dir");
    let output = output_dir.path().join("layout.json");

    let status = Command::new(env!("CARGO_BIN_EXE_force-layout"))
        .args([
            "run",
            "--input",
            "tests/fixtures/network.json",
            "--output",
            output.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to execute force-layout");

    assert!(status.success(), "force-layout exited with error");

    let json = fs::read_to_string(&output).expect("Failed to read layout.json");
    let snapshot: Value = serde_json::from_str(&json).expect("layout is not JSON");

    assert_eq!(snapshot["nodes"].as_array().unwrap().len(), 8);
    assert_eq!(snapshot["edges"].as_array().unwrap().len(), 7);
    assert!(snapshot["alpha"].as_f64().unwrap() <= 0.001);
    let tick = snapshot["tick"].as_u64().unwrap();
    assert!((290..=310).contains(&tick), "settled at tick {tick}");

    let hub = node(&snapshot, "center");
    let (x, y) = (hub["x"].as_f64().unwrap(), hub["y"].as_f64().unwrap());
    assert!(
        (x - 300.0).abs() < 40.0 && (y - 150.0).abs() < 40.0,
        "hub at ({x}, {y})"
    );
}

#[test]
fn lays_out_yaml_fixture_to_stdout() {
    let out = Command::new(env!("CARGO_BIN_EXE_force-layout"))
        .args(["run", "-i", "tests/fixtures/network.yaml", "--width", "400"])
        .output()
        .expect("Failed to execute force-layout");

    assert!(out.status.success());
    let snapshot: Value = serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    assert_eq!(snapshot["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(snapshot["edges"][0]["source"], "data1");
}

#[test]
fn every_tick_emits_the_whole_history() {
    let out = Command::new(env!("CARGO_BIN_EXE_force-layout"))
        .args(["demo", "--every-tick", "--max-ticks", "25"])
        .output()
        .expect("Failed to execute force-layout");

    assert!(out.status.success());
    let history: Value = serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 25);
    assert_eq!(history[0]["tick"], 1);
    assert_eq!(history[24]["tick"], 25);
}

#[test]
fn reports_unknown_edge_endpoint() {
    let out = Command::new(env!("CARGO_BIN_EXE_force-layout"))
        .args(["run", "--input", "tests/fixtures/broken.json"])
        .output()
        .expect("Failed to execute force-layout");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("edge 0 references unknown node 'nowhere'"),
        "stderr: {stderr}"
    );
}

#[test]
fn rejects_unsupported_extension() {
    let out = Command::new(env!("CARGO_BIN_EXE_force-layout"))
        .args(["run", "--input", "tests/fixtures/graph.ttl"])
        .output()
        .expect("Failed to execute force-layout");

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported format: ttl"));
}
