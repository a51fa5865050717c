//! Integration tests for Phiflow
//!
//! These tests verify that the CLI, graph loading and the pathfinder work
//! together correctly.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const GRAPH_JSON: &str = r#"{
  "A": {
    "B": { "cost": 10, "coherence": 0.7 },
    "C": { "cost": 5, "coherence": 0.9 }
  },
  "B": { "D": { "cost": 7, "coherence": 0.8 } },
  "C": { "D": { "cost": 15, "coherence": 0.5 } },
  "D": { "E": { "cost": 8, "coherence": 0.95 } },
  "E": {}
}"#;

const SHORTCUT_TOML: &str = r#"
[Start.X]
cost = 10
coherence = 0.9

[Start.Y]
cost = 2
coherence = 0.1

[X.End]
cost = 2
coherence = 0.8

[Y.End]
cost = 10
coherence = 0.95
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn phiflow(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_phiflow"))
        .args(args)
        .output()
        .expect("Failed to execute phiflow")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = phiflow(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Coherence-biased path search"));

    let version = phiflow(&["version"]);
    assert!(stdout(&version).starts_with("Phiflow v"));
}

/// Test routing the golden graph from a JSON file
#[test]
fn test_route_command() {
    let temp_dir = TempDir::new().unwrap();
    let graph = write(temp_dir.path(), "graph.json", GRAPH_JSON);

    let output = phiflow(&["route", "-g", graph.to_str().unwrap(), "--from", "A", "--to", "E"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("A -> B -> D -> E"), "unexpected output: {text}");
    assert!(text.contains("Total traditional cost: 25"));
    assert!(text.contains("Combined cost: 12.75"));
}

/// Test JSON output of a route
#[test]
fn test_route_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let graph = write(temp_dir.path(), "shortcut.toml", SHORTCUT_TOML);

    let output = phiflow(&[
        "route", "-g", graph.to_str().unwrap(), "--from", "Start", "--to", "End", "--json",
    ]);
    assert!(output.status.success());

    let route: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(route["nodes"], serde_json::json!(["Start", "X", "End"]));
    assert!((route["combined_cost"].as_f64().unwrap() - 3.5).abs() < 1e-9);
}

/// Test that an unreachable end is reported, not treated as a failure
#[test]
fn test_route_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let graph = write(temp_dir.path(), "graph.json", GRAPH_JSON);

    let output = phiflow(&["route", "-g", graph.to_str().unwrap(), "--from", "E", "--to", "A"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No coherent path found from E to A."));

    let json = phiflow(&[
        "route", "-g", graph.to_str().unwrap(), "--from", "E", "--to", "A", "--json",
    ]);
    assert_eq!(stdout(&json).trim(), "null");
}

/// Test that strict mode and bad inputs fail the command
#[test]
fn test_route_errors() {
    let temp_dir = TempDir::new().unwrap();
    let graph = write(temp_dir.path(), "graph.json", GRAPH_JSON);

    let strict = phiflow(&[
        "route", "-g", graph.to_str().unwrap(), "--from", "A", "--to", "Z", "--strict",
    ]);
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("unknown node: Z"));

    let missing = phiflow(&["route", "-g", "does-not-exist.json", "--from", "A", "--to", "E"]);
    assert!(!missing.status.success());
}

/// Test that weights given on the command line and in a config file change the route
#[test]
fn test_weights_change_route() {
    let temp_dir = TempDir::new().unwrap();
    let graph = write(temp_dir.path(), "shortcut.toml", SHORTCUT_TOML);
    let graph = graph.to_str().unwrap();

    // Without the coherence bonus both routes cost 12; Y is reached first
    let flag = phiflow(&[
        "route", "-g", graph, "--from", "Start", "--to", "End", "--coherence-weight", "0", "--json",
    ]);
    let route: serde_json::Value = serde_json::from_str(&stdout(&flag)).unwrap();
    assert_eq!(route["nodes"], serde_json::json!(["Start", "Y", "End"]));
    assert!((route["combined_cost"].as_f64().unwrap() - 12.0).abs() < 1e-9);

    let config = write(temp_dir.path(), "phiflow.toml", "[search]\nmax_relaxations = 1\n");
    let capped = phiflow(&[
        "--config", config.to_str().unwrap(), "route", "-g", graph, "--from", "Start", "--to", "End",
    ]);
    assert!(!capped.status.success());
    assert!(String::from_utf8_lossy(&capped.stderr).contains("negative cycle suspected"));
}

/// Test routing several pairs at once
#[test]
fn test_batch_command() {
    let temp_dir = TempDir::new().unwrap();
    let graph = write(temp_dir.path(), "graph.json", GRAPH_JSON);

    let output = phiflow(&[
        "batch", "-g", graph.to_str().unwrap(), "-p", "A:E", "-p", "E:A", "-p", "C:E", "--json",
    ]);
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["route"]["nodes"], serde_json::json!(["A", "B", "D", "E"]));
    assert!(results[1]["route"].is_null());
    assert_eq!(results[2]["route"]["nodes"], serde_json::json!(["C", "D", "E"]));

    let bad = phiflow(&["batch", "-g", graph.to_str().unwrap(), "-p", "A-E"]);
    assert!(!bad.status.success());
}

/// Test that a pair splits at its first colon
#[test]
fn test_batch_pair_splits_at_first_colon() {
    let temp_dir = TempDir::new().unwrap();
    let graph = write(temp_dir.path(), "graph.json", GRAPH_JSON);

    let output = phiflow(&["batch", "-g", graph.to_str().unwrap(), "-p", "C:D:E"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No coherent path found from C to D:E."));

    let json = phiflow(&["batch", "-g", graph.to_str().unwrap(), "-p", "C:D:E", "--json"]);
    let results: serde_json::Value = serde_json::from_str(&stdout(&json)).unwrap();
    assert_eq!(results[0]["from"], "C");
    assert_eq!(results[0]["to"], "D:E");
    assert!(results[0]["route"].is_null());

    let empty_from = phiflow(&["batch", "-g", graph.to_str().unwrap(), "-p", ":D"]);
    assert!(!empty_from.status.success());
}

/// Test the energy coherence score command
#[test]
fn test_score_command() {
    let output = phiflow(&[
        "score", "--initial", "7", "--final", "10", "--efficiency", "0.85", "--entropy-change", "0.5",
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Energy coherence score: 0.8096"));

    let decreasing = phiflow(&[
        "score", "--initial", "10", "--final", "16.1803", "--efficiency", "0.99", "--entropy-change", "-0.2",
    ]);
    assert!(decreasing.status.success());
    assert!(stdout(&decreasing).contains("Energy coherence score: 0.99"));
}

/// Test the sequence deviation command
#[test]
fn test_sequence_command() {
    let doubling = phiflow(&["sequence", "--values", "1,2,4"]);
    assert!(doubling.status.success());
    assert!(stdout(&doubling).contains("Sequence phi deviation: 0.3820"));

    let fibonacci = phiflow(&["sequence", "--values", "1,1,2,3,5,8"]);
    assert!(fibonacci.status.success());
    let line = stdout(&fibonacci);
    let value: f64 = line.trim().rsplit(' ').next().unwrap().parse().unwrap();
    assert!(value < 0.382, "fibonacci deviated {value}");

    let single = phiflow(&["sequence", "--values", "3"]);
    assert!(stdout(&single).contains("Sequence phi deviation: 1.0000"));

    assert!(!phiflow(&["sequence"]).status.success());
}

/// Test the library surface end to end without the CLI
#[test]
fn test_library_round_trip() {
    use phiflow_core::{SearchConfig, find_path, parse_graph_json};
    use phiflow_score::ScoreWeights;

    let graph = parse_graph_json(GRAPH_JSON, &ScoreWeights::default()).unwrap();
    let route = find_path(&graph, "A", "E", &SearchConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(route.nodes, vec!["A", "B", "D", "E"]);

    let json = serde_json::to_value(&route).unwrap();
    assert_eq!(json["hops"].as_array().unwrap().len(), 3);
}
