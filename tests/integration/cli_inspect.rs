#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

const CHR1: &str = "H\tVN:Z:1.0
S\t1\tCAAATAAG
S\t2\tA
S\t3\tG
L\t1\t+\t2\t+\t0M
L\t2\t+\t3\t+\t0M
P\tchr1\t1+,2+,3+\t*
P\tshort\t2+\t*
";

struct Env {
    dir: TempDir,
    graph: PathBuf,
    config: PathBuf,
}

fn setup(config_body: Option<&str>) -> Env {
    let dir = TempDir::new().expect("tempdir");
    let graph = dir.path().join("chr1.gfa");
    fs::write(&graph, CHR1).expect("write graph");
    let config = dir.path().join("config.toml");
    if let Some(body) = config_body {
        fs::write(&config, body).expect("write config");
    }
    Env { dir, graph, config }
}

fn json_output(env: &Env, args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("odgi-inspect")
        .arg("--config")
        .arg(&env.config)
        .arg("--graph")
        .arg(&env.graph)
        .args(["--format", "json"])
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("valid json")
}

#[test]
fn stats_as_json() {
    let env = setup(None);
    let json = json_output(&env, &["stats"]);
    assert_eq!(json["nodes"], 3);
    assert_eq!(json["edges"], 2);
    assert_eq!(json["paths"], 2);
    assert_eq!(json["steps"], 4);
    assert_eq!(json["min_node_id"], 1);
    assert_eq!(json["max_node_id"], 3);
    assert_eq!(json["total_length"], 10);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn stats_as_text() {
    let env = setup(None);
    let output = cargo_bin_cmd!("odgi-inspect")
        .arg("--config")
        .arg(&env.config)
        .arg("stats")
        .arg("--graph")
        .arg(&env.graph)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Counts"), "{text}");
    assert!(
        text.lines()
            .any(|line| line.split_whitespace().eq(["nodes", "3"])),
        "{text}"
    );
}

#[test]
fn paths_list_step_counts() {
    let env = setup(None);
    let json = json_output(&env, &["paths"]);
    let paths = json.as_array().expect("array");
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0]["name"], "chr1");
    assert_eq!(paths[0]["steps"], 3);
    assert_eq!(paths[1]["name"], "short");
    assert_eq!(paths[1]["steps"], 1);
}

#[test]
fn walk_follows_path_order() {
    let env = setup(None);
    let json = json_output(&env, &["walk", "chr1"]);
    let ids: Vec<u64> = json["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["node_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    let ranks: Vec<i64> = json["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["rank"].as_i64().unwrap())
        .collect();
    assert_eq!(ranks, vec![0, 0, 0]);
    assert_eq!(json["truncated"], false);
}

#[test]
fn walk_limit_truncates() {
    let env = setup(None);
    let json = json_output(&env, &["walk", "chr1", "--limit", "2"]);
    assert_eq!(json["steps"].as_array().unwrap().len(), 2);
    assert_eq!(json["total_steps"], 3);
    assert_eq!(json["truncated"], true);
}

#[test]
fn node_reports_neighbors() {
    let env = setup(None);
    let json = json_output(&env, &["node", "2"]);
    assert_eq!(json["sequence"], "A");
    assert_eq!(json["step_count"], 2);
    assert_eq!(json["left"], serde_json::json!(["1+"]));
    assert_eq!(json["right"], serde_json::json!(["3+"]));
}

#[test]
fn abi_needs_no_graph() {
    let env = setup(None);
    let output = cargo_bin_cmd!("odgi-inspect")
        .arg("--config")
        .arg(&env.config)
        .args(["--format", "json", "abi"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["handle_i_size"], 8);
    assert_eq!(json["edge_handle_i_size"], 16);
    assert_eq!(json["step_handle_i_size"], 16);
    assert_eq!(json["test_uint128"], "0x0123456789abcdeffedcba9876543210");
    assert_eq!(json["ok"], true);
}

#[test]
fn config_supplies_graph_and_format() {
    let env = setup(None);
    fs::write(
        &env.config,
        format!(
            "default_graph = {:?}\nformat = \"json\"\n",
            env.graph.to_str().unwrap()
        ),
    )
    .unwrap();
    let output = cargo_bin_cmd!("odgi-inspect")
        .arg("--config")
        .arg(&env.config)
        .arg("stats")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["nodes"], 3);
}

#[test]
fn strict_flag_from_config_rejects_unknown_records() {
    let env = setup(Some("[load]\nstrict = true\n"));
    let mut body = CHR1.to_string();
    body.push_str("W\tsample\t0\tchr1\t0\t10\t>1>2>3\n");
    fs::write(&env.graph, body).unwrap();
    cargo_bin_cmd!("odgi-inspect")
        .arg("--config")
        .arg(&env.config)
        .arg("--graph")
        .arg(&env.graph)
        .arg("stats")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn missing_graph_and_unknown_path_fail() {
    let env = setup(None);
    let out = cargo_bin_cmd!("odgi-inspect")
        .arg("--config")
        .arg(&env.config)
        .arg("stats")
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("no graph given"));

    let out = cargo_bin_cmd!("odgi-inspect")
        .arg("--config")
        .arg(&env.config)
        .arg("--graph")
        .arg(&env.graph)
        .args(["walk", "chrX"])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("path 'chrX' not found"));
}

#[test]
fn invalid_config_is_reported() {
    let env = setup(Some("format = \"yaml\"\n"));
    let out = cargo_bin_cmd!("odgi-inspect")
        .arg("--config")
        .arg(&env.config)
        .arg("abi")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("yaml"));
    drop(env.dir);
}

#[test]
fn completions_for_bash() {
    let output = cargo_bin_cmd!("odgi-inspect")
        .args(["completions", "bash"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8_lossy(&output).contains("odgi-inspect"));
}
