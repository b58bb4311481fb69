//! E2E tests for graph-to-dot, scc-enumerate and path-find.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TRIANGLE: &str = "3\n0 1\n1 2\n2 0\n";
const SCENARIO_A: &str = "4\n0 1\n0 2\n2 1\n2 3\n3 2\n";
const CITIES: &str = "4 n\nparis\nlyon\nnice\nbrest\nparis lyon\nlyon nice\nnice lyon\n";

fn tool(bin: &str, dir: &Path) -> Command {
    let mut cmd = match bin {
        "graph-to-dot" => Command::new(assert_cmd::cargo::cargo_bin!("graph-to-dot")),
        "scc-enumerate" => Command::new(assert_cmd::cargo::cargo_bin!("scc-enumerate")),
        _ => Command::new(assert_cmd::cargo::cargo_bin!("path-find")),
    };
    cmd.current_dir(dir);
    cmd.env("KOSA_LOG", "error");
    cmd.env_remove("KOSA_CONFIG");
    cmd
}

fn write_graph(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write graph");
    path
}

// ---------------------------------------------------------------------------
// graph-to-dot
// ---------------------------------------------------------------------------

#[test]
fn dot_from_stdin_to_stdout() {
    let dir = TempDir::new().expect("tempdir");
    tool("graph-to-dot", dir.path())
        .args(["--repr", "dense"])
        .write_stdin("3\n0 2\n0 1\n")
        .assert()
        .success()
        .stdout("digraph G {\n  0 -> 1;\n  0 -> 2;\n}\n");
}

#[test]
fn dot_named_graph_to_file() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_graph(dir.path(), "cities.txt", CITIES);
    let out = dir.path().join("cities.dot");

    tool("graph-to-dot", dir.path())
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["-name", "france", "-repr", "dense"])
        .assert()
        .success()
        .stdout("");

    let dot = std::fs::read_to_string(&out).expect("read dot");
    assert!(dot.starts_with("digraph france {\n"));
    assert!(dot.contains("  \"paris\" -> \"lyon\";\n"));
    assert!(dot.contains("  \"nice\" -> \"lyon\";\n"));
    assert!(!dot.contains("brest"));
}

#[test]
fn dot_empty_input_fails() {
    let dir = TempDir::new().expect("tempdir");
    tool("graph-to-dot", dir.path())
        .write_stdin("\n\n")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("input is empty"));
}

#[test]
fn dot_missing_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    tool("graph-to-dot", dir.path())
        .args(["-i", "nope.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.txt"));
}

#[test]
fn dot_graph_name_from_config() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("kosa.toml"), "[dot]\ngraph_name = \"fromcfg\"\n")
        .expect("write config");

    tool("graph-to-dot", dir.path())
        .write_stdin(TRIANGLE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph fromcfg {"));
}

// ---------------------------------------------------------------------------
// scc-enumerate
// ---------------------------------------------------------------------------

#[test]
fn scc_triangle_is_one_component() {
    let dir = TempDir::new().expect("tempdir");
    tool("scc-enumerate", dir.path())
        .write_stdin(TRIANGLE)
        .assert()
        .success()
        .stdout(predicate::str::ends_with("\n\n1 strongly connected components\n"));
}

#[test]
fn scc_dense_output_is_exact() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_graph(dir.path(), "a.txt", SCENARIO_A);
    for traversal in ["recursive", "iterative"] {
        tool("scc-enumerate", dir.path())
            .arg("-i")
            .arg(&input)
            .args(["--repr", "dense", "--traversal", traversal])
            .assert()
            .success()
            .stdout("0\n\n2 3\n\n1\n\n3 strongly connected components\n");
    }
}

#[test]
fn scc_json_output() {
    let dir = TempDir::new().expect("tempdir");
    let output = tool("scc-enumerate", dir.path())
        .args(["--json", "--repr", "sparse"])
        .write_stdin("5\n")
        .output()
        .expect("scc-enumerate should not crash");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["count"], 5);
    assert_eq!(json["components"].as_array().map(Vec::len), Some(5));
}

#[test]
fn scc_named_graph_prints_names() {
    let dir = TempDir::new().expect("tempdir");
    let out = tool("scc-enumerate", dir.path())
        .write_stdin(CITIES)
        .output()
        .expect("scc-enumerate should not crash");
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.last(), Some(&"3 strongly connected components"));
    assert!(lines.iter().any(|l| *l == "lyon nice" || *l == "nice lyon"));
    assert!(lines.contains(&"paris"));
    assert!(lines.contains(&"brest"));
}

#[test]
fn scc_recursion_limit_fails_without_output() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("kosa.toml"),
        "[traversal]\nstrategy = \"recursive\"\nmax_recursion_depth = 8\n",
    )
    .expect("write config");

    let mut chain = String::from("64\n");
    for v in 0..63 {
        chain.push_str(&format!("{v} {}\n", v + 1));
    }

    tool("scc-enumerate", dir.path())
        .write_stdin(chain.clone())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("recursion"));

    tool("scc-enumerate", dir.path())
        .args(["--traversal", "iterative"])
        .write_stdin(chain)
        .assert()
        .success()
        .stdout(predicate::str::ends_with("64 strongly connected components\n"));
}

#[test]
fn scc_deep_chain_with_huge_configured_depth() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("kosa.toml"),
        "[traversal]\nstrategy = \"recursive\"\nmax_recursion_depth = 1000000\n",
    )
    .expect("write config");

    let n = 200_000;
    let mut chain = format!("{n}\n");
    for v in 0..n - 1 {
        chain.push_str(&format!("{v} {}\n", v + 1));
    }

    tool("scc-enumerate", dir.path())
        .write_stdin(chain)
        .assert()
        .success()
        .stdout(predicate::str::ends_with("200000 strongly connected components\n"));
}

#[test]
fn scc_json_errors_are_json() {
    let dir = TempDir::new().expect("tempdir");
    let output = tool("scc-enumerate", dir.path())
        .arg("--json")
        .write_stdin("abc\n")
        .output()
        .expect("scc-enumerate should not crash");
    assert_eq!(output.status.code(), Some(1));

    let json: Value = serde_json::from_slice(&output.stderr).expect("valid JSON");
    assert_eq!(json["error"]["error_code"], "E1002");
}

#[test]
fn scc_bad_config_fails() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("broken.toml");
    std::fs::write(&cfg, "[graph\n").expect("write config");

    tool("scc-enumerate", dir.path())
        .arg("--config")
        .arg(&cfg)
        .write_stdin(TRIANGLE)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken.toml"));
}

// ---------------------------------------------------------------------------
// path-find
// ---------------------------------------------------------------------------

#[test]
fn path_found_by_handles() {
    let dir = TempDir::new().expect("tempdir");
    tool("path-find", dir.path())
        .args(["-start", "0", "-goal", "2", "--repr", "dense"])
        .write_stdin(TRIANGLE)
        .assert()
        .success()
        .stdout("0 -> 1 -> 2\n");
}

#[test]
fn path_found_by_names() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_graph(dir.path(), "cities.txt", CITIES);
    tool("path-find", dir.path())
        .arg("-i")
        .arg(&input)
        .args(["--start", "paris", "--goal", "nice"])
        .assert()
        .success()
        .stdout("paris -> lyon -> nice\n");
}

#[test]
fn no_path_is_success() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_graph(dir.path(), "cities.txt", CITIES);
    tool("path-find", dir.path())
        .arg("-i")
        .arg(&input)
        .args(["-start", "nice", "-goal", "paris"])
        .assert()
        .success()
        .stdout("no path found from nice to paris\n");
}

#[test]
fn endpoints_read_from_stdin() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_graph(dir.path(), "tri.txt", TRIANGLE);
    tool("path-find", dir.path())
        .arg("-i")
        .arg(&input)
        .write_stdin("2\n1\n")
        .assert()
        .success()
        .stdout("2 -> 0 -> 1\n");
}

#[test]
fn endpoints_required_when_graph_on_stdin() {
    let dir = TempDir::new().expect("tempdir");
    tool("path-find", dir.path())
        .args(["--start", "0"])
        .write_stdin(TRIANGLE)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--goal"));
}

#[test]
fn unknown_vertex_fails() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_graph(dir.path(), "cities.txt", CITIES);
    tool("path-find", dir.path())
        .arg("-i")
        .arg(&input)
        .args(["--start", "paris", "--goal", "rome"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("rome"));
}

#[test]
fn bad_flag_exits_one() {
    let dir = TempDir::new().expect("tempdir");
    tool("path-find", dir.path())
        .arg("--bogus")
        .assert()
        .code(1);
}

#[test]
fn help_exits_zero() {
    let dir = TempDir::new().expect("tempdir");
    tool("scc-enumerate", dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--traversal"));
}
