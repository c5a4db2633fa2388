//! Integration tests for the ink-equations binary.
//!
//! These tests run the compiled binary on the JSON ink documents in demos/
//! and compare its output with the golden .expect.txt files next to them.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ink-equations"))
}

fn demos_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("demos");
    path
}

/// Run the binary with the given stdin input and extra CLI args.
fn run(input: &str, extra_args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::Write;
            if let Some(ref mut stdin) = child.stdin {
                stdin.write_all(input.as_bytes()).ok();
            }
            child.wait_with_output()
        })
        .expect("Failed to run binary")
}

/// Run the binary and return stdout, failing on a non-zero exit.
fn run_binary(input: &str, extra_args: &[&str]) -> String {
    let output = run(input, extra_args);
    assert!(
        output.status.success(),
        "Binary exited with {:?}:\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Non-UTF8 output")
}

/// Find all (name, ink_file, expect_file) triples in the demos directory.
fn find_demo_pairs() -> Vec<(String, PathBuf, PathBuf)> {
    let dir = demos_dir();
    let mut pairs = Vec::new();
    if let Ok(entries) = fs::read_dir(&dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let file_name = path.file_name().unwrap().to_string_lossy().to_string();
            if let Some(name) = file_name.strip_suffix(".ink.json") {
                let expect_path = dir.join(format!("{}.expect.txt", name));
                if expect_path.exists() {
                    pairs.push((name.to_string(), path, expect_path));
                }
            }
        }
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

fn read_demo(name: &str) -> String {
    fs::read_to_string(demos_dir().join(format!("{}.ink.json", name)))
        .unwrap_or_else(|e| panic!("Cannot read demo {}: {}", name, e))
}

// ─── Golden file tests ──────────────────────────────────────────────────────

#[test]
fn test_all_demos_match_expect() {
    let pairs = find_demo_pairs();
    assert!(!pairs.is_empty(), "No demo pairs found in {:?}", demos_dir());

    let mut failures = Vec::new();
    for (name, ink_file, expect_file) in &pairs {
        let src = fs::read_to_string(ink_file)
            .unwrap_or_else(|e| panic!("Cannot read {:?}: {}", ink_file, e));
        let expected = fs::read_to_string(expect_file)
            .unwrap_or_else(|e| panic!("Cannot read {:?}: {}", expect_file, e));

        let actual = run_binary(&src, &[]);
        if actual != expected {
            failures.push(format!(
                "FAIL: {} (expected {:?}, got {:?})",
                name, expected, actual
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Golden file mismatches ({}/{}):\n{}",
            failures.len(),
            pairs.len(),
            failures.join("\n")
        );
    }
}

#[test]
fn test_input_file_argument() {
    let path = demos_dir().join("fraction.ink.json");
    let output = run_binary("", &[path.to_str().unwrap()]);
    assert_eq!(output, "\\frac{7}{3}\n");
}

// ─── Flag tests ─────────────────────────────────────────────────────────────

#[test]
fn test_tree_flag() {
    let output = run_binary(&read_demo("fraction"), &["--tree"]);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    let line = lines
        .iter()
        .find(|l| l.contains("FRACTION_LINE"))
        .expect("no fraction line in tree");
    assert!(line.contains("parent=-"));
    assert!(line.contains(" ABOVE=[#") && line.contains(" BELOW=[#"));
    let children = lines.iter().filter(|l| !l.contains("parent=-")).count();
    assert_eq!(children, 2);
}

#[test]
fn test_output_flag() {
    let out = std::env::temp_dir().join(format!("ink-equations-{}.txt", std::process::id()));
    let stdout = run_binary(&read_demo("cos"), &["-o", out.to_str().unwrap()]);
    assert!(stdout.is_empty());
    let written = fs::read_to_string(&out).expect("output file not written");
    fs::remove_file(&out).ok();
    assert_eq!(written, "cos\n");
}

#[test]
fn test_max_symbol_strokes_and_verbose_flags() {
    let output = run_binary(
        &read_demo("exponent"),
        &["--max-symbol-strokes", "2", "--verbose", "--log-level", "debug"],
    );
    assert_eq!(output, "x^{2}+1\n");
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[test]
fn test_malformed_json_exits_with_error() {
    let output = run("{ not json", &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "), "stderr: {}", stderr);
}

#[test]
fn test_unknown_label_exits_with_error() {
    let doc = r#"{ "strokes": [[[0, 0], [1, 1]]], "symbols": [{ "label": "STAR", "strokes": [0] }] }"#;
    let output = run(doc, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no such symbol: STAR"));
}

#[test]
fn test_missing_input_file() {
    let output = run("", &["/nonexistent/ink.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read '/nonexistent/ink.json'"));
}

#[test]
fn test_unwritable_output_file() {
    let output = run(&read_demo("cos"), &["-o", "/nonexistent/dir/out.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("cannot write '/nonexistent/dir/out.txt'"),
        "stderr: {}",
        stderr
    );
}
