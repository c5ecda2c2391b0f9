//! CLI Tests - Process Contract
//!
//! Runs the compiled binary with a scrubbed environment and checks the
//! stdout envelope and the exit code. None of these reach a real venue.

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{Value, json};

const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn workdir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("order-bridge-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn bridge(name: &str, args: &[&str], env: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_order-bridge"))
        .args(args)
        .env_clear()
        .envs(env.iter().copied())
        .current_dir(workdir(name))
        .output()
        .unwrap()
}

fn envelope(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 1, "expected exactly one stdout line, got {stdout:?}");
    serde_json::from_str(lines[0]).unwrap()
}

#[test]
fn test_missing_private_key_is_config_error() {
    let output = bridge("nokey", &["balance"], &[]);
    let v = envelope(&output);
    assert_eq!(v["success"], json!(false));
    assert_eq!(v["error_type"], json!("ConfigError"));
    assert!(v["error"].as_str().unwrap().contains("POLYMARKET_PRIVATE_KEY"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_bad_side_is_invalid_input() {
    let output = bridge(
        "badside",
        &["market", "--token", "1", "--side", "HOLD", "--size", "5"],
        &[("POLYMARKET_PRIVATE_KEY", TEST_KEY)],
    );
    let v = envelope(&output);
    assert_eq!(v["success"], json!(false));
    assert_eq!(v["error_type"], json!("InvalidInput"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unknown_command_is_invalid_input() {
    let output = bridge("nocmd", &[], &[("POLYMARKET_PRIVATE_KEY", TEST_KEY)]);
    let v = envelope(&output);
    assert_eq!(v["error"], json!("Unknown command. Use --help for usage."));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_zero() {
    let output = bridge("help", &["--help"], &[]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cancel-all"));
    assert!(stdout.contains("derive-key"));
}

#[test]
fn test_invalid_config_is_config_error() {
    let output = bridge(
        "badchain",
        &["balance"],
        &[
            ("POLYMARKET_PRIVATE_KEY", TEST_KEY),
            ("POLYMARKET_CHAIN_ID", "1"),
        ],
    );
    let v = envelope(&output);
    assert_eq!(v["error_type"], json!("ConfigError"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unreachable_venue_is_network_error() {
    let output = bridge(
        "offline",
        &["market", "--token", "1", "--side", "BUY", "--size", "5"],
        &[
            ("POLYMARKET_PRIVATE_KEY", TEST_KEY),
            ("POLYMARKET_CLOB_URL", "http://127.0.0.1:1"),
        ],
    );
    let v = envelope(&output);
    assert_eq!(v["success"], json!(false));
    assert_eq!(v["error_type"], json!("NetworkError"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_oversized_order_is_invalid_input() {
    let output = bridge(
        "oversized",
        &[
            "place",
            "--token",
            "1",
            "--side",
            "BUY",
            "--size",
            "100000000000000000000000",
            "--price",
            "0.5",
        ],
        &[
            ("POLYMARKET_PRIVATE_KEY", TEST_KEY),
            ("POLYMARKET_CLOB_URL", "http://127.0.0.1:1"),
        ],
    );
    let v = envelope(&output);
    assert_eq!(v["success"], json!(false));
    assert_eq!(v["error_type"], json!("InvalidInput"));
    assert!(v["error"].as_str().unwrap().contains("out of range"));
    assert_eq!(output.status.code(), Some(1));
}
