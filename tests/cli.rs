//! End-to-end CLI tests for `secure-id`.

use anyhow::ensure;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::process::{Command, Output};

fn secure_id() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_secure-id"));
    cmd.env_remove("SECURE_ID_CONFIG")
        .env_remove("SECURE_ID_SOURCES")
        .env_remove("SECURE_ID_FALLBACK_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn run_ok(cmd: &mut Command) -> anyhow::Result<String> {
    let output = cmd.output()?;
    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "secure-id failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(String::from_utf8(output.stdout)?)
}

fn run_json(cmd: &mut Command) -> anyhow::Result<Value> {
    let stdout = run_ok(cmd.arg("--json"))?;
    Ok(serde_json::from_str(&stdout)?)
}

fn run_failure(cmd: &mut Command) -> anyhow::Result<Output> {
    let output = cmd.output()?;
    if output.status.success() {
        return Err(anyhow::anyhow!("secure-id unexpectedly succeeded"));
    }
    Ok(output)
}

fn is_uuid_v4(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, &c)| match i {
            8 | 13 | 18 | 23 => c == b'-',
            14 => c == b'4',
            19 => matches!(c, b'8' | b'9' | b'a' | b'b'),
            _ => matches!(c, b'0'..=b'9' | b'a'..=b'f'),
        })
}

fn is_hex32(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

#[test]
fn generate_prints_one_uuid_per_line() -> anyhow::Result<()> {
    let stdout = run_ok(secure_id().arg("generate"))?;
    let lines: Vec<&str> = stdout.lines().collect();
    ensure!(lines.len() == 1, "unexpected output: {stdout}");
    ensure!(lines.iter().all(|l| is_uuid_v4(l)), "unexpected output: {stdout}");

    let stdout = run_ok(secure_id().args(["generate", "--count", "4"]))?;
    let ids: HashSet<&str> = stdout.lines().collect();
    ensure!(ids.len() == 4, "expected 4 distinct ids: {stdout}");
    Ok(())
}

#[test]
fn generate_json_reports_origin() -> anyhow::Result<()> {
    let value = run_json(secure_id().args(["generate", "--count", "3"]))?;
    let Some(items) = value.as_array() else {
        anyhow::bail!("expected array: {value}");
    };
    ensure!(items.len() == 3);
    for item in items {
        ensure!(item.get("source") == Some(&Value::from("os")), "{item}");
        ensure!(item.get("tier") == Some(&Value::from("direct-uuid")), "{item}");
        let id = item.get("id").and_then(Value::as_str).unwrap_or_default();
        ensure!(is_uuid_v4(id), "{item}");
    }
    Ok(())
}

#[test]
fn no_direct_uuid_falls_back_to_hex() -> anyhow::Result<()> {
    let value = run_json(secure_id().args(["generate", "--no-direct-uuid", "--source", "thread"]))?;
    let item = value.get(0).cloned().unwrap_or_default();
    ensure!(item.get("tier") == Some(&Value::from("filled-bytes")), "{value}");
    ensure!(item.get("source") == Some(&Value::from("thread")), "{value}");
    let id = item.get("id").and_then(Value::as_str).unwrap_or_default();
    ensure!(is_hex32(id), "{value}");

    let stdout = run_ok(secure_id().args([
        "generate",
        "--no-direct-uuid",
        "--fallback-format",
        "uuid-v4",
    ]))?;
    ensure!(is_uuid_v4(stdout.trim_end()), "unexpected output: {stdout}");
    Ok(())
}

#[test]
fn sources_reflect_env_and_flags() -> anyhow::Result<()> {
    let value = run_json(secure_id().arg("sources"))?;
    ensure!(value.get("chain") == Some(&serde_json::json!(["os", "thread"])), "{value}");
    ensure!(value.get("direct_uuid") == Some(&Value::Bool(true)), "{value}");
    ensure!(value.get("fallback_format") == Some(&Value::from("raw-hex")), "{value}");

    let value = run_json(
        secure_id()
            .arg("sources")
            .env("SECURE_ID_SOURCES", "thread,os")
            .env("SECURE_ID_FALLBACK_FORMAT", "uuid-v4"),
    )?;
    ensure!(value.get("chain") == Some(&serde_json::json!(["thread", "os"])), "{value}");
    ensure!(value.get("fallback_format") == Some(&Value::from("uuid-v4")), "{value}");

    let value = run_json(secure_id().args(["sources", "--source", "os"]))?;
    ensure!(value.get("chain") == Some(&serde_json::json!(["os"])), "{value}");
    Ok(())
}

#[test]
fn config_file_is_applied_and_flags_override_it() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("secure-id.json");
    fs::write(
        &path,
        r#"{"sources": ["thread"], "direct_uuid": false, "fallback_format": "uuid-v4"}"#,
    )?;

    let value = run_json(secure_id().arg("sources").arg("--config").arg(&path))?;
    ensure!(value.get("chain") == Some(&serde_json::json!(["thread"])), "{value}");
    ensure!(value.get("direct_uuid") == Some(&Value::Bool(false)), "{value}");

    let value = run_json(
        secure_id()
            .args(["sources", "--source", "os", "--fallback-format", "raw-hex"])
            .env("SECURE_ID_CONFIG", &path),
    )?;
    ensure!(value.get("chain") == Some(&serde_json::json!(["os"])), "{value}");
    ensure!(value.get("fallback_format") == Some(&Value::from("raw-hex")), "{value}");
    Ok(())
}

#[test]
fn empty_source_chain_fails_with_fixed_message() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("secure-id.json");
    fs::write(&path, r#"{"sources": []}"#)?;

    let output = run_failure(secure_id().arg("generate").arg("--config").arg(&path))?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    ensure!(output.stdout.is_empty());
    ensure!(
        stderr.contains("Secure random generator unavailable"),
        "unexpected stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn invalid_inputs_are_rejected() -> anyhow::Result<()> {
    run_failure(secure_id().args(["generate", "--count", "0"]))?;
    run_failure(secure_id().args(["generate", "--source", "math-random"]))?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"sources": ["os"], "seed": 4}"#)?;
    let output = run_failure(secure_id().arg("generate").arg("--config").arg(&path))?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    ensure!(stderr.contains("broken.json"), "unexpected stderr: {stderr}");
    Ok(())
}
