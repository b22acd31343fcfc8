use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Write a data directory holding the given catalog and glossary documents.
pub fn data_dir(catalog: &Value, glossary: &Value) -> Result<TempDir> {
    let dir = TempDir::new().context("failed to allocate data dir")?;
    write_json(&dir.path().join(legalmap::CATALOG_FILE), catalog)?;
    write_json(&dir.path().join(legalmap::GLOSSARY_FILE), glossary)?;
    Ok(dir)
}

pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

pub fn query_command(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_legalmap-query"));
    cmd.arg("--data-dir").arg(data_dir);
    cmd.env_remove("LEGALMAP_ROOT");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Parse JSON-lines stdout into values.
pub fn json_lines(stdout: &[u8]) -> Result<Vec<Value>> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("line {} is not JSON", idx + 1))
        })
        .collect()
}

pub fn names(lines: &[Value]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| line.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}
