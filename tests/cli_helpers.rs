#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn data_dir_for_home(home: &TempDir) -> PathBuf {
    home.path().join(".fundfolio")
}

pub fn archive_dir_for_home(home: &TempDir) -> PathBuf {
    data_dir_for_home(home).join("archive")
}

pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("fundfolio"));
    cmd.env("HOME", home.path());
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let output = run_cmd(home, args)?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

/// Write a fund batch file inside the temp home and return its path
pub fn write_fund_batch(home: &TempDir, name: &str, labels: &[&str], values: &[&str]) -> PathBuf {
    let path = home.path().join(name);
    let text = format!("{}\n{}\n", labels.join("\t"), values.join("\t"));
    std::fs::write(&path, text).expect("failed to write batch file");
    path
}

pub fn add_funds(home: &TempDir, file: &Path, date: &str) -> Result<Value> {
    let file = file.to_string_lossy();
    run_cmd_json(home, &["--json", "add", "funds", &file, "--date", date])
}

pub fn add_assets(
    home: &TempDir,
    precious_metals: &str,
    crypto: &str,
    physical_gold: &str,
    date: &str,
) -> Result<Value> {
    run_cmd_json(
        home,
        &[
            "--json",
            "add",
            "assets",
            precious_metals,
            crypto,
            physical_gold,
            "--date",
            date,
        ],
    )
}

pub fn analyze_json(home: &TempDir, from: &str, to: &str) -> Result<Value> {
    run_cmd_json(home, &["--json", "analyze", "--from", from, "--to", to])
}
