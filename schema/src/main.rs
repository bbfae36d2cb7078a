use std::{
    fs::{self, canonicalize},
    path::PathBuf,
};

use anyhow::{Context, Result};
use metadata::{RecognizerConfig, SymbolEntry};
use schemars::schema_for;

const VSCODE_DIR: &str = "../.vscode";

fn main() -> Result<()> {
    let vscode_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(VSCODE_DIR);
    fs::create_dir_all(&vscode_dir)?;
    let vscode_dir = canonicalize(&vscode_dir).context("定位 .vscode 目录失败")?;

    let config_schema = serde_json::to_string_pretty(&schema_for!(RecognizerConfig))?;
    fs::write(vscode_dir.join("config.schema.json"), config_schema)?;

    let symbols_schema = serde_json::to_string_pretty(&schema_for!(Vec<SymbolEntry>))?;
    fs::write(vscode_dir.join("symbols.schema.json"), symbols_schema)?;
    Ok(())
}
