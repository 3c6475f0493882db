use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use relabel::executor::{self, ExecuteOptions};
use relabel::patterns::PatternConfig;
use relabel::utils::io;

use super::CmdResult;

#[derive(Args)]
pub struct ApplyArgs {
    /// Path to an externally supplied pattern configuration (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Root directory to scan
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Report matches without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Glob patterns excluded from substitution (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub ignore: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutput {
    pub config: String,
    pub modified_files: Vec<String>,
    pub total_modified: usize,
    pub dry_run: bool,
}

pub fn run(args: ApplyArgs) -> CmdResult<ApplyOutput> {
    let raw = io::read_file(&args.config, "load pattern config")?;
    let config: PatternConfig = serde_json::from_str(&raw)?;

    let opts = ExecuteOptions {
        root: args.root,
        dry_run: args.dry_run,
        ignore: args.ignore,
    };
    let modified = executor::execute_config_replacements(&config, &opts)?;

    let output = ApplyOutput {
        config: args.config.display().to_string(),
        total_modified: modified.len(),
        modified_files: modified,
        dry_run: args.dry_run,
    };
    Ok((output, 0))
}
