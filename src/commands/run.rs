use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use relabel::executor::{self, ExecuteOptions, AUDIT_LOG_FILE};
use relabel::tracker::{ReplacementTracker, TrackOutcome};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Rename pairs as OLD=NEW (repeatable)
    #[arg(long = "map", value_name = "OLD=NEW", required = true)]
    pub map: Vec<String>,

    /// Root directory to scan
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Report matches without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Glob patterns excluded from substitution (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Source file attributed to tracked renames in the audit log
    #[arg(long, default_value = "cli")]
    pub source: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub modified_files: Vec<String>,
    pub total_modified: usize,
    pub tracked: usize,
    pub rejected: usize,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_log: Option<String>,
}

pub fn run(args: RunArgs) -> CmdResult<RunOutput> {
    let pairs = super::parse_map_pairs(&args.map)?;

    let mut tracker = ReplacementTracker::new();
    let mut rejected = 0;
    for (old_id, new_id) in &pairs {
        if tracker.track(old_id, new_id, &args.source) == TrackOutcome::Rejected {
            rejected += 1;
        }
    }

    let opts = ExecuteOptions {
        root: args.root.clone(),
        dry_run: args.dry_run,
        ignore: args.ignore,
    };
    let modified = executor::execute_id_replacements(&mut tracker, &opts)?;

    // The audit log only exists for live runs against a populated tracker.
    let audit_log = (!args.dry_run && tracker.has_replacements())
        .then(|| args.root.join(AUDIT_LOG_FILE).display().to_string());

    let output = RunOutput {
        total_modified: modified.len(),
        modified_files: modified,
        tracked: tracker.len(),
        rejected,
        dry_run: args.dry_run,
        audit_log,
    };
    Ok((output, 0))
}
