use clap::Args;

use relabel::patterns::PatternConfig;
use relabel::tracker::ReplacementTracker;
use relabel::Error;

use super::CmdResult;

#[derive(Args)]
pub struct PatternsArgs {
    /// Rename pairs as OLD=NEW (repeatable)
    #[arg(long = "map", value_name = "OLD=NEW", required = true)]
    pub map: Vec<String>,
}

/// Print the pattern configuration that `run` would derive, without
/// touching the filesystem.
pub fn run(args: PatternsArgs) -> CmdResult<PatternConfig> {
    let pairs = super::parse_map_pairs(&args.map)?;

    let mut tracker = ReplacementTracker::new();
    for (old_id, new_id) in &pairs {
        tracker.track(old_id, new_id, "cli");
    }

    let config = tracker
        .pattern_config()
        .ok_or_else(|| Error::Config("No valid rename pairs supplied".to_string()))?;
    Ok((config, 0))
}
