//! Executor — materializes the pattern configuration and runs it tree-wide.
//!
//! Two entry points: `execute_id_replacements` drives the tracker-derived
//! configuration (with the round trip through the transient artifact, the
//! audit log, and unconditional cleanup), and `execute_config_replacements`
//! runs a caller-owned configuration as a batched pass per group.
//!
//! Everything is strictly sequential (one group, then one rule, at a
//! time) so the audit log ordering is reproducible across runs.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::core::patterns::{self, PatternConfig};
use crate::core::replace::{self, ReplaceRequest};
use crate::core::tracker::ReplacementTracker;
use crate::log_status;
use crate::utils::io;

/// Transient pattern-configuration artifact, written under the root and
/// removed before the executor returns.
pub const CONFIG_ARTIFACT: &str = "relabel-patterns.json";

/// Audit log artifact, written under the root once per run.
pub const AUDIT_LOG_FILE: &str = "relabel-audit.json";

#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    pub root: PathBuf,
    pub dry_run: bool,
    pub ignore: Vec<String>,
}

/// Join the root with a group's file pattern. A root of `.` leaves the
/// pattern unmodified.
fn resolve_glob(root: &Path, files: &str) -> String {
    if root == Path::new(".") {
        files.to_string()
    } else {
        format!("{}/{}", root.display(), files)
    }
}

/// Apply the tracker-derived configuration across the tree under
/// `opts.root` and return the deduplicated list of modified files.
///
/// An empty tracker returns immediately without touching the filesystem.
/// In a live run the configuration round-trips through the transient
/// artifact before use, and the artifact is deleted whether the run
/// succeeded or failed; a dry run issues zero writes, so it uses the
/// in-memory configuration directly and skips the audit log as well.
/// Rule-level failures are reported and skipped, never fatal.
pub fn execute_id_replacements(
    tracker: &mut ReplacementTracker,
    opts: &ExecuteOptions,
) -> Result<Vec<String>> {
    let Some(config) = tracker.pattern_config() else {
        return Ok(Vec::new());
    };

    let config_path = opts.root.join(CONFIG_ARTIFACT);
    let audit_path = opts.root.join(AUDIT_LOG_FILE);
    let exclude = [config_path.clone(), audit_path.clone()];

    if opts.dry_run {
        let modified = apply_rule_by_rule(tracker, &config, opts, &exclude);
        return Ok(modified.into_iter().collect());
    }

    tracker.write_config(&config_path)?;

    let outcome = (|| -> Result<BTreeSet<String>> {
        let raw = io::read_file(&config_path, "reload pattern config")?;
        let reloaded: PatternConfig = serde_json::from_str(&raw)?;
        Ok(apply_rule_by_rule(tracker, &reloaded, opts, &exclude))
    })();

    // Cleanup is unconditional: the artifact must be gone on every exit path.
    let _ = fs::remove_file(&config_path);

    let modified = outcome?;
    tracker.write_audit_log(&audit_path)?;

    Ok(modified.into_iter().collect())
}

/// One rule at a time, in group order. Each rule that changed at least one
/// file contributes `replaced` audit entries with identifiers recovered
/// from the rule's quoted tokens.
fn apply_rule_by_rule(
    tracker: &mut ReplacementTracker,
    config: &PatternConfig,
    opts: &ExecuteOptions,
    exclude: &[PathBuf],
) -> BTreeSet<String> {
    let mut modified = BTreeSet::new();

    for group in &config.operations {
        let file_pattern = resolve_glob(&opts.root, &group.files);
        for rule in &group.patterns {
            let req = ReplaceRequest {
                file_pattern: &file_pattern,
                rules: std::slice::from_ref(rule),
                dry_run: opts.dry_run,
                ignore: &opts.ignore,
                exclude_paths: exclude,
            };
            match replace::replace_in_tree(&req) {
                Ok(outcomes) => {
                    let (old_id, new_id) =
                        patterns::recover_pair(&rule.from, &rule.to).unwrap_or_default();
                    for outcome in outcomes.into_iter().filter(|o| o.changed) {
                        tracker.record_replacement(
                            &old_id,
                            &new_id,
                            &outcome.file,
                            &rule.from,
                            &rule.to,
                        );
                        modified.insert(outcome.file);
                    }
                }
                Err(e) => {
                    log_status!("replace", "Rule '{}' failed, continuing: {}", rule.from, e);
                }
            }
        }
    }

    modified
}

/// Apply an externally supplied configuration. Rules within one group run
/// as a single batched multi-pattern pass per file. No audit log is
/// produced and no transient artifact exists; the configuration is
/// caller-owned.
pub fn execute_config_replacements(
    config: &PatternConfig,
    opts: &ExecuteOptions,
) -> Result<Vec<String>> {
    let mut modified = BTreeSet::new();

    for group in &config.operations {
        let file_pattern = resolve_glob(&opts.root, &group.files);
        let req = ReplaceRequest {
            file_pattern: &file_pattern,
            rules: &group.patterns,
            dry_run: opts.dry_run,
            ignore: &opts.ignore,
            exclude_paths: &[],
        };
        match replace::replace_in_tree(&req) {
            Ok(outcomes) => {
                for outcome in outcomes.into_iter().filter(|o| o.changed) {
                    modified.insert(outcome.file);
                }
            }
            Err(e) => {
                log_status!("replace", "Group '{}' failed, continuing: {}", group.files, e);
            }
        }
    }

    Ok(modified.into_iter().collect())
}
