//! Generic recursive find-and-substitute primitive.
//!
//! Expands a file glob, filters out dependency/VCS directories, excluded
//! artifact paths, and caller-supplied ignore globs, then applies a list
//! of regex rules to each surviving file. One read and at most one write
//! per file; dry-run performs identical matching with zero writes.

use std::fs;
use std::path::{Path, PathBuf};

use glob_match::glob_match;
use regex::Regex;
use serde::Serialize;

use crate::core::error::{Error, Result};
use crate::core::patterns::Rule;
use crate::utils::io;

/// Dependency/VCS directories skipped at any depth.
pub const SKIP_DIRS: &[&str] = &["node_modules", "vendor", ".git", ".svn", ".hg"];

/// One substitution request: a file glob plus the rules to apply to it.
#[derive(Debug)]
pub struct ReplaceRequest<'a> {
    pub file_pattern: &'a str,
    pub rules: &'a [Rule],
    pub dry_run: bool,
    /// Caller-supplied globs; matching paths are left untouched.
    pub ignore: &'a [String],
    /// Exact paths (transient artifacts, logs) never substituted.
    pub exclude_paths: &'a [PathBuf],
}

/// Per-file result of one rule application pass.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub file: String,
    pub changed: bool,
}

fn in_skipped_dir(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => a == b,
    }
}

/// Apply every rule in `req` to every file matching the glob.
///
/// Returns one outcome per visited file. Unreadable files (binary,
/// permission) are skipped rather than fatal; a bad glob or a rule that
/// fails to compile is an error, which the executor treats as an isolated
/// rule failure.
pub fn replace_in_tree(req: &ReplaceRequest) -> Result<Vec<FileOutcome>> {
    let compiled: Vec<(Regex, &str)> = req
        .rules
        .iter()
        .map(|rule| {
            Regex::new(&rule.from)
                .map(|re| (re, rule.to.as_str()))
                .map_err(|e| Error::Pattern(format!("'{}': {}", rule.from, e)))
        })
        .collect::<Result<_>>()?;

    let entries = glob::glob(req.file_pattern)
        .map_err(|e| Error::Pattern(format!("invalid glob '{}': {}", req.file_pattern, e)))?;

    let mut outcomes = Vec::new();

    for path in entries.filter_map(|entry| entry.ok()) {
        if !path.is_file() || in_skipped_dir(&path) {
            continue;
        }
        if req.exclude_paths.iter().any(|x| same_file(x, &path)) {
            continue;
        }
        let display = path.to_string_lossy().to_string();
        if req.ignore.iter().any(|pat| glob_match(pat, &display)) {
            continue;
        }

        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };

        let mut updated = content.clone();
        for (re, to) in &compiled {
            updated = re.replace_all(&updated, *to).into_owned();
        }

        let changed = updated != content;
        if changed && !req.dry_run {
            io::write_file(&path, &updated, "apply substitution")?;
        }

        outcomes.push(FileOutcome {
            file: display,
            changed,
        });
    }

    Ok(outcomes)
}
