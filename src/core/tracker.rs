//! Rename tracker — canonical mapping set and append-only audit log.
//!
//! The tracker is the only mutable state in the engine. It is owned by the
//! top-level driver and passed by reference into the migration pass and the
//! executor; `reset` is an explicit lifecycle call, not hidden module state.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::patterns::{self, PatternConfig};
use crate::utils::io;

/// One tracked rename: `old_id` is unique across the tracker; the last
/// write for a given `old_id` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRecord {
    pub old_id: String,
    pub new_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogEntryKind {
    Tracked,
    Replaced,
}

/// Append-only audit entry. `tracked` entries carry the source file the
/// migration pass was editing; `replaced` entries carry the file the
/// substitution touched. Substitution is file-scoped, so `replaced`
/// entries have no line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub kind: LogEntryKind,
    pub old_id: String,
    pub new_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Search expression of the rule that produced a `replaced` entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_content: Option<String>,
    /// Replacement template of the rule that produced a `replaced` entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_replacements: usize,
    pub generated_at: String,
}

/// Immutable snapshot written once per executor run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub summary: AuditSummary,
    pub replacements: Vec<RenameRecord>,
    pub detailed_log: Vec<LogEntry>,
}

/// Result of offering a rename pair to the tracker. Invalid pairs (empty
/// or identical ids) are rejected without mutation or logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    Accepted,
    Rejected,
}

/// Ordered-insertion mapping `old_id -> new_id` plus the append-only log.
#[derive(Debug, Clone, Default)]
pub struct ReplacementTracker {
    records: Vec<RenameRecord>,
    log: Vec<LogEntry>,
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ReplacementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one rename discovered by the migration pass.
    ///
    /// Rejects (no mutation, no log entry) when either id is empty or the
    /// ids are equal. Otherwise upserts the mapping (a repeat `old_id`
    /// overwrites in place, keeping its original position) and appends a
    /// `tracked` entry.
    pub fn track(&mut self, old_id: &str, new_id: &str, source_file: &str) -> TrackOutcome {
        if old_id.is_empty() || new_id.is_empty() || old_id == new_id {
            return TrackOutcome::Rejected;
        }

        match self.records.iter_mut().find(|r| r.old_id == old_id) {
            Some(existing) => existing.new_id = new_id.to_string(),
            None => self.records.push(RenameRecord {
                old_id: old_id.to_string(),
                new_id: new_id.to_string(),
            }),
        }

        self.log.push(LogEntry {
            kind: LogEntryKind::Tracked,
            old_id: old_id.to_string(),
            new_id: new_id.to_string(),
            source_file: Some(source_file.to_string()),
            file: None,
            line: None,
            old_content: None,
            new_content: None,
            timestamp: now_iso8601(),
        });

        TrackOutcome::Accepted
    }

    /// Record one applied substitution (called by the executor).
    /// `old_content`/`new_content` carry the rule that fired; substitution
    /// is file-scoped, so there is no line number.
    pub fn record_replacement(
        &mut self,
        old_id: &str,
        new_id: &str,
        file: &str,
        old_content: &str,
        new_content: &str,
    ) {
        self.log.push(LogEntry {
            kind: LogEntryKind::Replaced,
            old_id: old_id.to_string(),
            new_id: new_id.to_string(),
            source_file: None,
            file: Some(file.to_string()),
            line: None,
            old_content: Some(old_content.to_string()),
            new_content: Some(new_content.to_string()),
            timestamp: now_iso8601(),
        });
    }

    pub fn has_replacements(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Defensive copy of the mapping, never the live records.
    pub fn replacements(&self) -> Vec<RenameRecord> {
        self.records.clone()
    }

    /// Return the tracker to its uninitialized state. Idempotent.
    pub fn reset(&mut self) {
        self.records.clear();
        self.log.clear();
    }

    /// Derive the pattern configuration for the current mapping.
    /// `None` when the tracker is empty.
    pub fn pattern_config(&self) -> Option<PatternConfig> {
        if self.records.is_empty() {
            return None;
        }
        Some(patterns::config_for(&self.records))
    }

    /// Persist the pattern configuration. Writes nothing and returns
    /// `false` when the tracker is empty.
    pub fn write_config(&self, path: &Path) -> Result<bool> {
        let Some(config) = self.pattern_config() else {
            return Ok(false);
        };
        let json = serde_json::to_string_pretty(&config)?;
        io::write_file(path, &json, "write pattern config")?;
        Ok(true)
    }

    /// Snapshot the audit log. Safe on an empty tracker (count 0).
    pub fn audit_log(&self) -> AuditLog {
        AuditLog {
            summary: AuditSummary {
                total_replacements: self.records.len(),
                generated_at: now_iso8601(),
            },
            replacements: self.records.clone(),
            detailed_log: self.log.clone(),
        }
    }

    /// Persist the audit log snapshot.
    pub fn write_audit_log(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.audit_log())?;
        io::write_file(path, &json, "write audit log")
    }
}
