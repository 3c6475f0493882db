// Public modules
pub mod error;
pub mod executor;
pub mod patterns;
pub mod replace;
pub mod tracker;

// Re-export common types for convenience
pub use error::{Error, Result};
pub use executor::{execute_config_replacements, execute_id_replacements, ExecuteOptions};
pub use patterns::{OperationGroup, PatternConfig, Rule};
pub use replace::{FileOutcome, ReplaceRequest};
pub use tracker::{AuditLog, LogEntry, LogEntryKind, RenameRecord, ReplacementTracker, TrackOutcome};
