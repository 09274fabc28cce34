//! Event logging subsystem for vrocli.
//!
//! Every executed command appends one line to an NDJSON audit log next to the
//! configuration file, so a team sharing a package can reconstruct who pulled,
//! pushed, expanded, or built what, and when. Logging is best-effort: a failed
//! append warns on stderr but never fails the command that triggered it.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: the command performed (pull, push, expand, build)
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `package`: optional package name for package-scoped events
//! - `details`: freeform object with action-specific details

use crate::error::{Result, VrocliError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// File name of the audit log, relative to the current directory.
pub const EVENTS_FILE: &str = "vrocli-events.ndjson";

/// Commands that are logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Package downloaded from a server
    Pull,
    /// Package uploaded to a server
    Push,
    /// Package expanded to module files
    Expand,
    /// Package rebuilt from module files
    Build,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Pull => write!(f, "pull"),
            EventAction::Push => write!(f, "push"),
            EventAction::Expand => write!(f, "expand"),
            EventAction::Build => write!(f, "build"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The command that was performed.
    pub action: EventAction,

    /// The actor who performed it (e.g., `user@HOST`).
    pub actor: String,

    /// Package name for package-scoped events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is set to the current time and the actor is determined
    /// from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            package: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the package name for this event.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| VrocliError::UserError(format!("failed to serialize event: {}", e)))
    }
}

/// Actor string for event metadata.
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the audit log at `path`.
///
/// The file is created on first use; each append produces exactly one line.
pub fn append_event<P: AsRef<Path>>(path: P, event: &Event) -> Result<()> {
    let path = path.as_ref();
    let json_line = event.to_ndjson_line()?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            VrocliError::UserError(format!(
                "failed to open events file '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        VrocliError::UserError(format!(
            "failed to write event to '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Log an event, downgrading failures to a warning.
///
/// The audit trail must never block the command itself.
pub fn log_event<P: AsRef<Path>>(path: P, event: Event) {
    if let Err(e) = append_event(path, &event) {
        eprintln!("Warning: failed to log event: {}", e);
    }
}
