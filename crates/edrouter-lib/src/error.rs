use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the edrouter library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A journal line could not be parsed as an event object.
    #[error("malformed journal line {line}: {message}")]
    MalformedLine { line: u64, message: String },

    /// The tailed journal vanished, moved, or was truncated underneath the tailer.
    #[error("journal file {path} is no longer available")]
    FileUnavailable { path: PathBuf },

    /// No `Journal.*.log` files were found in a journal directory.
    #[error("no journal files found in {path}")]
    JournalDirEmpty { path: PathBuf },

    /// The CSV header row did not match any known route layout.
    #[error("unknown route format with columns: {}", .columns.join(", "))]
    UnknownRouteFormat { columns: Vec<String> },

    /// A CSV row had fewer columns than its header requires.
    #[error("route row {row} is truncated: expected {expected} columns, found {found}")]
    TruncatedRow {
        row: u64,
        expected: usize,
        found: usize,
    },

    /// A CSV field could not be decoded into its column type.
    #[error("invalid value '{value}' for column '{column}' at row {row}")]
    InvalidField {
        row: u64,
        column: String,
        value: String,
    },

    /// The requested route file does not exist.
    #[error("route file not found at {path}")]
    RouteFileNotFound { path: PathBuf },

    /// A route was built from waypoints of more than one kind.
    #[error("route mixes {expected} and {found} waypoints")]
    MixedWaypoints {
        expected: &'static str,
        found: &'static str,
    },

    /// A waypoint position past the end of the route.
    #[error("waypoint {position} is out of range for a route of {len} waypoints")]
    WaypointOutOfRange { position: usize, len: usize },

    /// The player arrived at a system that is not part of the route.
    #[error("system {name} is not in the route{}", format_suggestions(.suggestions))]
    SystemNotInRoute {
        name: String,
        suggestions: Vec<String>,
    },

    /// The planner returned a payload that could not be turned into a route.
    #[error("malformed planner result: {message}")]
    MalformedResult { message: String },

    /// The planner reported an error, or the request itself failed.
    #[error("route planner error: {message}")]
    Planner { message: String },

    /// A module id did not match any known drive or booster.
    #[error("unknown module {item}")]
    UnknownModule { item: String },

    /// Raised when ship data fails validation.
    #[error("invalid ship data: {message}")]
    ShipDataValidation { message: String },

    /// An operation needed ship stats before any loadout was seen.
    #[error("no ship loadout available yet")]
    NoShipLoaded,

    /// A configuration value was missing or out of range.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV reader/writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
