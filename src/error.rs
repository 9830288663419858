//! Error types for the standings engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during engine operation.
///
/// None of these are fatal: the engine holds no state that a failed call
/// leaves half-written, so callers may log and carry on.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed team or match record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// A raw goal or gamelle counter was negative
    #[error("Match {match_id}: {field} must be a non-negative count (got {value})")]
    NegativeCount {
        match_id: String,
        field: &'static str,
        value: i64,
    },

    /// Both sides of a match are the same team
    #[error("Match {match_id}: team {team_id} cannot play against itself")]
    SelfMatch { match_id: String, team_id: String },

    /// Team ID already present in the roster
    #[error("Duplicate team ID {0}")]
    DuplicateTeam(String),

    /// Match ID already present in the schedule
    #[error("Duplicate match ID {0}")]
    DuplicateMatch(String),

    /// A match references a team that is not in the roster
    #[error("Match {match_id} references unknown team {team_id}")]
    UnknownTeam { match_id: String, team_id: String },

    /// No match with this ID
    #[error("Unknown match ID {0}")]
    UnknownMatch(String),

    /// Unrecognised scoring configuration value
    #[error("Invalid value {value:?} for {key}: expected one of {expected}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Missing input file arguments
    #[error("Missing input file argument. Usage: foosball-standings <teams.csv> <matches.csv>")]
    MissingArgument,
}
