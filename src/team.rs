//! Team model and its derived aggregates.
//!
//! The `points`, `goals` and `pratfalls_absorbed` fields are a cache of the
//! aggregation over the match set. Only a full recompute writes them.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Separator between player names in the CSV `players` column.
pub const PLAYER_SEPARATOR: char = ';';

/// Totals accumulated for one team across the matches that count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Aggregate {
    /// Table points under the active point policy.
    pub points: i64,

    /// Raw goals scored by the team.
    pub goals: i64,

    /// Gamelles committed by opponents, each of which cost this team a goal.
    pub pratfalls_absorbed: i64,
}

impl Aggregate {
    /// `goals - pratfalls_absorbed`. May be negative.
    pub fn goal_difference(&self) -> i64 {
        self.goals - self.pratfalls_absorbed
    }

    /// Folds one match's contribution into the totals.
    ///
    /// Totals are wider than the per-match `u32` counters, so summing any
    /// realistic number of matches cannot overflow.
    pub fn absorb(&mut self, points: i64, goals: u32, opponent_pratfalls: u32) {
        self.points += points;
        self.goals += i64::from(goals);
        self.pratfalls_absorbed += i64::from(opponent_pratfalls);
    }
}

/// A tournament team.
///
/// # Invariants
///
/// - Aggregate fields equal a fresh recompute over the current match set
/// - `players` is display data only and never feeds scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    /// Short stable identifier, unique within the roster.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Player names in lineup order.
    pub players: Vec<String>,

    pub points: i64,
    pub goals: i64,
    pub pratfalls_absorbed: i64,
}

impl Team {
    /// Creates a team with zeroed aggregates.
    pub fn new(id: impl Into<String>, name: impl Into<String>, players: Vec<String>) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            players,
            points: 0,
            goals: 0,
            pratfalls_absorbed: 0,
        }
    }

    /// `goals - pratfalls_absorbed`, always derived.
    pub fn goal_difference(&self) -> i64 {
        self.aggregates().goal_difference()
    }

    /// The cached aggregate fields as one value.
    pub fn aggregates(&self) -> Aggregate {
        Aggregate {
            points: self.points,
            goals: self.goals,
            pratfalls_absorbed: self.pratfalls_absorbed,
        }
    }

    /// Returns a copy of this team carrying `totals` as its aggregates.
    pub fn with_aggregates(&self, totals: Aggregate) -> Self {
        Team {
            points: totals.points,
            goals: totals.goals,
            pratfalls_absorbed: totals.pratfalls_absorbed,
            ..self.clone()
        }
    }
}

/// Raw team record as read from CSV.
///
/// The aggregate columns are optional. When present they are only compared
/// against the recomputed values, never used as a data source.
#[derive(Debug, Deserialize)]
pub struct TeamRecord {
    pub id: String,
    pub name: String,

    /// `;`-separated player names
    #[serde(default)]
    pub players: Option<String>,

    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub goals: Option<i64>,
    #[serde(default, alias = "gamelles")]
    pub pratfalls: Option<i64>,
}

impl TeamRecord {
    /// Parses the raw record into a team with zeroed aggregates.
    pub fn parse(&self, row: usize) -> Result<Team> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(EngineError::InvalidRecord {
                row,
                message: "team id is empty".to_string(),
            });
        }

        let players: Vec<String> = self
            .players
            .as_deref()
            .map(|raw| {
                raw.split(PLAYER_SEPARATOR)
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Team::new(id, self.name.trim(), players))
    }

    /// The cached aggregates carried by the record, if all three columns are set.
    pub fn cached_aggregates(&self) -> Option<Aggregate> {
        Some(Aggregate {
            points: self.points?,
            goals: self.goals?,
            pratfalls_absorbed: self.pratfalls?,
        })
    }
}
