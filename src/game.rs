//! Match model, score entry and lifecycle.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

/// Where a match is in its lifecycle.
///
/// ```text
/// Scheduled --set_score--> Scored --finish--> Finished
///     ^                                          |
///     +------------------- reset ----------------+
/// ```
///
/// `reopen` moves a finished match back to `Scored` (or `Scheduled` if 0-0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    Scheduled,
    Scored,
    Finished,
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchState::Scheduled => "scheduled",
            MatchState::Scored => "scored",
            MatchState::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Absolute score values submitted by the score-entry surface.
///
/// Applying the same update twice leaves the match unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub team1_goals: u32,
    pub team2_goals: u32,
    pub team1_pratfalls: u32,
    pub team2_pratfalls: u32,
}

/// A match between two distinct teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: String,

    /// Scheduling labels, opaque to scoring.
    pub day: String,
    pub time: String,

    pub team1_id: String,
    pub team2_id: String,

    pub team1_goals: u32,
    pub team2_goals: u32,

    /// Gamelles committed by each side.
    pub team1_pratfalls: u32,
    pub team2_pratfalls: u32,

    pub finished: bool,
}

impl Match {
    /// Creates an empty, unfinished match.
    pub fn new(
        id: impl Into<String>,
        day: impl Into<String>,
        time: impl Into<String>,
        team1_id: impl Into<String>,
        team2_id: impl Into<String>,
    ) -> Self {
        Match {
            id: id.into(),
            day: day.into(),
            time: time.into(),
            team1_id: team1_id.into(),
            team2_id: team2_id.into(),
            team1_goals: 0,
            team2_goals: 0,
            team1_pratfalls: 0,
            team2_pratfalls: 0,
            finished: false,
        }
    }

    pub fn state(&self) -> MatchState {
        if self.finished {
            MatchState::Finished
        } else if self.score() != ScoreUpdate::default() {
            MatchState::Scored
        } else {
            MatchState::Scheduled
        }
    }

    /// Which side `team_id` plays on, if any.
    pub fn side_of(&self, team_id: &str) -> Option<Side> {
        if self.team1_id == team_id {
            Some(Side::Team1)
        } else if self.team2_id == team_id {
            Some(Side::Team2)
        } else {
            None
        }
    }

    pub fn team_id(&self, side: Side) -> &str {
        match side {
            Side::Team1 => &self.team1_id,
            Side::Team2 => &self.team2_id,
        }
    }

    pub fn goals(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.team1_goals,
            Side::Team2 => self.team2_goals,
        }
    }

    /// Gamelles committed by `side`.
    pub fn pratfalls(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.team1_pratfalls,
            Side::Team2 => self.team2_pratfalls,
        }
    }

    /// Current counters as an absolute update.
    pub fn score(&self) -> ScoreUpdate {
        ScoreUpdate {
            team1_goals: self.team1_goals,
            team2_goals: self.team2_goals,
            team1_pratfalls: self.team1_pratfalls,
            team2_pratfalls: self.team2_pratfalls,
        }
    }

    /// Overwrites all four counters. The finished flag is untouched, so a
    /// finished match can be corrected in place.
    pub fn set_score(&mut self, update: ScoreUpdate) {
        self.team1_goals = update.team1_goals;
        self.team2_goals = update.team2_goals;
        self.team1_pratfalls = update.team1_pratfalls;
        self.team2_pratfalls = update.team2_pratfalls;
    }

    /// Confirms the result. Returns `false` if already finished.
    pub fn finish(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        true
    }

    /// Reopens a finished match, keeping its counters. Returns `false` if
    /// the match was not finished.
    pub fn reopen(&mut self) -> bool {
        if !self.finished {
            return false;
        }
        self.finished = false;
        true
    }

    /// Back to `Scheduled`: counters zeroed, not finished.
    pub fn reset(&mut self) {
        self.set_score(ScoreUpdate::default());
        self.finished = false;
    }
}

/// Raw match record as read from CSV.
///
/// Counters are signed here so that negative input can be rejected with a
/// useful message instead of a generic CSV type error.
#[derive(Debug, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub time: String,

    #[serde(alias = "team1_id")]
    pub team1: String,
    #[serde(alias = "team2_id")]
    pub team2: String,

    #[serde(default)]
    pub team1_goals: Option<i64>,
    #[serde(default)]
    pub team2_goals: Option<i64>,
    #[serde(default, alias = "team1_gamelles")]
    pub team1_pratfalls: Option<i64>,
    #[serde(default, alias = "team2_gamelles")]
    pub team2_pratfalls: Option<i64>,

    #[serde(default)]
    pub finished: Option<bool>,
}

impl MatchRecord {
    /// Parses and validates the raw record. Empty counters read as zero.
    pub fn parse(&self, row: usize) -> Result<Match> {
        let id = self.id.trim();
        let team1 = self.team1.trim();
        let team2 = self.team2.trim();

        if id.is_empty() || team1.is_empty() || team2.is_empty() {
            return Err(EngineError::InvalidRecord {
                row,
                message: "match id and both team ids are required".to_string(),
            });
        }

        if team1 == team2 {
            return Err(EngineError::SelfMatch {
                match_id: id.to_string(),
                team_id: team1.to_string(),
            });
        }

        let mut parsed = Match::new(id, self.day.trim(), self.time.trim(), team1, team2);
        parsed.set_score(ScoreUpdate {
            team1_goals: counter(id, "team1_goals", self.team1_goals)?,
            team2_goals: counter(id, "team2_goals", self.team2_goals)?,
            team1_pratfalls: counter(id, "team1_pratfalls", self.team1_pratfalls)?,
            team2_pratfalls: counter(id, "team2_pratfalls", self.team2_pratfalls)?,
        });
        parsed.finished = self.finished.unwrap_or(false);

        Ok(parsed)
    }
}

fn counter(match_id: &str, field: &'static str, value: Option<i64>) -> Result<u32> {
    let value = value.unwrap_or(0);
    u32::try_from(value).map_err(|_| EngineError::NegativeCount {
        match_id: match_id.to_string(),
        field,
        value,
    })
}
