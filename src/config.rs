//! Scoring configuration.
//!
//! The active point policy, final-score rule and match inclusion are a single
//! value, loaded once from the environment and passed to every computation.

use crate::error::Result;
use crate::game::Match;
use crate::scoring::{FinalScoreRule, MatchInclusion, PointPolicy};
use log::info;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const POINT_POLICY_VAR: &str = "STANDINGS_POINT_POLICY";
pub const FINAL_SCORE_VAR: &str = "STANDINGS_FINAL_SCORE";
pub const INCLUSION_VAR: &str = "STANDINGS_MATCHES";

/// Both final scores and both point awards of one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    /// `(team1, team2)` final scores.
    pub final_scores: (i64, i64),

    /// `(team1, team2)` points earned.
    pub points: (i64, i64),
}

/// The scoring rules in force for a tournament.
///
/// Defaults to signed final scores, score-as-points and finished matches only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub policy: PointPolicy,
    pub final_score: FinalScoreRule,
    pub inclusion: MatchInclusion,
}

impl ScoringConfig {
    pub fn new(
        policy: PointPolicy,
        final_score: FinalScoreRule,
        inclusion: MatchInclusion,
    ) -> Self {
        ScoringConfig {
            policy,
            final_score,
            inclusion,
        }
    }

    /// Loads the configuration from `STANDINGS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    ///
    /// Missing keys fall back to the default; present but unknown values are
    /// an error rather than a silent fallback.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(ScoringConfig {
            policy: load(&lookup, POINT_POLICY_VAR)?,
            final_score: load(&lookup, FINAL_SCORE_VAR)?,
            inclusion: load(&lookup, INCLUSION_VAR)?,
        })
    }

    /// Whether `m` feeds the standings under this configuration.
    pub fn counts(&self, m: &Match) -> bool {
        match self.inclusion {
            MatchInclusion::FinishedOnly => m.finished,
            MatchInclusion::AllMatches => true,
        }
    }

    /// Computes final scores and points for both sides of `m`.
    pub fn outcome(&self, m: &Match) -> MatchOutcome {
        let final1 = self.final_score.apply(m.team1_goals, m.team2_pratfalls);
        let final2 = self.final_score.apply(m.team2_goals, m.team1_pratfalls);

        MatchOutcome {
            final_scores: (final1, final2),
            points: (
                self.policy.award(final1, final2),
                self.policy.award(final2, final1),
            ),
        }
    }
}

impl fmt::Display for ScoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "policy={} final_score={} matches={}",
            self.policy, self.final_score, self.inclusion
        )
    }
}

fn load<T, F>(lookup: &F, key: &str) -> Result<T>
where
    T: FromStr<Err = crate::error::EngineError> + Default + fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.parse(),
        _ => {
            let default = T::default();
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
