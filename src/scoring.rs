//! Match scoring rules.
//!
//! A gamelle committed by one side takes a goal away from the *other* side,
//! so a side's final score is its own goals minus the opponent's gamelles.
//! Which variant of that rule is in force, and how final scores turn into
//! table points, are explicit named choices rather than separate code paths.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points for a win under [`PointPolicy::WinDrawLoss`].
pub const WIN_POINTS: i64 = 3;

/// Points for a draw under [`PointPolicy::WinDrawLoss`].
pub const DRAW_POINTS: i64 = 1;

/// Points for a loss under [`PointPolicy::WinDrawLoss`].
pub const LOSS_POINTS: i64 = 0;

/// Canonical final score: own goals minus the opponent's gamelles.
///
/// Not floored at zero.
///
/// ```
/// use foosball_standings::final_score;
///
/// assert_eq!(final_score(10, 0), 10);
/// assert_eq!(final_score(0, 2), -2);
/// ```
pub fn final_score(own_goals: u32, opponent_pratfalls: u32) -> i64 {
    i64::from(own_goals) - i64::from(opponent_pratfalls)
}

/// How a side's final score is derived from raw counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalScoreRule {
    /// `goals - opponent gamelles`, may be negative.
    #[default]
    Signed,

    /// `max(0, goals - opponent gamelles)`.
    ClampedAtZero,
}

impl FinalScoreRule {
    pub const NAMES: &'static str = "signed, clamped-at-zero";

    pub fn apply(self, own_goals: u32, opponent_pratfalls: u32) -> i64 {
        let score = final_score(own_goals, opponent_pratfalls);
        match self {
            FinalScoreRule::Signed => score,
            FinalScoreRule::ClampedAtZero => score.max(0),
        }
    }

    fn name(self) -> &'static str {
        match self {
            FinalScoreRule::Signed => "signed",
            FinalScoreRule::ClampedAtZero => "clamped-at-zero",
        }
    }
}

/// How table points are awarded from the two final scores of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointPolicy {
    /// 3 for a win, 1 each for a draw, 0 for a loss.
    WinDrawLoss,

    /// Each side banks its own final score.
    #[default]
    ScoreAsPoints,
}

impl PointPolicy {
    pub const NAMES: &'static str = "win-draw-loss, score-as-points";

    /// Points earned by a side with `own_final` against `opponent_final`.
    pub fn award(self, own_final: i64, opponent_final: i64) -> i64 {
        match self {
            PointPolicy::WinDrawLoss => match own_final.cmp(&opponent_final) {
                std::cmp::Ordering::Greater => WIN_POINTS,
                std::cmp::Ordering::Equal => DRAW_POINTS,
                std::cmp::Ordering::Less => LOSS_POINTS,
            },
            PointPolicy::ScoreAsPoints => own_final,
        }
    }

    fn name(self) -> &'static str {
        match self {
            PointPolicy::WinDrawLoss => "win-draw-loss",
            PointPolicy::ScoreAsPoints => "score-as-points",
        }
    }
}

/// Which matches feed the standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchInclusion {
    /// Only matches confirmed as finished.
    #[default]
    FinishedOnly,

    /// Every match, finished or not. Unplayed matches are 0-0 draws.
    AllMatches,
}

impl MatchInclusion {
    pub const NAMES: &'static str = "finished-only, all-matches";

    fn name(self) -> &'static str {
        match self {
            MatchInclusion::FinishedOnly => "finished-only",
            MatchInclusion::AllMatches => "all-matches",
        }
    }
}

/// Implements `Display`/`FromStr` over the kebab-case names above.
macro_rules! named_choice {
    ($ty:ty, $key:expr, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = EngineError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase().replace('_', "-");
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.name() == wanted)
                    .ok_or_else(|| EngineError::InvalidConfig {
                        key: $key,
                        value: s.to_string(),
                        expected: <$ty>::NAMES,
                    })
            }
        }
    };
}

named_choice!(
    PointPolicy,
    crate::config::POINT_POLICY_VAR,
    [PointPolicy::WinDrawLoss, PointPolicy::ScoreAsPoints]
);
named_choice!(
    FinalScoreRule,
    crate::config::FINAL_SCORE_VAR,
    [FinalScoreRule::Signed, FinalScoreRule::ClampedAtZero]
);
named_choice!(
    MatchInclusion,
    crate::config::INCLUSION_VAR,
    [MatchInclusion::FinishedOnly, MatchInclusion::AllMatches]
);
