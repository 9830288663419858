//! # Foosball Standings
//!
//! Scoring and standings for a small foosball tournament played under the
//! gamelle rule: every gamelle a side commits takes one goal off the
//! opponent's final score.
//!
//! ## Design Principles
//!
//! - **Derived aggregates**: team points, goals and gamelles are always
//!   recomputed from the whole match set, never patched incrementally
//! - **Explicit rules**: point policy, final-score clamping and match
//!   inclusion are one named [`ScoringConfig`] value
//! - **Atomic updates**: a recompute builds the new table aside and swaps it in
//! - **Deterministic output**: stable ranking by points, goal difference, goals
//!
//! ## Example
//!
//! ```no_run
//! use foosball_standings::StandingsEngine;
//! use std::io::Cursor;
//!
//! let teams = "id,name,players\na,Alpha,Ana;Bo\nb,Bravo,Cy;Di\n";
//! let matches = "id,day,time,team1,team2,team1_goals,team2_goals,\
//!                team1_pratfalls,team2_pratfalls,finished\n\
//!                m1,lundi,12:00,a,b,10,4,0,2,true\n";
//!
//! let mut engine = StandingsEngine::new();
//! engine.load_teams_csv(Cursor::new(teams)).unwrap();
//! engine.load_matches_csv(Cursor::new(matches)).unwrap();
//! engine.write_standings(std::io::stdout()).unwrap();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod scoring;
pub mod standings;
pub mod team;

pub use config::{MatchOutcome, ScoringConfig};
pub use engine::StandingsEngine;
pub use error::{EngineError, Result};
pub use game::{Match, MatchRecord, MatchState, ScoreUpdate, Side};
pub use scoring::{final_score, FinalScoreRule, MatchInclusion, PointPolicy};
pub use standings::{aggregate, rank, rank_refs, recompute_all, Divergence};
pub use team::{Aggregate, Team, TeamRecord};
