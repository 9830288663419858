//! Aggregation and ranking.
//!
//! Everything here is a pure function of a roster snapshot, a match snapshot
//! and a [`ScoringConfig`]. Nothing is patched incrementally: team aggregates
//! are always rebuilt from zero over the whole match set.

use crate::config::{MatchOutcome, ScoringConfig};
use crate::error::{EngineError, Result};
use crate::game::{Match, Side};
use crate::team::{Aggregate, Team};
use log::debug;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// A team whose cached aggregates disagree with a fresh recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    pub team_id: String,
    pub cached: Aggregate,
    pub recomputed: Aggregate,
}

/// Totals for `team_id` over the matches that count under `config`.
///
/// A team that appears in no counted match gets zeroed totals.
pub fn aggregate(team_id: &str, matches: &[Match], config: &ScoringConfig) -> Aggregate {
    let mut totals = Aggregate::default();

    for m in matches.iter().filter(|m| config.counts(m)) {
        if let Some(side) = m.side_of(team_id) {
            absorb_side(&mut totals, m, side, &config.outcome(m));
        }
    }

    totals
}

/// Rebuilds every team's aggregates from zero over `matches`.
///
/// All match references are checked before anything is computed, so either
/// every team comes back updated or an error is returned and nothing is.
/// The returned roster keeps the input order.
pub fn recompute_all(
    teams: &[Team],
    matches: &[Match],
    config: &ScoringConfig,
) -> Result<Vec<Team>> {
    check_references(teams, matches)?;

    let mut totals: HashMap<&str, Aggregate> = HashMap::with_capacity(teams.len());
    let mut counted = 0usize;

    for m in matches.iter().filter(|m| config.counts(m)) {
        let outcome = config.outcome(m);
        for side in [Side::Team1, Side::Team2] {
            let entry = totals.entry(m.team_id(side)).or_default();
            absorb_side(entry, m, side, &outcome);
        }
        counted += 1;
    }

    debug!(
        "Recomputed {} teams from {} of {} matches ({})",
        teams.len(),
        counted,
        matches.len(),
        config
    );

    Ok(teams
        .iter()
        .map(|t| t.with_aggregates(totals.get(t.id.as_str()).copied().unwrap_or_default()))
        .collect())
}

/// Teams whose stored aggregates differ from what `recompute_all` produces.
pub fn divergences(
    teams: &[Team],
    matches: &[Match],
    config: &ScoringConfig,
) -> Result<Vec<Divergence>> {
    let fresh = recompute_all(teams, matches, config)?;

    Ok(teams
        .iter()
        .zip(fresh.iter())
        .filter(|(cached, recomputed)| cached.aggregates() != recomputed.aggregates())
        .map(|(cached, recomputed)| Divergence {
            team_id: cached.id.clone(),
            cached: cached.aggregates(),
            recomputed: recomputed.aggregates(),
        })
        .collect())
}

/// Standings order: points, then goal difference, then goals, all descending.
pub fn standing_order(a: &Team, b: &Team) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals.cmp(&a.goals))
}

/// Sorts teams into standings order. Full ties keep their input order.
pub fn rank(teams: &[Team]) -> Vec<Team> {
    rank_refs(teams).into_iter().cloned().collect()
}

/// Borrowing form of [`rank`].
pub fn rank_refs<'a, I>(teams: I) -> Vec<&'a Team>
where
    I: IntoIterator<Item = &'a Team>,
{
    let mut ranked: Vec<&Team> = teams.into_iter().collect();
    ranked.sort_by(|a, b| standing_order(a, b));
    ranked
}

/// Every match must name two distinct teams from the roster.
fn check_references(teams: &[Team], matches: &[Match]) -> Result<()> {
    let known: HashSet<&str> = teams.iter().map(|t| t.id.as_str()).collect();

    for m in matches {
        if m.team1_id == m.team2_id {
            return Err(EngineError::SelfMatch {
                match_id: m.id.clone(),
                team_id: m.team1_id.clone(),
            });
        }
        for team_id in [&m.team1_id, &m.team2_id] {
            if !known.contains(team_id.as_str()) {
                return Err(EngineError::UnknownTeam {
                    match_id: m.id.clone(),
                    team_id: team_id.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Adds `side`'s share of match `m` to `totals`.
///
/// The gamelles counted against a team are the opponent's, i.e. the ones
/// that reduced this team's final score.
fn absorb_side(totals: &mut Aggregate, m: &Match, side: Side, outcome: &MatchOutcome) {
    let points = match side {
        Side::Team1 => outcome.points.0,
        Side::Team2 => outcome.points.1,
    };
    totals.absorb(points, m.goals(side), m.pratfalls(side.opponent()));
}
