//! Tournament engine: roster, schedule and the only writer of standings.
//!
//! Teams and matches are loaded from CSV in streaming fashion. Every change
//! that can affect the table goes through a full recompute which builds the
//! new roster off to the side and swaps it in as a whole, so readers never
//! see a half-updated table.

use crate::config::ScoringConfig;
use crate::error::{EngineError, Result};
use crate::game::{Match, MatchRecord, ScoreUpdate};
use crate::standings;
use crate::team::{Aggregate, Team, TeamRecord};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::{Read, Write};

/// The standings engine.
///
/// # Output Ordering
///
/// Standings are written in ranking order; full ties keep roster order,
/// which is the order teams were loaded in.
pub struct StandingsEngine {
    config: ScoringConfig,

    /// Roster in insertion order.
    teams: Vec<Team>,
    team_index: HashMap<String, usize>,

    /// Schedule in insertion order.
    matches: Vec<Match>,
    match_index: HashMap<String, usize>,

    /// Aggregate columns read from the team CSV, kept aside until the next
    /// recompute compares them. Never shown as standings.
    cached: HashMap<String, Aggregate>,
}

impl StandingsEngine {
    /// Creates an empty engine with the default scoring configuration.
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default())
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        StandingsEngine {
            config,
            teams: Vec::new(),
            team_index: HashMap::new(),
            matches: Vec::new(),
            match_index: HashMap::new(),
            cached: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Loads teams from CSV.
    ///
    /// Invalid or duplicate rows are logged at warn level and skipped. Teams
    /// always enter the roster with zeroed aggregates; cached aggregate columns
    /// are held aside and only compared by the next recompute.
    pub fn load_teams_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<TeamRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    continue;
                }
            };

            let team = match record.parse(row_num) {
                Ok(team) => team,
                Err(e) => {
                    warn!("Row {}: {}", row_num, e);
                    continue;
                }
            };

            let team_id = team.id.clone();
            match self.insert_team(team) {
                Ok(()) => {
                    if let Some(cached) = record.cached_aggregates() {
                        self.cached.insert(team_id, cached);
                    }
                }
                Err(e) => warn!("Row {}: {}, ignoring", row_num, e),
            }
        }

        info!("Loaded {} teams", self.teams.len());
        Ok(())
    }

    /// Loads matches from CSV, then recomputes the standings.
    ///
    /// Rows that are malformed, carry negative counters, duplicate an
    /// existing match ID or reference a team missing from the roster are
    /// rejected with a warning and never stored.
    pub fn load_matches_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<MatchRecord>().enumerate() {
            let row_num = row_idx + 2;

            match result {
                Ok(record) => match record.parse(row_num) {
                    Ok(m) => {
                        if let Err(e) = self.insert_match(m) {
                            warn!("Row {}: {}, rejecting match", row_num, e);
                        }
                    }
                    Err(e) => warn!("Row {}: {}", row_num, e),
                },
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        info!("Loaded {} matches", self.matches.len());
        self.recompute_all()
    }

    /// Adds a team to the roster with zeroed aggregates.
    pub fn add_team(&mut self, team: Team) -> Result<()> {
        self.insert_team(team)
    }

    /// Adds a match to the schedule and refreshes the standings if it counts.
    pub fn add_match(&mut self, m: Match) -> Result<()> {
        let counts = self.config.counts(&m);
        self.insert_match(m)?;
        if counts {
            self.recompute_all()?;
        }
        Ok(())
    }

    /// A new team has played no stored match, so zero is its recomputed value.
    fn insert_team(&mut self, team: Team) -> Result<()> {
        if self.team_index.contains_key(&team.id) {
            return Err(EngineError::DuplicateTeam(team.id));
        }
        let team = team.with_aggregates(Aggregate::default());

        debug!("Added team {} ({})", team.id, team.name);
        self.team_index.insert(team.id.clone(), self.teams.len());
        self.teams.push(team);
        Ok(())
    }

    fn insert_match(&mut self, m: Match) -> Result<()> {
        if self.match_index.contains_key(&m.id) {
            return Err(EngineError::DuplicateMatch(m.id));
        }
        if m.team1_id == m.team2_id {
            return Err(EngineError::SelfMatch {
                match_id: m.id,
                team_id: m.team1_id,
            });
        }
        for team_id in [&m.team1_id, &m.team2_id] {
            if !self.team_index.contains_key(team_id) {
                return Err(EngineError::UnknownTeam {
                    match_id: m.id.clone(),
                    team_id: team_id.clone(),
                });
            }
        }

        debug!(
            "Added match {} ({} vs {}, {} {})",
            m.id, m.team1_id, m.team2_id, m.day, m.time
        );
        self.match_index.insert(m.id.clone(), self.matches.len());
        self.matches.push(m);
        Ok(())
    }

    /// Overwrites a match's counters with absolute values.
    pub fn set_score(&mut self, match_id: &str, update: ScoreUpdate) -> Result<()> {
        self.mutate_match(match_id, |m| {
            if m.score() == update {
                debug!("Match {}: score unchanged", m.id);
            }
            m.set_score(update);
        })
    }

    /// Confirms a match result. Finishing a finished match is a no-op.
    pub fn finish(&mut self, match_id: &str) -> Result<()> {
        self.mutate_match(match_id, |m| {
            if !m.finish() {
                debug!("Match {}: already finished, ignoring", m.id);
            }
        })
    }

    /// Reopens a finished match for corrections, keeping its counters.
    pub fn reopen(&mut self, match_id: &str) -> Result<()> {
        self.mutate_match(match_id, |m| {
            if !m.reopen() {
                debug!("Match {}: not finished, ignoring reopen", m.id);
            }
        })
    }

    /// Returns a match to its scheduled state.
    pub fn reset(&mut self, match_id: &str) -> Result<()> {
        self.mutate_match(match_id, Match::reset)
    }

    /// Resets every match and zeroes the table.
    pub fn reset_all(&mut self) -> Result<()> {
        for m in &mut self.matches {
            m.reset();
        }
        info!("Reset {} matches", self.matches.len());
        self.recompute_all()
    }

    /// Applies `change` to one match and recomputes if the match counted
    /// toward the standings before or after the change.
    fn mutate_match<F>(&mut self, match_id: &str, change: F) -> Result<()>
    where
        F: FnOnce(&mut Match),
    {
        let idx = *self
            .match_index
            .get(match_id)
            .ok_or_else(|| EngineError::UnknownMatch(match_id.to_string()))?;

        let m = &mut self.matches[idx];
        let counted_before = self.config.counts(m);
        let before = m.state();
        change(&mut *m);
        let counted_after = self.config.counts(m);

        debug!("Match {}: {} -> {}", match_id, before, m.state());

        if counted_before || counted_after {
            self.recompute_all()?;
        }
        Ok(())
    }

    /// Rebuilds every team's aggregates from the full match set.
    ///
    /// The new roster is computed from a snapshot and swapped in only on
    /// success. Cached values from the team CSV that disagree are reported at
    /// warn level and then discarded.
    pub fn recompute_all(&mut self) -> Result<()> {
        let fresh = standings::recompute_all(&self.teams, &self.matches, &self.config)?;

        for (old, new) in self.teams.iter().zip(fresh.iter()) {
            if let Some(cached) = self.cached.get(&new.id) {
                if *cached != new.aggregates() {
                    warn!(
                        "Team {}: cached aggregates {:?} disagree with recomputed {:?}, ignored",
                        new.id,
                        cached,
                        new.aggregates()
                    );
                }
            }
            if old.aggregates() != new.aggregates() {
                debug!(
                    "Team {}: {:?} -> {:?}",
                    new.id,
                    old.aggregates(),
                    new.aggregates()
                );
            }
        }

        self.teams = fresh;
        self.cached.clear();
        Ok(())
    }

    /// Teams whose current aggregates differ from a fresh recompute.
    pub fn divergences(&self) -> Result<Vec<standings::Divergence>> {
        standings::divergences(&self.teams, &self.matches, &self.config)
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.team_index.get(id).map(|&idx| &self.teams[idx])
    }

    pub fn match_by_id(&self, id: &str) -> Option<&Match> {
        self.match_index.get(id).map(|&idx| &self.matches[idx])
    }

    /// Roster in insertion order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Schedule in insertion order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Matches scheduled on `day`, in schedule order.
    pub fn matches_on<'a>(&'a self, day: &'a str) -> impl Iterator<Item = &'a Match> + 'a {
        self.matches.iter().filter(move |m| m.day == day)
    }

    /// Teams in standings order.
    pub fn standings(&self) -> Vec<&Team> {
        standings::rank_refs(&self.teams)
    }

    /// Writes the standings table to CSV.
    pub fn write_standings<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "rank",
            "team",
            "name",
            "points",
            "goals",
            "pratfalls",
            "goal_difference",
        ])?;

        for (position, team) in self.standings().into_iter().enumerate() {
            csv_writer.write_record([
                (position + 1).to_string(),
                team.id.clone(),
                team.name.clone(),
                team.points.to_string(),
                team.goals.to_string(),
                team.pratfalls_absorbed.to_string(),
                team.goal_difference().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes every match with its state and final scores to CSV.
    pub fn write_matches<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "day",
            "time",
            "team1",
            "team2",
            "team1_goals",
            "team2_goals",
            "team1_pratfalls",
            "team2_pratfalls",
            "team1_final",
            "team2_final",
            "state",
        ])?;

        for m in &self.matches {
            let outcome = self.config.outcome(m);
            csv_writer.write_record([
                m.id.clone(),
                m.day.clone(),
                m.time.clone(),
                m.team1_id.clone(),
                m.team2_id.clone(),
                m.team1_goals.to_string(),
                m.team2_goals.to_string(),
                m.team1_pratfalls.to_string(),
                m.team2_pratfalls.to_string(),
                outcome.final_scores.0.to_string(),
                outcome.final_scores.1.to_string(),
                m.state().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for StandingsEngine {
    fn default() -> Self {
        Self::new()
    }
}
