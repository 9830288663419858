//! Foosball Standings CLI
//!
//! Reads a team roster and a match list, then prints the standings table.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- teams.csv matches.csv > standings.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `STANDINGS_POINT_POLICY`: `score-as-points` (default) or `win-draw-loss`
//! - `STANDINGS_FINAL_SCORE`: `signed` (default) or `clamped-at-zero`
//! - `STANDINGS_MATCHES`: `finished-only` (default) or `all-matches`

use foosball_standings::{EngineError, Result, ScoringConfig, StandingsEngine};
use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(EngineError::MissingArgument);
    }

    let config = ScoringConfig::from_env()?;
    info!("Scoring with {}", config);

    let teams = BufReader::new(File::open(&args[1])?);
    let matches = BufReader::new(File::open(&args[2])?);

    let mut engine = StandingsEngine::with_config(config);
    engine.load_teams_csv(teams)?;
    engine.load_matches_csv(matches)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_standings(handle)?;

    Ok(())
}
