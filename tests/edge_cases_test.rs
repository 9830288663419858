//! Edge case tests for scoring, aggregation and ranking.

use foosball_standings::{
    aggregate, final_score, rank, recompute_all, Aggregate, EngineError, FinalScoreRule, Match,
    MatchInclusion, PointPolicy, ScoreUpdate, ScoringConfig, StandingsEngine, Team,
};
use std::io::Cursor;

fn team(id: &str) -> Team {
    Team::new(id, format!("Team {}", id), vec![])
}

fn team_with(id: &str, points: i64, goals: i64, pratfalls_absorbed: i64) -> Team {
    team(id).with_aggregates(Aggregate {
        points,
        goals,
        pratfalls_absorbed,
    })
}

fn played(id: &str, t1: &str, t2: &str, score: [u32; 4], finished: bool) -> Match {
    let mut m = Match::new(id, "lundi", "12:00", t1, t2);
    m.set_score(ScoreUpdate {
        team1_goals: score[0],
        team2_goals: score[1],
        team1_pratfalls: score[2],
        team2_pratfalls: score[3],
    });
    m.finished = finished;
    m
}

fn win_draw_loss() -> ScoringConfig {
    ScoringConfig {
        policy: PointPolicy::WinDrawLoss,
        ..ScoringConfig::default()
    }
}

fn roster() -> Vec<Team> {
    vec![team("a"), team("b"), team("c"), team("d")]
}

fn schedule() -> Vec<Match> {
    vec![
        played("m1", "a", "b", [5, 2, 0, 0], true),
        played("m2", "c", "d", [1, 1, 2, 0], true),
        played("m3", "a", "c", [0, 3, 4, 1], true),
        played("m4", "b", "d", [7, 0, 0, 0], false),
        played("m5", "d", "a", [2, 2, 1, 1], true),
    ]
}

// ==================== FINAL SCORE ====================

#[test]
fn test_final_score_without_pratfalls() {
    assert_eq!(final_score(10, 0), 10);
}

#[test]
fn test_final_score_goes_negative() {
    assert_eq!(final_score(0, 2), -2);
    assert_eq!(FinalScoreRule::Signed.apply(0, 2), -2);
}

#[test]
fn test_final_score_clamped_variant() {
    assert_eq!(FinalScoreRule::ClampedAtZero.apply(0, 2), 0);
}

#[test]
fn test_final_score_handles_max_counters() {
    assert_eq!(final_score(u32::MAX, 0), i64::from(u32::MAX));
    assert_eq!(final_score(0, u32::MAX), -i64::from(u32::MAX));
}

// ==================== POINT POLICIES ====================

#[test]
fn test_policy_example_five_two() {
    let m = played("m1", "a", "b", [5, 2, 0, 0], true);

    assert_eq!(win_draw_loss().outcome(&m).points, (3, 0));
    assert_eq!(ScoringConfig::default().outcome(&m).points, (5, 2));
}

#[test]
fn test_draw_decided_on_final_score_not_goals() {
    // 3-2 on goals, but the gamelle charged to b costs a one goal
    let m = played("m1", "a", "b", [3, 2, 0, 1], true);
    assert_eq!(win_draw_loss().outcome(&m).points, (1, 1));

    let m = played("m1", "a", "b", [3, 4, 0, 1], true);
    assert_eq!(win_draw_loss().outcome(&m).final_scores, (2, 4));

    let m = played("m1", "a", "b", [3, 3, 1, 1], true);
    assert_eq!(win_draw_loss().outcome(&m).points, (1, 1));
}

// ==================== AGGREGATION ====================

#[test]
fn test_unfinished_match_contributes_nothing() {
    let matches = vec![played("m1", "a", "b", [6, 1, 0, 0], false)];
    let config = ScoringConfig::default();

    assert_eq!(aggregate("a", &matches, &config), Aggregate::default());
    assert_eq!(aggregate("b", &matches, &config), Aggregate::default());
}

#[test]
fn test_all_matches_inclusion_counts_unfinished() {
    let matches = vec![played("m1", "a", "b", [6, 1, 0, 0], false)];
    let config = ScoringConfig {
        inclusion: MatchInclusion::AllMatches,
        ..ScoringConfig::default()
    };

    assert_eq!(aggregate("a", &matches, &config).points, 6);
    assert_eq!(aggregate("b", &matches, &config).points, 1);
}

#[test]
fn test_team_without_matches_is_zero() {
    let teams = recompute_all(&roster(), &[], &ScoringConfig::default()).unwrap();
    assert!(teams.iter().all(|t| t.aggregates() == Aggregate::default()));
}

#[test]
fn test_shared_match_counted_once_per_side() {
    let matches = vec![played("m1", "a", "b", [4, 3, 2, 1], true)];
    let config = ScoringConfig::default();

    let a = aggregate("a", &matches, &config);
    let b = aggregate("b", &matches, &config);

    assert_eq!((a.goals, a.pratfalls_absorbed, a.points), (4, 1, 3));
    assert_eq!((b.goals, b.pratfalls_absorbed, b.points), (3, 2, 1));
    // every goal and gamelle in the match lands on exactly one team
    assert_eq!(a.goals + b.goals, 7);
    assert_eq!(a.pratfalls_absorbed + b.pratfalls_absorbed, 3);
}

#[test]
fn test_recompute_is_deterministic() {
    let teams = roster();
    let matches = schedule();

    for config in [ScoringConfig::default(), win_draw_loss()] {
        let first = recompute_all(&teams, &matches, &config).unwrap();
        let second = recompute_all(&teams, &matches, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(rank(&first), rank(&second));
    }
}

#[test]
fn test_zero_then_recompute_twice_is_idempotent() {
    let zeroed: Vec<Team> = roster()
        .iter()
        .map(|t| t.with_aggregates(Aggregate::default()))
        .collect();
    let matches = schedule();
    let config = ScoringConfig::default();

    let once = recompute_all(&zeroed, &matches, &config).unwrap();
    let twice = recompute_all(&once, &matches, &config).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_unknown_team_fails_whole_recompute() {
    let mut matches = schedule();
    matches.push(played("m9", "a", "nobody", [1, 0, 0, 0], true));

    let err = recompute_all(&roster(), &matches, &ScoringConfig::default()).unwrap_err();
    assert!(matches!(err, EngineError::UnknownTeam { .. }));
}

#[test]
fn test_totals_sum_past_counter_width() {
    let matches = vec![
        played("m1", "a", "b", [u32::MAX, 0, 0, 0], true),
        played("m2", "b", "a", [0, 1, 0, 0], true),
    ];

    let teams = recompute_all(&roster(), &matches, &ScoringConfig::default()).unwrap();
    let a = &teams[0];
    assert_eq!(a.goals, i64::from(u32::MAX) + 1);
    assert_eq!(a.points, i64::from(u32::MAX) + 1);
    assert_eq!(a.goal_difference(), i64::from(u32::MAX) + 1);
}

#[test]
fn test_self_match_fails_recompute() {
    let matches = vec![played("m1", "a", "a", [1, 0, 0, 0], true)];
    let err = recompute_all(&roster(), &matches, &ScoringConfig::default()).unwrap_err();
    assert!(matches!(err, EngineError::SelfMatch { .. }));
}

// ==================== RANKING ====================

#[test]
fn test_goal_difference_breaks_points_tie() {
    let x = team_with("x", 5, 10, 3);
    let y = team_with("y", 5, 8, 0);

    let ranked = rank(&[x, y]);
    assert_eq!(ranked[0].id, "y");
}

#[test]
fn test_goals_break_goal_difference_tie() {
    let x = team_with("x", 5, 4, 1);
    let y = team_with("y", 5, 6, 3);

    let ranked = rank(&[x, y]);
    assert_eq!(ranked[0].id, "y");
}

#[test]
fn test_full_tie_keeps_input_order() {
    let teams = vec![team_with("q", 2, 2, 0), team_with("p", 2, 2, 0)];
    let ranked = rank(&teams);
    assert_eq!(ranked[0].id, "q");
    assert_eq!(ranked[1].id, "p");
}

#[test]
fn test_negative_points_rank_below_zero() {
    let teams = vec![team_with("neg", -3, 0, 3), team_with("zero", 0, 0, 0)];
    let ranked = rank(&teams);
    assert_eq!(ranked[0].id, "zero");
}

// ==================== ENGINE ====================

fn loaded_engine(config: ScoringConfig) -> StandingsEngine {
    let mut engine = StandingsEngine::with_config(config);
    for t in roster() {
        engine.add_team(t).unwrap();
    }
    for m in schedule() {
        engine.add_match(m).unwrap();
    }
    engine
}

#[test]
fn test_engine_matches_pure_recompute() {
    for config in [ScoringConfig::default(), win_draw_loss()] {
        let engine = loaded_engine(config);
        let expected = recompute_all(&roster(), &schedule(), &config).unwrap();
        assert_eq!(engine.teams(), expected.as_slice());
    }
}

#[test]
fn test_engine_stays_consistent_through_mutations() {
    let mut engine = loaded_engine(ScoringConfig::default());

    engine
        .set_score(
            "m1",
            ScoreUpdate {
                team1_goals: 1,
                team2_goals: 9,
                team1_pratfalls: 3,
                team2_pratfalls: 0,
            },
        )
        .unwrap();
    engine.finish("m4").unwrap();
    engine.reopen("m3").unwrap();
    engine.reset("m5").unwrap();

    assert!(engine.divergences().unwrap().is_empty());
    let expected = recompute_all(engine.teams(), engine.matches(), engine.config()).unwrap();
    assert_eq!(engine.teams(), expected.as_slice());
}

#[test]
fn test_engine_rejects_unknown_team_on_add() {
    let mut engine = loaded_engine(ScoringConfig::default());
    let before = engine.teams().to_vec();

    let err = engine
        .add_match(played("m9", "a", "zz", [3, 0, 0, 0], true))
        .unwrap_err();

    assert!(matches!(err, EngineError::UnknownTeam { .. }));
    assert!(engine.match_by_id("m9").is_none());
    assert_eq!(engine.teams(), before.as_slice());
}

#[test]
fn test_engine_rejects_duplicate_team() {
    let mut engine = loaded_engine(ScoringConfig::default());
    let err = engine.add_team(team("a")).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateTeam(id) if id == "a"));
}

#[test]
fn test_engine_add_team_ignores_supplied_aggregates() {
    let mut engine = StandingsEngine::new();
    engine.add_team(team_with("a", 40, 40, 0)).unwrap();
    assert_eq!(engine.team("a").unwrap().points, 0);
}

#[test]
fn test_engine_team_csv_cache_is_not_served() {
    let mut engine = StandingsEngine::new();
    engine
        .load_teams_csv(Cursor::new(
            "id,name,players,points,goals,gamelles\na,A,,12,12,0\nb,B,,30,30,0\n",
        ))
        .unwrap();

    assert!(engine
        .standings()
        .iter()
        .all(|t| t.aggregates() == Aggregate::default()));
    assert_eq!(engine.standings()[0].id, "a");
}

#[test]
fn test_clamped_config_end_to_end() {
    let config = ScoringConfig::new(
        PointPolicy::ScoreAsPoints,
        FinalScoreRule::ClampedAtZero,
        MatchInclusion::FinishedOnly,
    );
    let mut engine = StandingsEngine::with_config(config);
    engine
        .load_teams_csv(Cursor::new("id,name,players\na,A,\nb,B,\n"))
        .unwrap();
    engine
        .load_matches_csv(Cursor::new(
            "id,day,time,team1,team2,team1_goals,team2_goals,\
             team1_pratfalls,team2_pratfalls,finished\n\
             m1,lundi,12:00,a,b,0,0,0,5,true\n",
        ))
        .unwrap();

    let a = engine.team("a").unwrap();
    assert_eq!(a.points, 0);
    assert_eq!(a.pratfalls_absorbed, 5);
    assert_eq!(a.goal_difference(), -5);
}

#[test]
fn test_engine_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StandingsEngine>();
    assert_send_sync::<Team>();
    assert_send_sync::<Match>();
    assert_send_sync::<ScoringConfig>();
}
