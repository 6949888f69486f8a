//! End-to-end session tests through the public API

use expr_shooter::consts::*;
use expr_shooter::persistence::{KeyValueStore, MemoryStore};
use expr_shooter::sim::answer_points;
use expr_shooter::{Category, GameEvent, GamePhase, GameState, ScoreBoard, Settings, TickInput, tick};
use glam::Vec2;

fn session(seed: u64, learn_mode: bool) -> GameState {
    GameState::new(
        seed,
        Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
        Settings {
            learn_mode,
            ..Default::default()
        },
    )
}

fn idle(state: &mut GameState, steps: usize) {
    for _ in 0..steps {
        tick(state, &TickInput::default(), SIM_DT);
    }
}

fn wait_for_answers(state: &mut GameState) {
    let mut guard = 0;
    while !state.answers_enabled() && state.phase == GamePhase::Playing && guard < 600 {
        idle(state, 1);
        guard += 1;
    }
}

/// Fire at the correct (or a wrong) answer and wait until it resolves
fn fire(state: &mut GameState, correct: bool) {
    wait_for_answers(state);
    let answers = state.answers.clone().expect("question on screen");
    let index = if correct {
        answers.correct_index
    } else {
        (answers.correct_index + 1) % ANSWER_COUNT
    };
    let before = state.questions_answered;
    tick(
        state,
        &TickInput {
            shoot: Some(index),
            ..Default::default()
        },
        SIM_DT,
    );
    let mut guard = 0;
    while state.questions_answered == before && guard < 600 {
        idle(state, 1);
        guard += 1;
    }
    assert_eq!(state.questions_answered, before + 1);
}

#[test]
fn perfect_run_reaches_unlimited_mode() {
    let mut state = session(2024, false);
    state.start_game();

    let mut events = Vec::new();
    for _ in 0..30 {
        fire(&mut state, true);
        events.extend(state.drain_events());
    }
    wait_for_answers(&mut state);
    events.extend(state.drain_events());

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.lives, STARTING_LIVES);
    assert_eq!(state.max_combo, 30);
    assert_eq!(
        events.iter().filter(|e| **e == GameEvent::Victory).count(),
        1
    );
    assert!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count()
            >= 5
    );

    // Score is exactly the sum of the awarded points
    let awarded: u64 = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::AnswerCorrect { points, .. } => Some(*points),
            _ => None,
        })
        .sum();
    assert_eq!(awarded, state.score);
    assert!(state.score >= 30 * answer_points(1, 1));

    assert!(state.answers_enabled());
    assert_eq!(state.snapshot().hud.category, Category::Unlimited);
}

#[test]
fn ten_misses_end_the_game_and_a_restart_is_clean() {
    let mut state = session(77, false);
    state.start_game();
    fire(&mut state, true);

    for _ in 0..STARTING_LIVES {
        fire(&mut state, false);
    }
    assert_eq!(state.lives, 0);
    idle(&mut state, 90);

    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.combo, 0);
    let events = state.drain_events();
    assert!(events.contains(&GameEvent::GameOver {
        score: state.score,
        max_combo: 1
    }));

    state.start_game();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.lives, STARTING_LIVES);
    assert_eq!(state.score, 0);
    idle(&mut state, 300);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn leaving_mid_prompt_leaves_nothing_behind() {
    let mut state = session(9, true);
    state.start_game();
    fire(&mut state, true);
    assert!(state.learn.is_some());

    state.return_to_menu();
    idle(&mut state, 600);
    assert_eq!(state.phase, GamePhase::Menu);
    assert!(state.question.is_none());
    assert!(state.expression.is_none());
    assert!(state.pending_tasks().is_empty());
}

#[test]
fn pause_freezes_the_session() {
    let mut state = session(5, false);
    state.start_game();
    idle(&mut state, 5);

    let toggle = TickInput {
        pause: true,
        ..Default::default()
    };
    tick(&mut state, &toggle, SIM_DT);
    assert_eq!(state.phase, GamePhase::Paused);
    let ticks = state.time_ticks;
    let y = state.expression.as_ref().map(|b| b.pos.y);

    idle(&mut state, 100);
    assert_eq!(state.time_ticks, ticks);
    assert_eq!(state.expression.as_ref().map(|b| b.pos.y), y);
    // Answers are refused while paused
    let shot = TickInput {
        shoot: Some(0),
        ..Default::default()
    };
    tick(&mut state, &shot, SIM_DT);
    assert!(state.projectiles.is_empty());

    tick(&mut state, &toggle, SIM_DT);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn snapshot_serializes_for_the_host() {
    let mut state = session(31, false);
    state.start_game();
    idle(&mut state, 3);

    let json = serde_json::to_value(state.snapshot()).expect("snapshot serializes");
    assert_eq!(json["phase"], "Playing");
    assert_eq!(json["hud"]["lives"], STARTING_LIVES);
    assert!(json["answers"]["answers"].as_array().is_some_and(|a| a.len() == 3));
}

#[test]
fn final_score_lands_on_the_board() {
    let mut state = session(404, false);
    state.start_game();
    for _ in 0..3 {
        fire(&mut state, true);
    }

    let mut board = ScoreBoard::new(MemoryStore::default());
    assert!(board.is_high_score(state.score));
    assert_eq!(board.add_score("zed", state.score, "2026-10-16"), Some(1));
    assert_eq!(board.add_score("low", 1, "2026-10-16"), Some(2));

    // Survives a reload from the same store
    let board = ScoreBoard::new(board.into_store());
    let scores = board.scores();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].name, "ZED");
    assert_eq!(scores[0].score, state.score);
}

#[test]
fn corrupt_scores_read_as_empty() {
    let mut store = MemoryStore::default();
    store
        .set(ScoreBoard::<MemoryStore>::STORAGE_KEY, "{not json")
        .expect("memory store accepts writes");

    let mut board = ScoreBoard::new(store);
    assert!(board.scores().is_empty());
    assert!(board.is_high_score(0));
    assert_eq!(board.add_score("abc", 50, "2026-10-16"), Some(1));
    assert_eq!(board.scores().len(), 1);
}

#[test]
fn single_pointer_report_steers_the_ship() {
    // A click reports one x and nothing else; the ship keeps easing toward it
    let mut state = session(12, false);
    state.start_game();
    tick(
        &mut state,
        &TickInput {
            target_x: Some(100.0),
            ..Default::default()
        },
        SIM_DT,
    );
    idle(&mut state, 120);
    assert!((state.player.pos.x - 100.0).abs() < 1.0);
}
