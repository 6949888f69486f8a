//! Expression Shooter - an arcade quiz about JavaScript expression semantics
//!
//! Core modules:
//! - `quiz`: Question bank, level progression and distractor generation
//! - `sim`: Session state machine, entities and the fixed-step tick
//! - `renderer`: Draw contract and frame composition
//! - `platform`: Browser/native time and seeding
//! - `persistence`: Key-value storage backends
//! - `highscores`: Top-10 leaderboard on top of persistence

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod quiz;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, ScoreBoard, ScoreEntry};
pub use quiz::{AnswerSet, Category, Question};
pub use settings::Settings;
pub use sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate all per-step motion is tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest frame delta accepted by the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Steps that fit in `MAX_FRAME_DT`; caps the catch-up after a hitch
    pub const MAX_SUBSTEPS: u32 = 6;

    /// Canvas used before the host reports a real size
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

    /// Session rules
    pub const STARTING_LIVES: u32 = 10;
    pub const ANSWER_COUNT: usize = 3;
    pub const BASE_POINTS: f64 = 100.0;
    /// Combo length at which the HUD badge appears
    pub const COMBO_DISPLAY_MIN: u32 = 3;

    /// Deferred transitions (seconds)
    pub const NEXT_QUESTION_DELAY: f32 = 0.5;
    pub const GAME_OVER_DELAY: f32 = 1.0;
    pub const LEARN_AUTO_DISMISS_DELAY: f32 = 2.0;
    pub const VICTORY_SPAWN_DELAY: f32 = 3.5;
    pub const CELEBRATION_BURSTS: u8 = 5;
    pub const CELEBRATION_INTERVAL: f32 = 0.2;

    /// Notification lifetimes (steps); alpha fades over the last `NOTIFICATION_FADE_STEPS`
    pub const LEVEL_UP_STEPS: u32 = 120;
    pub const VICTORY_STEPS: u32 = 180;
    pub const NOTIFICATION_FADE_STEPS: u32 = 30;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_BOTTOM_OFFSET: f32 = 120.0;
    pub const PLAYER_SMOOTHING: f32 = 0.15;

    /// Expression block
    pub const BLOCK_SPAWN_Y: f32 = 50.0;
    pub const BLOCK_REST_Y: f32 = 280.0;
    pub const BLOCK_DESCENT_SPEED: f32 = 0.8;
    pub const BLOCK_MIN_WIDTH: f32 = 280.0;
    pub const BLOCK_PADDING: f32 = 60.0;
    pub const BLOCK_HEIGHT: f32 = 80.0;
    /// Advance of one glyph in the block's bold 20px monospace face
    pub const BLOCK_GLYPH_WIDTH: f32 = 11.0;
    pub const BLOCK_WOBBLE_RATE: f32 = 0.05;

    /// Projectile
    pub const PROJECTILE_SPEED: f32 = 15.0;
    pub const PROJECTILE_ARRIVAL_RADIUS: f32 = 20.0;
    pub const PROJECTILE_MUZZLE_OFFSET: f32 = 20.0;
    pub const PROJECTILE_SIZE: f32 = 6.0;

    /// Score popups
    pub const FLOATING_TEXT_RISE: f32 = 2.0;
    pub const FLOATING_TEXT_DECAY: f32 = 0.02;
    pub const FLOATING_TEXT_OFFSET: f32 = 50.0;

    /// Wrong-answer feedback
    pub const SCREEN_SHAKE_INTENSITY: f32 = 10.0;
    pub const FLASH_STEPS: u32 = 10;
}
