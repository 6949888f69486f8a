//! Read-only render view of a session

use glam::Vec2;
use serde::Serialize;

use super::effects::Effects;
use super::entities::{ExpressionBlock, FloatingText, Player, Projectile};
use super::state::{GamePhase, GameState, LearnPrompt};
use crate::consts::{COMBO_DISPLAY_MIN, STARTING_LIVES};
use crate::quiz::{AnswerSet, Category, Question, current_category, unlocked_categories};

/// Values shown in the heads-up display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudState {
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
    pub combo: u32,
    /// The combo badge only appears once a streak is worth something
    pub show_combo: bool,
    pub max_combo: u32,
    pub questions_answered: u32,
    pub category: Category,
    pub level: usize,
    /// Number of categories unlocked so far
    pub unlocked: usize,
}

/// Everything a frame needs, borrowed from the session
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub canvas: Vec2,
    pub player: &'a Player,
    pub expression: Option<&'a ExpressionBlock>,
    pub question: Option<&'a Question>,
    pub answers: Option<&'a AnswerSet>,
    pub answers_enabled: bool,
    pub projectiles: &'a [Projectile],
    pub floating_texts: &'a [FloatingText],
    pub effects: &'a Effects,
    pub learn: Option<&'a LearnPrompt>,
    pub hud: HudState,
    pub show_fps: bool,
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        let category = current_category(state.questions_answered);
        Self {
            phase: state.phase,
            canvas: state.canvas,
            player: &state.player,
            expression: state.expression.as_ref(),
            question: state.question.as_ref(),
            answers: state.answers.as_ref(),
            answers_enabled: state.answers_enabled(),
            projectiles: &state.projectiles,
            floating_texts: &state.floating_texts,
            effects: &state.effects,
            learn: state.learn.as_ref(),
            hud: HudState {
                score: state.score,
                lives: state.lives,
                max_lives: STARTING_LIVES,
                combo: state.combo,
                show_combo: state.combo >= COMBO_DISPLAY_MIN,
                max_combo: state.max_combo,
                questions_answered: state.questions_answered,
                category,
                level: category.level(),
                unlocked: unlocked_categories(state.questions_answered).len(),
            },
            show_fps: state.settings.show_fps,
        }
    }

    /// Whether gameplay entities should be drawn
    pub fn in_session(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }
}
