//! Fixed timestep simulation tick
//!
//! `tick` takes a frame's wall-clock delta, applies queued input, and runs as many
//! fixed steps as fit. All motion constants are per step, so behaviour is the
//! same at any display refresh rate.

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input collected since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in canvas coordinates
    pub target_x: Option<f32>,
    /// Answer button / number key pressed
    pub shoot: Option<usize>,
    /// Close the learn prompt
    pub dismiss: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Apply input and advance by `frame_dt` seconds. Returns the number of fixed
/// steps simulated.
pub fn tick(state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    if state.phase == GamePhase::Paused {
        // Don't bank time while paused
        state.accumulator = 0.0;
        return 0;
    }

    if let Some(x) = input.target_x {
        state.move_player(x);
    }
    if input.dismiss {
        state.dismiss_learn();
    }
    if let Some(index) = input.shoot {
        state.shoot(index);
    }

    let dt = if frame_dt.is_finite() {
        frame_dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };
    state.accumulator += dt;

    let mut steps = 0;
    while state.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
        step(state);
        state.accumulator -= SIM_DT;
        steps += 1;
    }
    steps
}

/// Advance the simulation by exactly one fixed step
pub fn step(state: &mut GameState) {
    if state.phase == GamePhase::Paused {
        return;
    }
    state.time_ticks += 1;

    if state.phase == GamePhase::Playing {
        // 1. Entities
        state.player.update();
        if let Some(block) = &mut state.expression {
            block.update();
        }

        for projectile in &mut state.projectiles {
            projectile.update();
            if !projectile.arrived {
                state.effects.trail(projectile.pos, &mut state.rng);
            }
        }

        // 2. Arrivals resolve into answers
        let arrived: Vec<usize> = state
            .projectiles
            .iter()
            .filter(|p| p.arrived)
            .map(|p| p.answer_index)
            .collect();
        state.projectiles.retain(|p| !p.arrived);
        for answer_index in arrived {
            state.handle_answer(answer_index);
        }

        state.expire_question();

        for text in &mut state.floating_texts {
            text.update();
        }
        state.floating_texts.retain(|t| !t.is_dead());
    }

    let animate_stars = state.settings.starfield;
    state.effects.update(animate_stars, &mut state.rng);

    // 3. Deferred transitions. A task from before the last cancel_all never runs,
    //    including one made stale by an earlier task in this same batch.
    for (handle, task) in state.scheduler.advance(SIM_DT) {
        if handle.generation != state.scheduler.generation() {
            continue;
        }
        state.run_task(task);
    }
}
