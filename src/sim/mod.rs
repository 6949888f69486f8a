//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers are scheduler entries, never callbacks
//! - No rendering or platform dependencies

pub mod effects;
pub mod entities;
pub mod scheduler;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use effects::{Effects, Notification, Particle, ParticleKind, Star, Starfield};
pub use entities::{ExpressionBlock, FloatingText, Player, Projectile, TextTone};
pub use scheduler::{Scheduler, Task, TaskHandle};
pub use scoring::{answer_points, combo_multiplier, difficulty_bonus};
pub use snapshot::{HudState, Snapshot};
pub use state::{GameEvent, GamePhase, GameState, LearnPrompt};
pub use tick::{TickInput, step, tick};
