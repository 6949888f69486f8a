//! Cosmetic effects: particles, notifications, screen shake, starfield
//!
//! Nothing here affects gameplay. Effects still use the session RNG so a seeded
//! run replays identically.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::consts::*;
use crate::quiz::Category;

/// Particle shrink factor per step
const PARTICLE_SHRINK: f32 = 0.97;

/// Particles smaller than this are culled
const PARTICLE_MIN_SIZE: f32 = 0.5;

/// Notification alpha lost per step while fading
const NOTIFICATION_FADE_RATE: f32 = 0.033;

/// Screen shake lost per step
const SHAKE_DECAY: f32 = 0.5;

/// What spawned a particle (drives its color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParticleKind {
    Correct,
    Error,
    Trail,
    Sparkle,
    Celebration,
}

/// A visual particle
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    pub decay: f32,
    pub size: f32,
    pub gravity: f32,
    pub friction: f32,
    pub kind: ParticleKind,
    /// Palette index within the kind
    pub shade: u8,
}

impl Particle {
    pub fn update(&mut self) {
        self.vel.y += self.gravity;
        self.vel *= self.friction;
        self.pos += self.vel;
        self.life -= self.decay;
        self.size *= PARTICLE_SHRINK;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.size < PARTICLE_MIN_SIZE
    }
}

/// Timed banner (level up, victory)
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Category unlocked (level up) or reached (victory)
    pub category: Category,
    /// Steps remaining
    pub timer: u32,
    pub alpha: f32,
}

impl Notification {
    pub fn new(category: Category, steps: u32) -> Self {
        Self {
            category,
            timer: steps,
            alpha: 1.0,
        }
    }

    /// Count down; returns false once fully faded
    pub fn update(&mut self) -> bool {
        self.timer = self.timer.saturating_sub(1);
        if self.timer < NOTIFICATION_FADE_STEPS {
            self.alpha = (self.alpha - NOTIFICATION_FADE_RATE).max(0.0);
        }
        self.timer > 0 && self.alpha > 0.0
    }
}

/// Background star
#[derive(Debug, Clone, Serialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub alpha: f32,
    pub twinkle: f32,
}

/// (count, size, speed, alpha) per parallax layer
const STAR_LAYERS: [(usize, f32, f32, f32); 3] = [
    (50, 1.0, 0.2, 0.3),
    (30, 1.5, 0.4, 0.5),
    (15, 2.0, 0.6, 0.7),
];

/// Parallax starfield
#[derive(Debug, Clone, Default, Serialize)]
pub struct Starfield {
    pub stars: Vec<Star>,
    bounds: Vec2,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(bounds: Vec2, rng: &mut R) -> Self {
        let mut stars = Vec::new();
        for &(count, size, speed, alpha) in &STAR_LAYERS {
            for _ in 0..count {
                stars.push(Star {
                    pos: Vec2::new(
                        rng.random_range(0.0..bounds.x.max(1.0)),
                        rng.random_range(0.0..bounds.y.max(1.0)),
                    ),
                    size,
                    speed,
                    alpha,
                    twinkle: rng.random_range(0.0..std::f32::consts::TAU),
                });
            }
        }
        Self { stars, bounds }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for star in &mut self.stars {
            star.pos.y += star.speed;
            star.twinkle += 0.05;
            if star.pos.y > self.bounds.y {
                star.pos.y = 0.0;
                star.pos.x = rng.random_range(0.0..self.bounds.x.max(1.0));
            }
        }
    }

    /// Rescale star positions to new bounds
    pub fn resize(&mut self, bounds: Vec2) {
        if self.bounds.x > 0.0 && self.bounds.y > 0.0 {
            let scale = bounds / self.bounds;
            for star in &mut self.stars {
                star.pos *= scale;
            }
        }
        self.bounds = bounds;
    }
}

/// All cosmetic state owned by the session
#[derive(Debug, Clone, Default, Serialize)]
pub struct Effects {
    /// Shake amplitude in pixels
    pub screen_shake: f32,
    /// Red flash steps remaining
    pub flash_steps: u32,
    pub level_up: Option<Notification>,
    pub victory: Option<Notification>,
    pub particles: Vec<Particle>,
    pub starfield: Starfield,
    /// Particle cap (0 disables particles)
    #[serde(skip)]
    max_particles: usize,
}

impl Effects {
    pub fn new(starfield: Starfield, max_particles: usize) -> Self {
        Self {
            starfield,
            max_particles,
            ..Default::default()
        }
    }

    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
        }
    }

    /// Clear everything transient (keeps stars)
    pub fn reset(&mut self) {
        self.screen_shake = 0.0;
        self.flash_steps = 0;
        self.level_up = None;
        self.victory = None;
        self.particles.clear();
    }

    fn push(&mut self, particle: Particle) {
        if self.max_particles == 0 {
            return;
        }
        if self.particles.len() >= self.max_particles {
            // Remove oldest to make room
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Radial burst for a correct answer
    pub fn explode<R: Rng + ?Sized>(&mut self, at: Vec2, rng: &mut R) {
        let count = 20;
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed = rng.random_range(3.0..9.0);
            self.push(Particle {
                pos: at,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                decay: 0.025,
                size: rng.random_range(3.0..8.0),
                gravity: 0.05,
                friction: 0.96,
                kind: ParticleKind::Correct,
                shade: rng.random_range(0..3),
            });
        }
    }

    /// Scattered red burst for a wrong answer
    pub fn error_burst<R: Rng + ?Sized>(&mut self, at: Vec2, rng: &mut R) {
        for _ in 0..15 {
            self.push(Particle {
                pos: at,
                vel: Vec2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0)),
                life: 0.8,
                decay: 0.03,
                size: rng.random_range(2.0..6.0),
                gravity: 0.15,
                friction: 0.94,
                kind: ParticleKind::Error,
                shade: 0,
            });
        }
    }

    /// Occasional exhaust particle behind a projectile
    pub fn trail<R: Rng + ?Sized>(&mut self, at: Vec2, rng: &mut R) {
        if !rng.random_bool(0.5) {
            return;
        }
        self.push(Particle {
            pos: at + Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)),
            vel: Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(0.5..1.5)),
            life: 0.6,
            decay: 0.05,
            size: rng.random_range(2.0..4.0),
            gravity: 0.0,
            friction: 0.95,
            kind: ParticleKind::Trail,
            shade: 0,
        });
    }

    /// Upward golden sparkle once the combo multiplier kicks in
    pub fn combo_sparkle<R: Rng + ?Sized>(&mut self, at: Vec2, rng: &mut R) {
        for _ in 0..30 {
            self.push(Particle {
                pos: at,
                vel: Vec2::new(rng.random_range(-4.0..4.0), rng.random_range(-4.0..4.0) - 3.0),
                life: 1.0,
                decay: 0.015,
                size: rng.random_range(2.0..5.0),
                gravity: 0.08,
                friction: 0.97,
                kind: ParticleKind::Sparkle,
                shade: rng.random_range(0..3),
            });
        }
    }

    /// One firework burst of the victory celebration
    pub fn celebrate<R: Rng + ?Sized>(&mut self, bounds: Vec2, burst: u8, rng: &mut R) {
        let origin = Vec2::new(
            rng.random_range(0.2..0.8) * bounds.x,
            rng.random_range(0.15..0.45) * bounds.y,
        );
        for _ in 0..40 {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(2.0..8.0);
            self.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                decay: 0.012,
                size: rng.random_range(3.0..7.0),
                gravity: 0.1,
                friction: 0.98,
                kind: ParticleKind::Celebration,
                shade: burst.wrapping_add(rng.random_range(0..2)) % 6,
            });
        }
    }

    /// Wrong-answer feedback: shake plus red flash, respecting settings
    pub fn wrong_feedback(&mut self, shake: bool, flash: bool) {
        if shake {
            self.screen_shake = SCREEN_SHAKE_INTENSITY;
        }
        if flash {
            self.flash_steps = FLASH_STEPS;
        }
    }

    /// Advance one step
    pub fn update<R: Rng + ?Sized>(&mut self, animate_stars: bool, rng: &mut R) {
        self.screen_shake = (self.screen_shake - SHAKE_DECAY).max(0.0);
        self.flash_steps = self.flash_steps.saturating_sub(1);

        if let Some(n) = &mut self.level_up {
            if !n.update() {
                self.level_up = None;
            }
        }
        if let Some(n) = &mut self.victory {
            if !n.update() {
                self.victory = None;
            }
        }

        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| !p.is_dead());

        if animate_stars {
            self.starfield.update(rng);
        }
    }

    /// Shake offset for this frame
    pub fn shake_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if self.screen_shake <= 0.0 {
            return Vec2::ZERO;
        }
        let s = self.screen_shake;
        Vec2::new(rng.random_range(-s..s), rng.random_range(-s..s))
    }
}
