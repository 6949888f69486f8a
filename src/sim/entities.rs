//! Simulated game objects
//!
//! All motion constants are per fixed step (see `consts::SIM_DT`).

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;

/// The player's ship
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    /// Where the ship is heading (already clamped)
    pub target_x: f32,
    pub size: Vec2,
    /// Fraction of the remaining distance covered per step
    pub smoothing: f32,
    canvas_width: f32,
}

impl Player {
    pub fn new(canvas: Vec2) -> Self {
        let x = canvas.x / 2.0;
        Self {
            pos: Vec2::new(x, canvas.y - PLAYER_BOTTOM_OFFSET),
            target_x: x,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            smoothing: PLAYER_SMOOTHING,
            canvas_width: canvas.x,
        }
    }

    /// Aim for `x`, clamped so the hull stays on screen
    pub fn move_to(&mut self, x: f32) {
        if !x.is_finite() {
            return;
        }
        let half = self.size.x / 2.0;
        let max = (self.canvas_width - half).max(half);
        self.target_x = x.clamp(half, max);
    }

    /// Ease toward the target (single-pole lerp)
    pub fn update(&mut self) {
        self.pos.x += (self.target_x - self.pos.x) * self.smoothing;
    }

    /// Keep the ship on screen after the canvas changes size
    pub fn resize(&mut self, canvas: Vec2) {
        self.canvas_width = canvas.x;
        self.pos.y = canvas.y - PLAYER_BOTTOM_OFFSET;
        let target = self.target_x;
        self.move_to(target);
    }

    /// Launch point for projectiles
    pub fn muzzle(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, PROJECTILE_MUZZLE_OFFSET)
    }
}

/// The descending block showing the current expression
#[derive(Debug, Clone, Serialize)]
pub struct ExpressionBlock {
    pub pos: Vec2,
    pub target_y: f32,
    pub size: Vec2,
    pub speed: f32,
    pub arrived: bool,
    /// Animation phase
    pub wobble: f32,
    /// 0-1 pulse derived from wobble
    pub glow: f32,
    /// Expression text as shown (`<expr> = ?`)
    pub label: String,
    canvas_height: f32,
}

/// Resting height that keeps the whole block on a canvas of this height
fn rest_y(canvas_height: f32) -> f32 {
    BLOCK_REST_Y
        .min(canvas_height - BLOCK_HEIGHT / 2.0)
        .max(0.0)
}

impl ExpressionBlock {
    pub fn new(canvas: Vec2, expression: &str) -> Self {
        let label = format!("{} = ?", expression);
        let text_width = label.chars().count() as f32 * BLOCK_GLYPH_WIDTH;
        let target_y = rest_y(canvas.y);
        Self {
            pos: Vec2::new(canvas.x / 2.0, BLOCK_SPAWN_Y.min(target_y)),
            target_y,
            size: Vec2::new(BLOCK_MIN_WIDTH.max(text_width + BLOCK_PADDING), BLOCK_HEIGHT),
            speed: BLOCK_DESCENT_SPEED,
            arrived: false,
            wobble: 0.0,
            glow: 0.5,
            label,
            canvas_height: canvas.y,
        }
    }

    pub fn update(&mut self) {
        if !self.arrived {
            self.pos.y += self.speed;
            if self.pos.y >= self.target_y {
                self.pos.y = self.target_y;
                self.arrived = true;
            }
        }

        self.wobble += BLOCK_WOBBLE_RATE;
        self.glow = 0.5 + 0.5 * self.wobble.sin();
    }

    /// Fell past the bottom of the canvas. Spawn and resize keep the block
    /// above the bottom edge, so only a block that was on screen can expire.
    pub fn is_expired(&self) -> bool {
        self.pos.y > self.canvas_height
    }

    pub fn resize(&mut self, canvas: Vec2) {
        self.pos.x = canvas.x / 2.0;
        self.canvas_height = canvas.y;
        self.target_y = rest_y(canvas.y);
        if self.pos.y >= self.target_y {
            self.pos.y = self.target_y;
            self.arrived = true;
        } else {
            self.arrived = false;
        }
    }
}

/// A shot carrying one answer toward the block
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Block position captured at launch (never re-targeted)
    pub target: Vec2,
    pub vel: Vec2,
    pub answer_index: usize,
    pub arrived: bool,
    pub size: f32,
}

impl Projectile {
    pub fn new(from: Vec2, to: Vec2, answer_index: usize) -> Self {
        let vel = (to - from).normalize_or_zero() * PROJECTILE_SPEED;
        Self {
            pos: from,
            target: to,
            vel,
            answer_index,
            arrived: false,
            size: PROJECTILE_SIZE,
        }
    }

    /// Advance one step. Arrival triggers on proximity OR on passing the target's
    /// height; either alone can miss on degenerate paths.
    pub fn update(&mut self) {
        if self.arrived {
            return;
        }
        self.pos += self.vel;

        let dist = self.pos.distance(self.target);
        if dist < PROJECTILE_ARRIVAL_RADIUS || self.pos.y < self.target.y {
            self.arrived = true;
        }
    }
}

/// Color family of a floating text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextTone {
    Positive,
    Negative,
}

/// Rising, fading score popup
#[derive(Debug, Clone, Serialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub tone: TextTone,
    /// 1.0 at spawn, doubles as opacity
    pub life: f32,
    pub rise: f32,
    pub decay: f32,
}

impl FloatingText {
    pub fn new(pos: Vec2, text: impl Into<String>, tone: TextTone) -> Self {
        Self {
            pos,
            text: text.into(),
            tone,
            life: 1.0,
            rise: FLOATING_TEXT_RISE,
            decay: FLOATING_TEXT_DECAY,
        }
    }

    pub fn update(&mut self) {
        self.pos.y -= self.rise;
        self.life -= self.decay;
    }

    pub fn opacity(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Vec2 {
        Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }

    #[test]
    fn test_player_clamps_target() {
        let mut player = Player::new(canvas());
        player.move_to(-500.0);
        assert_eq!(player.target_x, PLAYER_WIDTH / 2.0);
        player.move_to(10_000.0);
        assert_eq!(player.target_x, DEFAULT_CANVAS_WIDTH - PLAYER_WIDTH / 2.0);
        player.move_to(f32::NAN);
        assert_eq!(player.target_x, DEFAULT_CANVAS_WIDTH - PLAYER_WIDTH / 2.0);
    }

    #[test]
    fn test_player_eases_toward_target() {
        let mut player = Player::new(canvas());
        let start = player.pos.x;
        player.move_to(start + 100.0);
        player.update();
        assert!((player.pos.x - (start + 15.0)).abs() < 1e-3);
        for _ in 0..200 {
            player.update();
        }
        assert!((player.pos.x - (start + 100.0)).abs() < 0.01);
    }

    #[test]
    fn test_player_on_tiny_canvas() {
        let mut player = Player::new(Vec2::new(20.0, 200.0));
        player.move_to(100.0);
        assert_eq!(player.target_x, PLAYER_WIDTH / 2.0);
    }

    #[test]
    fn test_block_descends_and_rests() {
        let mut block = ExpressionBlock::new(canvas(), "typeof null");
        assert_eq!(block.label, "typeof null = ?");
        assert_eq!(block.size.x, BLOCK_MIN_WIDTH);
        let steps = ((BLOCK_REST_Y - BLOCK_SPAWN_Y) / BLOCK_DESCENT_SPEED).ceil() as usize;
        for _ in 0..steps + 1 {
            block.update();
        }
        assert!(block.arrived);
        assert_eq!(block.pos.y, BLOCK_REST_Y);
        assert!(!block.is_expired());
    }

    #[test]
    fn test_long_expression_widens_block() {
        let block = ExpressionBlock::new(canvas(), "[1,2,3].reduce((a,b)=>a+b,0) + [4,5,6].length");
        assert!(block.size.x > BLOCK_MIN_WIDTH);
    }

    #[test]
    fn test_block_rests_on_short_canvas() {
        let mut block = ExpressionBlock::new(Vec2::new(800.0, 100.0), "1");
        for _ in 0..400 {
            block.update();
        }
        assert!(block.arrived);
        assert_eq!(block.pos.y, 100.0 - BLOCK_HEIGHT / 2.0);
        assert!(!block.is_expired());

        // Shorter than the spawn height
        let block = ExpressionBlock::new(Vec2::new(800.0, 40.0), "1");
        assert_eq!(block.pos.y, 0.0);
        assert!(!block.is_expired());
    }

    #[test]
    fn test_block_follows_canvas_shrink() {
        let mut block = ExpressionBlock::new(canvas(), "1");
        for _ in 0..400 {
            block.update();
        }
        block.resize(Vec2::new(800.0, 150.0));
        assert_eq!(block.pos.y, 150.0 - BLOCK_HEIGHT / 2.0);
        assert!(!block.is_expired());

        // Growing again lets it descend to the usual height
        block.resize(canvas());
        assert!(!block.arrived);
        for _ in 0..400 {
            block.update();
        }
        assert_eq!(block.pos.y, BLOCK_REST_Y);
    }

    #[test]
    fn test_block_below_bottom_is_expired() {
        let mut block = ExpressionBlock::new(Vec2::new(800.0, 100.0), "1");
        block.pos.y = 101.0;
        assert!(block.is_expired());
    }

    #[test]
    fn test_projectile_reaches_target() {
        let mut shot = Projectile::new(Vec2::new(400.0, 460.0), Vec2::new(400.0, 280.0), 1);
        let mut steps = 0;
        while !shot.arrived && steps < 100 {
            shot.update();
            steps += 1;
        }
        assert!(shot.arrived);
        assert!(steps <= 12);
        assert_eq!(shot.answer_index, 1);
    }

    #[test]
    fn test_projectile_zero_distance_arrives() {
        let here = Vec2::new(100.0, 100.0);
        let mut shot = Projectile::new(here, here, 0);
        assert_eq!(shot.vel, Vec2::ZERO);
        shot.update();
        assert!(shot.arrived);
    }

    #[test]
    fn test_projectile_target_below_launch_arrives() {
        // Target lies below the launch point; the height check ends the flight
        let mut shot = Projectile::new(Vec2::new(100.0, 100.0), Vec2::new(900.0, 500.0), 2);
        shot.update();
        assert!(shot.arrived);
    }

    #[test]
    fn test_projectile_passing_height_arrives() {
        // Steep diagonal that overshoots the radius but crosses the target's height
        let mut shot = Projectile::new(Vec2::new(0.0, 400.0), Vec2::new(300.0, 280.0), 0);
        let mut steps = 0;
        while !shot.arrived && steps < 100 {
            shot.update();
            steps += 1;
        }
        assert!(shot.arrived);
    }

    #[test]
    fn test_floating_text_fades() {
        let mut text = FloatingText::new(Vec2::new(0.0, 100.0), "+100", TextTone::Positive);
        text.update();
        assert_eq!(text.pos.y, 98.0);
        for _ in 0..60 {
            text.update();
        }
        assert!(text.is_dead());
        assert_eq!(text.opacity(), 0.0);
    }
}
