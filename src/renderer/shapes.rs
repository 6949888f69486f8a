//! Draw implementations for entities, effects and overlays

use glam::Vec2;

use super::{Canvas, Color, Draw, Face, TextStyle};
use crate::quiz::Category;
use crate::sim::{
    ExpressionBlock, FloatingText, Notification, Particle, ParticleKind, Player, Projectile, Star,
    TextTone,
};

/// Distance of the category tag above the block centre
pub const CATEGORY_TAG_OFFSET: f32 = 55.0;

const SHIP_BODY: Color = Color::hex(0x4a4aff);
const SHIP_COCKPIT: Color = Color::hex(0x00ffff);
const SHIP_ENGINE: Color = Color::hex(0xff6600);

const BLOCK_FILL: Color = Color::rgba(30, 30, 60, 0.9);
const BLOCK_TEXT: Color = Color::hex(0xffcc66);

const PROJECTILE_BODY: Color = Color::hex(0x88aaff);

const POSITIVE: Color = Color::hex(0x00ff88);
const NEGATIVE: Color = Color::hex(0xff4444);

const FLASH: Color = Color::rgba(255, 0, 0, 0.2);
const SCAN_LINE_ALPHA: f32 = 0.03;
const BANNER: Color = Color::hex(0xffaa00);

/// Colors cycled by the victory fireworks
const CELEBRATION_COLORS: [Color; 6] = [
    Color::hex(0xffcc00),
    Color::hex(0xff6600),
    Color::hex(0x00ff88),
    Color::hex(0xff00ff),
    Color::hex(0x00ffff),
    Color::hex(0xffffff),
];

/// Tag color per category
pub fn category_color(category: Category) -> Color {
    match category {
        Category::TypeCoercion => Color::hex(0x4a90d9),
        Category::TruthyFalsy => Color::hex(0x9b59b6),
        Category::Equality => Color::hex(0xe74c3c),
        Category::Typeof => Color::hex(0xf39c12),
        Category::Arrays => Color::hex(0x2ecc71),
        Category::Objects => Color::hex(0x1abc9c),
        Category::Unlimited => Color::hex(0xff00ff),
    }
}

fn particle_color(kind: ParticleKind, shade: u8) -> Color {
    match kind {
        ParticleKind::Correct => match shade {
            0 => POSITIVE,
            1 => Color::hex(0x66ffbb),
            _ => Color::hex(0xaaffdd),
        },
        ParticleKind::Error => NEGATIVE,
        ParticleKind::Trail => Color::hex(0x6a6aff),
        ParticleKind::Sparkle => match shade {
            0 => Color::hex(0xffaa00),
            1 => Color::hex(0xffcc00),
            _ => Color::hex(0xffff66),
        },
        ParticleKind::Celebration => {
            CELEBRATION_COLORS[shade as usize % CELEBRATION_COLORS.len()]
        }
    }
}

impl Draw for Player {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let half = self.size / 2.0;

        // Hull
        canvas.fill_polygon(
            &[
                self.pos + Vec2::new(0.0, -half.y),
                self.pos + Vec2::new(-half.x, half.y),
                self.pos + Vec2::new(half.x, half.y),
            ],
            SHIP_BODY,
        );

        canvas.fill_ellipse(self.pos, Vec2::new(8.0, 12.0), SHIP_COCKPIT);

        // Engines
        for side in [-12.0, 12.0] {
            canvas.fill_ellipse(
                self.pos + Vec2::new(side, half.y + 5.0),
                Vec2::new(4.0, 8.0),
                SHIP_ENGINE,
            );
        }
    }
}

impl Draw for ExpressionBlock {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let outline = Color::rgba(100, 100, 200, 0.5 + self.glow * 0.3);
        canvas.fill_round_rect(self.pos, self.size, 10.0, BLOCK_FILL, Some(outline));

        let style = TextStyle::new(20.0, Face::Mono, BLOCK_TEXT)
            .bold()
            .glow(Color::rgba(100, 100, 255, self.glow * 0.6), 20.0);
        canvas.text(&self.label, self.pos, &style);
    }
}

impl Draw for Projectile {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.pos, self.size, PROJECTILE_BODY);
        canvas.fill_circle(self.pos, self.size * 0.4, Color::WHITE);
    }
}

impl Draw for FloatingText {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let color = match self.tone {
            TextTone::Positive => POSITIVE,
            TextTone::Negative => NEGATIVE,
        }
        .with_alpha(self.opacity());
        let style = TextStyle::new(18.0, Face::Pixel, color)
            .bold()
            .glow(color, 10.0);
        canvas.text(&self.text, self.pos, &style);
    }
}

impl Draw for Particle {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let color = particle_color(self.kind, self.shade).with_alpha(self.life);
        canvas.fill_circle(self.pos, self.size, color);
    }
}

impl Draw for Star {
    fn draw(&self, canvas: &mut dyn Canvas) {
        let alpha = self.alpha * (0.7 + 0.3 * self.twinkle.sin());
        canvas.fill_circle(self.pos, self.size, Color::WHITE.with_alpha(alpha));
    }
}

/// Category label above the expression block
pub fn draw_category_tag(canvas: &mut dyn Canvas, category: Category, at: Vec2) {
    let style = TextStyle::new(10.0, Face::Mono, category_color(category));
    canvas.text(category.tag(), at, &style);
}

/// Red wash after a wrong answer
pub fn draw_flash(canvas: &mut dyn Canvas) {
    let size = canvas.size();
    canvas.fill_rect(Vec2::ZERO, size, FLASH);
}

pub fn draw_level_up(canvas: &mut dyn Canvas, notification: &Notification) {
    let center = canvas.size() / 2.0;
    let color = BANNER.with_alpha(notification.alpha);
    let style = TextStyle::new(14.0, Face::Pixel, color).glow(color, 20.0);
    canvas.text(
        "NEW CATEGORY UNLOCKED!",
        center - Vec2::new(0.0, 20.0),
        &style,
    );
    canvas.text(
        notification.category.display_name(),
        center + Vec2::new(0.0, 20.0),
        &style,
    );
}

pub fn draw_victory(canvas: &mut dyn Canvas, notification: &Notification) {
    let center = canvas.size() / 2.0;
    let alpha = notification.alpha;

    let headline = Color::hex(0xffff00).with_alpha(alpha);
    let style = TextStyle::new(28.0, Face::Pixel, headline)
        .bold()
        .glow(Color::WHITE.with_alpha(alpha), 30.0);
    canvas.text("YOU WIN!", center - Vec2::new(0.0, 30.0), &style);

    let sub = SHIP_COCKPIT.with_alpha(alpha);
    let style = TextStyle::new(14.0, Face::Pixel, sub).glow(sub, 15.0);
    canvas.text("UNLIMITED MODE UNLOCKED!", center + Vec2::new(0.0, 20.0), &style);
}

pub fn draw_paused(canvas: &mut dyn Canvas) {
    let size = canvas.size();
    canvas.fill_rect(Vec2::ZERO, size, Color::BLACK.with_alpha(0.5));
    let style = TextStyle::new(24.0, Face::Pixel, Color::WHITE);
    canvas.text("PAUSED", size / 2.0, &style);
}

/// Dark band every 4px
pub fn draw_scan_lines(canvas: &mut dyn Canvas) {
    let size = canvas.size();
    let band = Color::BLACK.with_alpha(SCAN_LINE_ALPHA);
    let mut y = 0.0;
    while y < size.y {
        canvas.fill_rect(Vec2::new(0.0, y), Vec2::new(size.x, 2.0), band);
        y += 4.0;
    }
}

/// Darkened corners
pub fn draw_vignette(canvas: &mut dyn Canvas) {
    let size = canvas.size();
    canvas.fill_radial(
        size / 2.0,
        size.y * 0.3,
        size.y * 0.8,
        Color::BLACK.with_alpha(0.0),
        Color::BLACK.with_alpha(0.4),
    );
}
