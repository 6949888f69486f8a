//! Rendering module
//!
//! The simulation never draws. Each frame the host takes a [`Snapshot`] and hands
//! it to [`render_frame`] together with something implementing [`Canvas`]. Every
//! drawable entity implements [`Draw`] against that small primitive set, so the
//! frame composition can be tested with a recording canvas.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GamePhase, Snapshot};

/// 8-bit RGB color with float alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);

    /// Opaque color from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba()` string
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Font family used for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Code font (expressions)
    Mono,
    /// Arcade font (banners, popups)
    Pixel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub face: Face,
    pub align: Align,
    pub color: Color,
    /// Shadow glow color and blur
    pub glow: Option<(Color, f32)>,
}

impl TextStyle {
    pub fn new(size: f32, face: Face, color: Color) -> Self {
        Self {
            size,
            bold: false,
            face,
            align: Align::Center,
            color,
            glow: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn glow(mut self, color: Color, blur: f32) -> Self {
        self.glow = Some((color, blur));
        self
    }

    /// CSS font shorthand
    pub fn css_font(&self) -> String {
        let family = match self.face {
            Face::Mono => "Consolas, \"Courier New\", monospace",
            Face::Pixel => "\"Press Start 2P\", cursive",
        };
        let weight = if self.bold { "bold " } else { "" };
        format!("{}{}px {}", weight, self.size, family)
    }
}

/// Drawing primitives a frame is built from
pub trait Canvas {
    /// Drawable area in pixels
    fn size(&self) -> Vec2;

    /// Fill the whole surface with a vertical gradient
    fn clear(&mut self, top: Color, bottom: Color);

    /// Translate everything drawn afterwards (screen shake)
    fn set_offset(&mut self, offset: Vec2);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Rounded box centred on `center`, optionally outlined
    fn fill_round_rect(
        &mut self,
        center: Vec2,
        size: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Color>,
    );

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color);

    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Fill the whole surface with a radial gradient between two radii
    fn fill_radial(&mut self, center: Vec2, inner: f32, outer: f32, from: Color, to: Color);

    fn text(&mut self, text: &str, pos: Vec2, style: &TextStyle);
}

/// Anything that knows how to put itself on a canvas
pub trait Draw {
    fn draw(&self, canvas: &mut dyn Canvas);
}

/// Background gradient
const BACKGROUND_TOP: Color = Color::hex(0x0d0d2b);
const BACKGROUND_BOTTOM: Color = Color::hex(0x1a1a3e);

/// Compose one frame. `shake` is the screen-shake offset for this frame.
pub fn render_frame(snapshot: &Snapshot<'_>, canvas: &mut dyn Canvas, shake: Vec2) {
    canvas.set_offset(shake);
    canvas.clear(BACKGROUND_TOP, BACKGROUND_BOTTOM);

    for star in &snapshot.effects.starfield.stars {
        star.draw(canvas);
    }

    if snapshot.in_session() {
        // Particles behind entities
        for particle in &snapshot.effects.particles {
            particle.draw(canvas);
        }

        if let Some(block) = snapshot.expression {
            block.draw(canvas);
            if let Some(question) = snapshot.question {
                shapes::draw_category_tag(
                    canvas,
                    question.category,
                    block.pos - Vec2::new(0.0, shapes::CATEGORY_TAG_OFFSET),
                );
            }
        }

        for projectile in snapshot.projectiles {
            projectile.draw(canvas);
        }
        snapshot.player.draw(canvas);
        for text in snapshot.floating_texts {
            text.draw(canvas);
        }

        if snapshot.effects.flash_steps > 0 {
            shapes::draw_flash(canvas);
        }
        if let Some(notification) = &snapshot.effects.level_up {
            shapes::draw_level_up(canvas, notification);
        }
        if let Some(notification) = &snapshot.effects.victory {
            shapes::draw_victory(canvas, notification);
        }
        if snapshot.phase == GamePhase::Paused {
            shapes::draw_paused(canvas);
        }
    }

    canvas.set_offset(Vec2::ZERO);

    // CRT overlay, screen-fixed
    shapes::draw_scan_lines(canvas);
    shapes::draw_vignette(canvas);
}
