//! Canvas2D backend

use glam::Vec2;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Align, Canvas, Color, TextStyle};

/// Draws onto an HTML canvas through its 2D context
pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    offset: Vec2,
}

impl Canvas2d {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            canvas,
            offset: Vec2::ZERO,
        }
    }

    fn at(&self, p: Vec2) -> (f64, f64) {
        ((p.x + self.offset.x) as f64, (p.y + self.offset.y) as f64)
    }
}

impl Canvas for Canvas2d {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, top: Color, bottom: Color) {
        let size = self.size();
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, size.y as f64);
        let _ = gradient.add_color_stop(0.0, &top.to_css());
        let _ = gradient.add_color_stop(1.0, &bottom.to_css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        // Overdraw so shake never exposes an edge
        let pad = self.offset.abs();
        self.ctx.fill_rect(
            -pad.x as f64,
            -pad.y as f64,
            (size.x + 2.0 * pad.x) as f64,
            (size.y + 2.0 * pad.y) as f64,
        );
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let (x, y) = self.at(origin);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x, y, size.x as f64, size.y as f64);
    }

    fn fill_round_rect(
        &mut self,
        center: Vec2,
        size: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Color>,
    ) {
        let (cx, cy) = self.at(center);
        let (w, h) = (size.x as f64, size.y as f64);
        let (x, y) = (cx - w / 2.0, cy - h / 2.0);
        let r = (radius as f64).min(w / 2.0).min(h / 2.0);

        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.line_to(x + w - r, y);
        ctx.quadratic_curve_to(x + w, y, x + w, y + r);
        ctx.line_to(x + w, y + h - r);
        ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
        ctx.line_to(x + r, y + h);
        ctx.quadratic_curve_to(x, y + h, x, y + h - r);
        ctx.line_to(x, y + r);
        ctx.quadratic_curve_to(x, y, x + r, y);
        ctx.close_path();

        ctx.set_fill_style_str(&fill.to_css());
        ctx.fill();
        if let Some(stroke) = stroke {
            ctx.set_stroke_style_str(&stroke.to_css());
            ctx.set_line_width(2.0);
            ctx.stroke();
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let (x, y) = self.at(center);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        self.ctx
            .arc(x, y, radius.max(0.0) as f64, 0.0, std::f64::consts::TAU)
            .ok();
        self.ctx.fill();
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        let (x, y) = self.at(center);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        self.ctx
            .ellipse(
                x,
                y,
                radii.x.max(0.0) as f64,
                radii.y.max(0.0) as f64,
                0.0,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
        self.ctx.fill();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        let (x, y) = self.at(*first);
        self.ctx.move_to(x, y);
        for p in rest {
            let (x, y) = self.at(*p);
            self.ctx.line_to(x, y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_radial(&mut self, center: Vec2, inner: f32, outer: f32, from: Color, to: Color) {
        let size = self.size();
        let (cx, cy) = (center.x as f64, center.y as f64);
        let Ok(gradient) =
            self.ctx
                .create_radial_gradient(cx, cy, inner as f64, cx, cy, outer as f64)
        else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &from.to_css());
        let _ = gradient.add_color_stop(1.0, &to.to_css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        let (x, y) = self.at(pos);
        let ctx = &self.ctx;
        ctx.set_font(&style.css_font());
        ctx.set_text_align(match style.align {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        });
        ctx.set_text_baseline("middle");
        if let Some((glow, blur)) = style.glow {
            ctx.set_shadow_color(&glow.to_css());
            ctx.set_shadow_blur(blur as f64);
        }
        ctx.set_fill_style_str(&style.color.to_css());
        ctx.fill_text(text, x, y).ok();
        ctx.set_shadow_blur(0.0);
    }
}
