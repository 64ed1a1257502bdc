//! 2D canvas surface

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawCommand, Surface};

// Style setters through Reflect; the typed setters are deprecated.
fn set_style(ctx: &CanvasRenderingContext2d, prop: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(ctx.as_ref(), &JsValue::from_str(prop), value);
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Size the canvas to the viewport and grab its 2D context
    pub fn attach(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<Self, JsValue> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Wipe everything painted so far
    pub fn clear(&self) {
        if let Some(canvas) = self.ctx.canvas() {
            self.ctx
                .clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
    }

    fn glow(&self, center: glam::Vec2, color: &super::Color, gradient_radius: f32, disc_radius: f32) {
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, gradient_radius as f64)
        else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &color.to_css());
        let _ = gradient.add_color_stop(1.0, &color.with_alpha(0.0).to_css());
        set_style(&self.ctx, "fillStyle", gradient.as_ref());
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(x, y, disc_radius as f64, 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }
}

impl Surface for CanvasSurface {
    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::FillRect { rect, color } => {
                set_style(&self.ctx, "fillStyle", &JsValue::from_str(&color.to_css()));
                self.ctx.fill_rect(
                    rect.left as f64,
                    rect.top as f64,
                    rect.width as f64,
                    rect.height as f64,
                );
            }
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => {
                set_style(&self.ctx, "strokeStyle", &JsValue::from_str(&color.to_css()));
                self.ctx.set_line_width(*width as f64);
                self.ctx.begin_path();
                self.ctx.move_to(from.x as f64, from.y as f64);
                self.ctx.line_to(to.x as f64, to.y as f64);
                self.ctx.stroke();
            }
            DrawCommand::Glow {
                center,
                color,
                gradient_radius,
                disc_radius,
            } => self.glow(*center, color, *gradient_radius, *disc_radius),
        }
    }
}
