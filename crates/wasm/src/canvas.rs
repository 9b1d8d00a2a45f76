//! [`Surface`] over a 2-D canvas context.

use std::f64::consts::TAU;

use glam::DVec2;
use particle_net_core::{Rgba, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquires the canvas's 2-D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Page-space position of the canvas's top-left corner.
    pub fn origin(&self) -> DVec2 {
        let rect = self.canvas.get_bounding_client_rect();
        DVec2::new(rect.left(), rect.top())
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        f64::from(self.canvas.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.canvas.height())
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, line_width: f64) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        // arc only fails for a negative radius
        if self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }
}
