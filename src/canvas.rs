use crate::constants::{BACKDROP_STYLE, DEVICE_PIXEL_RATIO};
use crate::core::{fill_style, ProjectedStar, StarSurface, Viewport};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// 2D canvas the starfield paints onto.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the browser hands out no 2D context; callers treat that as
    /// an inert effect rather than an error.
    pub fn acquire(canvas: &web::HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas: canvas.clone(),
            ctx,
        })
    }

    pub fn apply_backdrop_style(&self) {
        let style = self.canvas.style();
        for (prop, value) in BACKDROP_STYLE {
            _ = style.set_property(prop, value);
        }
    }

    /// Match backing store and CSS size to the viewport.
    pub fn sync_to_viewport(&self, viewport: Viewport) {
        let w_px = (viewport.width as f64 * DEVICE_PIXEL_RATIO) as u32;
        let h_px = (viewport.height as f64 * DEVICE_PIXEL_RATIO) as u32;
        self.canvas.set_width(w_px);
        self.canvas.set_height(h_px);
        let style = self.canvas.style();
        _ = style.set_property("width", &format!("{}px", viewport.width));
        _ = style.set_property("height", &format!("{}px", viewport.height));
        // resizing resets the transform; keep drawing in CSS pixels
        _ = self
            .ctx
            .set_transform(DEVICE_PIXEL_RATIO, 0.0, 0.0, DEVICE_PIXEL_RATIO, 0.0, 0.0);
    }
}

impl StarSurface for CanvasSurface {
    fn clear(&mut self, viewport: Viewport) {
        self.ctx
            .clear_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
    }

    fn fill_star(&mut self, star: &ProjectedStar) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                star.center.x as f64,
                star.center.y as f64,
                star.radius as f64,
                0.0,
                TAU,
            )
            .is_err()
        {
            return;
        }
        self.ctx.set_fill_style_str(&fill_style(star.alpha));
        self.ctx.fill();
    }
}
