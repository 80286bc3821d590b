#![cfg(target_arch = "wasm32")]
use crate::constants::{
    ATTR_SPEED, ATTR_STAR_COUNT, HERO_SPEED, HERO_STAR_COUNT, STARFIELD_CANVAS_ID,
};
use crate::core::{FrameBudget, Starfield, StarfieldParams};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

mod canvas;
mod constants;
pub mod core;
mod dom;
mod frame;

thread_local! {
    // Keeps the effect mounted at module start alive for the page lifetime
    static AUTO_MOUNTED: RefCell<Option<StarfieldEffect>> = const { RefCell::new(None) };
}

/// Perspective starfield bound to one canvas.
///
/// Lifecycle from JS: `new StarfieldEffect("id", count?, speed?)`, then
/// `start()` / `stop()` as often as needed; `free()` stops it for good.
/// The window resize listener is attached by `start()` and detached by
/// `stop()`; a resize that happens while stopped is picked up on the next
/// `start()`. A canvas without a 2D context yields an inert effect whose
/// methods do nothing.
#[wasm_bindgen]
pub struct StarfieldEffect {
    frame_ctx: Option<Rc<RefCell<frame::FrameContext>>>,
    running: Option<frame::AnimationLoop>,
}

#[wasm_bindgen]
impl StarfieldEffect {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        star_count: Option<u32>,
        speed: Option<f32>,
    ) -> Result<StarfieldEffect, JsValue> {
        let defaults = StarfieldParams::default();
        let params = StarfieldParams {
            star_count: star_count.map_or(defaults.star_count, |n| n as usize),
            speed: speed.unwrap_or(defaults.speed),
            ..defaults
        };
        Self::mount(canvas_id, params).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
    }

    pub fn start(&mut self) {
        if self.running.as_ref().is_some_and(|l| l.is_running()) {
            return;
        }
        let Some(frame_ctx) = &self.frame_ctx else {
            return;
        };
        frame_ctx
            .borrow_mut()
            .resize_if_changed(dom::window_viewport());
        self.running = Some(frame::start_loop(frame_ctx.clone()));
        log::info!("[starfield] started");
    }

    pub fn stop(&mut self) {
        let Some(mut anim) = self.running.take() else {
            return;
        };
        anim.stop();
        if let Some(frame_ctx) = &self.frame_ctx {
            let ctx = frame_ctx.borrow();
            ctx.budget.log_summary();
            log::info!(
                "[starfield] stopped after {} respawns",
                ctx.starfield.total_respawns()
            );
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.running.as_ref().is_some_and(|l| l.is_running())
    }

    #[wasm_bindgen(getter, js_name = starCount)]
    pub fn star_count(&self) -> u32 {
        self.frame_ctx
            .as_ref()
            .map_or(0, |c| c.borrow().starfield.particles().len() as u32)
    }
}

impl StarfieldEffect {
    fn mount(canvas_id: &str, params: StarfieldParams) -> anyhow::Result<Self> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let canvas = dom::canvas_by_id(&document, canvas_id)?;
        let viewport = dom::window_viewport();
        let starfield = Starfield::from_entropy(params, viewport)?;

        let Some(surface) = canvas::CanvasSurface::acquire(&canvas) else {
            log::debug!("[canvas] no 2d context on #{}; starfield stays inert", canvas_id);
            return Ok(Self {
                frame_ctx: None,
                running: None,
            });
        };
        surface.apply_backdrop_style();
        surface.sync_to_viewport(viewport);

        let p = starfield.params();
        log::info!(
            "[starfield] mounted on #{} stars={} speed={} viewport={}x{}",
            canvas_id,
            p.star_count,
            p.speed,
            viewport.width,
            viewport.height
        );
        Ok(Self {
            frame_ctx: Some(Rc::new(RefCell::new(frame::FrameContext {
                starfield,
                surface,
                budget: FrameBudget::default(),
            }))),
            running: None,
        })
    }
}

impl Drop for StarfieldEffect {
    fn drop(&mut self) {
        self.stop();
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("starfield-web starting");

    if let Err(e) = auto_mount() {
        log::error!("auto-mount error: {:?}", e);
    }
    Ok(())
}

// Mounts onto <canvas id="starfield"> when the page has one.
fn auto_mount() -> anyhow::Result<()> {
    let Some(document) = dom::window_document() else {
        return Ok(());
    };
    let Some(el) = document.get_element_by_id(STARFIELD_CANVAS_ID) else {
        log::debug!("[starfield] no #{} on page", STARFIELD_CANVAS_ID);
        return Ok(());
    };

    let hero = StarfieldParams::new(HERO_STAR_COUNT, HERO_SPEED);
    let params = hero
        .clone()
        .with_attributes(
            el.get_attribute(ATTR_STAR_COUNT).as_deref(),
            el.get_attribute(ATTR_SPEED).as_deref(),
        )
        .unwrap_or_else(|e| {
            log::warn!("[starfield] ignoring canvas attributes: {}", e);
            hero
        });

    let mut effect = StarfieldEffect::mount(STARFIELD_CANVAS_ID, params)?;
    effect.start();
    AUTO_MOUNTED.with(|slot| *slot.borrow_mut() = Some(effect));
    Ok(())
}
