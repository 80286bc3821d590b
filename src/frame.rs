use crate::canvas::CanvasSurface;
use crate::core::{CancelToken, FrameBudget, Starfield, Viewport};
use crate::dom;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub starfield: Starfield,
    pub surface: CanvasSurface,
    pub budget: FrameBudget,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let t0 = Instant::now();
        self.starfield.tick(&mut self.surface);
        self.budget.record(t0.elapsed());
    }

    /// Used when resuming: the listener was detached while stopped.
    pub fn resize_if_changed(&mut self, viewport: Viewport) {
        if viewport != self.starfield.viewport() {
            self.resize(viewport);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.surface.sync_to_viewport(viewport);
        self.starfield.resize(viewport);
        log::debug!(
            "[canvas] resized to {}x{}",
            viewport.width,
            viewport.height
        );
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A running requestAnimationFrame loop plus its resize listener.
///
/// Owns every browser registration it made; `stop` (or drop) undoes them.
pub struct AnimationLoop {
    token: CancelToken,
    raf_handle: Rc<Cell<Option<i32>>>,
    tick: TickSlot,
    resize: Option<Closure<dyn FnMut()>>,
}

impl AnimationLoop {
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn stop(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        if let Some(w) = web::window() {
            if let Some(id) = self.raf_handle.take() {
                _ = w.cancel_animation_frame(id);
            }
            if let Some(resize) = &self.resize {
                _ = w.remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
            }
        }
        self.resize = None;
        // breaks the closure <-> slot cycle
        self.tick.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> AnimationLoop {
    let token = CancelToken::new();
    let raf_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: TickSlot = Rc::new(RefCell::new(None));

    let tick_clone = tick.clone();
    let token_tick = token.clone();
    let handle_tick = raf_handle.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        handle_tick.set(None);
        if token_tick.is_cancelled() {
            return;
        }
        frame_ctx_tick.borrow_mut().frame();
        handle_tick.set(request_frame(&tick_clone));
    }) as Box<dyn FnMut()>));
    raf_handle.set(request_frame(&tick));

    let resize = wire_resize(frame_ctx);
    AnimationLoop {
        token,
        raf_handle,
        tick,
        resize,
    }
}

fn request_frame(tick: &TickSlot) -> Option<i32> {
    let w = web::window()?;
    let slot = tick.borrow();
    let closure = slot.as_ref()?;
    w.request_animation_frame(closure.as_ref().unchecked_ref()).ok()
}

fn wire_resize(frame_ctx: Rc<RefCell<FrameContext>>) -> Option<Closure<dyn FnMut()>> {
    let w = web::window()?;
    let closure = Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().resize(dom::window_viewport());
    }) as Box<dyn FnMut()>);
    w.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        .ok()?;
    Some(closure)
}
