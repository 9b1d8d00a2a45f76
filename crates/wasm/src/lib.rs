#![deny(unsafe_code)]
//! Browser bindings for the particle network.
//!
//! [`ParticleNetwork::attach`] binds an [`AnimationDriver`] to a canvas,
//! wires the window resize and canvas pointer events into it, and drives it
//! from `requestAnimationFrame` until [`ParticleNetwork::stop`] is called.
//! A missing canvas is not an error: `attach` returns `undefined` and
//! nothing runs.

mod canvas;
mod effects;

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use particle_net_core::{AnimationDriver, FrameOutcome, NetworkConfig, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, Window};

pub use canvas::CanvasSurface;
pub use effects::PageEffects;

pub(crate) fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

fn window_viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

struct State {
    driver: AnimationDriver,
    surface: CanvasSurface,
    frame_id: Option<i32>,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

#[wasm_bindgen]
pub struct ParticleNetwork {
    window: Window,
    state: Rc<RefCell<State>>,
    frame: FrameCallback,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ParticleNetwork {
    /// Starts the animation on the canvas with id `canvas_id`.
    ///
    /// `params_json` holds configuration overrides (may be empty). Returns
    /// `undefined` when there is no window or no such canvas.
    pub fn attach(canvas_id: &str, params_json: &str) -> Result<Option<ParticleNetwork>, JsValue> {
        let Some(window) = web_sys::window() else {
            return Ok(None);
        };
        let Some(element) = window
            .document()
            .and_then(|d| d.get_element_by_id(canvas_id))
        else {
            tracing::debug!(canvas_id, "no canvas; particle network disabled");
            return Ok(None);
        };
        let canvas: HtmlCanvasElement = element.dyn_into()?;

        let params: serde_json::Value = if params_json.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(params_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let config = NetworkConfig::from_json(&params);
        let driver = AnimationDriver::new(window_viewport(&window), random_seed(), config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let state = Rc::new(RefCell::new(State {
            driver,
            surface: CanvasSurface::new(canvas.clone())?,
            frame_id: None,
        }));

        let mut network = ParticleNetwork {
            window: window.clone(),
            state,
            frame: Rc::new(RefCell::new(None)),
            listeners: Vec::new(),
        };
        network.listen_resize(&window)?;
        network.listen_pointer(&canvas)?;
        network.start_loop()?;
        Ok(Some(network))
    }

    /// Stops the animation and detaches every listener. Idempotent.
    pub fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.driver.stop();
        if let Some(id) = state.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        drop(state);
        self.frame.borrow_mut().take();
        for l in self.listeners.drain(..) {
            let _ = l
                .target
                .remove_event_listener_with_callback(l.event, l.callback.as_ref().unchecked_ref());
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.state.borrow().driver.state() == particle_net_core::DriverState::Running
    }

    /// Number of frames rendered so far.
    #[wasm_bindgen(getter, js_name = frameCount)]
    pub fn frame_count(&self) -> f64 {
        self.state.borrow().driver.frame_count() as f64
    }
}

impl ParticleNetwork {
    fn listen(
        &mut self,
        target: EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    ) -> Result<(), JsValue> {
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target,
            event,
            callback,
        });
        Ok(())
    }

    fn listen_resize(&mut self, window: &Window) -> Result<(), JsValue> {
        let state = Rc::clone(&self.state);
        let win = window.clone();
        let on_resize = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            state.borrow_mut().driver.resize(window_viewport(&win));
        });
        self.listen(window.clone().into(), "resize", on_resize)
    }

    fn listen_pointer(&mut self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let state = Rc::clone(&self.state);
        let on_move = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| {
            let Some(e) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut s = state.borrow_mut();
            let origin = s.surface.origin();
            let client = DVec2::new(f64::from(e.client_x()), f64::from(e.client_y()));
            s.driver.pointer_move(client, origin);
        });
        self.listen(canvas.clone().into(), "mousemove", on_move)?;

        let state = Rc::clone(&self.state);
        let on_leave = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
            state.borrow_mut().driver.pointer_leave();
        });
        self.listen(canvas.clone().into(), "mouseleave", on_leave)
    }

    fn start_loop(&mut self) -> Result<(), JsValue> {
        let state = Rc::clone(&self.state);
        let frame = Rc::clone(&self.frame);
        let window = self.window.clone();
        let tick = Closure::<dyn FnMut()>::new(move || {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            s.frame_id = None;
            if s.driver.frame(&mut s.surface) == FrameOutcome::Stop {
                return;
            }
            if let Some(cb) = frame.borrow().as_ref() {
                match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => s.frame_id = Some(id),
                    Err(e) => tracing::warn!(error = ?e, "requestAnimationFrame failed"),
                }
            }
        });
        let id = self
            .window
            .request_animation_frame(tick.as_ref().unchecked_ref())?;
        self.state.borrow_mut().frame_id = Some(id);
        *self.frame.borrow_mut() = Some(tick);
        Ok(())
    }
}

impl Drop for ParticleNetwork {
    fn drop(&mut self) {
        self.stop();
    }
}
