//! Page decorations around the network, exposed to the page script.
//!
//! The page owns the DOM; these bindings only hold state and answer
//! questions, returning JSON where the answer is structured.

use glam::DVec2;
use particle_net_core::effects::{
    chrome, split_reveal, EffectPool, KonamiDetector, MatrixMode, Orbiters, RevealTracker,
    TrailDebouncer,
};
use particle_net_core::{Viewport, Xorshift64};
use wasm_bindgen::prelude::*;

const POOL_CAPACITY: usize = 64;

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen]
pub struct PageEffects {
    rng: Xorshift64,
    pool: EffectPool,
    trail: TrailDebouncer,
    konami: KonamiDetector,
    matrix: Option<MatrixMode>,
    orbiters: Orbiters,
    reveal: RevealTracker,
}

#[wasm_bindgen]
impl PageEffects {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PageEffects {
        PageEffects {
            rng: Xorshift64::new(crate::random_seed()),
            pool: EffectPool::new(POOL_CAPACITY),
            trail: TrailDebouncer::default(),
            konami: KonamiDetector::new(),
            matrix: None,
            orbiters: Orbiters::new(),
            reveal: RevealTracker::new(),
        }
    }

    /// Pointer moved; trails are emitted from `tick`.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: f64) {
        self.trail.pointer_moved(DVec2::new(x, y), now_ms);
    }

    /// Click: a ripple plus a ring of sparks.
    pub fn click(&mut self, x: f64, y: f64, now_ms: f64) {
        self.pool
            .spawn_burst(DVec2::new(x, y), now_ms, &mut self.rng);
    }

    /// Emits pending trails, drops expired effects and returns the live
    /// ones as JSON.
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsError> {
        if let Some(at) = self.trail.poll(now_ms) {
            self.pool.spawn_trail(at, now_ms);
        }
        self.pool.tick(now_ms);
        if self.matrix.as_ref().is_some_and(|m| !m.is_active(now_ms)) {
            self.matrix = None;
        }
        let live: Vec<_> = self.pool.iter().collect();
        to_json(&live)
    }

    /// Feeds a `KeyboardEvent.key`. Returns the matrix columns as JSON
    /// when the sequence completes, otherwise `undefined`.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, now_ms: f64) -> Result<Option<String>, JsError> {
        if !self.konami.push(key) {
            return Ok(None);
        }
        tracing::info!("matrix mode activated");
        let mode = MatrixMode::start(now_ms, &mut self.rng);
        let json = to_json(&mode.columns)?;
        self.matrix = Some(mode);
        Ok(Some(json))
    }

    #[wasm_bindgen(js_name = matrixActive)]
    pub fn matrix_active(&self, now_ms: f64) -> bool {
        self.matrix.as_ref().is_some_and(|m| m.is_active(now_ms))
    }

    /// Orbiting dots around the pointer as `[[x, y, opacity], ...]`.
    pub fn orbit(&mut self, x: f64, y: f64) -> Result<String, JsError> {
        let dots = self.orbiters.advance(DVec2::new(x, y));
        let rows: Vec<[f64; 3]> = dots
            .iter()
            .map(|d| [d.position.x, d.position.y, d.opacity])
            .collect();
        to_json(&rows)
    }

    /// Pointer parallax for the `index`th shape as `[dx, dy]`.
    pub fn parallax(&self, index: usize, x: f64, y: f64, width: f64, height: f64) -> Vec<f64> {
        let off = chrome::parallax_offset(index, DVec2::new(x, y), Viewport::new(width, height));
        vec![off.x, off.y]
    }

    #[wasm_bindgen(js_name = scrollParallax)]
    pub fn scroll_parallax(&self, index: usize, scroll_y: f64) -> f64 {
        chrome::scroll_parallax(index, scroll_y)
    }

    #[wasm_bindgen(js_name = navbarShadow)]
    pub fn navbar_shadow(&self, scroll_y: f64) -> bool {
        chrome::navbar_shadow(scroll_y)
    }

    pub fn glitch(&self, scroll_y: f64) -> bool {
        chrome::glitch_triggered(scroll_y)
    }

    /// Glyphs for a heading, as JSON.
    #[wasm_bindgen(js_name = splitReveal)]
    pub fn split_reveal(&self, text: &str) -> Result<String, JsError> {
        to_json(&split_reveal(text))
    }

    /// True the first time element `id` is reported visible.
    #[wasm_bindgen(js_name = observeReveal)]
    pub fn observe_reveal(&mut self, id: &str, top: f64, bottom: f64, viewport_height: f64) -> bool {
        let visible = particle_net_core::effects::reveal::is_in_viewport(top, bottom, viewport_height);
        self.reveal.observe(id, visible)
    }
}

impl Default for PageEffects {
    fn default() -> Self {
        Self::new()
    }
}
