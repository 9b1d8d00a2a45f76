//! Scroll- and pointer-driven page chrome.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::config::Viewport;

/// Scroll offset past which the navbar gets its drop shadow.
pub const NAVBAR_SHADOW_THRESHOLD: f64 = 50.0;
const GLITCH_PERIOD: f64 = 500.0;
const GLITCH_WINDOW: f64 = 10.0;

/// Whether the navbar should show its shadow at this scroll offset.
pub fn navbar_shadow(scroll_y: f64) -> bool {
    scroll_y > NAVBAR_SHADOW_THRESHOLD
}

/// Whether a scroll update should flash the glitch overlay.
///
/// Fires inside the first 10 px of every 500 px band. It is sampled once
/// per scroll update, so a fast scroll may skip a band or hit it several
/// times.
pub fn glitch_triggered(scroll_y: f64) -> bool {
    scroll_y.rem_euclid(GLITCH_PERIOD) < GLITCH_WINDOW
}

/// Pointer parallax for the `index`th background shape: deeper shapes
/// move further from the viewport center.
pub fn parallax_offset(index: usize, pointer: DVec2, viewport: Viewport) -> DVec2 {
    let speed = (index + 1) as f64 * 0.06;
    let center = DVec2::new(viewport.width, viewport.height) / 2.0;
    (pointer - center) * speed
}

/// Vertical scroll parallax for the `index`th background shape, cycling
/// through three depths.
pub fn scroll_parallax(index: usize, scroll_y: f64) -> f64 {
    let speed = ((index % 3) + 1) as f64 * 0.3;
    -scroll_y * speed
}

/// One companion dot orbiting the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbiter {
    pub position: DVec2,
    pub opacity: f64,
}

/// Three dots circling the pointer, evenly spaced, with a breathing radius.
#[derive(Debug, Clone, Default)]
pub struct Orbiters {
    angle: f64,
}

impl Orbiters {
    pub const COUNT: usize = 3;
    const ANGLE_STEP: f64 = 0.01;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Advances one frame and returns the dots around `pointer`.
    pub fn advance(&mut self, pointer: DVec2) -> [Orbiter; Self::COUNT] {
        self.angle += Self::ANGLE_STEP;
        let a = self.angle;
        let radius = 50.0 + (a * 2.0).sin() * 20.0;
        let opacity = 0.3 + (a * 3.0).sin() * 0.2;
        std::array::from_fn(|i| {
            let phase = a + i as f64 * TAU / Self::COUNT as f64;
            Orbiter {
                position: pointer + DVec2::new(phase.cos(), phase.sin()) * radius,
                opacity,
            }
        })
    }
}
