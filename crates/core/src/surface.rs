//! The drawing-surface seam between the renderer and a concrete backend.
//!
//! The browser backend maps these calls onto a 2-D canvas context
//! (`clearRect`, `beginPath`/`moveTo`/`lineTo`/`stroke`, `arc`/`fill`);
//! [`RecordingSurface`] keeps them as a command list for headless runs and
//! the PNG rasterizer.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// A 2-D drawing target with a mutable size.
///
/// This trait is object-safe; the driver and renderer take `&mut dyn Surface`.
pub trait Surface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Resizes the backing store. Backends may clear their contents.
    fn set_size(&mut self, width: f64, height: f64);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, line_width: f64);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);

    /// True when either dimension is zero (or negative); nothing is drawn.
    fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    Line {
        from: DVec2,
        to: DVec2,
        color: Rgba,
        width: f64,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
}

/// In-memory surface that records every call since the last clear.
///
/// `clear` drops earlier commands and records a single `Clear`, so
/// [`RecordingSurface::commands`] always describes exactly one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded lines.
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    /// Number of recorded circles.
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, line_width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width: line_width,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}
