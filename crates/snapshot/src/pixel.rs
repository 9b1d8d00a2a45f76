//! Software rasterization of recorded draw commands.
//!
//! Lines and circles are drawn with one pixel of linear edge coverage and
//! composited source-over in straight (non-premultiplied) sRGB, which is
//! what a 2-D canvas context does closely enough for a preview.

use glam::DVec2;
use particle_net_core::{DrawCommand, Rgba, Srgb};

/// A straight-alpha RGBA image with `f64` channels in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<[f64; 4]>,
}

impl PixelBuffer {
    /// Creates a transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 4]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel at (x, y), or `None` outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> Option<[f64; 4]> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill([0.0; 4]);
    }

    /// Fills every pixel with an opaque color.
    pub fn fill(&mut self, color: Srgb) {
        self.data.fill([color.r, color.g, color.b, 1.0]);
    }

    /// Composites `color` scaled by `coverage` over the pixel at (x, y).
    fn blend(&mut self, x: usize, y: usize, color: Rgba, coverage: f64) {
        let a = (color.alpha * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = &mut self.data[y * self.width + x];
        let keep = dst[3] * (1.0 - a);
        let out_a = a + keep;
        let src = [color.rgb.r, color.rgb.g, color.rgb.b];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = (s * a + *d * keep) / out_a;
        }
        dst[3] = out_a;
    }

    /// Pixel indices whose centers may be touched by a shape covering
    /// `[min, max]`, clipped to the buffer.
    fn span(&self, min: DVec2, max: DVec2) -> Option<(usize, usize, usize, usize)> {
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f64 - 1.0);
        let y1 = max.y.ceil().min(self.height as f64 - 1.0);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    /// Strokes a segment of the given width.
    pub fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, line_width: f64) {
        // Hairlines get one pixel of coverage, dimmed by their width.
        let half = (line_width / 2.0).max(0.5);
        let dim = line_width.clamp(0.0, 1.0);
        let pad = DVec2::splat(half + 1.0);
        let Some((x0, y0, x1, y1)) = self.span(from.min(to) - pad, from.max(to) + pad) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (half + 0.5 - segment_distance(p, from, to)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage * dim);
                }
            }
        }
    }

    /// Fills a disc.
    pub fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let pad = DVec2::splat(radius + 1.0);
        let Some((x0, y0, x1, y1)) = self.span(center - pad, center + pad) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Replays one command.
    pub fn apply(&mut self, command: &DrawCommand) {
        match *command {
            DrawCommand::Clear => self.clear(),
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => self.stroke_line(from, to, color, width),
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => self.fill_circle(center, radius, color),
        }
    }

    /// Converts to RGBA8 bytes, row-major. The length is `width * height * 4`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|px| px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Replays `commands` over a buffer of the given size.
///
/// With `background` set, the buffer starts filled with it and a `Clear`
/// command restores it; otherwise clears leave transparent pixels.
pub fn rasterize(
    commands: &[DrawCommand],
    width: usize,
    height: usize,
    background: Option<Srgb>,
) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    let reset = |buf: &mut PixelBuffer| match background {
        Some(bg) => buf.fill(bg),
        None => buf.clear(),
    };
    reset(&mut buf);
    for command in commands {
        match command {
            DrawCommand::Clear => reset(&mut buf),
            other => buf.apply(other),
        }
    }
    tracing::debug!(width, height, commands = commands.len(), "rasterized frame");
    buf
}
