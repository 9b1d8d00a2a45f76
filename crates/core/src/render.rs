//! Draws the particle network onto a [`Surface`].
//!
//! Each frame is: clear, link every pair of particles closer than the
//! maximum distance, link particles near the pointer to it (with a glow on
//! the particle), then paint the dots on top.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::{Rgba, Srgb};
use crate::particle::{MouseState, Particle};
use crate::surface::Surface;

/// Colors, widths and alpha scales for every element of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub link_color: Srgb,
    /// Alpha of a link of zero length.
    pub link_alpha: f64,
    pub link_width: f64,
    pub pointer_color: Srgb,
    /// Alpha of a pointer link at zero distance.
    pub pointer_alpha: f64,
    pub pointer_width: f64,
    /// Glow radius as a multiple of the particle radius.
    pub glow_scale: f64,
    /// Glow alpha as a fraction of the pointer link alpha.
    pub glow_alpha: f64,
    pub dot_color: Rgba,
}

impl Default for RenderStyle {
    fn default() -> Self {
        let cyan = Srgb::from_u8(0, 212, 255);
        Self {
            link_color: cyan,
            link_alpha: 0.5,
            link_width: 0.5,
            pointer_color: Srgb::from_u8(255, 0, 128),
            pointer_alpha: 0.8,
            pointer_width: 1.0,
            glow_scale: 2.0,
            glow_alpha: 0.5,
            dot_color: Rgba::new(cyan, 0.8),
        }
    }
}

/// Counts of what a frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    pub links: usize,
    pub pointer_links: usize,
    pub dots: usize,
}

/// `(1 - d/max) * scale` for `d < max`, else 0.
fn falloff(distance: f64, max: f64, scale: f64) -> f64 {
    if max <= 0.0 || distance >= max {
        return 0.0;
    }
    (1.0 - distance / max) * scale
}

/// Opacity of a particle-particle link: linear from 0.5 down to 0 at `max_distance`.
pub fn connection_opacity(distance: f64, max_distance: f64) -> f64 {
    falloff(distance, max_distance, 0.5)
}

/// Opacity of a particle-pointer link: linear from 0.8 down to 0 at `radius`.
pub fn pointer_opacity(distance: f64, radius: f64) -> f64 {
    falloff(distance, radius, 0.8)
}

/// Stateless painter parameterized by a [`RenderStyle`].
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Full frame: clear, connections, then particles.
    ///
    /// An empty surface is cleared and nothing else is drawn.
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        particles: &[Particle],
        mouse: &MouseState,
        max_distance: f64,
    ) -> FrameStats {
        surface.clear();
        if surface.is_empty() {
            return FrameStats::default();
        }
        let mut stats = self.draw_connections(surface, particles, mouse, max_distance);
        stats.dots = self.draw_particles(surface, particles);
        stats
    }

    /// Links between nearby particles and from particles to the pointer.
    ///
    /// Pairwise distances are checked for every unordered pair, O(n²).
    pub fn draw_connections(
        &self,
        surface: &mut dyn Surface,
        particles: &[Particle],
        mouse: &MouseState,
        max_distance: f64,
    ) -> FrameStats {
        let s = &self.style;
        let mut stats = FrameStats::default();

        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                let d = a.position.distance(b.position);
                if d < max_distance {
                    let alpha = falloff(d, max_distance, s.link_alpha);
                    surface.stroke_line(
                        a.position,
                        b.position,
                        Rgba::new(s.link_color, alpha),
                        s.link_width,
                    );
                    stats.links += 1;
                }
            }

            if let Some(pointer) = mouse.position {
                if self.draw_pointer_link(surface, a, pointer, mouse.radius) {
                    stats.pointer_links += 1;
                }
            }
        }
        stats
    }

    fn draw_pointer_link(
        &self,
        surface: &mut dyn Surface,
        particle: &Particle,
        pointer: DVec2,
        radius: f64,
    ) -> bool {
        let s = &self.style;
        let d = particle.position.distance(pointer);
        if d >= radius {
            return false;
        }
        let alpha = falloff(d, radius, s.pointer_alpha);
        surface.stroke_line(
            particle.position,
            pointer,
            Rgba::new(s.pointer_color, alpha),
            s.pointer_width,
        );
        surface.fill_circle(
            particle.position,
            particle.radius * s.glow_scale,
            Rgba::new(s.pointer_color, alpha * s.glow_alpha),
        );
        true
    }

    /// Filled dots, one per particle. Returns the number drawn.
    pub fn draw_particles(&self, surface: &mut dyn Surface, particles: &[Particle]) -> usize {
        for p in particles {
            surface.fill_circle(p.position, p.radius, self.style.dot_color);
        }
        particles.len()
    }
}
