//! Particles and the per-frame physics that moves them.
//!
//! Each particle drifts around a base anchor by an amount read from two
//! noise samples, wraps to the opposite edge when it drifts far enough off
//! the canvas, and has its anchor pushed away from the pointer when the
//! pointer is close.

use glam::DVec2;
use noise::NoiseFn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::params::param_f64;
use crate::perlin::NoiseField;
use crate::prng::Xorshift64;

const DEFAULT_NOISE_SCALE: f64 = 0.003;
const DEFAULT_NOISE_STRENGTH: f64 = 0.5;
const DEFAULT_MOVE_RANGE: f64 = 50.0;
const DEFAULT_REPULSION_STRENGTH: f64 = 3.0;
/// Upper bound (exclusive) of the per-particle noise phase.
const NOISE_OFFSET_RANGE: f64 = 1000.0;
const MIN_RADIUS: f64 = 1.0;
const MAX_RADIUS: f64 = 3.0;

/// Tunables for particle motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionParams {
    /// Spatial frequency of the noise lookup.
    pub noise_scale: f64,
    /// Fraction of `move_range` the noise may displace a particle.
    pub noise_strength: f64,
    /// Drift range in pixels; also the off-canvas margin before wrapping.
    pub move_range: f64,
    /// Anchor displacement per frame at direct pointer contact.
    pub repulsion_strength: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            noise_scale: DEFAULT_NOISE_SCALE,
            noise_strength: DEFAULT_NOISE_STRENGTH,
            move_range: DEFAULT_MOVE_RANGE,
            repulsion_strength: DEFAULT_REPULSION_STRENGTH,
        }
    }
}

impl MotionParams {
    /// Reads overrides from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            noise_scale: param_f64(params, "noise_scale", d.noise_scale),
            noise_strength: param_f64(params, "noise_strength", d.noise_strength),
            move_range: param_f64(params, "move_range", d.move_range),
            repulsion_strength: param_f64(params, "repulsion_strength", d.repulsion_strength),
        }
    }

    /// Largest per-axis distance noise can move a particle from its anchor.
    pub fn max_displacement(&self) -> f64 {
        self.move_range * self.noise_strength
    }
}

/// A single network node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Rendered position for the current frame.
    pub position: DVec2,
    /// Drift anchor: noise input and repulsion target.
    pub base: DVec2,
    /// Per-particle noise phase, fixed at creation.
    pub noise_offset: DVec2,
    pub radius: f64,
}

/// Pointer position relative to the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseState {
    /// `None` until the pointer enters the surface and after it leaves.
    pub position: Option<DVec2>,
    /// Interaction radius for repulsion and pointer links.
    pub radius: f64,
}

impl MouseState {
    pub fn new(radius: f64) -> Self {
        Self {
            position: None,
            radius,
        }
    }

    pub fn move_to(&mut self, position: DVec2) {
        self.position = Some(position);
    }

    pub fn clear(&mut self) {
        self.position = None;
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }
}

/// Linear repulsion falloff: 1 at the pointer, 0 at `radius` and beyond.
pub fn repulsion_force(distance: f64, radius: f64) -> f64 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    (radius - distance) / radius
}

/// Owns the particle collection and the noise source that animates it.
#[derive(Debug, Clone)]
pub struct ParticleField<N = NoiseField> {
    particles: Vec<Particle>,
    noise: N,
    params: MotionParams,
}

impl<N: NoiseFn<f64, 2>> ParticleField<N> {
    /// Creates an empty field; call [`ParticleField::initialize`] to populate it.
    pub fn new(noise: N, params: MotionParams) -> Self {
        Self {
            particles: Vec::new(),
            noise,
            params,
        }
    }

    /// Replaces the collection with `count` freshly placed particles.
    ///
    /// Positions and anchors are drawn independently and uniformly inside
    /// `[0, width) x [0, height)`.
    pub fn initialize(&mut self, count: usize, width: f64, height: f64, rng: &mut Xorshift64) {
        let width = width.max(0.0);
        let height = height.max(0.0);
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let position = DVec2::new(rng.next_range(0.0, width), rng.next_range(0.0, height));
            let base = DVec2::new(rng.next_range(0.0, width), rng.next_range(0.0, height));
            let noise_offset = DVec2::new(
                rng.next_range(0.0, NOISE_OFFSET_RANGE),
                rng.next_range(0.0, NOISE_OFFSET_RANGE),
            );
            let radius = rng.next_range(MIN_RADIUS, MAX_RADIUS);
            self.particles.push(Particle {
                position,
                base,
                noise_offset,
                radius,
            });
        }
        tracing::debug!(count, width, height, "initialized particle field");
    }

    /// Advances every particle to `time`.
    pub fn step(&mut self, time: f64, mouse: &MouseState, width: f64, height: f64) {
        let MotionParams {
            noise_scale,
            noise_strength,
            move_range,
            repulsion_strength,
        } = self.params;

        for p in &mut self.particles {
            let off = p.noise_offset;
            let nx = self
                .noise
                .get([(p.base.x + time) * noise_scale + off.x, off.y]);
            let ny = self
                .noise
                .get([off.x, (p.base.y + time) * noise_scale + off.y]);
            p.position = p.base + DVec2::new(nx, ny) * move_range * noise_strength;

            if p.position.x < -move_range {
                p.base.x = width + move_range;
            }
            if p.position.x > width + move_range {
                p.base.x = -move_range;
            }
            if p.position.y < -move_range {
                p.base.y = height + move_range;
            }
            if p.position.y > height + move_range {
                p.base.y = -move_range;
            }

            if let Some(pointer) = mouse.position {
                let delta = pointer - p.position;
                let force = repulsion_force(delta.length(), mouse.radius);
                if force > 0.0 {
                    let angle = delta.y.atan2(delta.x);
                    p.base -= DVec2::new(angle.cos(), angle.sin()) * force * repulsion_strength;
                }
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Noise source that always returns the same value.
    struct Flat(f64);

    impl NoiseFn<f64, 2> for Flat {
        fn get(&self, _point: [f64; 2]) -> f64 {
            self.0
        }
    }

    fn flat_field(value: f64) -> ParticleField<Flat> {
        ParticleField::new(Flat(value), MotionParams::default())
    }

    fn at(base: DVec2) -> Particle {
        Particle {
            position: base,
            base,
            noise_offset: DVec2::ZERO,
            radius: 2.0,
        }
    }

    #[test]
    fn motion_defaults_match_page_constants() {
        let m = MotionParams::default();
        assert_eq!(m.noise_scale, 0.003);
        assert_eq!(m.noise_strength, 0.5);
        assert_eq!(m.move_range, 50.0);
        assert_eq!(m.repulsion_strength, 3.0);
        assert_eq!(m.max_displacement(), 25.0);
    }

    #[test]
    fn motion_from_json_overrides_only_named_keys() {
        let m = MotionParams::from_json(&json!({"move_range": 80, "noise_scale": "x"}));
        assert_eq!(m.move_range, 80.0);
        assert_eq!(m.noise_scale, 0.003);
    }

    #[test]
    fn initialize_produces_exact_count_within_bounds() {
        let mut rng = Xorshift64::new(42);
        let mut field = ParticleField::new(NoiseField::new(&mut rng), MotionParams::default());
        field.initialize(100, 1024.0, 768.0, &mut rng);
        assert_eq!(field.len(), 100);
        for p in field.particles() {
            assert!((0.0..1024.0).contains(&p.position.x));
            assert!((0.0..768.0).contains(&p.position.y));
            assert!((0.0..1024.0).contains(&p.base.x));
            assert!((0.0..768.0).contains(&p.base.y));
            assert!((0.0..1000.0).contains(&p.noise_offset.x));
            assert!((0.0..1000.0).contains(&p.noise_offset.y));
            assert!((1.0..3.0).contains(&p.radius));
        }
    }

    #[test]
    fn initialize_replaces_previous_particles() {
        let mut rng = Xorshift64::new(1);
        let mut field = flat_field(0.0);
        field.initialize(100, 800.0, 600.0, &mut rng);
        field.initialize(40, 500.0, 400.0, &mut rng);
        assert_eq!(field.len(), 40);
    }

    #[test]
    fn initialize_with_zero_size_does_not_panic() {
        let mut rng = Xorshift64::new(1);
        let mut field = flat_field(0.0);
        field.initialize(5, 0.0, 0.0, &mut rng);
        assert_eq!(field.len(), 5);
        assert!(field.particles().iter().all(|p| p.position == DVec2::ZERO));
    }

    #[test]
    fn step_displaces_by_noise_times_range_and_strength() {
        let mut field = flat_field(0.4);
        field.particles.push(at(DVec2::new(100.0, 200.0)));
        field.step(0.0, &MouseState::new(180.0), 800.0, 600.0);
        let p = field.particles()[0];
        assert!((p.position.x - 110.0).abs() < 1e-12);
        assert!((p.position.y - 210.0).abs() < 1e-12);
        assert_eq!(p.base, DVec2::new(100.0, 200.0));
    }

    #[test]
    fn particle_past_right_edge_wraps_to_left() {
        let mut field = flat_field(0.0);
        let width = 800.0;
        field.particles.push(at(DVec2::new(width + 50.0 + 1.0, 300.0)));
        field.step(0.0, &MouseState::new(180.0), width, 600.0);
        assert_eq!(field.particles()[0].base.x, -50.0);
        assert_eq!(field.particles()[0].base.y, 300.0);
    }

    #[test]
    fn particle_past_each_edge_wraps_to_opposite_side() {
        let mut field = flat_field(0.0);
        field.particles.push(at(DVec2::new(-51.0, -51.0)));
        field.particles.push(at(DVec2::new(400.0, 651.0)));
        field.step(0.0, &MouseState::new(180.0), 800.0, 600.0);
        let p = field.particles();
        assert_eq!(p[0].base, DVec2::new(850.0, 650.0));
        assert_eq!(p[1].base, DVec2::new(400.0, -50.0));
    }

    #[test]
    fn particle_inside_margin_does_not_wrap() {
        let mut field = flat_field(0.0);
        field.particles.push(at(DVec2::new(849.0, -49.0)));
        field.step(0.0, &MouseState::new(180.0), 800.0, 600.0);
        assert_eq!(field.particles()[0].base, DVec2::new(849.0, -49.0));
    }

    #[test]
    fn repulsion_force_extremes() {
        assert_eq!(repulsion_force(0.0, 180.0), 1.0);
        assert_eq!(repulsion_force(180.0, 180.0), 0.0);
        assert_eq!(repulsion_force(250.0, 180.0), 0.0);
        assert!((repulsion_force(90.0, 180.0) - 0.5).abs() < 1e-12);
        assert_eq!(repulsion_force(0.0, 0.0), 0.0);
    }

    #[test]
    fn pointer_pushes_anchor_directly_away() {
        let mut field = flat_field(0.0);
        field.particles.push(at(DVec2::new(100.0, 100.0)));
        let mut mouse = MouseState::new(100.0);
        mouse.move_to(DVec2::new(150.0, 100.0));
        field.step(0.0, &mouse, 800.0, 600.0);
        let base = field.particles()[0].base;
        // force = (100 - 50) / 100 = 0.5, scaled by 3, pointing -x
        assert!((base.x - 98.5).abs() < 1e-9, "base.x = {}", base.x);
        assert!((base.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_at_particle_gives_full_push() {
        let mut field = flat_field(0.0);
        field.particles.push(at(DVec2::new(100.0, 100.0)));
        let mut mouse = MouseState::new(100.0);
        mouse.move_to(DVec2::new(100.0, 100.0));
        field.step(0.0, &mouse, 800.0, 600.0);
        let moved = field.particles()[0].base.distance(DVec2::new(100.0, 100.0));
        assert!((moved - 3.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_outside_radius_or_absent_has_no_effect() {
        let mut field = flat_field(0.0);
        field.particles.push(at(DVec2::new(100.0, 100.0)));
        let mut mouse = MouseState::new(100.0);
        mouse.move_to(DVec2::new(200.0, 100.0));
        field.step(0.0, &mouse, 800.0, 600.0);
        mouse.clear();
        field.step(1.5, &mouse, 800.0, 600.0);
        assert_eq!(field.particles()[0].base, DVec2::new(100.0, 100.0));
    }

    #[test]
    fn mouse_state_transitions() {
        let mut m = MouseState::new(120.0);
        assert!(!m.is_present());
        m.move_to(DVec2::new(3.0, 4.0));
        assert_eq!(m.position, Some(DVec2::new(3.0, 4.0)));
        m.clear();
        assert!(!m.is_present());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn displacement_is_bounded_without_pointer(
                seed: u64,
                time in 0.0_f64..10_000.0,
                count in 1_usize..60,
            ) {
                let mut rng = Xorshift64::new(seed);
                let mut field = ParticleField::new(NoiseField::new(&mut rng), MotionParams::default());
                field.initialize(count, 1024.0, 768.0, &mut rng);
                field.step(time, &MouseState::new(180.0), 1024.0, 768.0);
                let bound = field.params().max_displacement() + 1e-9;
                for p in field.particles() {
                    // wrapped particles have had their anchor moved after the position was set
                    let wrapped_x = p.base.x == -50.0 || p.base.x == 1024.0 + 50.0;
                    let wrapped_y = p.base.y == -50.0 || p.base.y == 768.0 + 50.0;
                    if !wrapped_x {
                        prop_assert!((p.position.x - p.base.x).abs() <= bound);
                    }
                    if !wrapped_y {
                        prop_assert!((p.position.y - p.base.y).abs() <= bound);
                    }
                }
            }

            #[test]
            fn initialize_count_and_bounds(
                seed: u64,
                count in 0_usize..200,
                w in 1.0_f64..4000.0,
                h in 1.0_f64..4000.0,
            ) {
                let mut rng = Xorshift64::new(seed);
                let mut field = ParticleField::new(NoiseField::identity(), MotionParams::default());
                field.initialize(count, w, h, &mut rng);
                prop_assert_eq!(field.len(), count);
                for p in field.particles() {
                    prop_assert!(p.position.x >= 0.0 && p.position.x < w);
                    prop_assert!(p.position.y >= 0.0 && p.position.y < h);
                    prop_assert!(p.radius >= 1.0 && p.radius < 3.0);
                }
            }
        }
    }
}
