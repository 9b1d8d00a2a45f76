//! Owns the particle network and advances it one frame at a time.
//!
//! The driver holds all mutable animation state: particles, pointer, field
//! configuration and the animation clock. Input handlers and the frame
//! callback run on one thread and mutate it between frames, so nothing
//! here needs synchronization. The host (a browser `requestAnimationFrame`
//! loop or [`AnimationDriver::run`]) calls [`AnimationDriver::frame`] and
//! reschedules while it returns [`FrameOutcome::Continue`].

use glam::DVec2;
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::config::{FieldConfig, NetworkConfig, Profile, Viewport};
use crate::error::EngineError;
use crate::particle::{MouseState, Particle, ParticleField};
use crate::perlin::NoiseField;
use crate::prng::Xorshift64;
use crate::render::{FrameStats, Renderer};
use crate::surface::Surface;

/// Lifecycle of a driver. A constructed driver starts out `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    Running,
    Stopped,
}

/// What the host should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule another frame.
    Continue,
    /// The driver was stopped; do not reschedule.
    Stop,
}

/// The particle network animation.
pub struct AnimationDriver<N = NoiseField> {
    config: NetworkConfig,
    profile: Profile,
    field_config: FieldConfig,
    field: ParticleField<N>,
    renderer: Renderer,
    mouse: MouseState,
    viewport: Viewport,
    rng: Xorshift64,
    time: f64,
    frames: u64,
    last_stats: FrameStats,
    state: DriverState,
}

impl AnimationDriver<NoiseField> {
    /// Creates a running driver whose noise table is shuffled from `seed`.
    ///
    /// Returns `EngineError::InvalidConfig` if `config` fails validation.
    pub fn new(viewport: Viewport, seed: u64, config: NetworkConfig) -> Result<Self, EngineError> {
        let mut rng = Xorshift64::new(seed);
        let noise = NoiseField::new(&mut rng);
        Self::build(viewport, rng, config, noise)
    }
}

impl<N: NoiseFn<f64, 2>> AnimationDriver<N> {
    /// Creates a running driver over an arbitrary noise source.
    pub fn with_noise(
        viewport: Viewport,
        seed: u64,
        config: NetworkConfig,
        noise: N,
    ) -> Result<Self, EngineError> {
        Self::build(viewport, Xorshift64::new(seed), config, noise)
    }

    fn build(
        viewport: Viewport,
        rng: Xorshift64,
        config: NetworkConfig,
        noise: N,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let (profile, field_config) = config.resolve(viewport.width);
        let mut driver = Self {
            field: ParticleField::new(noise, config.motion),
            renderer: Renderer::new(config.style),
            mouse: MouseState::new(field_config.mouse_radius),
            config,
            profile,
            field_config,
            viewport,
            rng,
            time: 0.0,
            frames: 0,
            last_stats: FrameStats::default(),
            state: DriverState::Running,
        };
        driver.reinitialize();
        tracing::debug!(
            ?profile,
            particles = field_config.particle_count,
            width = viewport.width,
            height = viewport.height,
            "animation driver started"
        );
        Ok(driver)
    }

    fn reinitialize(&mut self) {
        self.field.initialize(
            self.field_config.particle_count,
            self.viewport.width,
            self.viewport.height,
            &mut self.rng,
        );
    }

    /// Handles a viewport resize.
    ///
    /// Re-resolves the profile (logging when it flips between mobile and
    /// desktop) and always replaces the particle set for the new size.
    pub fn resize(&mut self, viewport: Viewport) {
        let (profile, field_config) = self.config.resolve(viewport.width);
        if profile != self.profile {
            tracing::debug!(from = ?self.profile, to = ?profile, "profile changed on resize");
        }
        self.profile = profile;
        self.field_config = field_config;
        self.mouse.radius = field_config.mouse_radius;
        self.viewport = viewport;
        self.reinitialize();
    }

    /// Records a pointer move. `client` and `surface_origin` are both in
    /// page coordinates; the stored position is relative to the surface.
    pub fn pointer_move(&mut self, client: DVec2, surface_origin: DVec2) {
        self.mouse.move_to(client - surface_origin);
    }

    /// The pointer left the surface.
    pub fn pointer_leave(&mut self) {
        self.mouse.clear();
    }

    /// Renders one frame and advances the clock.
    ///
    /// A stopped driver draws nothing and returns [`FrameOutcome::Stop`].
    /// An empty viewport clears the surface and skips physics.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
        if self.state == DriverState::Stopped {
            return FrameOutcome::Stop;
        }
        let Viewport { width, height } = self.viewport;
        if surface.width() != width || surface.height() != height {
            surface.set_size(width, height);
        }

        if self.viewport.is_empty() {
            surface.clear();
            self.last_stats = FrameStats::default();
        } else {
            self.field.step(self.time, &self.mouse, width, height);
            self.last_stats = self.renderer.draw(
                surface,
                self.field.particles(),
                &self.mouse,
                self.field_config.max_distance,
            );
        }

        self.time += self.config.time_step;
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            links = self.last_stats.links,
            pointer_links = self.last_stats.pointer_links,
            "frame rendered"
        );
        FrameOutcome::Continue
    }

    /// Runs up to `frames` frames back to back, stopping early if the
    /// driver is stopped. Returns the number of frames rendered.
    pub fn run(&mut self, surface: &mut dyn Surface, frames: u64) -> u64 {
        let mut rendered = 0;
        while rendered < frames {
            if self.frame(surface) == FrameOutcome::Stop {
                break;
            }
            rendered += 1;
        }
        rendered
    }

    /// Stops the loop; subsequent frames are no-ops.
    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            tracing::info!(frames = self.frames, "animation driver stopped");
        }
        self.state = DriverState::Stopped;
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn field_config(&self) -> &FieldConfig {
        &self.field_config
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current animation time (not wall-clock time).
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn particles(&self) -> &[Particle] {
        self.field.particles()
    }

    /// What the most recent frame drew.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use serde_json::json;

    struct Zero;

    impl NoiseFn<f64, 2> for Zero {
        fn get(&self, _point: [f64; 2]) -> f64 {
            0.0
        }
    }

    fn desktop() -> AnimationDriver {
        AnimationDriver::new(Viewport::new(1024.0, 768.0), 42, NetworkConfig::default()).unwrap()
    }

    #[test]
    fn new_resolves_desktop_profile() {
        let d = desktop();
        assert_eq!(d.state(), DriverState::Running);
        assert_eq!(d.profile(), Profile::Desktop);
        assert_eq!(d.particles().len(), 100);
        assert_eq!(d.mouse().radius, 180.0);
        assert!(!d.mouse().is_present());
    }

    #[test]
    fn new_resolves_mobile_profile() {
        let d = AnimationDriver::new(Viewport::new(500.0, 800.0), 1, NetworkConfig::default())
            .unwrap();
        assert_eq!(d.profile(), Profile::Mobile);
        assert_eq!(d.particles().len(), 40);
        assert_eq!(d.field_config().max_distance, 100.0);
        assert_eq!(d.mouse().radius, 120.0);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = NetworkConfig::from_json(&json!({"time_step": -1}));
        assert!(AnimationDriver::new(Viewport::new(800.0, 600.0), 1, cfg).is_err());
    }

    #[test]
    fn resize_across_breakpoint_switches_profile() {
        let mut d = desktop();
        d.resize(Viewport::new(500.0, 900.0));
        assert_eq!(d.profile(), Profile::Mobile);
        assert_eq!(d.particles().len(), 40);
        assert_eq!(d.mouse().radius, 120.0);
        d.resize(Viewport::new(1280.0, 720.0));
        assert_eq!(d.particles().len(), 100);
        assert_eq!(d.mouse().radius, 180.0);
    }

    #[test]
    fn resize_within_profile_reinitializes_inside_new_bounds() {
        let mut d = desktop();
        d.resize(Viewport::new(900.0, 300.0));
        assert_eq!(d.particles().len(), 100);
        assert!(d
            .particles()
            .iter()
            .all(|p| p.position.x < 900.0 && p.position.y < 300.0));
    }

    #[test]
    fn pointer_position_is_relative_to_surface() {
        let mut d = desktop();
        d.pointer_move(DVec2::new(300.0, 250.0), DVec2::new(100.0, 50.0));
        assert_eq!(d.mouse().position, Some(DVec2::new(200.0, 200.0)));
        d.pointer_leave();
        assert_eq!(d.mouse().position, None);
    }

    #[test]
    fn frame_advances_time_and_draws() {
        let mut d = desktop();
        let mut surface = RecordingSurface::new(1024.0, 768.0);
        assert_eq!(d.frame(&mut surface), FrameOutcome::Continue);
        assert_eq!(d.time(), 1.5);
        assert_eq!(d.frame_count(), 1);
        assert_eq!(surface.commands()[0], DrawCommand::Clear);
        assert_eq!(d.last_stats().dots, 100);
        assert_eq!(surface.circle_count(), 100);
    }

    #[test]
    fn frame_sizes_surface_to_viewport() {
        let mut d = desktop();
        let mut surface = RecordingSurface::new(10.0, 10.0);
        d.frame(&mut surface);
        assert_eq!((surface.width(), surface.height()), (1024.0, 768.0));
    }

    #[test]
    fn empty_viewport_renders_nothing() {
        let mut d =
            AnimationDriver::new(Viewport::new(0.0, 0.0), 3, NetworkConfig::default()).unwrap();
        let mut surface = RecordingSurface::default();
        assert_eq!(d.frame(&mut surface), FrameOutcome::Continue);
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn stop_ends_the_loop() {
        let mut d = desktop();
        let mut surface = RecordingSurface::new(1024.0, 768.0);
        assert_eq!(d.run(&mut surface, 3), 3);
        d.stop();
        assert_eq!(d.state(), DriverState::Stopped);
        assert_eq!(d.frame(&mut surface), FrameOutcome::Stop);
        assert_eq!(d.run(&mut surface, 10), 0);
        assert_eq!(d.frame_count(), 3);
        assert_eq!(d.time(), 4.5);
    }

    #[test]
    fn same_seed_same_frames() {
        let mut a = desktop();
        let mut b = desktop();
        let mut sa = RecordingSurface::new(1024.0, 768.0);
        let mut sb = RecordingSurface::new(1024.0, 768.0);
        a.run(&mut sa, 5);
        b.run(&mut sb, 5);
        assert_eq!(sa.commands(), sb.commands());
    }

    #[test]
    fn pointer_repels_particles_over_frames() {
        let mut d = AnimationDriver::with_noise(
            Viewport::new(800.0, 600.0),
            9,
            NetworkConfig::from_json(&json!({"desktop": {"particle_count": 1}})),
            Zero,
        )
        .unwrap();
        let start = d.particles()[0].base;
        d.pointer_move(start + DVec2::new(10.0, 0.0), DVec2::ZERO);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        d.run(&mut surface, 5);
        let end = d.particles()[0].base;
        assert!(end.x < start.x, "expected push to the left: {start} -> {end}");
        assert!(d.last_stats().pointer_links == 1);
    }
}
