#![deny(unsafe_code)]
//! Core of the particle network background.
//!
//! Provides [`NoiseField`] gradient noise, [`Particle`]/[`ParticleField`]
//! physics, the [`Renderer`] that draws links and dots onto any [`Surface`],
//! the viewport-dependent [`NetworkConfig`], and the [`AnimationDriver`] that
//! ties them into a frame loop. The [`effects`] module holds the page
//! decorations around the network (trails, bursts, easter egg, text reveal).

pub mod color;
pub mod config;
pub mod driver;
pub mod effects;
pub mod error;
pub mod params;
pub mod particle;
pub mod perlin;
pub mod prng;
pub mod render;
pub mod surface;

pub use color::{Rgba, Srgb};
pub use config::{FieldConfig, NetworkConfig, Profile, Viewport};
pub use driver::{AnimationDriver, DriverState, FrameOutcome};
pub use error::EngineError;
pub use particle::{MotionParams, MouseState, Particle, ParticleField};
pub use perlin::NoiseField;
pub use prng::Xorshift64;
pub use render::{FrameStats, RenderStyle, Renderer};
pub use surface::{DrawCommand, RecordingSurface, Surface};
