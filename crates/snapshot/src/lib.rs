#![deny(unsafe_code)]
//! Headless output for the particle network.
//!
//! A frame drawn onto a [`RecordingSurface`](particle_net_core::RecordingSurface)
//! is a list of [`DrawCommand`](particle_net_core::DrawCommand)s. This crate
//! replays such a list into an RGBA8 buffer ([`pixel`]) and, with the `png`
//! feature (default on), writes that buffer to disk ([`snapshot`]). The wasm
//! crate does not depend on it; the browser draws straight to a canvas.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{rasterize, PixelBuffer};
