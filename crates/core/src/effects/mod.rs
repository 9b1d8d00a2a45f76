//! Page decorations that sit around the particle network.
//!
//! None of these touch the network itself. They are DOM-free state machines
//! the host polls each frame and mirrors into elements: a bounded pool of
//! short-lived trail/ripple/spark entities, the cursor-trail debounce, the
//! keyboard easter egg, scroll/pointer chrome and the letter-by-letter
//! text reveal.

pub mod chrome;
pub mod konami;
pub mod pool;
pub mod reveal;

pub use chrome::{Orbiter, Orbiters};
pub use konami::{KonamiDetector, MatrixColumn, MatrixMode};
pub use pool::{Effect, EffectKind, EffectPool, TrailDebouncer};
pub use reveal::{split_reveal, Glyph, RevealTracker};
