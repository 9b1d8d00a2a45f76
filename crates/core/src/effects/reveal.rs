//! Letter-by-letter heading reveal.
//!
//! Text is split into one glyph per character with a staggered animation
//! delay; the host renders each glyph as its own span and flips the whole
//! element to "animated" the first time it becomes visible.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Delay between consecutive characters, in seconds.
pub const CHAR_DELAY_S: f64 = 0.05;

/// One unit of revealed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Glyph {
    /// A visible character (spaces become U+00A0 so they keep their width).
    Char { ch: char, delay_s: f64 },
    /// A hard line break.
    Break,
}

/// Splits trimmed `text` into glyphs. The delay is indexed by character
/// position, so line breaks still consume a slot in the stagger.
pub fn split_reveal(text: &str) -> Vec<Glyph> {
    text.trim()
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            '\n' => Glyph::Break,
            ' ' => Glyph::Char {
                ch: '\u{a0}',
                delay_s: i as f64 * CHAR_DELAY_S,
            },
            c => Glyph::Char {
                ch: c,
                delay_s: i as f64 * CHAR_DELAY_S,
            },
        })
        .collect()
}

/// Whether an element spanning `[top, bottom]` intersects a viewport of
/// height `viewport_height`, including the case where it covers it.
pub fn is_in_viewport(top: f64, bottom: f64, viewport_height: f64) -> bool {
    (top >= 0.0 && top <= viewport_height)
        || (bottom >= 0.0 && bottom <= viewport_height)
        || (top < 0.0 && bottom > viewport_height)
}

/// Tracks which elements have already been revealed.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    animated: HashSet<String>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a visibility change for element `id`. Returns true only the
    /// first time the element is seen visible.
    pub fn observe(&mut self, id: &str, visible: bool) -> bool {
        if !visible || self.animated.contains(id) {
            return false;
        }
        tracing::trace!(id, "revealing text");
        self.animated.insert(id.to_owned())
    }

    pub fn is_animated(&self, id: &str) -> bool {
        self.animated.contains(id)
    }
}
