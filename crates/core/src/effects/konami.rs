//! Keyboard easter egg: ↑ ↑ ↓ ↓ ← → ← → B A turns on "matrix mode".

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::prng::Xorshift64;

/// Key values (as reported by `KeyboardEvent.key`) that trigger the egg.
pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// How long matrix mode stays on.
pub const MATRIX_DURATION_MS: f64 = 10_000.0;
/// Falling columns spawned when matrix mode starts.
pub const MATRIX_COLUMNS: usize = 20;

/// Remembers the last ten keys and reports when they spell the sequence.
#[derive(Debug, Clone, Default)]
pub struct KonamiDetector {
    recent: VecDeque<String>,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press. Returns true when the last ten keys match.
    pub fn push(&mut self, key: &str) -> bool {
        if self.recent.len() == KONAMI_SEQUENCE.len() {
            self.recent.pop_front();
        }
        self.recent.push_back(key.to_owned());
        self.recent.len() == KONAMI_SEQUENCE.len()
            && self.recent.iter().zip(KONAMI_SEQUENCE).all(|(k, s)| k == s)
    }
}

/// One falling column of glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixColumn {
    /// Horizontal position as a percentage of the page width, [0, 100).
    pub left_percent: f64,
    /// CSS animation delay in seconds, [0, 2).
    pub delay_s: f64,
}

/// An active matrix-mode episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixMode {
    pub started_at_ms: f64,
    pub columns: Vec<MatrixColumn>,
}

impl MatrixMode {
    pub fn start(now_ms: f64, rng: &mut Xorshift64) -> Self {
        let columns = (0..MATRIX_COLUMNS)
            .map(|_| MatrixColumn {
                left_percent: rng.next_range(0.0, 100.0),
                delay_s: rng.next_range(0.0, 2.0),
            })
            .collect();
        Self {
            started_at_ms: now_ms,
            columns,
        }
    }

    pub fn is_active(&self, now_ms: f64) -> bool {
        now_ms - self.started_at_ms < MATRIX_DURATION_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(detector: &mut KonamiDetector, keys: &[&str]) -> bool {
        keys.iter().fold(false, |_, k| detector.push(k))
    }

    #[test]
    fn full_sequence_triggers() {
        let mut d = KonamiDetector::new();
        assert!(feed(&mut d, &KONAMI_SEQUENCE));
    }

    #[test]
    fn sequence_after_noise_still_triggers() {
        let mut d = KonamiDetector::new();
        feed(&mut d, &["x", "ArrowUp", "Enter"]);
        assert!(feed(&mut d, &KONAMI_SEQUENCE));
    }

    #[test]
    fn partial_or_wrong_sequence_does_not_trigger() {
        let mut d = KonamiDetector::new();
        assert!(!feed(&mut d, &KONAMI_SEQUENCE[..9]));
        assert!(!d.push("b"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let mut d = KonamiDetector::new();
        let mut keys = KONAMI_SEQUENCE;
        keys[8] = "B";
        assert!(!feed(&mut d, &keys));
    }

    #[test]
    fn matrix_mode_has_twenty_columns_and_expires() {
        let mut rng = Xorshift64::new(10);
        let m = MatrixMode::start(1_000.0, &mut rng);
        assert_eq!(m.columns.len(), MATRIX_COLUMNS);
        assert!(m
            .columns
            .iter()
            .all(|c| (0.0..100.0).contains(&c.left_percent) && (0.0..2.0).contains(&c.delay_s)));
        assert!(m.is_active(10_999.0));
        assert!(!m.is_active(11_000.0));
    }
}
