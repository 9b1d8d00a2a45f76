//! Bounded pool of timed decoration entities.
//!
//! Every cursor trail, click ripple and burst spark lives for a fixed
//! lifetime and is then expired by [`EffectPool::tick`]. The pool has a
//! hard capacity; spawning into a full pool evicts the oldest entity, so the
//! number of live DOM nodes mirroring it is bounded no matter how fast the
//! user clicks.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::prng::Xorshift64;

/// Lifetime of every effect in milliseconds.
pub const EFFECT_LIFETIME_MS: f64 = 1000.0;
/// Sparks emitted per click burst.
pub const SPARKS_PER_BURST: usize = 8;
const SPARK_MIN_SPEED: f64 = 100.0;
const SPARK_MAX_SPEED: f64 = 150.0;
/// Delay between the last pointer move and the trail element it spawns.
pub const TRAIL_DEBOUNCE_MS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    /// Fading dot left behind the cursor.
    Trail,
    /// Expanding ring at a click.
    Ripple,
    /// Particle flung outward from a click; `travel` is its total
    /// displacement over the lifetime.
    Spark { travel: DVec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: u64,
    pub kind: EffectKind,
    pub origin: DVec2,
    pub spawned_at_ms: f64,
}

impl Effect {
    /// Fraction of the lifetime elapsed at `now_ms`, clamped to [0, 1].
    pub fn progress(&self, now_ms: f64) -> f64 {
        ((now_ms - self.spawned_at_ms) / EFFECT_LIFETIME_MS).clamp(0.0, 1.0)
    }

    /// Current position; sparks move linearly toward `origin + travel`.
    pub fn position(&self, now_ms: f64) -> DVec2 {
        match self.kind {
            EffectKind::Spark { travel } => self.origin + travel * self.progress(now_ms),
            _ => self.origin,
        }
    }

    fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawned_at_ms >= EFFECT_LIFETIME_MS
    }
}

/// Fixed-capacity FIFO of live effects.
#[derive(Debug, Clone)]
pub struct EffectPool {
    effects: VecDeque<Effect>,
    capacity: usize,
    next_id: u64,
}

impl EffectPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            effects: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    fn spawn(&mut self, kind: EffectKind, origin: DVec2, now_ms: f64) -> u64 {
        if self.capacity == 0 {
            return self.allocate_id();
        }
        if self.effects.len() == self.capacity {
            self.effects.pop_front();
        }
        let id = self.allocate_id();
        self.effects.push_back(Effect {
            id,
            kind,
            origin,
            spawned_at_ms: now_ms,
        });
        id
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds a cursor trail dot at `at`.
    pub fn spawn_trail(&mut self, at: DVec2, now_ms: f64) -> u64 {
        self.spawn(EffectKind::Trail, at, now_ms)
    }

    /// Adds a ripple plus a ring of sparks at evenly spaced angles with
    /// random speeds in [100, 150) px per lifetime.
    pub fn spawn_burst(&mut self, at: DVec2, now_ms: f64, rng: &mut Xorshift64) {
        self.spawn(EffectKind::Ripple, at, now_ms);
        for i in 0..SPARKS_PER_BURST {
            let angle = TAU * i as f64 / SPARKS_PER_BURST as f64;
            let speed = rng.next_range(SPARK_MIN_SPEED, SPARK_MAX_SPEED);
            let travel = DVec2::new(angle.cos(), angle.sin()) * speed;
            self.spawn(EffectKind::Spark { travel }, at, now_ms);
        }
    }

    /// Drops expired effects and returns how many were removed.
    pub fn tick(&mut self, now_ms: f64) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| !e.expired(now_ms));
        before - self.effects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Trailing-edge debounce for cursor trails.
///
/// Each move restarts the timer; a trail is emitted only once the pointer
/// has been still for [`TRAIL_DEBOUNCE_MS`]. Particle tracking does not go
/// through this.
#[derive(Debug, Clone, Default)]
pub struct TrailDebouncer {
    pending: Option<(DVec2, f64)>,
}

impl TrailDebouncer {
    pub fn pointer_moved(&mut self, at: DVec2, now_ms: f64) {
        self.pending = Some((at, now_ms));
    }

    /// Returns the position to spawn a trail at once the delay has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<DVec2> {
        match self.pending {
            Some((at, moved_at)) if now_ms - moved_at >= TRAIL_DEBOUNCE_MS => {
                self.pending = None;
                Some(at)
            }
            _ => None,
        }
    }
}
