// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-driven smooth scrolling.
//!
//! A [`SmoothScroll`] turns one resolved distance into a sequence of
//! incremental deltas. The caller drives it with a monotonic clock in
//! milliseconds; nothing here sleeps or schedules.

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Timing curve for smooth scrolls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Cosine ease in and out.
    #[default]
    AccelerateDecelerate,
    /// Cubic Hermite ease, `t² (3 - 2t)`.
    Smoothstep,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// One frame of a smooth scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTick {
    /// Delta to feed through the offset controller this frame.
    pub delta: f64,
    /// Whether this was the final frame.
    pub finished: bool,
}

/// An in-flight animated scroll toward one item.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothScroll {
    target: usize,
    total: f64,
    emitted: f64,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl SmoothScroll {
    /// Starts a scroll of `total` units toward logical `target` at `start_ms`.
    #[must_use]
    pub fn new(target: usize, total: f64, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            target,
            total,
            emitted: 0.0,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// The item this scroll brings onto the selection point.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Total distance of the scroll.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Distance not yet emitted.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.total - self.emitted
    }

    /// Advances to `now_ms` and returns the delta since the previous tick.
    ///
    /// The deltas of all ticks sum to [`total`](Self::total) exactly. A clock
    /// that runs backwards yields a zero delta.
    pub fn tick(&mut self, now_ms: u64) -> ScrollTick {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let finished = elapsed >= self.duration_ms;
        let value = if finished {
            self.total
        } else {
            let t = elapsed as f64 / self.duration_ms as f64;
            self.total * self.easing.apply(t)
        };
        let delta = value - self.emitted;
        self.emitted = value;
        ScrollTick { delta, finished }
    }
}

#[cfg(test)]
mod tests {
    use super::{Easing, SmoothScroll};

    #[test]
    fn easings_hit_endpoints() {
        for easing in [Easing::Linear, Easing::AccelerateDecelerate, Easing::Smoothstep] {
            assert!(easing.apply(0.0).abs() < 1e-12, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{easing:?}");
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-12, "{easing:?}");
        }
        // Slow start.
        assert!(Easing::AccelerateDecelerate.apply(0.1) < 0.1);
    }

    #[test]
    fn deltas_sum_to_total() {
        let mut scroll = SmoothScroll::new(3, 420.0, 1_000, 250, Easing::AccelerateDecelerate);
        let mut sum = 0.0;
        let mut now = 1_000;
        loop {
            now += 16;
            let tick = scroll.tick(now);
            sum += tick.delta;
            if tick.finished {
                break;
            }
        }
        assert!((sum - 420.0).abs() < 1e-9);
        assert_eq!(scroll.remaining(), 0.0);
        assert_eq!(scroll.target(), 3);
    }

    #[test]
    fn negative_distance_scrolls_backwards() {
        let mut scroll = SmoothScroll::new(0, -100.0, 0, 100, Easing::Linear);
        let tick = scroll.tick(50);
        assert!((tick.delta + 50.0).abs() < 1e-9);
        assert!(!tick.finished);
        let tick = scroll.tick(100);
        assert!((tick.delta + 50.0).abs() < 1e-9);
        assert!(tick.finished);
    }

    #[test]
    fn zero_duration_finishes_at_once() {
        let mut scroll = SmoothScroll::new(1, 80.0, 5, 0, Easing::Smoothstep);
        let tick = scroll.tick(5);
        assert_eq!(tick.delta, 80.0);
        assert!(tick.finished);
    }

    #[test]
    fn clock_going_backwards_is_harmless() {
        let mut scroll = SmoothScroll::new(1, 80.0, 100, 200, Easing::Linear);
        assert_eq!(scroll.tick(50).delta, 0.0);
        assert_eq!(scroll.remaining(), 80.0);
    }
}
