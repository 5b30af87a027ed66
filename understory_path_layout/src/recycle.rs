// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycle windows: which off-path items to release after a layout pass.
//!
//! A window keeps `cache_count / 2` items beyond each edge of the visible set
//! and marks the next `cache_count + 1` items on each side for eviction. In loop
//! mode both ranges wrap, so they may name the same logical index; the
//! resolver then shrinks both from their far ends until they are disjoint.

use smallvec::SmallVec;

use crate::{Extents, VisibleSet};

/// Minimum number of collision-shrink steps before eviction is skipped for a pass.
///
/// The actual cap is the larger of this and `cache_count + 1`, the step at
/// which both ranges run empty.
pub const MAX_COLLISION_SHRINK_STEPS: usize = 64;

/// An inclusive range of (possibly unnormalized) item indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexRange {
    /// First index (inclusive).
    pub start: i64,
    /// Last index (inclusive).
    pub end: i64,
}

impl IndexRange {
    /// Creates a range over `start..=end`.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Returns `true` if the range holds no index.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Iterates the logical indices of this range.
    ///
    /// When `looping`, indices wrap into `0..item_count`; otherwise indices
    /// outside that domain are dropped.
    pub fn logical(&self, item_count: usize, looping: bool) -> impl Iterator<Item = usize> {
        let count = i64::try_from(item_count).unwrap_or(i64::MAX);
        (self.start..=self.end).filter_map(move |i| {
            if count == 0 {
                None
            } else if looping {
                usize::try_from(i.rem_euclid(count)).ok()
            } else if (0..count).contains(&i) {
                usize::try_from(i).ok()
            } else {
                None
            }
        })
    }
}

/// Visible-window bounds and cache policy for one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecycleWindow {
    /// Scan position of the first visible item (virtual index when looping).
    pub first: i64,
    /// Scan position of the last visible item.
    pub last: i64,
    /// Number of logical items.
    pub item_count: usize,
    /// Items retained beyond the visible edges before eviction.
    pub cache_count: usize,
    /// See [`Extents::items_per_screen`].
    pub items_per_screen: usize,
    /// Whether indices wrap.
    pub looping: bool,
}

impl RecycleWindow {
    /// Derives a window from a resolved visible set.
    ///
    /// Returns `None` for an empty set.
    #[must_use]
    pub fn from_visible(
        visible: &VisibleSet,
        extents: &Extents,
        cache_count: usize,
        looping: bool,
    ) -> Option<Self> {
        Some(Self {
            first: visible.first()?.virtual_index,
            last: visible.last()?.virtual_index,
            item_count: extents.item_count,
            cache_count,
            items_per_screen: extents.items_per_screen(),
            looping,
        })
    }

    fn count(&self) -> i64 {
        i64::try_from(self.item_count).unwrap_or(i64::MAX)
    }

    fn half_cache(&self) -> i64 {
        i64::try_from(self.cache_count / 2).unwrap_or(i64::MAX)
    }

    /// Returns `true` if a parked view for logical `index` should be kept.
    ///
    /// The retention zone is the visible window widened up to, but not into,
    /// the eviction ranges.
    #[must_use]
    pub fn retains(&self, index: usize) -> bool {
        let Ok(index) = i64::try_from(index) else {
            return false;
        };
        let gap = (self.half_cache() - 1).max(0);
        let lo = self.first - gap;
        let hi = self.last + gap;
        if !self.looping {
            return (lo..=hi).contains(&index);
        }
        let count = self.count();
        let span = hi - lo + 1;
        if count == 0 {
            return false;
        }
        span >= count || (index - lo).rem_euclid(count) < span
    }
}

/// Index ranges to evict after a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecycleRanges {
    /// Range trailing behind the first visible item.
    pub forward: Option<IndexRange>,
    /// Range leading past the last visible item.
    pub backward: Option<IndexRange>,
}

impl RecycleRanges {
    /// Logical indices to evict, skipping anything in `visible`, without duplicates.
    #[must_use]
    pub fn evictions(
        &self,
        item_count: usize,
        looping: bool,
        visible: &VisibleSet,
    ) -> SmallVec<[usize; 16]> {
        let mut out: SmallVec<[usize; 16]> = SmallVec::new();
        for range in [self.forward, self.backward].into_iter().flatten() {
            for index in range.logical(item_count, looping) {
                if !visible.contains(index) && !out.contains(&index) {
                    out.push(index);
                }
            }
        }
        out
    }
}

fn collides(a: IndexRange, b: IndexRange, count: i64) -> bool {
    if a.is_empty() || b.is_empty() || count == 0 {
        return false;
    }
    (a.start..=a.end).any(|i| {
        let i = i.rem_euclid(count);
        (b.start..=b.end).any(|j| j.rem_euclid(count) == i)
    })
}

/// Computes the forward and backward eviction ranges for `window`.
///
/// - Bounded modes: the forward range exists only if it ends past index 0 and
///   the backward range only if it starts before the last item; both are
///   clamped into the item domain.
/// - Loop mode: both ranges exist whenever there are more items than the cache
///   plus one screen. Colliding ranges are shrunk one step at a time from their
///   far ends; if they still collide after `cache_count + 1` steps (at least
///   [`MAX_COLLISION_SHRINK_STEPS`]), no eviction happens this pass.
///
/// The ranges never reach into the visible window itself.
#[must_use]
pub fn resolve_recycle(window: &RecycleWindow) -> RecycleRanges {
    let half = window.half_cache();
    let cache = i64::try_from(window.cache_count).unwrap_or(i64::MAX);
    let count = window.count();

    let forward_end = (window.first - half).min(window.first - 1);
    let forward_start = forward_end - cache;
    let backward_start = (window.last + half).max(window.last + 1);
    let backward_end = backward_start + cache;

    if !window.looping {
        let forward = (forward_end > 0).then(|| IndexRange::new(forward_start.max(0), forward_end));
        let backward = (backward_start < count - 1)
            .then(|| IndexRange::new(backward_start, backward_end.min(count - 1)));
        return RecycleRanges { forward, backward };
    }

    if window.item_count <= window.cache_count + window.items_per_screen {
        return RecycleRanges::default();
    }

    let mut forward = IndexRange::new(forward_start, forward_end);
    let mut backward = IndexRange::new(backward_start, backward_end);
    let max_steps = window
        .cache_count
        .saturating_add(1)
        .max(MAX_COLLISION_SHRINK_STEPS);
    for step in 0..=max_steps {
        if !collides(forward, backward, count) {
            if step > 0 {
                tracing::debug!(step, ?forward, ?backward, "recycle ranges shrunk apart");
            }
            return RecycleRanges {
                forward: (!forward.is_empty()).then_some(forward),
                backward: (!backward.is_empty()).then_some(backward),
            };
        }
        forward.start += 1;
        backward.end -= 1;
    }
    tracing::warn!(
        first = window.first,
        last = window.last,
        item_count = window.item_count,
        cache_count = window.cache_count,
        "recycle ranges still collide; skipping eviction"
    );
    RecycleRanges::default()
}
