// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible-set resolution: which items sit on the path for a given offset.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::{Extents, PathSample, PathSampler, ScrollMode};

/// An item that is currently on the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleItem {
    /// Logical item index, in `0..item_count`.
    pub index: usize,
    /// Unbounded scan position. Equals `index` unless looping, where it may be
    /// negative or exceed `item_count`.
    pub virtual_index: i64,
    /// Position along the path as a fraction of its length.
    pub fraction: f64,
    /// Path geometry at `fraction`.
    pub sample: PathSample,
}

/// Items on the path, ordered by scan position along the path.
///
/// In loop mode logical indices are not monotonic: near the wrap point the
/// sequence runs e.g. `8, 9, 0, 1, 2`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSet {
    items: Vec<VisibleItem>,
}

impl VisibleSet {
    /// The visible items in scan order.
    #[must_use]
    pub fn items(&self) -> &[VisibleItem] {
        &self.items
    }

    /// Returns `true` if nothing is on the path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of visible items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// First item in scan order.
    #[must_use]
    pub fn first(&self) -> Option<&VisibleItem> {
        self.items.first()
    }

    /// Last item in scan order.
    #[must_use]
    pub fn last(&self) -> Option<&VisibleItem> {
        self.items.last()
    }

    /// Looks up a visible item by logical index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&VisibleItem> {
        self.items.iter().find(|item| item.index == index)
    }

    /// Returns `true` if the logical `index` is visible.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// The visible item whose fraction is closest to `selection_fraction`.
    ///
    /// Ties go to the item encountered first in scan order.
    #[must_use]
    pub fn closest_to(&self, selection_fraction: f64) -> Option<&VisibleItem> {
        let mut best: Option<(&VisibleItem, f64)> = None;
        for item in &self.items {
            let gap = (item.fraction - selection_fraction).abs();
            match best {
                Some((_, best_gap)) if gap >= best_gap => {}
                _ => best = Some((item, gap)),
            }
        }
        best.map(|(item, _)| item)
    }
}

/// Number of items that have scrolled past the path's end and must be looped
/// back in from its start.
///
/// Follows the vacancy computation of the recycle window: with
/// `first = offset + path_length` and `last = first - items_total_length`, the
/// vacant distance is `last % items_total_length` plus however far `first` has
/// run past `items_total_length + path_length`.
#[must_use]
pub fn overflow_count(offset: f64, extents: &Extents) -> i64 {
    let total = extents.items_total_length();
    let spacing = extents.spacing_i64();
    if total <= 0 || spacing <= 0 {
        return 0;
    }
    let path = extents.path_i64();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Truncation toward zero is part of the vacancy arithmetic"
    )]
    let first_item_scroll_offset = (offset + path as f64) as i64;
    let last_item_scroll_offset = first_item_scroll_offset - total;
    let last_item_overflow_offset = (first_item_scroll_offset - (total + path)).max(0);
    let vacant_distance = last_item_scroll_offset % total + last_item_overflow_offset;
    vacant_distance / spacing
}

/// Resolves the items on the path for `offset`.
///
/// Normal and overflow modes scan forward from the first item at or after the
/// path start for up to [`Extents::items_per_screen`] items. Loop mode scans
/// virtual indices ending at the [`overflow_count`] and maps each back into
/// `0..item_count`. Items the sampler reports as off-path are skipped.
pub fn resolve_visible<P: PathSampler + ?Sized>(
    sampler: &P,
    offset: f64,
    extents: &Extents,
    mode: ScrollMode,
) -> VisibleSet {
    let mut set = VisibleSet::default();
    if extents.item_count == 0 || extents.spacing == 0 || extents.path_length == 0 {
        return set;
    }
    let spacing = extents.spacing_i64() as f64;
    let path = extents.path_i64() as f64;
    let per_screen = i64::try_from(extents.items_per_screen()).unwrap_or(i64::MAX);
    let count = extents.count();

    let mut push = |virtual_index: i64, index: i64, distance: f64| {
        let Ok(index) = usize::try_from(index) else {
            return;
        };
        let fraction = distance / path;
        if let Some(sample) = sampler.sample(fraction) {
            set.items.push(VisibleItem {
                index,
                virtual_index,
                fraction,
                sample,
            });
        }
    };

    if extents.is_looping(mode) {
        let overflow = overflow_count(offset, extents);
        let first = overflow - per_screen - 1;
        for v in first..overflow {
            let index = v.rem_euclid(count);
            push(v, index, (v + count) as f64 * spacing - offset);
        }
    } else {
        let mut first = if offset > 0.0 {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Offset is bounded by the strip length"
            )]
            let guess = (offset / spacing).ceil() as i64;
            guess
        } else {
            0
        };
        // Settle rounding so `first` is the smallest index at or after the path start.
        while first > 0 && (first - 1) as f64 * spacing - offset >= 0.0 {
            first -= 1;
        }
        while first < count && (first as f64 * spacing - offset) < 0.0 {
            first += 1;
        }
        let end = first.saturating_add(per_screen).min(count);
        for i in first..end {
            push(i, i, i as f64 * spacing - offset);
        }
    }

    tracing::trace!(
        offset,
        visible = set.items.len(),
        first = set.items.first().map(|item| item.index),
        last = set.items.last().map(|item| item.index),
        "resolved visible set"
    );
    set
}
