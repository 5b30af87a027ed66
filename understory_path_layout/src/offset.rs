// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll offset ownership: clamping, rubber-banding, and loop wraparound.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// How the scroll offset behaves at the ends of the item strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollMode {
    /// The first item cannot leave the path start; the last cannot leave the path end.
    #[default]
    Normal,
    /// Items may scroll entirely off either end of the path.
    Overflow,
    /// Items wrap around endlessly, when there are enough of them to do so.
    Loop,
}

/// Scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal deltas drive the offset.
    Horizontal,
    /// Vertical deltas drive the offset.
    #[default]
    Vertical,
}

/// Integer geometry shared by every resolver in a layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extents {
    /// Number of logical items.
    pub item_count: usize,
    /// Distance between consecutive items along the path (`> 0`).
    pub spacing: u32,
    /// Length of the path.
    pub path_length: u32,
}

impl Extents {
    /// Creates extents for `item_count` items spaced `spacing` apart on a path of `path_length`.
    #[must_use]
    pub const fn new(item_count: usize, spacing: u32, path_length: u32) -> Self {
        Self {
            item_count,
            spacing,
            path_length,
        }
    }

    pub(crate) fn count(&self) -> i64 {
        i64::try_from(self.item_count).unwrap_or(i64::MAX)
    }

    pub(crate) fn spacing_i64(&self) -> i64 {
        i64::from(self.spacing)
    }

    pub(crate) fn path_i64(&self) -> i64 {
        i64::from(self.path_length)
    }

    /// Distance from the first item to just past the last one.
    ///
    /// This is `count * spacing - spacing + 1`. The trailing `+ 1` keeps the last
    /// item's fraction strictly below `1` when the strip exactly fills the path.
    #[must_use]
    pub fn items_total_length(&self) -> i64 {
        let spacing = self.spacing_i64();
        self.count().saturating_mul(spacing) - spacing + 1
    }

    /// Most items that can be on the path at once, plus one look-ahead item.
    #[must_use]
    pub fn items_per_screen(&self) -> usize {
        if self.spacing == 0 {
            return 0;
        }
        (self.path_length / self.spacing) as usize + 1
    }

    /// Whether loop mode can engage: the strip must exceed the path by more than one spacing.
    #[must_use]
    pub fn loop_eligible(&self) -> bool {
        self.items_total_length() - self.path_i64() > self.spacing_i64()
    }

    /// Whether `mode` behaves as an endless loop with these extents.
    #[must_use]
    pub fn is_looping(&self, mode: ScrollMode) -> bool {
        mode == ScrollMode::Loop && self.loop_eligible()
    }
}

/// The live scroll position.
///
/// Only the offset of the active [`Orientation`] is live; switching orientation
/// migrates it to the other axis and zeroes the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    offset_x: f64,
    offset_y: f64,
    /// Scroll regime.
    pub mode: ScrollMode,
    orientation: Orientation,
}

impl ScrollState {
    /// Creates a state at offset zero.
    #[must_use]
    pub fn new(mode: ScrollMode, orientation: Orientation) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            mode,
            orientation,
        }
    }

    /// The live offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.offset_x,
            Orientation::Vertical => self.offset_y,
        }
    }

    pub(crate) fn set_offset(&mut self, offset: f64) {
        match self.orientation {
            Orientation::Horizontal => self.offset_x = offset,
            Orientation::Vertical => self.offset_y = offset,
        }
    }

    /// The active scroll axis.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Switches the active axis, carrying the live offset over.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.orientation == orientation {
            return;
        }
        let live = self.offset();
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.orientation = orientation;
        self.set_offset(live);
    }
}

/// Returns the offset after applying `delta` under `mode`.
///
/// - Loop (when eligible): past `items_total_length` the offset wraps modulo that
///   length and backs off one spacing for the look-ahead item; at or below
///   `-path_length` it jumps forward by as many `items_total_length + spacing`
///   periods as it takes to get back above `-path_length`.
/// - Overflow: clamps to `[-path_length, items_total_length]`.
/// - Normal: clamps to `[0, items_total_length - path_length]`. When the items
///   do not fill the path, forward motion is refused and the offset stays put.
///
/// A zero or non-finite delta returns `offset` unchanged.
#[must_use]
pub fn apply_delta(offset: f64, delta: f64, mode: ScrollMode, extents: &Extents) -> f64 {
    if delta == 0.0 || !delta.is_finite() {
        return offset;
    }
    let path = extents.path_i64() as f64;
    let total = extents.items_total_length() as f64;
    let next = offset + delta;

    if extents.is_looping(mode) {
        let wrapped = wrap_loop(next, path, total, extents.spacing_i64() as f64);
        if wrapped != next {
            tracing::trace!(offset, delta, wrapped, "loop wrapped");
        }
        return wrapped;
    }

    match mode {
        ScrollMode::Overflow => next.max(-path).min(total),
        ScrollMode::Normal | ScrollMode::Loop => {
            let overflow = total - path;
            if next < 0.0 {
                0.0
            } else if next > overflow {
                if total > path { overflow } else { offset }
            } else {
                next
            }
        }
    }
}

/// Brings `offset` back into range after the item count, spacing or path changed.
///
/// Bounded modes clamp to their range, pinning at `0` when the items do not
/// fill the path. Loop mode wraps the same way as [`apply_delta`]. A
/// non-finite offset resets to `0`.
#[must_use]
pub fn settle_offset(offset: f64, mode: ScrollMode, extents: &Extents) -> f64 {
    if !offset.is_finite() {
        return 0.0;
    }
    let path = extents.path_i64() as f64;
    let total = extents.items_total_length() as f64;
    if extents.is_looping(mode) {
        return wrap_loop(offset, path, total, extents.spacing_i64() as f64);
    }
    match mode {
        ScrollMode::Overflow => offset.max(-path).min(total),
        ScrollMode::Normal | ScrollMode::Loop => offset.clamp(0.0, (total - path).max(0.0)),
    }
}

fn wrap_loop(offset: f64, path: f64, total: f64, spacing: f64) -> f64 {
    if offset > total {
        offset % total - spacing
    } else if offset <= -path {
        let period = total + spacing;
        offset + (((-path - offset) / period).floor() + 1.0) * period
    } else {
        offset
    }
}

/// Owns a [`ScrollState`] and applies scroll deltas to it.
#[derive(Clone, Debug)]
pub struct OffsetController {
    state: ScrollState,
    flinging: bool,
    fling_enabled: bool,
}

impl OffsetController {
    /// Creates a controller at offset zero with inertial scrolling enabled.
    #[must_use]
    pub fn new(state: ScrollState) -> Self {
        Self {
            state,
            flinging: false,
            fling_enabled: true,
        }
    }

    /// The owned scroll state.
    #[must_use]
    pub const fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Mutable access to the owned scroll state.
    pub fn state_mut(&mut self) -> &mut ScrollState {
        &mut self.state
    }

    /// The live offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.state.offset()
    }

    /// Marks whether an inertial (fling) scroll is in progress.
    pub fn set_flinging(&mut self, flinging: bool) {
        self.flinging = flinging;
    }

    /// Whether an inertial scroll is in progress.
    #[must_use]
    pub const fn is_flinging(&self) -> bool {
        self.flinging
    }

    /// Enables or disables inertial scrolling.
    pub fn set_fling_enabled(&mut self, enabled: bool) {
        self.fling_enabled = enabled;
    }

    /// Whether inertial scrolling is enabled.
    #[must_use]
    pub const fn fling_enabled(&self) -> bool {
        self.fling_enabled
    }

    /// Applies `delta` and returns how much of it was consumed.
    ///
    /// While a fling is in progress and inertial scrolling is disabled, every
    /// delta is refused. In loop mode the whole delta counts as consumed whenever
    /// the offset moved (wrapping makes the raw offset difference meaningless);
    /// otherwise the consumed amount is the actual offset change.
    pub fn apply_delta(&mut self, delta: f64, extents: &Extents) -> f64 {
        if self.flinging && !self.fling_enabled {
            tracing::trace!(delta, "fling disabled; delta refused");
            return 0.0;
        }
        let before = self.state.offset();
        let after = apply_delta(before, delta, self.state.mode, extents);
        self.state.set_offset(after);
        if after == before {
            0.0
        } else if extents.is_looping(self.state.mode) {
            delta
        } else {
            after - before
        }
    }
}
