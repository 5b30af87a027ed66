// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering-host boundary.

use kurbo::{Rect, Size};

/// Capabilities the embedding UI provides to [`PathLayout`](crate::PathLayout).
///
/// The layout core owns no views itself. It asks the host to create a view
/// for a logical index, positions it, and hands it back for release once it
/// falls out of the recycle window. Handles are opaque to the core.
pub trait ViewHost {
    /// Handle to one item view.
    type View;

    /// Creates (or fetches from a host-side pool) a view bound to `index`.
    fn materialize(&mut self, index: usize) -> Self::View;

    /// Returns a view the core no longer needs.
    fn release(&mut self, view: Self::View);

    /// Measures a view's unscaled size.
    fn measure(&mut self, view: &Self::View) -> Size;

    /// Positions a view. `bounds` is centered on the item's path point.
    fn place(&mut self, view: &mut Self::View, bounds: Rect);

    /// Rotates a view about its center, in degrees.
    fn set_rotation(&mut self, view: &mut Self::View, degrees: f64);

    /// Scales a view horizontally about its center.
    fn set_scale_x(&mut self, view: &mut Self::View, scale: f64);

    /// Scales a view vertically about its center.
    fn set_scale_y(&mut self, view: &mut Self::View, scale: f64);

    /// Called when a smooth scroll finishes with auto-select enabled.
    fn item_selected(&mut self, index: usize) {
        let _ = index;
    }

    /// Whether the host is in the middle of its own layout pass.
    ///
    /// Structural item changes reported while this is `true` are deferred.
    fn is_computing_layout(&self) -> bool {
        false
    }
}
