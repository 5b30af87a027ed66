// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_path_layout --heading-base-level=0

//! Understory Path Layout: virtualized item layout along an arbitrary curve.
//!
//! Items are spaced a fixed distance apart on a one-dimensional strip that is
//! scrolled along a path. Only items whose position falls on the path are
//! materialized; everything else is recycled. The crate is renderer-agnostic:
//! it computes positions, tangent angles and scales, and drives a host-provided
//! [`ViewHost`] to create, place and release views.
//!
//! The core concepts are:
//!
//! - [`PathSampler`]: maps a fraction of a path's length to a point and tangent.
//!   [`Keyframes`] implements it over a flattened kurbo [`BezPath`](kurbo::BezPath).
//! - [`ScrollMode`]: `Normal` clamps to the strip, `Overflow` lets items scroll
//!   off both ends, and `Loop` wraps endlessly once there are enough items.
//! - [`apply_delta`] and [`OffsetController`]: clamp or wrap the scroll offset.
//! - [`resolve_visible`]: which items are on the path for an offset, including
//!   the out-of-order logical indices of a wrapped loop.
//! - [`resolve_recycle`]: which off-path items to evict, with wrapped ranges
//!   kept disjoint.
//! - [`distance_to`]: the scroll delta that brings an item onto the selection point.
//! - [`ScaleCurve`]: piecewise-linear item scale along the path.
//! - [`PathLayout`]: the driver tying these together, with smooth scrolling,
//!   auto-select, and deferred relayout while the host is busy.
//!
//! The resolvers are pure functions over [`Extents`] and can be used without the
//! driver.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{BezPath, Rect, Size};
//! use understory_path_layout::{Keyframes, PathLayout, PathLayoutConfig, ViewHost};
//!
//! // A host whose views are just the item index and its bounds.
//! struct Host;
//!
//! impl ViewHost for Host {
//!     type View = (usize, Rect);
//!     fn materialize(&mut self, index: usize) -> (usize, Rect) {
//!         (index, Rect::ZERO)
//!     }
//!     fn release(&mut self, _view: (usize, Rect)) {}
//!     fn measure(&mut self, _view: &(usize, Rect)) -> Size {
//!         Size::new(16.0, 16.0)
//!     }
//!     fn place(&mut self, view: &mut (usize, Rect), bounds: Rect) {
//!         view.1 = bounds;
//!     }
//!     fn set_rotation(&mut self, _view: &mut (usize, Rect), _degrees: f64) {}
//!     fn set_scale_x(&mut self, _view: &mut (usize, Rect), _scale: f64) {}
//!     fn set_scale_y(&mut self, _view: &mut (usize, Rect), _scale: f64) {}
//! }
//!
//! let mut path = BezPath::new();
//! path.move_to((0.0, 0.0));
//! path.quad_to((200.0, -150.0), (400.0, 0.0));
//!
//! let mut layout = PathLayout::new(PathLayoutConfig::new(50)).unwrap();
//! layout.set_path(Keyframes::from_path(&path).unwrap());
//! layout.set_item_count(100, &mut Host).unwrap();
//!
//! let first = layout.placements()[0];
//! assert_eq!(first.index, 0);
//! assert!(first.fraction < 0.01);
//!
//! // Bring item 40 onto the middle of the path.
//! layout.scroll_to_index(40, &mut Host).unwrap();
//! assert_eq!(layout.closest_to_selection().unwrap(), Some(40));
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` support in kurbo, thiserror and tracing.
//! - `libm`: float math through kurbo's `libm` support for `no_std` targets.
//!
//! Logging goes through `tracing`; no subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod config;
mod driver;
mod error;
mod host;
mod offset;
mod recycle;
mod sampler;
mod scale;
mod smooth;
mod target;
mod visible;

pub use config::{
    DEFAULT_CACHE_COUNT, DEFAULT_SELECTION_FRACTION, DEFAULT_SMOOTH_SCROLL_DURATION_MS,
    PathLayoutConfig,
};
pub use driver::{
    DEFERRED_RETRY_INTERVAL_MS, ItemPlacement, LayoutState, MAX_DEFERRED_POLLS, PathLayout,
    Relayout, ScrollPhase,
};
pub use error::{ConfigError, PathLayoutError};
pub use host::ViewHost;
pub use offset::{
    Extents, OffsetController, Orientation, ScrollMode, ScrollState, apply_delta, settle_offset,
};
pub use recycle::{
    IndexRange, MAX_COLLISION_SHRINK_STEPS, RecycleRanges, RecycleWindow, resolve_recycle,
};
pub use sampler::{DEFAULT_FLATTEN_TOLERANCE, Keyframes, PathSample, PathSampler};
pub use scale::{ScaleCurve, ScaleStop};
pub use smooth::{Easing, ScrollTick, SmoothScroll};
pub use target::distance_to;
pub use visible::{VisibleItem, VisibleSet, overflow_count, resolve_visible};
