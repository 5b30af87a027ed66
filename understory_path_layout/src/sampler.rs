// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path sampling: the boundary between layout math and curve geometry.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, PathEl, Point};

use crate::{ConfigError, PathLayoutError};

/// Flattening tolerance used by [`Keyframes::from_path`].
pub const DEFAULT_FLATTEN_TOLERANCE: f64 = 0.25;

/// A point on a path together with its tangent direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    /// Position on the path, in path coordinates.
    pub position: Point,
    /// Tangent direction at `position`, in degrees (`0` points along +x, `90` along +y).
    pub angle: f64,
    /// Arc length from the start of the path to `position`.
    pub distance: f64,
}

/// Maps a fraction of a path's length to a point and tangent on that path.
///
/// Implementations own the curve data. Queries are expected to be cheap
/// (constant or logarithmic time) since layout issues one per visible item.
pub trait PathSampler {
    /// Total length of the path, in whole units of the scroll coordinate space.
    fn length(&self) -> u32;

    /// Samples the path at `fraction` of its length.
    ///
    /// Returns `None` when `fraction` lies outside the sampler's valid domain.
    /// Layout treats that as "this item is currently off the path", not as an error.
    fn sample(&self, fraction: f64) -> Option<PathSample>;
}

/// A [`PathSampler`] over a flattened [`BezPath`].
///
/// The first subpath of the input is flattened into a polyline and cumulative
/// arc lengths are precomputed, so each sample is a binary search plus a lerp.
/// The valid domain is `0.0 <= fraction < 1.0`.
#[derive(Clone, Debug)]
pub struct Keyframes {
    points: Vec<Point>,
    /// `lengths[i]` is the arc length from the start to `points[i]`.
    lengths: Vec<f64>,
}

impl Keyframes {
    /// Builds keyframes from `path` using [`DEFAULT_FLATTEN_TOLERANCE`].
    pub fn from_path(path: &BezPath) -> Result<Self, PathLayoutError> {
        Self::with_tolerance(path, DEFAULT_FLATTEN_TOLERANCE)
    }

    /// Builds keyframes from `path`, flattening curves to within `tolerance`.
    ///
    /// Only the first subpath is measured. Returns
    /// [`ConfigError::DegeneratePath`] if it has no length.
    pub fn with_tolerance(path: &BezPath, tolerance: f64) -> Result<Self, PathLayoutError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::NonFinite { value: tolerance }.into());
        }
        let mut frames = Self {
            points: Vec::new(),
            lengths: Vec::new(),
        };
        let mut subpath_start: Option<Point> = None;
        let mut done = false;
        kurbo::flatten(path.iter(), tolerance, |el| {
            if done {
                return;
            }
            match el {
                PathEl::MoveTo(p) => {
                    if subpath_start.is_some() {
                        done = true;
                    } else {
                        subpath_start = Some(p);
                        frames.push(p);
                    }
                }
                PathEl::LineTo(p) => frames.push(p),
                PathEl::ClosePath => {
                    if let Some(start) = subpath_start {
                        frames.push(start);
                    }
                    done = true;
                }
                // Flattening only emits lines.
                PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
            }
        });
        if frames.points.len() < 2 {
            return Err(ConfigError::DegeneratePath.into());
        }
        Ok(frames)
    }

    fn push(&mut self, p: Point) {
        match self.points.last() {
            None => {
                self.points.push(p);
                self.lengths.push(0.0);
            }
            Some(&last) => {
                let step = last.distance(p);
                // Zero-length segments carry no tangent.
                if step > 0.0 {
                    let total = self.total_length();
                    self.points.push(p);
                    self.lengths.push(total + step);
                }
            }
        }
    }

    /// Exact arc length of the flattened polyline.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }
}

impl PathSampler for Keyframes {
    fn length(&self) -> u32 {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Arc length is finite and non-negative; rounding to whole units is intended"
        )]
        let len = self.total_length().round() as u32;
        len
    }

    fn sample(&self, fraction: f64) -> Option<PathSample> {
        if !(0.0..1.0).contains(&fraction) {
            return None;
        }
        let distance = fraction * self.total_length();
        let last_segment = self.points.len() - 2;
        let seg = self
            .lengths
            .partition_point(|&l| l <= distance)
            .saturating_sub(1)
            .min(last_segment);
        let (p0, p1) = (self.points[seg], self.points[seg + 1]);
        let span = self.lengths[seg + 1] - self.lengths[seg];
        let t = ((distance - self.lengths[seg]) / span).clamp(0.0, 1.0);
        Some(PathSample {
            position: p0.lerp(p1, t),
            angle: (p1 - p0).atan2().to_degrees(),
            distance,
        })
    }
}
