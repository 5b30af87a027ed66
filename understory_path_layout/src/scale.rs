// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Piecewise-linear item scale along the path.

use smallvec::SmallVec;

use crate::{ConfigError, PathLayoutError};

/// One control point of a [`ScaleCurve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleStop {
    /// Scale factor applied at `fraction`.
    pub scale: f64,
    /// Position along the path, as a fraction of its length.
    pub fraction: f64,
}

/// Item scale as a function of path fraction.
///
/// Built from a flat list of `(scale, fraction)` pairs, e.g. `[0.8, 0.5]` scales
/// items to 80% at the middle of the path. Fractions must be non-decreasing.
/// Unless the list already starts at fraction `0` (or ends at `1`), an implicit
/// stop with scale `1` is added there, so items are full size at the path ends.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleCurve {
    stops: SmallVec<[ScaleStop; 4]>,
}

impl Default for ScaleCurve {
    /// A curve that leaves every item at scale `1`.
    fn default() -> Self {
        let mut stops = SmallVec::new();
        stops.push(ScaleStop {
            scale: 1.0,
            fraction: 0.0,
        });
        stops.push(ScaleStop {
            scale: 1.0,
            fraction: 1.0,
        });
        Self { stops }
    }
}

impl ScaleCurve {
    /// Validates a flat `(scale, fraction)` list and builds a curve from it.
    ///
    /// An empty list yields the identity curve.
    pub fn from_ratios(ratios: &[f64]) -> Result<Self, PathLayoutError> {
        if ratios.is_empty() {
            return Ok(Self::default());
        }
        for &value in ratios {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { value }.into());
            }
            if value < 0.0 {
                return Err(ConfigError::NegativeScaleValue { value }.into());
            }
        }
        if ratios.len() < 2 || ratios.len() % 2 != 0 {
            return Err(ConfigError::ScaleRatioLength { len: ratios.len() }.into());
        }

        let mut stops: SmallVec<[ScaleStop; 4]> = ratios
            .chunks_exact(2)
            .map(|pair| ScaleStop {
                scale: pair[0],
                fraction: pair[1],
            })
            .collect();
        if stops[0].fraction != 0.0 {
            stops.insert(
                0,
                ScaleStop {
                    scale: 1.0,
                    fraction: 0.0,
                },
            );
        }
        if stops[stops.len() - 1].fraction != 1.0 {
            stops.push(ScaleStop {
                scale: 1.0,
                fraction: 1.0,
            });
        }
        for pair in stops.windows(2) {
            if pair[1].fraction < pair[0].fraction {
                return Err(ConfigError::DescendingScaleFraction {
                    previous: pair[0].fraction,
                    next: pair[1].fraction,
                }
                .into());
            }
        }
        Ok(Self { stops })
    }

    /// Control points, including the implicit end stops.
    #[must_use]
    pub fn stops(&self) -> &[ScaleStop] {
        &self.stops
    }

    /// Scale at `fraction` of the path.
    ///
    /// Interpolates between the nearest stop at or before `fraction` and the
    /// nearest stop at or after it. Where those coincide, or the result is not
    /// finite, the lower stop's scale is returned.
    #[must_use]
    pub fn scale_at(&self, fraction: f64) -> f64 {
        let (mut min_scale, mut min_fraction) = (1.0, 1.0);
        for stop in self.stops.iter() {
            if stop.fraction <= fraction {
                min_scale = stop.scale;
                min_fraction = stop.fraction;
            } else {
                break;
            }
        }
        let (mut max_scale, mut max_fraction) = (1.0, 1.0);
        for stop in self.stops.iter().rev() {
            if stop.fraction >= fraction {
                max_scale = stop.scale;
                max_fraction = stop.fraction;
            } else {
                break;
            }
        }

        let span = max_fraction - min_fraction;
        if span == 0.0 {
            return min_scale;
        }
        let t = (fraction - min_fraction) / span;
        let scale = min_scale + t * (max_scale - min_scale);
        if scale.is_finite() { scale } else { min_scale }
    }
}
