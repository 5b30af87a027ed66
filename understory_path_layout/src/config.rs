// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration.

use crate::{ConfigError, Easing, Orientation, PathLayoutError, ScaleCurve, ScrollMode};

/// Items kept beyond the visible edges before eviction, by default.
pub const DEFAULT_CACHE_COUNT: usize = 10;

/// Default smooth-scroll duration in milliseconds.
pub const DEFAULT_SMOOTH_SCROLL_DURATION_MS: u64 = 250;

/// Default selection point: the middle of the path.
pub const DEFAULT_SELECTION_FRACTION: f64 = 0.5;

/// Everything that shapes a [`PathLayout`](crate::PathLayout) apart from the
/// path itself and the item count.
#[derive(Clone, Debug, PartialEq)]
pub struct PathLayoutConfig {
    /// Distance between consecutive items along the path. Must be `> 0`.
    pub spacing: u32,
    /// Behavior at the ends of the item strip.
    pub mode: ScrollMode,
    /// Axis whose deltas scroll the layout.
    pub orientation: Orientation,
    /// Point on the path, in `[0, 1]`, where selected items come to rest.
    pub selection_fraction: f64,
    /// Off-path items retained before eviction.
    pub cache_count: usize,
    /// Duration of smooth scrolls.
    pub smooth_scroll_duration_ms: u64,
    /// Whether inertial scroll deltas are accepted.
    pub fling_enabled: bool,
    /// Snap to the item nearest the selection point when scrolling stops.
    pub auto_select: bool,
    /// Keep items upright instead of following the path tangent.
    pub item_direction_fixed: bool,
    /// Item scale along the path; `None` leaves items at scale `1`.
    pub scale: Option<ScaleCurve>,
    /// Timing curve for smooth scrolls.
    pub easing: Easing,
}

impl PathLayoutConfig {
    /// Creates a configuration with the given item spacing and defaults elsewhere.
    #[must_use]
    pub fn new(spacing: u32) -> Self {
        Self {
            spacing,
            mode: ScrollMode::default(),
            orientation: Orientation::default(),
            selection_fraction: DEFAULT_SELECTION_FRACTION,
            cache_count: DEFAULT_CACHE_COUNT,
            smooth_scroll_duration_ms: DEFAULT_SMOOTH_SCROLL_DURATION_MS,
            fling_enabled: true,
            auto_select: false,
            item_direction_fixed: false,
            scale: None,
            easing: Easing::default(),
        }
    }

    /// Checks every invariant of the configuration.
    pub fn validate(&self) -> Result<(), PathLayoutError> {
        if self.spacing == 0 {
            return Err(ConfigError::ZeroSpacing.into());
        }
        validate_selection_fraction(self.selection_fraction)
    }
}

pub(crate) fn validate_selection_fraction(fraction: f64) -> Result<(), PathLayoutError> {
    if !fraction.is_finite() {
        return Err(ConfigError::NonFinite { value: fraction }.into());
    }
    if !(0.0..=1.0).contains(&fraction) {
        return Err(ConfigError::SelectionFraction { fraction }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::PathLayoutConfig;
    use crate::{ConfigError, PathLayoutError};

    #[test]
    fn defaults() {
        let config = PathLayoutConfig::new(40);
        assert_eq!(config.cache_count, 10);
        assert_eq!(config.smooth_scroll_duration_ms, 250);
        assert_eq!(config.selection_fraction, 0.5);
        assert!(config.fling_enabled);
        assert!(!config.auto_select);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            PathLayoutConfig::new(0).validate(),
            Err(PathLayoutError::InvalidConfiguration(ConfigError::ZeroSpacing))
        );
        let mut config = PathLayoutConfig::new(10);
        config.selection_fraction = 1.5;
        assert_eq!(
            config.validate(),
            Err(PathLayoutError::InvalidConfiguration(
                ConfigError::SelectionFraction { fraction: 1.5 }
            ))
        );
        config.selection_fraction = f64::NAN;
        assert!(config.validate().is_err());
    }
}
