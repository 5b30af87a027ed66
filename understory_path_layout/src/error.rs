// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for path layout configuration and geometry queries.

/// Errors returned by [`PathLayout`](crate::PathLayout) and its helpers.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PathLayoutError {
    /// A geometry-dependent operation was called before a path was configured.
    #[error("path not set")]
    PathNotSet,
    /// A configuration value was rejected; the previous configuration is unchanged.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// Reasons a configuration value is rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Item spacing must be strictly positive.
    #[error("item spacing must be > 0")]
    ZeroSpacing,
    /// Scale ratios come in `(scale, fraction)` pairs.
    #[error("scale ratio list must have an even length >= 2, got {len}")]
    ScaleRatioLength {
        /// Number of values supplied.
        len: usize,
    },
    /// Scale ratios and fractions may not be negative.
    #[error("scale ratio value can not be negative: {value}")]
    NegativeScaleValue {
        /// The offending value.
        value: f64,
    },
    /// Scale fractions must be non-decreasing.
    #[error("scale fractions must be ascending: {previous} > {next}")]
    DescendingScaleFraction {
        /// Fraction seen before `next`.
        previous: f64,
        /// Fraction that broke the ordering.
        next: f64,
    },
    /// A value was NaN or infinite.
    #[error("value must be finite: {value}")]
    NonFinite {
        /// The offending value.
        value: f64,
    },
    /// The selection fraction lies outside `[0, 1]`.
    #[error("selection fraction must be within [0, 1], got {fraction}")]
    SelectionFraction {
        /// The offending fraction.
        fraction: f64,
    },
    /// The path handed to [`Keyframes`](crate::Keyframes) has no length.
    #[error("path has no measurable length")]
    DegeneratePath,
}
