// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for invalid geometry, paint, and effect inputs.

use thiserror::Error;

/// An input was rejected before any state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImagingError {
    /// A flat point list had an odd length or no points.
    #[error("point list must hold a non-zero, even number of coordinates, got {0}")]
    InvalidPointList(usize),
    /// A circle radius was negative or not finite.
    #[error("radius must be finite and non-negative")]
    InvalidRadius,
    /// A stroke width or miter limit was negative or not finite.
    #[error("stroke parameter must be finite and non-negative")]
    InvalidStrokeParameter,
    /// An alpha value was not a number.
    #[error("alpha must be a number")]
    InvalidAlpha,
    /// A gradient had fewer than two colors.
    #[error("gradient needs at least two colors, got {0}")]
    TooFewColors(usize),
    /// Gradient positions did not line up with the colors.
    #[error("gradient has {colors} colors but {positions} positions")]
    MismatchedPositions {
        /// Number of colors supplied.
        colors: usize,
        /// Number of positions supplied.
        positions: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("coordinates must be finite")]
    NonFinite,
}
