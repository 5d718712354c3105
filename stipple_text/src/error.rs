// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by fonts, glyph runs, and paragraphs.

use skrifa::raw::ReadError;
use stipple_imaging::{ImagingError, TextEncoding};
use thiserror::Error;

/// Why a text operation was rejected.
#[derive(Debug, Error)]
pub enum TextError {
    /// Text input had no bytes.
    #[error("text is empty")]
    EmptyText,
    /// Text bytes were not valid in the stated encoding.
    #[error("text is not valid {0:?}")]
    InvalidEncoding(TextEncoding),
    /// A glyph run was requested from a font without a typeface.
    #[error("font has no typeface")]
    MissingTypeface,
    /// A font size was negative or not finite.
    #[error("font size must be finite and non-negative, got {0}")]
    InvalidFontSize(f32),
    /// A font program could not be parsed.
    #[error("font program: {0}")]
    FontParse(#[from] ReadError),
    /// A geometry value was invalid.
    #[error(transparent)]
    Imaging(#[from] ImagingError),
}
