// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors recorded by the flat call surface.

use stipple_imaging::ImagingError;
use stipple_raster::RasterError;
use stipple_text::TextError;
use thiserror::Error;

use crate::Kind;

/// Why a kit call returned its failure sentinel.
#[derive(Debug, Error)]
pub enum KitError {
    /// The null handle was passed where an object was required. The kind is
    /// `None` for calls that accept any kind.
    #[error("null {} handle", .0.map_or_else(|| "untyped".to_owned(), |k| format!("{k:?}")))]
    NullHandle(Option<Kind>),
    /// The handle refers to an object that was deleted.
    #[error("stale {0:?} handle")]
    StaleHandle(Kind),
    /// The handle refers to an object that a terminal call consumed.
    #[error("{0:?} handle was consumed")]
    Consumed(Kind),
    /// The handle names a different kind of object.
    #[error("expected a {expected:?} handle, got kind tag {found}")]
    WrongKind {
        /// Kind the call requires.
        expected: Kind,
        /// Kind tag carried by the handle.
        found: u8,
    },
    /// Every slot of an arena is in use.
    #[error("no free {0:?} slots")]
    ArenaFull(Kind),
    /// A numeric enumeration code is not defined.
    #[error("unknown {what} code {code}")]
    UnknownCode {
        /// Enumeration being decoded.
        what: &'static str,
        /// Code supplied.
        code: u32,
    },
    /// An argument was rejected before any state changed.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A raster operation failed.
    #[error(transparent)]
    Raster(#[from] RasterError),
    /// A text operation failed.
    #[error(transparent)]
    Text(#[from] TextError),
    /// A geometry or paint value was invalid.
    #[error(transparent)]
    Imaging(#[from] ImagingError),
}

impl KitError {
    /// Whether the error comes from misuse of a handle rather than from the
    /// arguments or the engine.
    pub fn is_handle_misuse(&self) -> bool {
        matches!(
            self,
            Self::NullHandle(_) | Self::StaleHandle(_) | Self::Consumed(_) | Self::WrongKind { .. }
        )
    }
}
