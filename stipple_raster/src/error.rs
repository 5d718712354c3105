// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by surfaces, images, and codecs.

use stipple_imaging::{ImageFormat, ImagingError};
use thiserror::Error;

/// Failure reported by a host GPU device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("gpu device: {0}")]
pub struct GpuError(pub String);

/// Why a raster operation was rejected.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Width or height outside `1..=65535`.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Width times height exceeds [`MAX_PIXELS`](crate::MAX_PIXELS).
    #[error("{width}x{height} exceeds the pixel limit")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A pixel buffer could not be allocated.
    #[error("cannot allocate {bytes} bytes of pixels")]
    OutOfMemory {
        /// Bytes requested.
        bytes: usize,
    },
    /// A pixel buffer length did not match its dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Bytes required.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// A read-back rectangle was empty or reached outside the source.
    #[error("read rectangle is empty or out of bounds")]
    ReadOutOfBounds,
    /// A destination row stride was smaller than one row of pixels.
    #[error("row stride {row_bytes} is smaller than {min} bytes")]
    RowBytes {
        /// Stride supplied.
        row_bytes: usize,
        /// Minimum stride.
        min: usize,
    },
    /// An encoder was requested for a format without a codec.
    #[error("no codec for {0:?}")]
    UnsupportedFormat(ImageFormat),
    /// Encoded input was empty.
    #[error("encoded input is empty")]
    EmptyInput,
    /// PNG decoding failed before any pixel data was produced.
    #[error("png decode: {0}")]
    Decode(#[from] png::DecodingError),
    /// Decoded pixels came out in a layout that cannot be expanded to RGBA8.
    #[error("unsupported decoded pixel layout")]
    PixelLayout,
    /// PNG encoding failed.
    #[error("png encode: {0}")]
    Encode(#[from] png::EncodingError),
    /// A geometry or paint value was invalid.
    #[error(transparent)]
    Imaging(#[from] ImagingError),
    /// The GPU device failed.
    #[error(transparent)]
    Gpu(#[from] GpuError),
    /// A GPU surface was requested but no context could be created.
    #[error("gpu context is unavailable")]
    GpuUnavailable,
}
