// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized RGBA8 read-back shared by surfaces and images.

use crate::RasterError;

/// Bytes per RGBA8 pixel.
pub(crate) const BYTES_PER_PIXEL: usize = 4;

/// A validated sub-rectangle of a pixel buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReadRect {
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl ReadRect {
    /// Check that `(x, y, width, height)` is non-empty and lies inside a
    /// `src_width` by `src_height` buffer.
    pub(crate) fn new(
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        src_width: u32,
        src_height: u32,
    ) -> Result<Self, RasterError> {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return Err(RasterError::ReadOutOfBounds);
        };
        let fits = |origin: u32, extent: u32, limit: u32| {
            extent > 0 && origin.checked_add(extent).is_some_and(|end| end <= limit)
        };
        if !fits(x, width, src_width) || !fits(y, height, src_height) {
            return Err(RasterError::ReadOutOfBounds);
        }
        let us = |v: u32| usize::try_from(v).map_err(|_| RasterError::ReadOutOfBounds);
        Ok(Self {
            x: us(x)?,
            y: us(y)?,
            width: us(width)?,
            height: us(height)?,
        })
    }
}

/// Copy `rect` out of a tightly packed premultiplied RGBA8 buffer of
/// `src_width` pixels per row into `dst` with stride `row_bytes`.
///
/// Nothing is written unless every check passes.
pub(crate) fn copy_rect(
    src: &[u8],
    src_width: usize,
    rect: ReadRect,
    dst: &mut [u8],
    row_bytes: usize,
) -> Result<(), RasterError> {
    let line = rect.width * BYTES_PER_PIXEL;
    if row_bytes < line {
        return Err(RasterError::RowBytes {
            row_bytes,
            min: line,
        });
    }
    let needed = row_bytes
        .checked_mul(rect.height - 1)
        .and_then(|n| n.checked_add(line))
        .ok_or(RasterError::RowBytes {
            row_bytes,
            min: line,
        })?;
    if dst.len() < needed {
        return Err(RasterError::BufferSize {
            expected: needed,
            actual: dst.len(),
        });
    }
    // Every offset below is bounded by `needed` or by the source length.
    let src_stride = src_width * BYTES_PER_PIXEL;
    for row in 0..rect.height {
        let start = (rect.y + row) * src_stride + rect.x * BYTES_PER_PIXEL;
        let out = row * row_bytes;
        dst[out..out + line].copy_from_slice(&src[start..start + line]);
    }
    Ok(())
}
