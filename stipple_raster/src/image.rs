// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable premultiplied raster images.

use std::borrow::Cow;

use peniko::Blob;
use stipple_imaging::{ImageFormat, premultiply, unpremultiply};

use crate::RasterError;
use crate::codec::{decode_png, encode_png};
use crate::pixels::{BYTES_PER_PIXEL, ReadRect, copy_rect};

/// Largest pixel count of a surface or image, such as 8192 by 8192.
pub const MAX_PIXELS: u64 = 1 << 26;

/// Check `1 <= width, height <= 65535` and the [`MAX_PIXELS`] cap, and
/// return the tight buffer length.
pub(crate) fn checked_len(width: u32, height: u32) -> Result<usize, RasterError> {
    let valid = |v: u32| (1..=u32::from(u16::MAX)).contains(&v);
    if !valid(width) || !valid(height) {
        return Err(RasterError::InvalidDimensions { width, height });
    }
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_PIXELS {
        return Err(RasterError::TooLarge { width, height });
    }
    let pixels =
        usize::try_from(pixels).map_err(|_| RasterError::TooLarge { width, height })?;
    Ok(pixels * BYTES_PER_PIXEL)
}

/// An empty buffer with room for `len` bytes.
pub(crate) fn reserve_pixels(len: usize) -> Result<Vec<u8>, RasterError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| RasterError::OutOfMemory { bytes: len })?;
    Ok(buf)
}

/// Encode premultiplied RGBA8 pixels.
///
/// Fully opaque pixels are handed to the encoder as they are; anything else
/// is un-premultiplied into a fresh buffer first.
pub(crate) fn encode_premul(
    width: u32,
    height: u32,
    premul: &[u8],
    format: ImageFormat,
) -> Result<Vec<u8>, RasterError> {
    if format != ImageFormat::Png {
        return Err(RasterError::UnsupportedFormat(format));
    }
    let opaque = premul.chunks_exact(BYTES_PER_PIXEL).all(|p| p[3] == 0xFF);
    let rgba: Cow<'_, [u8]> = if opaque {
        Cow::Borrowed(premul)
    } else {
        Cow::Owned(
            premul
                .chunks_exact(BYTES_PER_PIXEL)
                .flat_map(|p| unpremultiply([p[0], p[1], p[2], p[3]]))
                .collect(),
        )
    };
    encode_png(width, height, &rgba)
}

/// An immutable image holding premultiplied RGBA8 pixels.
///
/// Pixels live in a reference-counted blob, so clones are cheap and share
/// storage.
#[derive(Clone)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Blob<u8>,
    opaque: bool,
}

impl core::fmt::Debug for Image {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opaque", &self.opaque)
            .finish_non_exhaustive()
    }
}

impl Image {
    /// Wrap premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, RasterError> {
        let expected = checked_len(width, height)?;
        if pixels.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        let opaque = pixels.chunks_exact(BYTES_PER_PIXEL).all(|p| p[3] == 0xFF);
        Ok(Self {
            width,
            height,
            pixels: Blob::from(pixels),
            opaque,
        })
    }

    /// Premultiply and wrap unpremultiplied RGBA8 pixels.
    pub fn from_rgba8_unpremul(
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self, RasterError> {
        let expected = checked_len(width, height)?;
        if pixels.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        let mut premul = reserve_pixels(expected)?;
        premul.extend(
            pixels
                .chunks_exact(BYTES_PER_PIXEL)
                .flat_map(|p| premultiply([p[0], p[1], p[2], p[3]])),
        );
        Self::from_premul_rgba8(width, height, premul)
    }

    /// Eagerly decode an encoded image.
    ///
    /// Truncated streams produce the pixels decoded before the cut.
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let decoded = decode_png(bytes)?;
        log::debug!(
            "decoded {}x{} png{}",
            decoded.width,
            decoded.height,
            if decoded.truncated { " (truncated)" } else { "" }
        );
        Self::from_rgba8_unpremul(decoded.width, decoded.height, &decoded.rgba)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether every pixel has full alpha.
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    /// Tightly packed premultiplied RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.data()
    }

    pub(crate) fn blob(&self) -> &Blob<u8> {
        &self.pixels
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (usize::try_from(y).ok()? * usize::try_from(self.width).ok()?
            + usize::try_from(x).ok()?)
            * BYTES_PER_PIXEL;
        let p = self.pixels().get(i..i + BYTES_PER_PIXEL)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Copy a region into a new image.
    pub fn subset(&self, x: i32, y: i32, width: u32, height: u32) -> Result<Self, RasterError> {
        let rect = ReadRect::new(x, y, width, height, self.width, self.height)?;
        let stride = rect.width * BYTES_PER_PIXEL;
        let mut out = reserve_pixels(stride * rect.height)?;
        out.resize(stride * rect.height, 0);
        copy_rect(self.pixels(), self.stride_pixels(), rect, &mut out, stride)?;
        Self::from_premul_rgba8(width, height, out)
    }

    /// Copy a region as premultiplied RGBA8 into `dst` with stride
    /// `row_bytes`.
    pub fn read_pixels_rgba8888(
        &self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        dst: &mut [u8],
        row_bytes: usize,
    ) -> Result<(), RasterError> {
        let rect = ReadRect::new(x, y, width, height, self.width, self.height)?;
        copy_rect(self.pixels(), self.stride_pixels(), rect, dst, row_bytes)
    }

    /// Encode the image.
    ///
    /// Only [`ImageFormat::Png`] has a codec.
    pub fn encode(&self, format: ImageFormat) -> Result<Vec<u8>, RasterError> {
        encode_premul(self.width, self.height, self.pixels(), format)
    }

    fn stride_pixels(&self) -> usize {
        // Dimensions were validated against `u16::MAX` at construction.
        usize::from(u16::try_from(self.width).unwrap_or(u16::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_are_validated() {
        assert!(matches!(
            Image::from_premul_rgba8(0, 1, Vec::new()),
            Err(RasterError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Image::from_premul_rgba8(2, 2, vec![0; 15]),
            Err(RasterError::BufferSize {
                expected: 16,
                actual: 15
            })
        ));
        assert!(Image::from_premul_rgba8(70_000, 1, Vec::new()).is_err());
    }

    #[test]
    fn pixel_count_is_capped() {
        assert_eq!(checked_len(8192, 8192).ok(), Some(8192 * 8192 * 4));
        assert!(matches!(
            Image::from_rgba8_unpremul(65_535, 65_535, &[]),
            Err(RasterError::TooLarge { .. })
        ));
        assert!(matches!(
            reserve_pixels(usize::MAX),
            Err(RasterError::OutOfMemory { bytes: usize::MAX })
        ));
    }

    #[test]
    fn unpremul_input_is_premultiplied() {
        let image = Image::from_rgba8_unpremul(1, 1, &[255, 255, 255, 128]).expect("valid");
        assert_eq!(image.pixel(0, 0), Some([128, 128, 128, 128]));
        assert!(!image.is_opaque());
    }

    #[test]
    fn subset_copies_region() {
        let pixels: Vec<u8> = (0..16_u8).flat_map(|i| [i, i, i, 255]).collect();
        let image = Image::from_premul_rgba8(4, 4, pixels).expect("valid");
        let sub = image.subset(1, 2, 2, 1).expect("inside");
        assert_eq!((sub.width(), sub.height()), (2, 1));
        assert_eq!(sub.pixel(0, 0), Some([9, 9, 9, 255]));
        assert_eq!(sub.pixel(1, 0), Some([10, 10, 10, 255]));
        assert!(image.subset(3, 3, 2, 2).is_err());
    }

    #[test]
    fn png_round_trip_matches_within_rounding() {
        let image = Image::from_rgba8_unpremul(3, 2, &[40, 80, 120, 200].repeat(6)).expect("valid");
        let encoded = image.encode(ImageFormat::Png).expect("encodes");
        let decoded = Image::decode(&encoded).expect("decodes");
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        for (a, b) in image.pixels().iter().zip(decoded.pixels()) {
            assert!(a.abs_diff(*b) <= 1, "{a} vs {b}");
        }
    }

    #[test]
    fn other_formats_have_no_codec() {
        let image = Image::from_premul_rgba8(1, 1, vec![0, 0, 0, 255]).expect("valid");
        assert!(matches!(
            image.encode(ImageFormat::Webp),
            Err(RasterError::UnsupportedFormat(ImageFormat::Webp))
        ));
    }
}
