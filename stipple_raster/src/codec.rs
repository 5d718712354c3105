// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PNG encoding and tolerant, eager PNG decoding.

use png::{
    AdaptiveFilterType, BitDepth, ColorType, Compression, Decoder, Encoder, FilterType,
    Transformations,
};

use crate::RasterError;
use crate::image::{checked_len, reserve_pixels};

/// Decoded, unpremultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DecodedPng {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba: Vec<u8>,
    /// Whether the stream ended before every row was produced.
    pub(crate) truncated: bool,
}

/// Encode tightly packed, unpremultiplied RGBA8 pixels.
///
/// Filtering and adaptive filter selection are disabled so identical input
/// always produces identical bytes.
pub(crate) fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, RasterError> {
    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(Compression::Default);
    encoder.set_filter(FilterType::NoFilter);
    encoder.set_adaptive_filter(AdaptiveFilterType::NonAdaptive);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    writer.finish()?;
    Ok(out)
}

/// Decode a PNG stream into unpremultiplied RGBA8.
///
/// Palette, grayscale, 16-bit, and tRNS inputs are expanded. A stream that
/// ends early yields the rows decoded so far; the rest stay transparent.
/// Only empty input or a malformed signature or header fails.
pub(crate) fn decode_png(bytes: &[u8]) -> Result<DecodedPng, RasterError> {
    if bytes.is_empty() {
        return Err(RasterError::EmptyInput);
    }
    let mut decoder = Decoder::new(bytes);
    decoder.set_transformations(
        Transformations::EXPAND | Transformations::STRIP_16 | Transformations::ALPHA,
    );
    let mut reader = decoder.read_info()?;
    let (width, height) = reader.info().size();
    checked_len(width, height)?;
    let (color, depth) = reader.output_color_type();
    let size = reader.output_buffer_size();
    let mut buf = reserve_pixels(size)?;
    buf.resize(size, 0);
    let truncated = match reader.next_frame(&mut buf) {
        Ok(_) => false,
        Err(err) => {
            log::warn!("png stream incomplete, keeping partial pixels: {err}");
            true
        }
    };
    let rgba = match (color, depth) {
        (ColorType::Rgba, BitDepth::Eight) => buf,
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => buf
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        (ColorType::Rgb, BitDepth::Eight) => buf
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 0xFF])
            .collect(),
        (ColorType::Grayscale, BitDepth::Eight) => {
            buf.iter().flat_map(|&g| [g, g, g, 0xFF]).collect()
        }
        (color, depth) => {
            log::warn!("unexpected png output layout {color:?}/{depth:?}");
            return Err(RasterError::PixelLayout);
        }
    };
    Ok(DecodedPng {
        width,
        height,
        rgba,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| {
                if i % 2 == 0 {
                    [255, 0, 0, 255]
                } else {
                    [0, 0, 255, 128]
                }
            })
            .collect()
    }

    #[test]
    fn encoding_is_deterministic() {
        let pixels = checker(5, 3);
        let a = encode_png(5, 3, &pixels).expect("encodes");
        let b = encode_png(5, 3, &pixels).expect("encodes");
        assert_eq!(a, b);
        let decoded = decode_png(&a).expect("decodes");
        assert_eq!((decoded.width, decoded.height), (5, 3));
        assert_eq!(decoded.rgba, pixels);
        assert!(!decoded.truncated);
    }

    #[test]
    fn truncated_stream_keeps_header_size() {
        let _ = env_logger::builder().is_test(true).try_init();
        let pixels = checker(16, 16);
        let encoded = encode_png(16, 16, &pixels).expect("encodes");
        // Cut inside the image data, well past the header.
        let cut = &encoded[..encoded.len() - 20];
        let decoded = decode_png(cut).expect("partial data is accepted");
        assert_eq!((decoded.width, decoded.height), (16, 16));
        assert_eq!(decoded.rgba.len(), 16 * 16 * 4);
    }

    #[test]
    fn malformed_input_fails() {
        assert!(matches!(decode_png(&[]), Err(RasterError::EmptyInput)));
        assert!(decode_png(b"definitely not a png").is_err());
        let encoded = encode_png(1, 1, &[0, 0, 0, 0]).expect("encodes");
        // Signature plus half of the header chunk.
        assert!(decode_png(&encoded[..20]).is_err());
    }
}
