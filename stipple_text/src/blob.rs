// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable runs of positioned glyphs.

use std::sync::Arc;

use skrifa::instance::{LocationRef, Size};
use skrifa::{GlyphId, MetadataProvider};
use stipple_imaging::{Path, PathBuilder, TextEncoding};

use crate::outline::{GlyphPlacement, append_glyph};
use crate::{Font, TextError, Typeface};

/// One glyph of a run, positioned relative to the run origin on the baseline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the run's typeface.
    pub id: GlyphId,
    /// Horizontal offset of the glyph origin.
    pub x: f32,
    /// Vertical offset of the glyph origin.
    pub y: f32,
}

/// A single horizontal run of glyphs from one typeface.
#[derive(Clone, Debug)]
pub struct TextBlob {
    typeface: Arc<Typeface>,
    size: f32,
    scale_x: f32,
    skew_x: f32,
    glyphs: Vec<PositionedGlyph>,
    advance: f32,
}

impl TextBlob {
    /// Map `bytes` through the font's character map and lay the glyphs out
    /// left to right using their advances.
    ///
    /// Characters the typeface does not cover map to its missing-glyph box.
    pub fn from_text(bytes: &[u8], encoding: TextEncoding, font: &Font) -> Result<Self, TextError> {
        if bytes.is_empty() {
            return Err(TextError::EmptyText);
        }
        let typeface = font.typeface().ok_or(TextError::MissingTypeface)?;
        let font_ref = typeface.font_ref().ok_or(TextError::MissingTypeface)?;
        let ids = match encoding {
            TextEncoding::GlyphId => decode_glyph_ids(bytes)?,
            _ => {
                let charmap = font_ref.charmap();
                decode_chars(bytes, encoding)?
                    .into_iter()
                    .map(|ch| charmap.map(ch).unwrap_or(GlyphId::NOTDEF))
                    .collect()
            }
        };
        let metrics = font_ref.glyph_metrics(Size::new(font.size()), LocationRef::default());
        let mut x = 0.0;
        let glyphs = ids
            .into_iter()
            .map(|id| {
                let glyph = PositionedGlyph { id, x, y: 0.0 };
                x += metrics.advance_width(id).unwrap_or(0.0) * font.scale_x();
                glyph
            })
            .collect();
        Ok(Self {
            typeface: Arc::clone(typeface),
            size: font.size(),
            scale_x: font.scale_x(),
            skew_x: font.skew_x(),
            glyphs,
            advance: x,
        })
    }

    /// The typeface every glyph comes from.
    pub fn typeface(&self) -> &Arc<Typeface> {
        &self.typeface
    }

    /// Font size in pixels per em.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// The positioned glyphs, in logical order.
    pub fn glyphs(&self) -> &[PositionedGlyph] {
        &self.glyphs
    }

    /// Total advance of the run.
    pub fn advance(&self) -> f32 {
        self.advance
    }

    /// Glyph outlines with the run origin at `(x, y)`.
    pub fn to_path(&self, x: f32, y: f32) -> Path {
        let mut builder = PathBuilder::new();
        if let Some(font) = self.typeface.font_ref() {
            let outlines = font.outline_glyphs();
            for glyph in &self.glyphs {
                let placement = GlyphPlacement {
                    x: x + glyph.x,
                    y: y + glyph.y,
                    scale_x: self.scale_x,
                    skew_x: self.skew_x,
                };
                append_glyph(&outlines, glyph.id, self.size, placement, &mut builder);
            }
        }
        builder.detach()
    }
}

fn decode_chars(bytes: &[u8], encoding: TextEncoding) -> Result<Vec<char>, TextError> {
    let invalid = || TextError::InvalidEncoding(encoding);
    match encoding {
        TextEncoding::Utf8 => Ok(core::str::from_utf8(bytes)
            .map_err(|_| invalid())?
            .chars()
            .collect()),
        TextEncoding::Utf16 => {
            if bytes.len() % 2 != 0 {
                return Err(invalid());
            }
            let units = bytes
                .chunks_exact(2)
                .map(|unit| u16::from_ne_bytes([unit[0], unit[1]]));
            char::decode_utf16(units)
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())
        }
        TextEncoding::Utf32 => {
            if bytes.len() % 4 != 0 {
                return Err(invalid());
            }
            bytes
                .chunks_exact(4)
                .map(|unit| {
                    char::from_u32(u32::from_ne_bytes([unit[0], unit[1], unit[2], unit[3]]))
                        .ok_or_else(invalid)
                })
                .collect()
        }
        TextEncoding::GlyphId => Err(invalid()),
    }
}

fn decode_glyph_ids(bytes: &[u8]) -> Result<Vec<GlyphId>, TextError> {
    if bytes.len() % 2 != 0 {
        return Err(TextError::InvalidEncoding(TextEncoding::GlyphId));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|unit| GlyphId::new(u32::from(u16::from_ne_bytes([unit[0], unit[1]]))))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSans.ttf");

    fn font(size: f32) -> Font {
        let face = Typeface::from_bytes(DEJAVU, 0).expect("valid font");
        Font::new(Some(Arc::new(face)), size)
    }

    #[test]
    fn glyphs_advance_left_to_right() {
        let blob = TextBlob::from_text(b"Hi!", TextEncoding::Utf8, &font(16.0)).expect("blob");
        let xs: Vec<f32> = blob.glyphs().iter().map(|g| g.x).collect();
        assert_eq!(xs.len(), 3);
        assert_eq!(xs[0], 0.0);
        assert!(xs[0] < xs[1] && xs[1] < xs[2], "strictly increasing: {xs:?}");
        assert!(blob.advance() > xs[2], "run ends after its last glyph");
    }

    #[test]
    fn encodings_agree() {
        let text = "Ab";
        let utf16: Vec<u8> = text.encode_utf16().flat_map(u16::to_ne_bytes).collect();
        let utf32: Vec<u8> = text.chars().flat_map(|c| u32::from(c).to_ne_bytes()).collect();
        let f = font(12.0);
        let a = TextBlob::from_text(text.as_bytes(), TextEncoding::Utf8, &f).expect("utf8");
        let b = TextBlob::from_text(&utf16, TextEncoding::Utf16, &f).expect("utf16");
        let c = TextBlob::from_text(&utf32, TextEncoding::Utf32, &f).expect("utf32");
        assert_eq!(a.glyphs(), b.glyphs());
        assert_eq!(a.glyphs(), c.glyphs());
    }

    #[test]
    fn glyph_ids_pass_through() {
        let ids: Vec<u8> = [36_u16, 37].iter().flat_map(|id| id.to_ne_bytes()).collect();
        let blob = TextBlob::from_text(&ids, TextEncoding::GlyphId, &font(12.0)).expect("blob");
        let got: Vec<u32> = blob.glyphs().iter().map(|g| g.id.to_u32()).collect();
        assert_eq!(got, [36, 37]);
    }

    #[test]
    fn rejects_degenerate_input() {
        let f = font(12.0);
        assert!(matches!(
            TextBlob::from_text(b"", TextEncoding::Utf8, &f),
            Err(TextError::EmptyText)
        ));
        assert!(matches!(
            TextBlob::from_text(&[0xFF, 0xFE], TextEncoding::Utf8, &f),
            Err(TextError::InvalidEncoding(TextEncoding::Utf8))
        ));
        assert!(matches!(
            TextBlob::from_text(b"abc", TextEncoding::Utf16, &f),
            Err(TextError::InvalidEncoding(TextEncoding::Utf16))
        ));
        assert!(matches!(
            TextBlob::from_text(b"a", TextEncoding::Utf8, &Font::default()),
            Err(TextError::MissingTypeface)
        ));
    }

    #[test]
    fn path_is_offset_by_origin() {
        let blob = TextBlob::from_text(b"H", TextEncoding::Utf8, &font(20.0)).expect("blob");
        let bounds = blob.to_path(100.0, 50.0).bounds().expect("H has ink");
        assert!(bounds.x0 >= 100.0 && bounds.y1 <= 50.5, "{bounds:?}");
    }
}
