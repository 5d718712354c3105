// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parsed font faces and sized fonts.

use std::fmt;
use std::sync::Arc;

use peniko::{Blob, FontData};
use skrifa::attribute::Style;
use skrifa::instance::{LocationRef, Size};
use skrifa::string::StringId;
use skrifa::{FontRef, GlyphId, MetadataProvider};

use crate::TextError;

/// One face of a font program.
///
/// The font bytes are shared, so cloning a typeface or pulling several faces
/// out of one collection never copies the program.
#[derive(Clone)]
pub struct Typeface {
    data: FontData,
    family: String,
    weight: f32,
    italic: bool,
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("family", &self.family)
            .field("index", &self.data.index)
            .field("weight", &self.weight)
            .field("italic", &self.italic)
            .finish_non_exhaustive()
    }
}

impl Typeface {
    /// Parse face `index` of a font program or collection.
    pub fn from_data(data: FontData) -> Result<Self, TextError> {
        let font = FontRef::from_index(data.data.as_ref(), data.index)?;
        let family = font
            .localized_strings(StringId::FAMILY_NAME)
            .english_or_first()
            .map(|name| name.to_string())
            .unwrap_or_default();
        let attributes = font.attributes();
        let weight = attributes.weight.value();
        let italic = !matches!(attributes.style, Style::Normal);
        Ok(Self {
            data,
            family,
            weight,
            italic,
        })
    }

    /// Copy `bytes` and parse face `index` from them.
    pub fn from_bytes(bytes: &[u8], index: u32) -> Result<Self, TextError> {
        Self::from_data(FontData::new(Blob::from(bytes.to_vec()), index))
    }

    /// Family name from the naming table, or empty when the font has none.
    pub fn family_name(&self) -> &str {
        &self.family
    }

    /// Weight class, typically 100 to 900.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Whether the face is italic or oblique.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// The shared font program and face index.
    pub fn data(&self) -> &FontData {
        &self.data
    }

    pub(crate) fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.data.data.as_ref(), self.data.index).ok()
    }

    /// Nominal glyph for `ch`, or `None` when the face does not cover it.
    pub fn glyph_for_char(&self, ch: char) -> Option<GlyphId> {
        self.font_ref()?
            .charmap()
            .map(ch)
            .filter(|glyph| *glyph != GlyphId::NOTDEF)
    }

    /// Advance width of `glyph` at `size` pixels per em.
    pub fn advance(&self, glyph: GlyphId, size: f32) -> f32 {
        self.font_ref()
            .and_then(|font| {
                font.glyph_metrics(Size::new(size), LocationRef::default())
                    .advance_width(glyph)
            })
            .unwrap_or(0.0)
    }
}

/// How glyph edges are rasterized. Recorded for fidelity; glyphs are always
/// drawn anti-aliased.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FontEdging {
    /// Hard pixel edges.
    Alias = 0,
    /// Gray-scale coverage.
    #[default]
    AntiAlias = 1,
    /// Per-channel coverage.
    SubpixelAntiAlias = 2,
}

impl FontEdging {
    /// Numeric code of this mode.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Mode for a numeric code.
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Alias),
            1 => Some(Self::AntiAlias),
            2 => Some(Self::SubpixelAntiAlias),
            _ => None,
        }
    }
}

/// A typeface at a size, with horizontal scale and skew.
#[derive(Clone, Debug)]
pub struct Font {
    typeface: Option<Arc<Typeface>>,
    size: f32,
    scale_x: f32,
    skew_x: f32,
    edging: FontEdging,
}

impl Default for Font {
    fn default() -> Self {
        Self::new(None, Self::DEFAULT_SIZE)
    }
}

impl Font {
    /// Size used by [`Font::default`].
    pub const DEFAULT_SIZE: f32 = 12.0;

    /// A font using `typeface` at `size` pixels per em.
    pub fn new(typeface: Option<Arc<Typeface>>, size: f32) -> Self {
        Self {
            typeface,
            size,
            scale_x: 1.0,
            skew_x: 0.0,
            edging: FontEdging::default(),
        }
    }

    /// The typeface, if any.
    pub fn typeface(&self) -> Option<&Arc<Typeface>> {
        self.typeface.as_ref()
    }

    /// Replace the typeface. The font holds its own reference.
    pub fn set_typeface(&mut self, typeface: Option<Arc<Typeface>>) {
        self.typeface = typeface;
    }

    /// Size in pixels per em.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Set the size. Negative and non-finite sizes are rejected.
    pub fn set_size(&mut self, size: f32) -> Result<(), TextError> {
        if !size.is_finite() || size < 0.0 {
            return Err(TextError::InvalidFontSize(size));
        }
        self.size = size;
        Ok(())
    }

    /// Horizontal scale applied to glyphs and advances.
    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    /// Set the horizontal scale.
    pub fn set_scale_x(&mut self, scale_x: f32) {
        self.scale_x = scale_x;
    }

    /// Horizontal skew applied to glyph outlines.
    pub fn skew_x(&self) -> f32 {
        self.skew_x
    }

    /// Set the horizontal skew.
    pub fn set_skew_x(&mut self, skew_x: f32) {
        self.skew_x = skew_x;
    }

    /// Edge rasterization mode.
    pub fn edging(&self) -> FontEdging {
        self.edging
    }

    /// Set the edge rasterization mode.
    pub fn set_edging(&mut self, edging: FontEdging) {
        self.edging = edging;
    }
}
