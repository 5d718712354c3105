// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution of styled characters to glyphs, advances, and vertical extents.

use hashbrown::HashMap;
use skrifa::charmap::Charmap;
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::{GlyphId, MetadataProvider};
use stipple_imaging::Argb;

use crate::{FontManager, TextStyle};

/// Advance of a character no face covers, as a fraction of the font size.
pub(crate) const PLACEHOLDER_ADVANCE: f32 = 0.5;
/// Ascent of a character no face covers, as a fraction of the font size.
pub(crate) const PLACEHOLDER_ASCENT: f32 = 0.8;
/// Descent of a character no face covers, as a fraction of the font size.
pub(crate) const PLACEHOLDER_DESCENT: f32 = 0.2;

/// One shaped character.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Cluster {
    /// Byte offset of the character in the paragraph text.
    pub(crate) byte: usize,
    pub(crate) color: Argb,
    pub(crate) size: f32,
    /// Face slot in the font manager and glyph, or `None` for a placeholder.
    pub(crate) glyph: Option<(usize, GlyphId)>,
    pub(crate) advance: f32,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) whitespace: bool,
}

impl Cluster {
    pub(crate) fn placeholder(byte: usize, style: &TextStyle) -> Self {
        let size = style.font_size;
        Self {
            byte,
            color: style.color,
            size,
            glyph: None,
            advance: PLACEHOLDER_ADVANCE * size,
            ascent: PLACEHOLDER_ASCENT * size,
            descent: PLACEHOLDER_DESCENT * size,
            whitespace: false,
        }
    }
}

struct ScaledFace<'a> {
    glyphs: GlyphMetrics<'a>,
    ascent: f32,
    descent: f32,
}

/// Per-pass caches of character maps and sized metrics.
pub(crate) struct Shaper<'a> {
    fonts: &'a FontManager,
    charmaps: HashMap<usize, Charmap<'a>>,
    scaled: HashMap<(usize, u32), ScaledFace<'a>>,
}

impl<'a> Shaper<'a> {
    pub(crate) fn new(fonts: &'a FontManager) -> Self {
        Self {
            fonts,
            charmaps: HashMap::new(),
            scaled: HashMap::new(),
        }
    }

    /// Shape every character of `text`, with byte offsets starting at `base`.
    pub(crate) fn shape_str(&mut self, style: &TextStyle, base: usize, text: &str) -> Vec<Cluster> {
        text.char_indices()
            .map(|(i, ch)| self.shape_char(style, base + i, ch))
            .collect()
    }

    pub(crate) fn shape_char(&mut self, style: &TextStyle, byte: usize, ch: char) -> Cluster {
        let size = style.font_size;
        let mut cluster = Cluster::placeholder(byte, style);
        cluster.whitespace = ch.is_whitespace();
        if ch == '\n' {
            cluster.advance = 0.0;
            if let Some(slot) = self.primary_face(&style.families)
                && let Some(face) = self.scaled(slot, size)
            {
                cluster.ascent = face.ascent;
                cluster.descent = face.descent;
            }
        } else {
            if let Some((slot, glyph)) = self.resolve(&style.families, ch)
                && let Some(face) = self.scaled(slot, size)
            {
                cluster.glyph = Some((slot, glyph));
                cluster.advance = face.glyphs.advance_width(glyph).unwrap_or(0.0);
                cluster.ascent = face.ascent;
                cluster.descent = face.descent;
            }
            cluster.advance += style.letter_spacing;
            if cluster.whitespace {
                cluster.advance += style.word_spacing;
            }
        }
        if style.height > 0.0 {
            let natural = cluster.ascent + cluster.descent;
            if natural > 0.0 {
                let k = style.height * size / natural;
                cluster.ascent *= k;
                cluster.descent *= k;
            }
        }
        cluster
    }

    fn primary_face(&self, families: &[String]) -> Option<usize> {
        self.fonts
            .preferred_faces(families)
            .next()
            .or_else(|| (!self.fonts.typefaces().is_empty()).then_some(0))
    }

    fn resolve(&mut self, families: &[String], ch: char) -> Option<(usize, GlyphId)> {
        let fonts = self.fonts;
        fonts
            .preferred_faces(families)
            .chain(0..fonts.typefaces().len())
            .find_map(|slot| {
                self.charmap(slot)
                    .and_then(|charmap| charmap.map(ch))
                    .filter(|glyph| *glyph != GlyphId::NOTDEF)
                    .map(|glyph| (slot, glyph))
            })
    }

    fn charmap(&mut self, slot: usize) -> Option<&Charmap<'a>> {
        let fonts = self.fonts;
        if !self.charmaps.contains_key(&slot) {
            let font = fonts.face(slot)?.font_ref()?;
            self.charmaps.insert(slot, font.charmap());
        }
        self.charmaps.get(&slot)
    }

    fn scaled(&mut self, slot: usize, size: f32) -> Option<&ScaledFace<'a>> {
        let fonts = self.fonts;
        let key = (slot, size.to_bits());
        if !self.scaled.contains_key(&key) {
            let font = fonts.face(slot)?.font_ref()?;
            let px = Size::new(size);
            let metrics = font.metrics(px, LocationRef::default());
            self.scaled.insert(
                key,
                ScaledFace {
                    glyphs: font.glyph_metrics(px, LocationRef::default()),
                    ascent: metrics.ascent,
                    descent: -metrics.descent,
                },
            );
        }
        self.scaled.get(&key)
    }
}
