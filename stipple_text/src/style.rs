// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text and paragraph style descriptors.

use stipple_imaging::{Argb, TextAlign, TextDirection};

/// Style applied to a run of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Fill color of the glyphs.
    pub color: Argb,
    /// Font size in pixels per em.
    pub font_size: f32,
    /// Family names to try, in order, before any other loaded face.
    pub families: Vec<String>,
    /// Extra advance added after every character.
    pub letter_spacing: f32,
    /// Extra advance added after every space.
    pub word_spacing: f32,
    /// Line height as a multiple of the font size. Zero uses the font's own
    /// ascent and descent.
    pub height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Argb::BLACK,
            font_size: Self::DEFAULT_FONT_SIZE,
            families: Vec::new(),
            letter_spacing: 0.0,
            word_spacing: 0.0,
            height: 0.0,
        }
    }
}

impl TextStyle {
    /// Font size used by [`TextStyle::default`].
    pub const DEFAULT_FONT_SIZE: f32 = 14.0;

    /// A copy of this style with a different size and color.
    pub fn with_size_and_color(&self, font_size: f32, color: Argb) -> Self {
        Self {
            font_size,
            color,
            ..self.clone()
        }
    }
}

/// Style of a whole paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphStyle {
    /// Style of text added before any push.
    pub text_style: TextStyle,
    /// Horizontal alignment of each line.
    pub align: TextAlign,
    /// Base direction, which resolves `Start` and `End` alignment.
    pub direction: TextDirection,
    /// Maximum number of lines; zero means unlimited.
    pub max_lines: usize,
    /// Marker that replaces the overflow of the last visible line.
    pub ellipsis: Option<String>,
}

impl ParagraphStyle {
    /// Whether layout truncates at [`max_lines`](Self::max_lines).
    pub fn is_line_limited(&self) -> bool {
        self.max_lines > 0
    }

    pub(crate) fn resolved_align(&self) -> TextAlign {
        match (self.align, self.direction) {
            (TextAlign::Start, TextDirection::Ltr) | (TextAlign::End, TextDirection::Rtl) => {
                TextAlign::Left
            }
            (TextAlign::Start, TextDirection::Rtl) | (TextAlign::End, TextDirection::Ltr) => {
                TextAlign::Right
            }
            (align, _) => align,
        }
    }
}
