// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fonts, glyph runs, and paragraphs.

use std::sync::Arc;

use stipple_imaging::{Argb, TextAlign, TextDirection, TextEncoding};
use stipple_text::{
    Font, FontEdging, FontManager, ParagraphBuilder, ParagraphStyle, TextBlob, TextError,
    TextStyle, Typeface,
};

use super::{Kit, decode};
use crate::{Handle, KitError};

impl Kit {
    // Font management.

    /// A font manager over every face in `buffers`.
    ///
    /// No buffers gives an empty manager. A zero-length buffer is rejected;
    /// buffers that are not font programs are skipped.
    pub fn make_font_manager(&mut self, buffers: &[&[u8]]) -> Handle {
        self.call("FontMgr_FromData", |kit| {
            if buffers.iter().any(|b| b.is_empty()) {
                return Err(KitError::InvalidInput("font buffer is empty"));
            }
            let buffers = buffers.iter().map(|b| b.to_vec()).collect();
            let manager = FontManager::from_buffers(buffers);
            kit.font_managers.insert(Arc::new(manager))
        })
    }

    /// Number of distinct families.
    pub fn font_manager_count_families(&mut self, manager: Handle) -> usize {
        self.call("FontMgr_countFamilies", |kit| {
            Ok(kit.font_managers.get(manager)?.count_families())
        })
    }

    /// Name of family `index`.
    pub fn font_manager_family_name(&mut self, manager: Handle, index: usize) -> Option<String> {
        self.call("FontMgr_getFamilyName", |kit| {
            kit.font_managers
                .get(manager)?
                .family_name(index)
                .map(|name| Some(name.to_owned()))
                .ok_or(KitError::InvalidInput("family index out of range"))
        })
    }

    /// The face of a family closest to regular weight, as a typeface handle.
    pub fn font_manager_match_family(&mut self, manager: Handle, family: &str) -> Handle {
        self.call("FontMgr_matchFamilyStyle", |kit| {
            let face = kit
                .font_managers
                .get(manager)?
                .match_family(family)
                .map(Arc::clone)
                .ok_or(KitError::InvalidInput("no such family"))?;
            kit.typefaces.insert(face)
        })
    }

    /// A typeface from face `index` of a font program.
    pub fn make_typeface(&mut self, bytes: &[u8], index: u32) -> Handle {
        self.call("Typeface_MakeFreeTypeFaceFromData", |kit| {
            let face = Typeface::from_bytes(bytes, index)?;
            kit.typefaces.insert(Arc::new(face))
        })
    }

    /// The typeface's family name.
    pub fn typeface_family_name(&mut self, typeface: Handle) -> Option<String> {
        self.call("Typeface_getFamilyName", |kit| {
            Ok(Some(kit.typefaces.get(typeface)?.family_name().to_owned()))
        })
    }

    /// The typeface's weight class.
    pub fn typeface_weight(&mut self, typeface: Handle) -> f32 {
        self.call("Typeface_weight", |kit| Ok(kit.typefaces.get(typeface)?.weight()))
    }

    /// Whether the typeface is italic or oblique.
    pub fn typeface_is_italic(&mut self, typeface: Handle) -> bool {
        self.call("Typeface_isItalic", |kit| {
            Ok(kit.typefaces.get(typeface)?.is_italic())
        })
    }

    // Fonts.

    /// A font at `size`. A [`Handle::NULL`] typeface makes a font that can
    /// measure nothing until one is set.
    pub fn make_font(&mut self, typeface: Handle, size: f32) -> Handle {
        self.call("MakeFont", |kit| {
            let face = kit.optional_typeface(typeface)?;
            let mut font = Font::new(face, Font::DEFAULT_SIZE);
            font.set_size(size)?;
            kit.fonts.insert(font)
        })
    }

    /// Set the size in pixels per em.
    pub fn font_set_size(&mut self, font: Handle, size: f32) -> bool {
        self.call("Font_setSize", |kit| {
            kit.fonts.get_mut(font)?.set_size(size)?;
            Ok(true)
        })
    }

    /// Size in pixels per em.
    pub fn font_size(&mut self, font: Handle) -> f32 {
        self.call("Font_getSize", |kit| Ok(kit.fonts.get(font)?.size()))
    }

    /// Set the horizontal scale.
    pub fn font_set_scale_x(&mut self, font: Handle, scale_x: f32) -> bool {
        self.call("Font_setScaleX", |kit| {
            if !scale_x.is_finite() {
                return Err(KitError::InvalidInput("scale must be finite"));
            }
            kit.fonts.get_mut(font)?.set_scale_x(scale_x);
            Ok(true)
        })
    }

    /// Horizontal scale.
    pub fn font_scale_x(&mut self, font: Handle) -> f32 {
        self.call("Font_getScaleX", |kit| Ok(kit.fonts.get(font)?.scale_x()))
    }

    /// Set the horizontal skew.
    pub fn font_set_skew_x(&mut self, font: Handle, skew_x: f32) -> bool {
        self.call("Font_setSkewX", |kit| {
            if !skew_x.is_finite() {
                return Err(KitError::InvalidInput("skew must be finite"));
            }
            kit.fonts.get_mut(font)?.set_skew_x(skew_x);
            Ok(true)
        })
    }

    /// Horizontal skew.
    pub fn font_skew_x(&mut self, font: Handle) -> f32 {
        self.call("Font_getSkewX", |kit| Ok(kit.fonts.get(font)?.skew_x()))
    }

    /// Select the edging mode by code.
    pub fn font_set_edging(&mut self, font: Handle, code: u32) -> bool {
        self.call("Font_setEdging", |kit| {
            let edging = decode("font edging", code, FontEdging::from_code)?;
            kit.fonts.get_mut(font)?.set_edging(edging);
            Ok(true)
        })
    }

    /// The edging mode code.
    pub fn font_edging(&mut self, font: Handle) -> u32 {
        self.call("Font_getEdging", |kit| Ok(kit.fonts.get(font)?.edging().code()))
    }

    /// Replace the typeface; [`Handle::NULL`] clears it.
    pub fn font_set_typeface(&mut self, font: Handle, typeface: Handle) {
        self.call("Font_setTypeface", |kit| {
            let face = kit.optional_typeface(typeface)?;
            kit.fonts.get_mut(font)?.set_typeface(face);
            Ok(())
        });
    }

    // Glyph runs.

    /// Shape `bytes` in the given encoding into a single horizontal run.
    pub fn make_text_blob(&mut self, bytes: &[u8], encoding: u32, font: Handle) -> Handle {
        self.call("TextBlob_MakeFromText", |kit| {
            let encoding = decode("text encoding", encoding, TextEncoding::from_code)?;
            let blob = TextBlob::from_text(bytes, encoding, kit.fonts.get(font)?)?;
            kit.text_blobs.insert(Arc::new(blob))
        })
    }

    /// Total advance of a glyph run.
    pub fn text_blob_advance(&mut self, blob: Handle) -> f32 {
        self.call("TextBlob_advance", |kit| Ok(kit.text_blobs.get(blob)?.advance()))
    }

    /// Number of glyphs in a run.
    pub fn text_blob_glyph_count(&mut self, blob: Handle) -> usize {
        self.call("TextBlob_glyphCount", |kit| {
            Ok(kit.text_blobs.get(blob)?.glyphs().len())
        })
    }

    // Paragraph building.

    /// A paragraph builder over a font manager.
    ///
    /// The base style uses the manager's first family. `max_lines` of zero
    /// means unlimited.
    pub fn make_paragraph_builder(
        &mut self,
        font_manager: Handle,
        font_size: f32,
        color: u32,
        align: u32,
        direction: u32,
        max_lines: usize,
        ellipsis: Option<&str>,
    ) -> Handle {
        self.call("ParagraphBuilder_Make", |kit| {
            let align = decode("text align", align, TextAlign::from_code)?;
            let direction = decode("text direction", direction, TextDirection::from_code)?;
            font_size_checked(font_size)?;
            let fonts = Arc::clone(kit.font_managers.get(font_manager)?);
            let families = fonts.family_name(0).map(str::to_owned).into_iter().collect();
            let style = ParagraphStyle {
                text_style: TextStyle {
                    color: Argb(color),
                    font_size,
                    families,
                    ..TextStyle::default()
                },
                align,
                direction,
                max_lines,
                ellipsis: ellipsis.filter(|e| !e.is_empty()).map(str::to_owned),
            };
            kit.paragraph_builders
                .insert(ParagraphBuilder::new(style, fonts))
        })
    }

    /// Push a style that changes size and color and inherits everything
    /// else. Returns the nesting depth before the push.
    pub fn paragraph_builder_push_style(
        &mut self,
        builder: Handle,
        font_size: f32,
        color: u32,
    ) -> usize {
        self.call("ParagraphBuilder_pushStyle", |kit| {
            font_size_checked(font_size)?;
            let builder = kit.paragraph_builders.get_mut(builder)?;
            let style = builder
                .current_style()
                .with_size_and_color(font_size, Argb(color));
            Ok(builder.push_style(style))
        })
    }

    /// Push a fully specified style. A `None` family inherits the current
    /// family list.
    pub fn paragraph_builder_push_text_style(
        &mut self,
        builder: Handle,
        font_size: f32,
        color: u32,
        family: Option<&str>,
        letter_spacing: f32,
        word_spacing: f32,
        height: f32,
    ) -> usize {
        self.call("ParagraphBuilder_pushTextStyle", |kit| {
            font_size_checked(font_size)?;
            if ![letter_spacing, word_spacing, height]
                .iter()
                .all(|v| v.is_finite())
                || height < 0.0
            {
                return Err(KitError::InvalidInput("spacing and height must be finite"));
            }
            let builder = kit.paragraph_builders.get_mut(builder)?;
            let mut style = builder
                .current_style()
                .with_size_and_color(font_size, Argb(color));
            if let Some(family) = family {
                style.families = vec![family.to_owned()];
            }
            style.letter_spacing = letter_spacing;
            style.word_spacing = word_spacing;
            style.height = height;
            Ok(builder.push_style(style))
        })
    }

    /// Return to the style before the last push. Popping the base style
    /// does nothing.
    pub fn paragraph_builder_pop(&mut self, builder: Handle) {
        self.call("ParagraphBuilder_pop", |kit| {
            kit.paragraph_builders.get_mut(builder)?.pop();
            Ok(())
        });
    }

    /// Append UTF-8 text in the current style.
    ///
    /// Invalid UTF-8 and empty input return `false` and leave the builder
    /// unchanged.
    pub fn paragraph_builder_add_text(&mut self, builder: Handle, utf8: &[u8]) -> bool {
        self.call("ParagraphBuilder_addText", |kit| {
            let text = core::str::from_utf8(utf8)
                .map_err(|_| TextError::InvalidEncoding(TextEncoding::Utf8))?;
            kit.paragraph_builders.get_mut(builder)?.add_text(text)?;
            Ok(true)
        })
    }

    /// Freeze the builder into a paragraph, consuming the builder handle.
    /// A positive `width` lays the paragraph out right away.
    pub fn paragraph_builder_build(&mut self, builder: Handle, width: f32) -> Handle {
        self.call("ParagraphBuilder_build", |kit| {
            let builder = kit.paragraph_builders.consume(builder)?;
            kit.paragraphs.insert(builder.build(width))
        })
    }

    // Paragraphs.

    /// Lay the paragraph out at `width`.
    pub fn paragraph_layout(&mut self, paragraph: Handle, width: f32) -> bool {
        self.call("Paragraph_layout", |kit| {
            if width.is_nan() {
                return Err(KitError::InvalidInput("layout width is NaN"));
            }
            kit.paragraphs.get_mut(paragraph)?.layout(width);
            Ok(true)
        })
    }

    /// Total height of the laid-out lines.
    pub fn paragraph_height(&mut self, paragraph: Handle) -> f32 {
        self.call("Paragraph_getHeight", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.height())
        })
    }

    /// Width passed to the last layout.
    pub fn paragraph_max_width(&mut self, paragraph: Handle) -> f32 {
        self.call("Paragraph_getMaxWidth", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.max_width())
        })
    }

    /// Width of the widest unbreakable segment.
    pub fn paragraph_min_intrinsic_width(&mut self, paragraph: Handle) -> f32 {
        self.call("Paragraph_getMinIntrinsicWidth", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.min_intrinsic_width())
        })
    }

    /// Width of the widest line without soft wrapping.
    pub fn paragraph_max_intrinsic_width(&mut self, paragraph: Handle) -> f32 {
        self.call("Paragraph_getMaxIntrinsicWidth", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.max_intrinsic_width())
        })
    }

    /// Width of the widest laid-out line.
    pub fn paragraph_longest_line(&mut self, paragraph: Handle) -> f32 {
        self.call("Paragraph_getLongestLine", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.longest_line())
        })
    }

    /// Distance from the top to the first alphabetic baseline.
    pub fn paragraph_alphabetic_baseline(&mut self, paragraph: Handle) -> f32 {
        self.call("Paragraph_getAlphabeticBaseline", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.alphabetic_baseline())
        })
    }

    /// Distance from the top to the first ideographic baseline.
    pub fn paragraph_ideographic_baseline(&mut self, paragraph: Handle) -> f32 {
        self.call("Paragraph_getIdeographicBaseline", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.ideographic_baseline())
        })
    }

    /// Number of laid-out lines.
    pub fn paragraph_line_count(&mut self, paragraph: Handle) -> usize {
        self.call("Paragraph_lineNumber", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.line_count())
        })
    }

    /// Whether the last layout dropped lines past the line limit.
    pub fn paragraph_did_exceed_max_lines(&mut self, paragraph: Handle) -> bool {
        self.call("Paragraph_didExceedMaxLines", |kit| {
            Ok(kit.paragraphs.get(paragraph)?.did_exceed_max_lines())
        })
    }

    /// The visible text of line `index`, including any ellipsis.
    pub fn paragraph_line_text(&mut self, paragraph: Handle, index: usize) -> Option<String> {
        self.call("Paragraph_getLineText", |kit| {
            kit.paragraphs
                .get(paragraph)?
                .line_text(index)
                .map(Some)
                .ok_or(KitError::InvalidInput("line index out of range"))
        })
    }

    fn optional_typeface(&self, typeface: Handle) -> Result<Option<Arc<Typeface>>, KitError> {
        if typeface.is_null() {
            Ok(None)
        } else {
            Ok(Some(Arc::clone(self.typefaces.get(typeface)?)))
        }
    }
}

fn font_size_checked(size: f32) -> Result<(), KitError> {
    if size.is_finite() && size >= 0.0 {
        Ok(())
    } else {
        Err(TextError::InvalidFontSize(size).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../../../assets/fonts/dejavu/DejaVuSans.ttf");

    fn paragraph_kit() -> (Kit, Handle) {
        let mut kit = Kit::default();
        let manager = kit.make_font_manager(&[DEJAVU]);
        (kit, manager)
    }

    #[test]
    fn manager_reports_families() {
        let (mut kit, manager) = paragraph_kit();
        assert_eq!(kit.font_manager_count_families(manager), 1);
        assert_eq!(
            kit.font_manager_family_name(manager, 0).as_deref(),
            Some("DejaVu Sans")
        );
        assert_eq!(kit.font_manager_family_name(manager, 1), None);
        let face = kit.font_manager_match_family(manager, "dejavu sans");
        assert_eq!(kit.typeface_family_name(face).as_deref(), Some("DejaVu Sans"));
        assert!(!kit.typeface_is_italic(face), "upright");
        assert_eq!(kit.ref_count(face), 2, "shared with the manager");
    }

    #[test]
    fn empty_buffers_are_rejected_but_no_buffers_is_fine() {
        let mut kit = Kit::default();
        assert_eq!(kit.make_font_manager(&[&[][..]]), Handle::NULL);
        let empty = kit.make_font_manager(&[]);
        assert_eq!(kit.font_manager_count_families(empty), 0);
        let junk = kit.make_font_manager(&[&b"not a font"[..]]);
        assert_eq!(kit.font_manager_count_families(junk), 0);
    }

    #[test]
    fn blobs_need_a_typeface() {
        let mut kit = Kit::default();
        let bare = kit.make_font(Handle::NULL, 12.0);
        assert_eq!(kit.make_text_blob(b"hi", 0, bare), Handle::NULL);
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::Text(TextError::MissingTypeface))
        ));
        let face = kit.make_typeface(DEJAVU, 0);
        kit.font_set_typeface(bare, face);
        let blob = kit.make_text_blob(b"hi", 0, bare);
        assert_eq!(kit.text_blob_glyph_count(blob), 2);
        assert!(kit.text_blob_advance(blob) > 0.0, "advances");
        assert_eq!(kit.make_text_blob(b"hi", 7, bare), Handle::NULL, "bad encoding");
    }

    #[test]
    fn font_fields_validate() {
        let mut kit = Kit::default();
        assert_eq!(kit.make_font(Handle::NULL, -1.0), Handle::NULL);
        let font = kit.make_font(Handle::NULL, 20.0);
        assert_eq!(kit.font_size(font), 20.0);
        assert!(!kit.font_set_size(font, f32::NAN), "nan size");
        assert!(kit.font_set_scale_x(font, 1.5), "scale");
        assert_eq!(kit.font_scale_x(font), 1.5);
        assert!(kit.font_set_skew_x(font, -0.25), "skew");
        assert_eq!(kit.font_skew_x(font), -0.25);
        assert!(kit.font_set_edging(font, 2), "subpixel");
        assert_eq!(kit.font_edging(font), 2);
        assert!(!kit.font_set_edging(font, 3), "unknown edging");
    }

    #[test]
    fn builder_is_consumed_by_build() {
        let (mut kit, manager) = paragraph_kit();
        let builder = kit.make_paragraph_builder(manager, 16.0, 0xFF00_0000, 4, 1, 0, None);
        assert!(kit.paragraph_builder_add_text(builder, b"hello"), "text");
        assert!(!kit.paragraph_builder_add_text(builder, &[0xFF, 0xFE]), "invalid utf-8");
        assert!(!kit.paragraph_builder_add_text(builder, b""), "empty");
        let paragraph = kit.paragraph_builder_build(builder, 300.0);
        assert_eq!(kit.paragraph_line_count(paragraph), 1);
        assert_eq!(kit.paragraph_line_text(paragraph, 0).as_deref(), Some("hello"));
        assert!(!kit.paragraph_builder_add_text(builder, b"more"), "consumed");
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::Consumed(crate::Kind::ParagraphBuilder))
        ));
    }

    #[test]
    fn pushed_styles_nest() {
        let (mut kit, manager) = paragraph_kit();
        let builder = kit.make_paragraph_builder(manager, 10.0, 0xFF00_0000, 4, 1, 0, None);
        assert_eq!(kit.paragraph_builder_push_style(builder, 20.0, 0xFFFF_0000), 0);
        let depth = kit.paragraph_builder_push_text_style(
            builder,
            30.0,
            0xFF00_FF00,
            Some("DejaVu Sans"),
            1.0,
            0.0,
            1.5,
        );
        assert_eq!(depth, 1);
        kit.paragraph_builder_pop(builder);
        kit.paragraph_builder_pop(builder);
        kit.paragraph_builder_pop(builder);
        assert!(kit.last_error().is_none(), "extra pop is a no-op");
        assert_eq!(kit.paragraph_builder_push_style(builder, -2.0, 0), 0);
        assert!(kit.take_last_error().is_some(), "negative size");
    }

    #[test]
    fn metrics_are_zero_before_layout() {
        let (mut kit, manager) = paragraph_kit();
        let builder = kit.make_paragraph_builder(manager, 16.0, 0xFF00_0000, 4, 1, 0, None);
        kit.paragraph_builder_add_text(builder, b"text");
        let paragraph = kit.paragraph_builder_build(builder, 0.0);
        assert_eq!(kit.paragraph_height(paragraph), 0.0);
        assert_eq!(kit.paragraph_line_count(paragraph), 0);
        assert!(kit.paragraph_layout(paragraph, 200.0), "layout");
        assert!(kit.paragraph_height(paragraph) > 0.0, "laid out");
        assert_eq!(kit.paragraph_max_width(paragraph), 200.0);
        assert!(!kit.paragraph_layout(paragraph, f32::NAN), "nan width");
    }
}
