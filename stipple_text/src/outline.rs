// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph outlines appended to path builders.

use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{GlyphId, OutlineGlyphCollection};
use stipple_imaging::PathBuilder;

/// Placement of one glyph: baseline origin plus horizontal scale and skew.
#[derive(Copy, Clone, Debug)]
pub(crate) struct GlyphPlacement {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) scale_x: f32,
    pub(crate) skew_x: f32,
}

impl GlyphPlacement {
    pub(crate) fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            scale_x: 1.0,
            skew_x: 0.0,
        }
    }
}

/// Pen that writes into a path builder, flipping font space (y up) into
/// canvas space (y down).
struct BuilderPen<'b> {
    builder: &'b mut PathBuilder,
    placement: GlyphPlacement,
}

impl BuilderPen<'_> {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        let p = self.placement;
        (p.x + x * p.scale_x - y * p.skew_x, p.y - y)
    }
}

impl OutlinePen for BuilderPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (cx0, cy0) = self.map(cx0, cy0);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (cx0, cy0) = self.map(cx0, cy0);
        let (cx1, cy1) = self.map(cx1, cy1);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Append the unhinted outline of `glyph` at `size` pixels per em. Returns
/// `false` when the face has no outline for it.
pub(crate) fn append_glyph(
    outlines: &OutlineGlyphCollection<'_>,
    glyph: GlyphId,
    size: f32,
    placement: GlyphPlacement,
    builder: &mut PathBuilder,
) -> bool {
    let Some(outline) = outlines.get(glyph) else {
        return false;
    };
    let mut pen = BuilderPen { builder, placement };
    let settings = DrawSettings::unhinted(Size::new(size), LocationRef::default());
    match outline.draw(settings, &mut pen) {
        Ok(_) => true,
        Err(err) => {
            log::debug!("glyph {} outline failed: {err}", glyph.to_u32());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skrifa::{FontRef, MetadataProvider};

    const DEJAVU: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSans.ttf");

    #[test]
    fn outline_sits_above_the_baseline() {
        let font = FontRef::new(DEJAVU).expect("valid font");
        let glyph = font.charmap().map('H').expect("H is covered");
        let mut builder = PathBuilder::new();
        assert!(
            append_glyph(
                &font.outline_glyphs(),
                glyph,
                20.0,
                GlyphPlacement::at(10.0, 30.0),
                &mut builder,
            ),
            "H has an outline"
        );
        let bounds = builder.bounds().expect("non-empty outline");
        assert!(bounds.y1 <= 30.5, "H does not descend: {bounds:?}");
        assert!(bounds.y0 < 20.0, "H rises above the baseline: {bounds:?}");
        assert!(bounds.x0 >= 10.0, "H starts right of the origin: {bounds:?}");
    }

    #[test]
    fn space_has_no_contours() {
        let font = FontRef::new(DEJAVU).expect("valid font");
        let glyph = font.charmap().map(' ').expect("space is covered");
        let mut builder = PathBuilder::new();
        append_glyph(
            &font.outline_glyphs(),
            glyph,
            20.0,
            GlyphPlacement::at(0.0, 0.0),
            &mut builder,
        );
        assert!(builder.is_empty(), "space draws nothing");
    }
}
