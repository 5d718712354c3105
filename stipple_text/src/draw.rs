// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text drawing on a raster canvas.

use stipple_imaging::Paint;
use stipple_raster::Canvas;

use crate::{Paragraph, TextBlob};

/// Text drawing operations for [`Canvas`].
pub trait TextCanvasExt {
    /// Draw the glyph outlines of `blob` with the run origin at `(x, y)`,
    /// filled or stroked by `paint`.
    fn draw_text_blob(&mut self, blob: &TextBlob, x: f32, y: f32, paint: &Paint);

    /// Paint a laid-out paragraph with its top-left corner at `(x, y)`.
    ///
    /// A paragraph that was never laid out draws nothing.
    fn draw_paragraph(&mut self, paragraph: &Paragraph, x: f32, y: f32);
}

impl TextCanvasExt for Canvas<'_> {
    fn draw_text_blob(&mut self, blob: &TextBlob, x: f32, y: f32, paint: &Paint) {
        let path = blob.to_path(x, y);
        if path.is_empty() {
            log::debug!("text blob of {} glyphs has no outlines", blob.glyphs().len());
            return;
        }
        self.draw_path(&path, paint);
    }

    fn draw_paragraph(&mut self, paragraph: &Paragraph, x: f32, y: f32) {
        paragraph.paint(self, x, y);
    }
}
