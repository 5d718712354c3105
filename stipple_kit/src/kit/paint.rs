// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paints and the shared effects attached to them.

use std::sync::Arc;

use stipple_imaging::{
    Argb, BlendMode, ColorFilter, Paint, PaintStyle, Shader, StrokeCap, StrokeJoin, TileMode,
};

use super::{Kit, decode};
use crate::handle::Arena;
use crate::{Handle, KitError};

impl Kit {
    /// An opaque black fill paint.
    pub fn make_paint(&mut self) -> Handle {
        self.call("MakePaint", |kit| kit.paints.insert(Paint::new()))
    }

    /// A copy of a paint that shares its shader and color filter.
    pub fn paint_copy(&mut self, paint: Handle) -> Handle {
        self.call("Paint_copy", |kit| {
            let copy = kit.paints.get(paint)?.clone();
            kit.paints.insert(copy)
        })
    }

    /// Set the packed `0xAARRGGBB` color, resetting the alpha override.
    pub fn paint_set_color(&mut self, paint: Handle, color: u32) {
        self.call("Paint_setColor", |kit| {
            kit.paints.get_mut(paint)?.set_color(Argb(color));
            Ok(())
        });
    }

    /// The packed color with the alpha override applied.
    pub fn paint_color(&mut self, paint: Handle) -> u32 {
        self.call("Paint_getColor", |kit| Ok(kit.paints.get(paint)?.color().0))
    }

    /// Override alpha with a value in `[0, 1]`.
    pub fn paint_set_alpha_f(&mut self, paint: Handle, alpha: f32) -> bool {
        self.call("Paint_setAlphaf", |kit| {
            kit.paints.get_mut(paint)?.set_alpha_f(alpha)?;
            Ok(true)
        })
    }

    /// Alpha in `[0, 1]`.
    pub fn paint_alpha_f(&mut self, paint: Handle) -> f32 {
        self.call("Paint_getAlphaf", |kit| Ok(kit.paints.get(paint)?.alpha()))
    }

    /// Record the anti-alias flag.
    pub fn paint_set_anti_alias(&mut self, paint: Handle, anti_alias: bool) {
        self.call("Paint_setAntiAlias", |kit| {
            kit.paints.get_mut(paint)?.set_anti_alias(anti_alias);
            Ok(())
        });
    }

    /// The anti-alias flag.
    pub fn paint_anti_alias(&mut self, paint: Handle) -> bool {
        self.call("Paint_getAntiAlias", |kit| {
            Ok(kit.paints.get(paint)?.anti_alias())
        })
    }

    /// Select fill, stroke, or both by code.
    pub fn paint_set_style(&mut self, paint: Handle, code: u32) -> bool {
        self.call("Paint_setStyle", |kit| {
            let style = decode("paint style", code, PaintStyle::from_code)?;
            kit.paints.get_mut(paint)?.set_style(style);
            Ok(true)
        })
    }

    /// The paint style code.
    pub fn paint_style(&mut self, paint: Handle) -> u32 {
        self.call("Paint_getStyle", |kit| Ok(kit.paints.get(paint)?.style().code()))
    }

    /// Set a non-negative stroke width.
    pub fn paint_set_stroke_width(&mut self, paint: Handle, width: f32) -> bool {
        self.call("Paint_setStrokeWidth", |kit| {
            kit.paints.get_mut(paint)?.set_stroke_width(width)?;
            Ok(true)
        })
    }

    /// The stroke width.
    pub fn paint_stroke_width(&mut self, paint: Handle) -> f32 {
        self.call("Paint_getStrokeWidth", |kit| {
            Ok(kit.paints.get(paint)?.stroke_width())
        })
    }

    /// Set a non-negative miter limit.
    pub fn paint_set_stroke_miter(&mut self, paint: Handle, miter: f32) -> bool {
        self.call("Paint_setStrokeMiter", |kit| {
            kit.paints.get_mut(paint)?.set_stroke_miter(miter)?;
            Ok(true)
        })
    }

    /// The miter limit.
    pub fn paint_stroke_miter(&mut self, paint: Handle) -> f32 {
        self.call("Paint_getStrokeMiter", |kit| {
            Ok(kit.paints.get(paint)?.stroke_miter())
        })
    }

    /// Select the stroke cap by code.
    pub fn paint_set_stroke_cap(&mut self, paint: Handle, code: u32) -> bool {
        self.call("Paint_setStrokeCap", |kit| {
            let cap = decode("stroke cap", code, StrokeCap::from_code)?;
            kit.paints.get_mut(paint)?.set_stroke_cap(cap);
            Ok(true)
        })
    }

    /// The stroke cap code.
    pub fn paint_stroke_cap(&mut self, paint: Handle) -> u32 {
        self.call("Paint_getStrokeCap", |kit| {
            Ok(kit.paints.get(paint)?.stroke_cap().code())
        })
    }

    /// Select the stroke join by code.
    pub fn paint_set_stroke_join(&mut self, paint: Handle, code: u32) -> bool {
        self.call("Paint_setStrokeJoin", |kit| {
            let join = decode("stroke join", code, StrokeJoin::from_code)?;
            kit.paints.get_mut(paint)?.set_stroke_join(join);
            Ok(true)
        })
    }

    /// The stroke join code.
    pub fn paint_stroke_join(&mut self, paint: Handle) -> u32 {
        self.call("Paint_getStrokeJoin", |kit| {
            Ok(kit.paints.get(paint)?.stroke_join().code())
        })
    }

    /// Select the blend mode by code.
    pub fn paint_set_blend_mode(&mut self, paint: Handle, code: u32) -> bool {
        self.call("Paint_setBlendMode", |kit| {
            let mode = decode("blend mode", code, BlendMode::from_code)?;
            kit.paints.get_mut(paint)?.set_blend_mode(mode);
            Ok(true)
        })
    }

    /// The blend mode code.
    pub fn paint_blend_mode(&mut self, paint: Handle) -> u32 {
        self.call("Paint_getBlendMode", |kit| {
            Ok(kit.paints.get(paint)?.blend_mode().code())
        })
    }

    /// Attach a shared shader, or detach with [`Handle::NULL`].
    pub fn paint_set_shader(&mut self, paint: Handle, shader: Handle) {
        self.call("Paint_setShader", |kit| {
            let shader = if shader.is_null() {
                None
            } else {
                Some(Arc::clone(kit.shaders.get(shader)?))
            };
            kit.paints.get_mut(paint)?.set_shader(shader);
            Ok(())
        });
    }

    /// Attach a shared color filter, or detach with [`Handle::NULL`].
    pub fn paint_set_color_filter(&mut self, paint: Handle, filter: Handle) {
        self.call("Paint_setColorFilter", |kit| {
            let filter = if filter.is_null() {
                None
            } else {
                Some(Arc::clone(kit.color_filters.get(filter)?))
            };
            kit.paints.get_mut(paint)?.set_color_filter(filter);
            Ok(())
        });
    }

    /// A shader that paints one color.
    pub fn make_shader_color(&mut self, color: u32) -> Handle {
        self.call("MakeShaderColor", |kit| {
            kit.shaders.insert(Arc::new(Shader::color(Argb(color))))
        })
    }

    /// A linear gradient from `(x0, y0)` to `(x1, y1)`.
    ///
    /// `positions`, when present, must be as long as `colors`.
    pub fn make_linear_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        colors: &[u32],
        positions: Option<&[f32]>,
        tile_mode: u32,
    ) -> Handle {
        self.call("MakeLinearGradient", |kit| {
            let tile = decode("tile mode", tile_mode, TileMode::from_code)?;
            let colors: Vec<Argb> = colors.iter().copied().map(Argb).collect();
            let shader = Shader::linear_gradient((x0, y0), (x1, y1), &colors, positions, tile)?;
            kit.shaders.insert(Arc::new(shader))
        })
    }

    /// A color filter blending each source color against `color`.
    pub fn make_color_filter_blend(&mut self, color: u32, mode: u32) -> Handle {
        self.call("MakeColorFilterBlend", |kit| {
            let mode = decode("blend mode", mode, BlendMode::from_code)?;
            kit.color_filters
                .insert(Arc::new(ColorFilter::blend(Argb(color), mode)))
        })
    }
}

/// The paint behind `paint`, or `None` for [`Handle::NULL`].
pub(super) fn optional_paint(
    paints: &Arena<Paint>,
    paint: Handle,
) -> Result<Option<&Paint>, KitError> {
    if paint.is_null() {
        Ok(None)
    } else {
        paints.get(paint).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_round_trip_through_codes() {
        let mut kit = Kit::default();
        let p = kit.make_paint();
        kit.paint_set_color(p, 0x80FF_0000);
        assert_eq!(kit.paint_color(p), 0x80FF_0000);
        assert!(kit.paint_set_alpha_f(p, 1.0), "alpha");
        assert_eq!(kit.paint_color(p), 0xFFFF_0000);
        assert!(kit.paint_set_style(p, 1), "stroke");
        assert_eq!(kit.paint_style(p), 1);
        assert!(kit.paint_set_stroke_cap(p, 2), "square");
        assert_eq!(kit.paint_stroke_cap(p), 2);
        assert!(kit.paint_set_stroke_join(p, 1), "round");
        assert_eq!(kit.paint_stroke_join(p), 1);
        assert!(kit.paint_set_blend_mode(p, 24), "multiply");
        assert_eq!(kit.paint_blend_mode(p), 24);
        kit.paint_set_anti_alias(p, false);
        assert!(!kit.paint_anti_alias(p), "recorded");
    }

    #[test]
    fn invalid_values_leave_the_paint_unchanged() {
        let mut kit = Kit::default();
        let p = kit.make_paint();
        assert!(kit.paint_set_stroke_width(p, 3.0), "valid width");
        assert!(!kit.paint_set_stroke_width(p, -1.0), "negative width");
        assert_eq!(kit.paint_stroke_width(p), 3.0);
        assert!(!kit.paint_set_style(p, 3), "unknown style");
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::UnknownCode { code: 3, .. })
        ));
        assert_eq!(kit.paint_style(p), 0);
    }

    #[test]
    fn attached_shader_outlives_its_handle() {
        let mut kit = Kit::default();
        let p = kit.make_paint();
        let s = kit.make_shader_color(0xFF00_FF00);
        assert_eq!(kit.ref_count(s), 1);
        kit.paint_set_shader(p, s);
        assert_eq!(kit.ref_count(s), 2);
        let copy = kit.paint_copy(p);
        assert_eq!(kit.ref_count(s), 3);
        kit.delete(copy);
        assert_eq!(kit.ref_count(s), 2);
        kit.delete(s);
        assert!(!kit.is_live(s), "handle released");
        assert!(
            kit.paints.get(p).expect("paint").shader().is_some(),
            "paint keeps its reference"
        );
        kit.paint_set_shader(p, Handle::NULL);
        assert!(kit.paints.get(p).expect("paint").shader().is_none(), "detached");
    }

    #[test]
    fn gradients_validate_their_stops() {
        let mut kit = Kit::default();
        let colors = [0xFFFF_0000, 0xFF00_00FF];
        let ok = kit.make_linear_gradient(0.0, 0.0, 10.0, 0.0, &colors, None, 0);
        assert!(!ok.is_null(), "two colors");
        let one = kit.make_linear_gradient(0.0, 0.0, 10.0, 0.0, &[0xFFFF_0000], None, 0);
        assert_eq!(one, Handle::NULL);
        let mismatched = kit.make_linear_gradient(
            0.0,
            0.0,
            10.0,
            0.0,
            &[0xFFFF_0000, 0xFF00_00FF],
            Some(&[0.0][..]),
            0,
        );
        assert_eq!(mismatched, Handle::NULL);
        let bad_tile = kit.make_linear_gradient(0.0, 0.0, 1.0, 0.0, &[0, 0], None, 4);
        assert_eq!(bad_tile, Handle::NULL);
    }
}
