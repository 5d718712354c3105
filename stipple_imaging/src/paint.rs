// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing style descriptor.

use alloc::sync::Arc;

use crate::{
    Argb, BlendMode, ColorFilter, ImagingError, PaintStyle, Shader, StrokeCap, StrokeJoin,
    unit_to_u8,
};

/// How geometry and text are rendered.
///
/// Effects are held by shared reference: cloning a paint, or attaching the
/// same shader to several paints, never copies the effect itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    color: Argb,
    alpha: f32,
    anti_alias: bool,
    style: PaintStyle,
    stroke_width: f32,
    stroke_miter: f32,
    stroke_cap: StrokeCap,
    stroke_join: StrokeJoin,
    blend_mode: BlendMode,
    shader: Option<Arc<Shader>>,
    color_filter: Option<Arc<ColorFilter>>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Argb::BLACK,
            alpha: 1.0,
            anti_alias: true,
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            stroke_miter: 4.0,
            stroke_cap: StrokeCap::Butt,
            stroke_join: StrokeJoin::Miter,
            blend_mode: BlendMode::SrcOver,
            shader: None,
            color_filter: None,
        }
    }
}

impl Paint {
    /// Opaque black fill with default stroke parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective packed color, with the alpha override applied.
    pub fn color(&self) -> Argb {
        self.color.with_alpha(unit_to_u8(self.alpha))
    }

    /// Set the packed color. The alpha override is reset from its alpha byte.
    pub fn set_color(&mut self, color: Argb) {
        self.color = color;
        self.alpha = f32::from(color.alpha()) / 255.0;
    }

    /// Alpha in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Override alpha, clamped to `[0, 1]`.
    pub fn set_alpha_f(&mut self, alpha: f32) -> Result<(), ImagingError> {
        if alpha.is_nan() {
            return Err(ImagingError::InvalidAlpha);
        }
        self.alpha = alpha.clamp(0.0, 1.0);
        Ok(())
    }

    /// Anti-alias flag.
    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    /// Record the anti-alias flag.
    pub fn set_anti_alias(&mut self, aa: bool) {
        self.anti_alias = aa;
    }

    /// Fill, stroke, or both.
    pub fn style(&self) -> PaintStyle {
        self.style
    }

    /// Select fill, stroke, or both.
    pub fn set_style(&mut self, style: PaintStyle) {
        self.style = style;
    }

    /// Stroke width; zero means hairline.
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Set the stroke width. Negative or non-finite widths are rejected.
    pub fn set_stroke_width(&mut self, width: f32) -> Result<(), ImagingError> {
        self.stroke_width = check_stroke_parameter(width)?;
        Ok(())
    }

    /// Miter limit.
    pub fn stroke_miter(&self) -> f32 {
        self.stroke_miter
    }

    /// Set the miter limit. Negative or non-finite limits are rejected.
    pub fn set_stroke_miter(&mut self, miter: f32) -> Result<(), ImagingError> {
        self.stroke_miter = check_stroke_parameter(miter)?;
        Ok(())
    }

    /// Cap style.
    pub fn stroke_cap(&self) -> StrokeCap {
        self.stroke_cap
    }

    /// Set the cap style.
    pub fn set_stroke_cap(&mut self, cap: StrokeCap) {
        self.stroke_cap = cap;
    }

    /// Join style.
    pub fn stroke_join(&self) -> StrokeJoin {
        self.stroke_join
    }

    /// Set the join style.
    pub fn set_stroke_join(&mut self, join: StrokeJoin) {
        self.stroke_join = join;
    }

    /// Blend mode.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Set the blend mode.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// Attached shader.
    pub fn shader(&self) -> Option<&Arc<Shader>> {
        self.shader.as_ref()
    }

    /// Attach or detach a shader.
    pub fn set_shader(&mut self, shader: Option<Arc<Shader>>) {
        self.shader = shader;
    }

    /// Attached color filter.
    pub fn color_filter(&self) -> Option<&Arc<ColorFilter>> {
        self.color_filter.as_ref()
    }

    /// Attach or detach a color filter.
    pub fn set_color_filter(&mut self, filter: Option<Arc<ColorFilter>>) {
        self.color_filter = filter;
    }

    /// Whether the paint fills geometry interiors.
    pub fn fills(&self) -> bool {
        matches!(self.style, PaintStyle::Fill | PaintStyle::StrokeAndFill)
    }

    /// Whether the paint strokes geometry outlines.
    pub fn strokes(&self) -> bool {
        matches!(self.style, PaintStyle::Stroke | PaintStyle::StrokeAndFill)
    }

    /// Stroke parameters as a kurbo stroke. Zero width becomes a one-unit
    /// hairline.
    pub fn to_kurbo_stroke(&self) -> kurbo::Stroke {
        let width = if self.stroke_width == 0.0 {
            1.0
        } else {
            f64::from(self.stroke_width)
        };
        kurbo::Stroke::new(width)
            .with_caps(self.stroke_cap.to_kurbo())
            .with_join(self.stroke_join.to_kurbo())
            .with_miter_limit(f64::from(self.stroke_miter))
    }
}

fn check_stroke_parameter(v: f32) -> Result<f32, ImagingError> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(ImagingError::InvalidStrokeParameter)
    }
}
