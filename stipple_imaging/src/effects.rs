// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable paint effects: shaders and color filters.

use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::{Argb, BlendMode, ImagingError, TileMode, premultiply, unit_to_u8, unpremultiply};

/// Source of color for a paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Shader {
    /// A single solid color.
    Color(Argb),
    /// A linear gradient between two points.
    LinearGradient(LinearGradient),
}

impl Shader {
    /// A solid-color shader.
    pub fn color(color: Argb) -> Self {
        Self::Color(color)
    }

    /// A linear gradient from `start` to `end`.
    ///
    /// When `positions` is `None` the colors are spread evenly over `[0, 1]`.
    /// Supplied positions are clamped to `[0, 1]` and forced to be
    /// non-decreasing.
    pub fn linear_gradient(
        start: (f32, f32),
        end: (f32, f32),
        colors: &[Argb],
        positions: Option<&[f32]>,
        tile_mode: TileMode,
    ) -> Result<Self, ImagingError> {
        LinearGradient::new(start, end, colors, positions, tile_mode).map(Self::LinearGradient)
    }
}

/// A validated linear gradient.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// Point where the gradient parameter is 0.
    pub start: (f32, f32),
    /// Point where the gradient parameter is 1.
    pub end: (f32, f32),
    /// Color stops with non-decreasing offsets in `[0, 1]`.
    pub stops: Vec<(f32, Argb)>,
    /// Sampling outside `[0, 1]`.
    pub tile_mode: TileMode,
}

impl LinearGradient {
    fn new(
        start: (f32, f32),
        end: (f32, f32),
        colors: &[Argb],
        positions: Option<&[f32]>,
        tile_mode: TileMode,
    ) -> Result<Self, ImagingError> {
        if colors.len() < 2 {
            return Err(ImagingError::TooFewColors(colors.len()));
        }
        if let Some(p) = positions
            && p.len() != colors.len()
        {
            return Err(ImagingError::MismatchedPositions {
                colors: colors.len(),
                positions: p.len(),
            });
        }
        if ![start.0, start.1, end.0, end.1].iter().all(|v| v.is_finite()) {
            return Err(ImagingError::NonFinite);
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "stop counts are far below f32 precision limits"
        )]
        let last = (colors.len() - 1) as f32;
        let mut prev = 0.0_f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "stop counts are far below f32 precision limits"
                )]
                let raw = positions.map_or(i as f32 / last, |p| p[i]);
                let raw = if raw.is_nan() { prev } else { raw };
                let offset = raw.clamp(0.0, 1.0).max(prev);
                prev = offset;
                (offset, color)
            })
            .collect();
        Ok(Self {
            start,
            end,
            stops,
            tile_mode,
        })
    }

    /// A copy with every stop color passed through `filter`.
    pub fn filtered(&self, filter: &ColorFilter) -> Self {
        Self {
            stops: self
                .stops
                .iter()
                .map(|&(offset, color)| (offset, filter.filter_argb(color)))
                .collect(),
            ..self.clone()
        }
    }
}

/// Transformation applied to source colors before compositing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorFilter {
    /// Blend a fixed color (as source) over each incoming color (as
    /// destination).
    Blend {
        /// The fixed color.
        color: Argb,
        /// How the fixed color combines with the incoming color.
        mode: BlendMode,
    },
}

impl ColorFilter {
    /// A blend color filter.
    pub fn blend(color: Argb, mode: BlendMode) -> Self {
        Self::Blend { color, mode }
    }

    /// Filter an unpremultiplied packed color.
    pub fn filter_argb(&self, color: Argb) -> Argb {
        let Self::Blend { color: src, mode } = *self;
        let out = blend(
            Rgba::from_argb(src).premultiplied(),
            Rgba::from_argb(color).premultiplied(),
            mode,
        );
        out.to_argb()
    }

    /// Filter a premultiplied `[r, g, b, a]` pixel.
    pub fn filter_premul_rgba8(&self, pixel: [u8; 4]) -> [u8; 4] {
        let unpremul = Argb::from_rgba8(unpremultiply(pixel));
        premultiply(self.filter_argb(unpremul).to_rgba8())
    }
}

/// Premultiplied or straight color in unit range, depending on context.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Rgba {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Rgba {
    fn from_argb(c: Argb) -> Self {
        let unit = |v: u8| f32::from(v) / 255.0;
        Self {
            r: unit(c.red()),
            g: unit(c.green()),
            b: unit(c.blue()),
            a: unit(c.alpha()),
        }
    }

    fn premultiplied(self) -> Self {
        Self {
            r: self.r * self.a,
            g: self.g * self.a,
            b: self.b * self.a,
            a: self.a,
        }
    }

    fn unpremultiplied(self) -> Self {
        if self.a <= 0.0 {
            return Self {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 0.0,
            };
        }
        Self {
            r: self.r / self.a,
            g: self.g / self.a,
            b: self.b / self.a,
            a: self.a,
        }
    }

    /// Convert a premultiplied color back to a packed straight color.
    fn to_argb(self) -> Argb {
        let c = self.unpremultiplied();
        Argb::from_argb(
            unit_to_u8(c.a),
            unit_to_u8(c.r),
            unit_to_u8(c.g),
            unit_to_u8(c.b),
        )
    }

    fn rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Composite premultiplied `src` onto premultiplied `dst`.
fn blend(src: Rgba, dst: Rgba, mode: BlendMode) -> Rgba {
    let (sa, da) = (src.a, dst.a);
    let porter_duff = |fa: f32, fb: f32| Rgba {
        r: (src.r * fa + dst.r * fb).min(1.0),
        g: (src.g * fa + dst.g * fb).min(1.0),
        b: (src.b * fa + dst.b * fb).min(1.0),
        a: (sa * fa + da * fb).min(1.0),
    };
    match mode {
        BlendMode::Clear => porter_duff(0.0, 0.0),
        BlendMode::Src => porter_duff(1.0, 0.0),
        BlendMode::Dst => porter_duff(0.0, 1.0),
        BlendMode::SrcOver => porter_duff(1.0, 1.0 - sa),
        BlendMode::DstOver => porter_duff(1.0 - da, 1.0),
        BlendMode::SrcIn => porter_duff(da, 0.0),
        BlendMode::DstIn => porter_duff(0.0, sa),
        BlendMode::SrcOut => porter_duff(1.0 - da, 0.0),
        BlendMode::DstOut => porter_duff(0.0, 1.0 - sa),
        BlendMode::SrcATop => porter_duff(da, 1.0 - sa),
        BlendMode::DstATop => porter_duff(1.0 - da, sa),
        BlendMode::Xor => porter_duff(1.0 - da, 1.0 - sa),
        BlendMode::Plus => porter_duff(1.0, 1.0),
        BlendMode::Modulate => Rgba {
            r: src.r * dst.r,
            g: src.g * dst.g,
            b: src.b * dst.b,
            a: sa * da,
        },
        _ => {
            let cs = src.unpremultiplied().rgb();
            let cb = dst.unpremultiplied().rgb();
            let mixed = mix(cb, cs, mode);
            let ch = |i: usize, s: f32, d: f32| {
                s * (1.0 - da) + d * (1.0 - sa) + sa * da * mixed[i]
            };
            Rgba {
                r: ch(0, src.r, dst.r),
                g: ch(1, src.g, dst.g),
                b: ch(2, src.b, dst.b),
                a: sa + da * (1.0 - sa),
            }
        }
    }
}

/// Mix backdrop `cb` with source `cs`, both straight colors.
fn mix(cb: [f32; 3], cs: [f32; 3], mode: BlendMode) -> [f32; 3] {
    let separable = |f: fn(f32, f32) -> f32| [f(cb[0], cs[0]), f(cb[1], cs[1]), f(cb[2], cs[2])];
    match mode {
        BlendMode::Multiply => separable(|b, s| b * s),
        BlendMode::Screen => separable(screen),
        BlendMode::Overlay => separable(|b, s| hard_light(s, b)),
        BlendMode::Darken => separable(f32::min),
        BlendMode::Lighten => separable(f32::max),
        BlendMode::ColorDodge => separable(|b, s| {
            if b == 0.0 {
                0.0
            } else if s >= 1.0 {
                1.0
            } else {
                (b / (1.0 - s)).min(1.0)
            }
        }),
        BlendMode::ColorBurn => separable(|b, s| {
            if b >= 1.0 {
                1.0
            } else if s == 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - b) / s).min(1.0)
            }
        }),
        BlendMode::HardLight => separable(hard_light),
        BlendMode::SoftLight => separable(|b, s| {
            if s <= 0.5 {
                b - (1.0 - 2.0 * s) * b * (1.0 - b)
            } else {
                let d = if b <= 0.25 {
                    ((16.0 * b - 12.0) * b + 4.0) * b
                } else {
                    b.sqrt()
                };
                b + (2.0 * s - 1.0) * (d - b)
            }
        }),
        BlendMode::Difference => separable(|b, s| (b - s).abs()),
        BlendMode::Exclusion => separable(|b, s| b + s - 2.0 * b * s),
        BlendMode::Hue => set_lum(set_sat(cs, sat(cb)), lum(cb)),
        BlendMode::Saturation => set_lum(set_sat(cb, sat(cs)), lum(cb)),
        BlendMode::Color => set_lum(cs, lum(cb)),
        BlendMode::Luminosity => set_lum(cb, lum(cs)),
        // Porter-Duff modes are resolved before mixing.
        _ => cs,
    }
}

fn screen(b: f32, s: f32) -> f32 {
    b + s - b * s
}

fn hard_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        b * 2.0 * s
    } else {
        screen(b, 2.0 * s - 1.0)
    }
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn sat(c: [f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 {
        out = out.map(|v| l + (v - l) * l / (l - n));
    }
    if x > 1.0 {
        out = out.map(|v| l + (v - l) * (1.0 - l) / (x - l));
    }
    out
}

fn set_sat(c: [f32; 3], s: f32) -> [f32; 3] {
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    if x > n {
        c.map(|v| (v - n) * s / (x - n))
    } else {
        [0.0; 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn gradient_needs_two_colors() {
        let err =
            Shader::linear_gradient((0.0, 0.0), (1.0, 0.0), &[Argb::RED], None, TileMode::Clamp);
        assert_eq!(err, Err(ImagingError::TooFewColors(1)));
    }

    #[test]
    fn gradient_positions_must_match_colors() {
        let err = Shader::linear_gradient(
            (0.0, 0.0),
            (1.0, 0.0),
            &[Argb::RED, Argb::BLUE],
            Some(&[0.0]),
            TileMode::Clamp,
        );
        assert_eq!(
            err,
            Err(ImagingError::MismatchedPositions {
                colors: 2,
                positions: 1
            })
        );
    }

    #[test]
    fn implied_positions_are_even() {
        let Ok(Shader::LinearGradient(g)) = Shader::linear_gradient(
            (0.0, 0.0),
            (10.0, 0.0),
            &[Argb::RED, Argb::GREEN, Argb::BLUE],
            None,
            TileMode::Decal,
        ) else {
            panic!("valid gradient");
        };
        let offsets: Vec<f32> = g.stops.iter().map(|s| s.0).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn positions_are_clamped_and_monotonic() {
        let Ok(Shader::LinearGradient(g)) = Shader::linear_gradient(
            (0.0, 0.0),
            (10.0, 0.0),
            &[Argb::RED, Argb::GREEN, Argb::BLUE],
            Some(&[-1.0, 0.8, 0.3]),
            TileMode::Clamp,
        ) else {
            panic!("valid gradient");
        };
        let offsets: Vec<f32> = g.stops.iter().map(|s| s.0).collect();
        assert_eq!(offsets, vec![0.0, 0.8, 0.8]);
    }

    #[test]
    fn src_in_filter_keeps_input_coverage() {
        let filter = ColorFilter::blend(Argb::BLUE, BlendMode::SrcIn);
        assert_eq!(filter.filter_argb(Argb::RED), Argb::BLUE);
        assert_eq!(filter.filter_argb(Argb::TRANSPARENT), Argb::TRANSPARENT);
    }

    #[test]
    fn dst_filter_is_identity() {
        let filter = ColorFilter::blend(Argb::BLUE, BlendMode::Dst);
        let c = Argb(0xFF12_3456);
        assert_eq!(filter.filter_argb(c), c);
    }

    #[test]
    fn multiply_filter_darkens() {
        let filter = ColorFilter::blend(Argb(0xFF80_8080), BlendMode::Multiply);
        let out = filter.filter_argb(Argb::WHITE);
        assert_eq!(out, Argb(0xFF80_8080));
        assert_eq!(filter.filter_argb(Argb::BLACK), Argb::BLACK);
    }

    #[test]
    fn luminosity_of_gray_over_red_keeps_opacity() {
        let filter = ColorFilter::blend(Argb(0xFF80_8080), BlendMode::Luminosity);
        let out = filter.filter_argb(Argb::RED);
        assert_eq!(out.alpha(), 255);
        assert!(out.red() > out.green(), "hue of the backdrop is kept: {out:?}");
    }

    #[test]
    fn premul_filtering_handles_transparent_pixels() {
        let filter = ColorFilter::blend(Argb::RED, BlendMode::SrcOver);
        assert_eq!(filter.filter_premul_rgba8([0, 0, 0, 0]), [255, 0, 0, 255]);
    }
}
