// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of paints and images into rasterizer paint sources.

use kurbo::Point;
use peniko::{Blob, Color, Extend, Gradient, ImageAlphaType, ImageData, ImageSampler};
use stipple_imaging::{
    ColorFilter, LinearGradient, Paint, SamplingOptions, Shader, TileMode, unit_to_u8,
};
use vello_cpu::{Image as CpuImage, ImageSource, RenderContext};

use crate::Image;

/// A resolved paint source, ready to be installed on a render context.
#[derive(Clone, Debug)]
pub(crate) enum Brush {
    Solid(Color),
    Gradient(Gradient),
    Image(CpuImage),
}

impl Brush {
    /// Resolve the color source of `paint`, with its color filter and alpha
    /// applied.
    pub(crate) fn from_paint(paint: &Paint) -> Self {
        let filter = paint.color_filter().map(|f| **f);
        let filtered = |c| filter.map_or(c, |f: ColorFilter| f.filter_argb(c));
        match paint.shader().map(|s| &**s) {
            None => Self::Solid(filtered(paint.color()).to_peniko(1.0)),
            Some(Shader::Color(c)) => Self::Solid(filtered(*c).to_peniko(paint.alpha())),
            Some(Shader::LinearGradient(g)) => match filter {
                Some(f) => linear(&g.filtered(&f), paint.alpha()),
                None => linear(g, paint.alpha()),
            },
        }
    }

    /// An image source sampled with `sampling`, with the paint's color filter
    /// and alpha baked into a pixel copy when needed.
    pub(crate) fn from_image(
        image: &Image,
        sampling: SamplingOptions,
        paint: Option<&Paint>,
    ) -> Self {
        let filter = paint.and_then(|p| p.color_filter()).map(|f| **f);
        let alpha = paint.map_or(255, |p| unit_to_u8(p.alpha()));
        let data = if filter.is_none() && alpha == 255 {
            image.blob().clone()
        } else {
            let pixels: Vec<u8> = image
                .pixels()
                .chunks_exact(4)
                .flat_map(|p| {
                    let px = [p[0], p[1], p[2], p[3]];
                    let px = filter.map_or(px, |f| f.filter_premul_rgba8(px));
                    px.map(|c| scale_u8(c, alpha))
                })
                .collect();
            Blob::from(pixels)
        };
        let data = ImageData {
            data,
            format: peniko::ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::AlphaPremultiplied,
            width: image.width(),
            height: image.height(),
        };
        Self::Image(CpuImage {
            image: ImageSource::from_peniko_image_data(&data),
            sampler: ImageSampler {
                quality: sampling.quality(),
                ..ImageSampler::default()
            },
        })
    }

    /// Install this source as the current paint of `ctx`.
    pub(crate) fn apply(&self, ctx: &mut RenderContext) {
        match self {
            Self::Solid(color) => ctx.set_paint(*color),
            Self::Gradient(gradient) => ctx.set_paint(gradient.clone()),
            Self::Image(image) => ctx.set_paint(image.clone()),
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "result of the rounded division is at most 255"
)]
fn scale_u8(c: u8, a: u8) -> u8 {
    ((u32::from(c) * u32::from(a) + 127) / 255) as u8
}

fn linear(g: &LinearGradient, alpha: f32) -> Brush {
    let stops: Vec<(f32, Color)> = g
        .stops
        .iter()
        .map(|&(offset, color)| (offset, color.to_peniko(alpha)))
        .collect();
    let start = Point::new(f64::from(g.start.0), f64::from(g.start.1));
    let end = Point::new(f64::from(g.end.0), f64::from(g.end.1));
    if start == end {
        // A zero-length gradient degenerates to its final color.
        let last = match g.tile_mode {
            TileMode::Decal => Color::TRANSPARENT,
            _ => stops.last().map_or(Color::TRANSPARENT, |s| s.1),
        };
        return Brush::Solid(last);
    }
    match g.tile_mode.to_extend() {
        Some(extend) => Brush::Gradient(
            Gradient::new_linear(start, end)
                .with_extend(extend)
                .with_stops(&stops[..]),
        ),
        None => decal(start, end, &stops),
    }
}

/// Emulate decal tiling: stretch the axis to three times its length and
/// surround the original stops with transparent hard stops.
fn decal(start: Point, end: Point, stops: &[(f32, Color)]) -> Brush {
    let d = end - start;
    let remap = |t: f32| (t + 1.0) / 3.0;
    let (Some(&(_, first)), Some(&(_, last))) = (stops.first(), stops.last()) else {
        return Brush::Solid(Color::TRANSPARENT);
    };
    let clear = Color::TRANSPARENT;
    let mut out = Vec::with_capacity(stops.len() + 6);
    out.push((0.0, clear));
    out.push((remap(0.0), clear));
    out.push((remap(0.0), first));
    out.extend(stops.iter().map(|&(t, c)| (remap(t), c)));
    out.push((remap(1.0), last));
    out.push((remap(1.0), clear));
    out.push((1.0, clear));
    Brush::Gradient(
        Gradient::new_linear(start - d, end + d)
            .with_extend(Extend::Pad)
            .with_stops(&out[..]),
    )
}
