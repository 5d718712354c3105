// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Imaging: geometry, paint, and effect values.
//!
//! This crate holds the plain values that drawing calls consume. It knows
//! nothing about pixels; rasterization lives in `stipple_raster` and text in
//! `stipple_text`.
//!
//! # Core concepts
//!
//! - **Geometry**: [`PathBuilder`] accumulates contours; [`PathBuilder::snapshot`]
//!   freezes them into an immutable [`Path`] that can be drawn repeatedly or
//!   mapped through a [`Matrix`].
//! - **Style**: [`Paint`] aggregates color, stroke parameters, and a blend
//!   mode, plus shared references to a [`Shader`] and a [`ColorFilter`].
//! - **Codes**: every enumeration ([`FillType`], [`BlendMode`], [`TileMode`],
//!   ...) carries a fixed numeric code for exchange across a flat boundary.
//! - **Colors**: [`Argb`] packs unpremultiplied color as `0xAARRGGBB`.
//! - **Scoped state**: [`ScopedStack`] is the push/pop stack behind canvas
//!   save/restore and the paragraph style stack.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use stipple_imaging::{Argb, Matrix, Paint, PaintStyle, PathBuilder, RectF, Shader, TileMode};
//!
//! let mut builder = PathBuilder::new();
//! builder.add_rect(RectF::from_xywh(0.0, 0.0, 10.0, 10.0));
//! let path = builder.snapshot();
//! let moved = path.transform(&Matrix::translate(5.0, 5.0));
//! assert_eq!(moved.bounds(), Some(RectF::new(5.0, 5.0, 15.0, 15.0)));
//!
//! let gradient = Shader::linear_gradient(
//!     (0.0, 0.0),
//!     (10.0, 0.0),
//!     &[Argb::RED, Argb::BLUE],
//!     None,
//!     TileMode::Clamp,
//! )
//! .unwrap();
//!
//! let mut paint = Paint::new();
//! paint.set_style(PaintStyle::Stroke);
//! paint.set_stroke_width(2.0).unwrap();
//! paint.set_shader(Some(Arc::new(gradient)));
//! assert!(paint.strokes());
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Enable the `libm` feature when
//! building without `std`.

#![no_std]

extern crate alloc;

mod codes;
mod color;
mod effects;
mod error;
mod geom;
mod matrix;
mod paint;
mod path;
mod stack;

pub use codes::{
    BlendMode, ClipOp, FillType, FilterMode, ImageFormat, MipmapMode, PaintStyle, SamplingOptions,
    StrokeCap, StrokeJoin, TextAlign, TextDirection, TextEncoding, TileMode,
};
pub use color::{Argb, premultiply, unit_to_u8, unpremultiply};
pub use effects::{ColorFilter, LinearGradient, Shader};
pub use error::ImagingError;
pub use geom::RectF;
pub use matrix::Matrix;
pub use paint::Paint;
pub use path::{Path, PathBuilder, PathCmd};
pub use stack::ScopedStack;
