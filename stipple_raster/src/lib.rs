// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Raster: surfaces, canvases, and the pixel pipeline.
//!
//! A [`Surface`] is a fixed-size render target. Its [`Canvas`] draws
//! [`stipple_imaging`] geometry and paints through the Vello CPU rasterizer,
//! keeping a transform and clip stack in the surface. Pixels are always
//! premultiplied RGBA8, whether the surface presents to a GPU target or not,
//! so read-back and encoding are byte-for-byte reproducible.
//!
//! - [`Surface::new_raster`] and [`Surface::new_gpu`] create targets; a GPU
//!   surface presents frames through an explicit [`GpuContext`].
//! - [`Surface::read_pixels_rgba8888`] copies a region at a caller stride.
//! - [`Image`] is an immutable, cheaply cloned premultiplied pixel buffer with
//!   eager, truncation-tolerant PNG decoding and deterministic PNG encoding.
//!
//! # Example
//!
//! ```
//! use stipple_imaging::{Argb, ImageFormat};
//! use stipple_raster::{Image, Surface, SurfaceOptions};
//!
//! let mut surface = Surface::new_raster(4, 4, &SurfaceOptions::default()).unwrap();
//! surface.canvas().clear(Argb::RED);
//!
//! let mut rgba = [0_u8; 4 * 4 * 4];
//! surface.read_pixels_rgba8888(0, 0, 4, 4, &mut rgba, 16).unwrap();
//! assert_eq!(&rgba[..4], &[255, 0, 0, 255]);
//!
//! let png = surface.encode(ImageFormat::Png).unwrap();
//! let decoded = Image::decode(&png).unwrap();
//! assert_eq!((decoded.width(), decoded.height()), (4, 4));
//! ```

mod brush;
mod canvas;
mod codec;
mod error;
mod gpu;
mod image;
mod pixels;
mod surface;

pub use canvas::Canvas;
pub use error::{GpuError, RasterError};
pub use gpu::{GpuContext, GpuDevice, GpuTarget};
pub use image::{Image, MAX_PIXELS};
pub use surface::{Surface, SurfaceOptions};

pub use vello_cpu::RenderMode;
