// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Kit: a flat, handle-based call surface over the Stipple engine.
//!
//! Hosts that cannot hold Rust references, such as a scripting runtime or a
//! C caller, drive the engine through a [`Kit`]. The kit owns every object
//! and hands out opaque [`Handle`]s:
//!
//! - Paths, paints, surfaces, fonts, paragraph builders, and paragraphs are
//!   exclusive. Deleting the handle drops the object.
//! - Images, shaders, color filters, typefaces, text blobs, byte blobs, and
//!   font managers are shared. Attaching one to another object takes a
//!   reference, so deleting its handle only drops the kit's reference.
//! - A canvas handle is derived from its surface and goes stale with it.
//!
//! Handles carry a kind tag and a slot generation, so a deleted, consumed,
//! or mistyped handle is rejected with a [`KitError`] instead of reaching
//! the wrong object. Every call reports failure with a sentinel
//! ([`Handle::NULL`], `false`, `0`, or `None`), logs the cause at `warn`,
//! and keeps it in [`Kit::last_error`].
//!
//! Enumerations cross the surface as their numeric codes, colors as packed
//! `0xAARRGGBB`, and matrices as nine row-major floats.
//!
//! # Features
//!
//! - `ffi`: export the call surface as `extern "C"` functions over a
//!   thread-local kit. See the `ffi` module.
//!
//! # Example
//!
//! ```
//! use stipple_kit::Kit;
//!
//! let mut kit = Kit::default();
//! let surface = kit.make_sw_surface(16, 16);
//! let canvas = kit.surface_get_canvas(surface);
//!
//! let path = kit.make_path_builder();
//! kit.path_add_circle(path, 8.0, 8.0, 6.0);
//! let paint = kit.make_paint();
//! kit.paint_set_color(paint, 0xFF00_80FF);
//! kit.canvas_draw_path(canvas, path, paint);
//!
//! let mut center = [0_u8; 4];
//! kit.surface_read_pixels(surface, 8, 8, 1, 1, &mut center, 4);
//! assert_eq!(center, [0, 128, 255, 255]);
//!
//! let png = kit.surface_encode(surface, 0);
//! assert!(kit.data_size(png) > 0);
//! ```

mod config;
mod error;
mod handle;
mod kit;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use config::{GpuContextFactory, KitConfig};
pub use error::KitError;
pub use handle::{Handle, Kind};
pub use kit::Kit;
