// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Text: fonts, glyph runs, and paragraph layout.
//!
//! Font programs are parsed with Skrifa and drawn as outlines through
//! [`stipple_raster`], so text follows the same rasterization path as any
//! other geometry.
//!
//! - [`FontManager`] loads font buffers and groups faces by family name.
//! - [`Typeface`] and [`Font`] describe one face and how it is sized.
//! - [`TextBlob`] is a single immutable run of positioned glyphs.
//! - [`ParagraphBuilder`] accumulates text under a stack of [`TextStyle`]s
//!   and produces a [`Paragraph`], which breaks lines at word boundaries,
//!   honors a line limit with an optional ellipsis, aligns each line, and
//!   can be laid out again at a different width.
//! - [`TextCanvasExt`] adds text drawing to [`stipple_raster::Canvas`].
//!
//! Characters no loaded face covers are measured as a box half the font size
//! wide, so layout stays deterministic without any fonts.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use stipple_text::{FontManager, ParagraphBuilder, ParagraphStyle, TextStyle};
//!
//! let style = ParagraphStyle {
//!     text_style: TextStyle { font_size: 10.0, ..TextStyle::default() },
//!     ..ParagraphStyle::default()
//! };
//! let mut builder = ParagraphBuilder::new(style, Arc::new(FontManager::empty()));
//! builder.add_text("ab cd").unwrap();
//! let mut paragraph = builder.build(100.0);
//! assert_eq!(paragraph.line_count(), 1);
//! assert_eq!(paragraph.max_intrinsic_width(), 25.0);
//!
//! paragraph.layout(12.0);
//! assert_eq!(paragraph.line_count(), 2);
//! assert_eq!(paragraph.height(), 20.0);
//! ```

mod blob;
mod builder;
mod draw;
mod error;
mod manager;
mod outline;
mod paragraph;
mod shape;
mod style;
mod typeface;

pub use blob::{PositionedGlyph, TextBlob};
pub use builder::{ParagraphBuilder, StyledRun};
pub use draw::TextCanvasExt;
pub use error::TextError;
pub use manager::FontManager;
pub use paragraph::{LineMetrics, Paragraph};
pub use style::{ParagraphStyle, TextStyle};
pub use typeface::{Font, FontEdging, Typeface};

pub use skrifa::GlyphId;
