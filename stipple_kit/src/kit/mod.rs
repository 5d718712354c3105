// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flat call surface.
//!
//! Every method takes primitives, slices, and [`Handle`]s, and reports
//! failure with a sentinel: [`Handle::NULL`], `false`, `0`, or `None`. The
//! cause of the most recent failure is kept in [`Kit::last_error`].

mod geometry;
mod image;
mod paint;
mod surface;
mod text;

use std::sync::Arc;

use stipple_imaging::{ColorFilter, Matrix, Paint, Path, PathBuilder, RectF, Shader};
use stipple_raster::{GpuContext, Image, RasterError, Surface};
use stipple_text::{Font, FontManager, Paragraph, ParagraphBuilder, TextBlob, Typeface};

use crate::handle::Arena;
use crate::{Handle, Kind, KitConfig, KitError};

enum GpuState {
    Pending,
    Ready(GpuContext),
    Failed,
}

/// Owner of every object reachable through a [`Handle`].
///
/// A kit is single-threaded. Handles from one kit mean nothing to another.
///
/// ```
/// use stipple_kit::{Handle, Kit};
///
/// let mut kit = Kit::default();
/// let surface = kit.make_sw_surface(4, 4);
/// let canvas = kit.surface_get_canvas(surface);
/// kit.canvas_clear(canvas, 0xFFFF_0000);
///
/// let mut rgba = [0_u8; 64];
/// assert!(kit.surface_read_pixels(surface, 0, 0, 4, 4, &mut rgba, 16));
/// assert_eq!(&rgba[..4], &[255, 0, 0, 255]);
///
/// kit.delete(surface);
/// assert_eq!(kit.surface_get_canvas(surface), Handle::NULL);
/// assert!(kit.take_last_error().is_some());
/// ```
pub struct Kit {
    config: KitConfig,
    gpu: GpuState,
    path_builders: Arena<PathBuilder>,
    paths: Arena<Path>,
    paints: Arena<Paint>,
    surfaces: Arena<Surface>,
    fonts: Arena<Font>,
    paragraph_builders: Arena<ParagraphBuilder>,
    paragraphs: Arena<Paragraph>,
    images: Arena<Arc<Image>>,
    shaders: Arena<Arc<Shader>>,
    color_filters: Arena<Arc<ColorFilter>>,
    typefaces: Arena<Arc<Typeface>>,
    text_blobs: Arena<Arc<TextBlob>>,
    data: Arena<Arc<[u8]>>,
    font_managers: Arena<Arc<FontManager>>,
    last_error: Option<KitError>,
}

impl core::fmt::Debug for Kit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Kit")
            .field("config", &self.config)
            .field("live_objects", &self.live_objects())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl Default for Kit {
    fn default() -> Self {
        Self::new(KitConfig::default())
    }
}

impl Kit {
    /// An empty kit.
    pub fn new(config: KitConfig) -> Self {
        Self {
            config,
            gpu: GpuState::Pending,
            path_builders: Arena::new(Kind::PathBuilder),
            paths: Arena::new(Kind::Path),
            paints: Arena::new(Kind::Paint),
            surfaces: Arena::new(Kind::Surface),
            fonts: Arena::new(Kind::Font),
            paragraph_builders: Arena::new(Kind::ParagraphBuilder),
            paragraphs: Arena::new(Kind::Paragraph),
            images: Arena::new(Kind::Image),
            shaders: Arena::new(Kind::Shader),
            color_filters: Arena::new(Kind::ColorFilter),
            typefaces: Arena::new(Kind::Typeface),
            text_blobs: Arena::new(Kind::TextBlob),
            data: Arena::new(Kind::Data),
            font_managers: Arena::new(Kind::FontManager),
            last_error: None,
        }
    }

    /// The cause of the most recent failure sentinel.
    pub fn last_error(&self) -> Option<&KitError> {
        self.last_error.as_ref()
    }

    /// Take and clear the cause of the most recent failure sentinel.
    pub fn take_last_error(&mut self) -> Option<KitError> {
        self.last_error.take()
    }

    /// Number of objects alive across all kinds, counting each surface once.
    pub fn live_objects(&self) -> usize {
        self.path_builders.len()
            + self.paths.len()
            + self.paints.len()
            + self.surfaces.len()
            + self.fonts.len()
            + self.paragraph_builders.len()
            + self.paragraphs.len()
            + self.images.len()
            + self.shaders.len()
            + self.color_filters.len()
            + self.typefaces.len()
            + self.text_blobs.len()
            + self.data.len()
            + self.font_managers.len()
    }

    /// Whether `handle` refers to a live object.
    pub fn is_live(&self, handle: Handle) -> bool {
        self.check(handle).is_ok()
    }

    /// Delete the object behind `handle`.
    ///
    /// For a shared object this drops the kit's reference; the object lives
    /// on while paints, fonts, or paragraphs hold it. Deleting a surface
    /// also invalidates its canvas handle.
    pub fn delete(&mut self, handle: Handle) {
        self.call("Delete", |kit| match kind_of(handle)? {
            Kind::PathBuilder => kit.path_builders.remove(handle).map(drop),
            Kind::Path => kit.paths.remove(handle).map(drop),
            Kind::Paint => kit.paints.remove(handle).map(drop),
            Kind::Surface => kit.surfaces.remove(handle).map(drop),
            Kind::Canvas => Err(KitError::InvalidInput("a canvas is deleted with its surface")),
            Kind::Font => kit.fonts.remove(handle).map(drop),
            Kind::ParagraphBuilder => kit.paragraph_builders.remove(handle).map(drop),
            Kind::Paragraph => kit.paragraphs.remove(handle).map(drop),
            Kind::Image => kit.images.remove(handle).map(drop),
            Kind::Shader => kit.shaders.remove(handle).map(drop),
            Kind::ColorFilter => kit.color_filters.remove(handle).map(drop),
            Kind::Typeface => kit.typefaces.remove(handle).map(drop),
            Kind::TextBlob => kit.text_blobs.remove(handle).map(drop),
            Kind::Data => kit.data.remove(handle).map(drop),
            Kind::FontManager => kit.font_managers.remove(handle).map(drop),
        });
    }

    /// Delete `handle` only if it names an object of `kind`.
    pub fn delete_kind(&mut self, kind: Kind, handle: Handle) {
        match handle.kind() {
            Some(found) if found != kind => {
                let err = KitError::WrongKind {
                    expected: kind,
                    found: found as u8,
                };
                self.fail::<()>("Delete", err);
            }
            _ => self.delete(handle),
        }
    }

    /// Live references to a shared object, including the kit's own.
    ///
    /// Returns 0 for exclusive kinds and for handles that are not live.
    pub fn ref_count(&mut self, handle: Handle) -> usize {
        self.call("ref_count", |kit| {
            Ok(match kind_of(handle)? {
                Kind::Image => Arc::strong_count(kit.images.get(handle)?),
                Kind::Shader => Arc::strong_count(kit.shaders.get(handle)?),
                Kind::ColorFilter => Arc::strong_count(kit.color_filters.get(handle)?),
                Kind::Typeface => Arc::strong_count(kit.typefaces.get(handle)?),
                Kind::TextBlob => Arc::strong_count(kit.text_blobs.get(handle)?),
                Kind::Data => Arc::strong_count(kit.data.get(handle)?),
                Kind::FontManager => Arc::strong_count(kit.font_managers.get(handle)?),
                kind => {
                    debug_assert!(!kind.is_shared(), "every shared kind is counted");
                    return Err(KitError::InvalidInput("not a shared object"));
                }
            })
        })
    }

    fn check(&self, handle: Handle) -> Result<(), KitError> {
        match kind_of(handle)? {
            Kind::PathBuilder => self.path_builders.get(handle).map(drop),
            Kind::Path => self.paths.get(handle).map(drop),
            Kind::Paint => self.paints.get(handle).map(drop),
            Kind::Surface => self.surfaces.get(handle).map(drop),
            Kind::Canvas => self.surfaces.get(handle.with_kind(Kind::Surface)).map(drop),
            Kind::Font => self.fonts.get(handle).map(drop),
            Kind::ParagraphBuilder => self.paragraph_builders.get(handle).map(drop),
            Kind::Paragraph => self.paragraphs.get(handle).map(drop),
            Kind::Image => self.images.get(handle).map(drop),
            Kind::Shader => self.shaders.get(handle).map(drop),
            Kind::ColorFilter => self.color_filters.get(handle).map(drop),
            Kind::Typeface => self.typefaces.get(handle).map(drop),
            Kind::TextBlob => self.text_blobs.get(handle).map(drop),
            Kind::Data => self.data.get(handle).map(drop),
            Kind::FontManager => self.font_managers.get(handle).map(drop),
        }
    }

    /// Run `f` and turn its error into the sentinel `T::default()`.
    fn call<T: Default>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, KitError>,
    ) -> T {
        match f(self) {
            Ok(value) => value,
            Err(err) => self.fail(name, err),
        }
    }

    /// Record `err` as the cause of a failure sentinel returned by `name`.
    pub(crate) fn fail<T: Default>(&mut self, name: &'static str, err: KitError) -> T {
        log::warn!("{name} failed: {err}");
        self.last_error = Some(err);
        T::default()
    }

    /// The GPU context, created from the configured factory on first use.
    fn gpu_context(&mut self) -> Result<GpuContext, KitError> {
        if matches!(self.gpu, GpuState::Pending) {
            self.gpu = match self.config.gpu.take().map(|factory| factory()) {
                Some(Ok(context)) => {
                    log::debug!("gpu context created");
                    GpuState::Ready(context)
                }
                Some(Err(err)) => {
                    log::warn!("gpu context creation failed: {err}");
                    GpuState::Failed
                }
                None => {
                    log::warn!("no gpu context factory configured");
                    GpuState::Failed
                }
            };
        }
        match &self.gpu {
            GpuState::Ready(context) => Ok(context.clone()),
            GpuState::Pending | GpuState::Failed => Err(RasterError::GpuUnavailable.into()),
        }
    }
}

fn kind_of(handle: Handle) -> Result<Kind, KitError> {
    if handle.is_null() {
        return Err(KitError::NullHandle(None));
    }
    handle
        .kind()
        .ok_or(KitError::InvalidInput("handle carries an unknown kind tag"))
}

/// Decode a numeric enumeration code.
fn decode<T>(
    what: &'static str,
    code: u32,
    from_code: fn(u32) -> Option<T>,
) -> Result<T, KitError> {
    from_code(code).ok_or(KitError::UnknownCode { what, code })
}

fn rect(left: f32, top: f32, right: f32, bottom: f32) -> Result<RectF, KitError> {
    let rect = RectF::new(left, top, right, bottom);
    if rect.is_finite() {
        Ok(rect)
    } else {
        Err(KitError::InvalidInput("rectangle coordinates must be finite"))
    }
}

/// A row-major 3x3 matrix, with `None` meaning identity.
fn matrix(values: Option<&[f32]>) -> Result<Matrix, KitError> {
    Matrix::from_slice(values).ok_or(KitError::InvalidInput("a matrix has nine elements"))
}

/// The surface behind a canvas handle.
fn canvas_surface(surfaces: &mut Arena<Surface>, canvas: Handle) -> Result<&mut Surface, KitError> {
    if canvas.is_null() {
        return Err(KitError::NullHandle(Some(Kind::Canvas)));
    }
    match canvas.kind() {
        Some(Kind::Canvas) => surfaces.get_mut(canvas.with_kind(Kind::Surface)),
        _ => Err(KitError::WrongKind {
            expected: Kind::Canvas,
            found: canvas.kind_code(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_recorded_and_taken() {
        let mut kit = Kit::default();
        kit.delete(Handle::NULL);
        assert!(kit.last_error().is_some(), "null delete is reported");
        assert!(kit.take_last_error().is_some(), "taken once");
        assert!(kit.last_error().is_none(), "cleared");
    }

    #[test]
    fn untyped_calls_report_null_as_handle_misuse() {
        let mut kit = Kit::default();
        kit.delete(Handle::NULL);
        assert!(matches!(kit.last_error(), Some(KitError::NullHandle(None))));
        assert!(kit.take_last_error().is_some_and(|e| e.is_handle_misuse()));
        assert_eq!(kit.ref_count(Handle::NULL), 0);
        assert!(matches!(kit.take_last_error(), Some(KitError::NullHandle(None))));
        assert!(!kit.is_live(Handle::NULL));
        kit.canvas_clear(Handle::NULL, 0);
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::NullHandle(Some(Kind::Canvas)))
        ));
    }

    #[test]
    fn delete_kind_rejects_other_kinds() {
        let mut kit = Kit::default();
        let paint = kit.make_paint();
        kit.delete_kind(Kind::Path, paint);
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::WrongKind { expected: Kind::Path, .. })
        ));
        assert!(kit.is_live(paint), "paint survives a mistyped delete");
        kit.delete_kind(Kind::Paint, paint);
        assert!(!kit.is_live(paint), "deleted");
        assert_eq!(kit.live_objects(), 0);
    }

    #[test]
    fn exclusive_objects_have_no_ref_count() {
        let mut kit = Kit::default();
        let paint = kit.make_paint();
        assert_eq!(kit.ref_count(paint), 0);
        assert!(matches!(kit.take_last_error(), Some(KitError::InvalidInput(_))));
    }

    #[test]
    fn gpu_surfaces_fail_without_a_factory() {
        let mut kit = Kit::default();
        assert_eq!(kit.make_gpu_surface(8, 8), Handle::NULL);
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::Raster(RasterError::GpuUnavailable))
        ));
    }
}
