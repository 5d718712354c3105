// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render targets.
//!
//! A surface keeps its committed pixels in a [`Pixmap`] and records new
//! drawing into a [`RenderContext`]. Committing rasterizes the context over
//! the previous pixels, which are replayed as a backdrop image, so drawing
//! accumulates like an immediate-mode canvas.

use std::fmt;

use kurbo::{Affine, BezPath, Rect};
use peniko::{Blob, Fill, ImageAlphaType, ImageData, ImageQuality, ImageSampler};
use stipple_imaging::{Argb, ImageFormat, Matrix, ScopedStack, premultiply};
use vello_cpu::{Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};

use crate::canvas::Canvas;
use crate::gpu::{GpuContext, GpuTarget};
use crate::image::{checked_len, encode_premul, reserve_pixels};
use crate::pixels::{BYTES_PER_PIXEL, ReadRect, copy_rect};
use crate::{Image, RasterError};

/// Rasterizer settings applied to new surfaces.
#[derive(Copy, Clone, Debug)]
pub struct SurfaceOptions {
    /// Pipeline precision. [`RenderMode::OptimizeSpeed`] selects the
    /// deterministic u8 pipeline.
    pub render_mode: RenderMode,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::OptimizeSpeed,
        }
    }
}

impl SurfaceOptions {
    /// Settings for a new render context.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            render_mode: self.render_mode,
            ..RenderSettings::default()
        }
    }
}

/// One saved canvas state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct DrawState {
    pub(crate) matrix: Matrix,
    /// Number of clip layers in effect.
    pub(crate) clip_depth: usize,
}

/// A clip in device space.
#[derive(Clone, Debug)]
pub(crate) struct ClipLayer {
    pub(crate) path: BezPath,
    pub(crate) fill: Fill,
}

#[derive(Debug)]
enum Backing {
    Cpu,
    Gpu {
        context: GpuContext,
        target: GpuTarget,
    },
}

/// A fixed-size render target holding premultiplied RGBA8 pixels.
pub struct Surface {
    width: u16,
    height: u16,
    ctx: RenderContext,
    pixmap: Pixmap,
    /// Whether `pixmap` holds pixels that must be replayed under new drawing.
    has_backdrop: bool,
    /// Whether `ctx` holds drawing not yet committed to `pixmap`.
    pending: bool,
    pub(crate) state: ScopedStack<DrawState>,
    /// Open clip layers, outermost first. `ctx` always has exactly this many
    /// layers pushed.
    pub(crate) clips: Vec<ClipLayer>,
    backing: Backing,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("save_count", &(self.state.depth() + 1))
            .field("clips", &self.clips.len())
            .field("backing", &self.backing)
            .finish_non_exhaustive()
    }
}

/// Validate a surface size and check that its pixels can be allocated.
fn checked_size(width: u32, height: u32) -> Result<(u16, u16), RasterError> {
    let len = checked_len(width, height)?;
    // The pixmap and the replayed backdrop each hold `len` bytes.
    let total = len
        .checked_mul(2)
        .ok_or(RasterError::TooLarge { width, height })?;
    reserve_pixels(total)?;
    let err = || RasterError::InvalidDimensions { width, height };
    Ok((
        u16::try_from(width).map_err(|_| err())?,
        u16::try_from(height).map_err(|_| err())?,
    ))
}

impl Surface {
    fn with_backing(
        width: u16,
        height: u16,
        options: &SurfaceOptions,
        backing: Backing,
    ) -> Self {
        Self {
            width,
            height,
            ctx: RenderContext::new_with(width, height, options.render_settings()),
            pixmap: Pixmap::new(width, height),
            has_backdrop: false,
            pending: false,
            state: ScopedStack::default(),
            clips: Vec::new(),
            backing,
        }
    }

    /// A CPU-backed surface, initially transparent.
    pub fn new_raster(
        width: u32,
        height: u32,
        options: &SurfaceOptions,
    ) -> Result<Self, RasterError> {
        let (w, h) = checked_size(width, height)?;
        log::debug!("raster surface {w}x{h}");
        Ok(Self::with_backing(w, h, options, Backing::Cpu))
    }

    /// A surface whose frames are presented to a render target of `context`.
    pub fn new_gpu(
        context: &GpuContext,
        width: u32,
        height: u32,
        options: &SurfaceOptions,
    ) -> Result<Self, RasterError> {
        let (w, h) = checked_size(width, height)?;
        let target = context.create_target(w, h)?;
        log::debug!("gpu surface {w}x{h} on target {}", target.0);
        Ok(Self::with_backing(
            w,
            h,
            options,
            Backing::Gpu {
                context: context.clone(),
                target,
            },
        ))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Whether frames are presented to a GPU render target.
    pub fn is_gpu(&self) -> bool {
        matches!(self.backing, Backing::Gpu { .. })
    }

    /// The drawing interface bound to this surface.
    ///
    /// The transform and clip stack live in the surface, so every canvas
    /// obtained here observes the same state.
    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(self)
    }

    /// Committed premultiplied RGBA8 pixels.
    pub fn pixels(&mut self) -> &[u8] {
        self.commit();
        self.pixmap.data_as_u8_slice()
    }

    /// Copy a region as premultiplied RGBA8 into `dst` with stride
    /// `row_bytes`.
    ///
    /// The whole rectangle must lie inside the surface. Nothing is written
    /// on failure.
    pub fn read_pixels_rgba8888(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        dst: &mut [u8],
        row_bytes: usize,
    ) -> Result<(), RasterError> {
        let rect = ReadRect::new(x, y, width, height, self.width(), self.height())?;
        let stride = usize::from(self.width);
        copy_rect(self.pixels(), stride, rect, dst, row_bytes)
    }

    /// An immutable copy of the current pixels.
    pub fn make_image_snapshot(&mut self) -> Result<Image, RasterError> {
        let (w, h) = (self.width(), self.height());
        let pixels = self.pixels();
        let mut copy = reserve_pixels(pixels.len())?;
        copy.extend_from_slice(pixels);
        Image::from_premul_rgba8(w, h, copy)
    }

    /// Encode the current pixels without an intermediate image.
    pub fn encode(&mut self, format: ImageFormat) -> Result<Vec<u8>, RasterError> {
        let (w, h) = (self.width(), self.height());
        encode_premul(w, h, self.pixels(), format)
    }

    /// Commit pending drawing and, for GPU surfaces, present the frame.
    pub fn flush(&mut self) -> Result<(), RasterError> {
        self.commit();
        if let Backing::Gpu { context, target } = &self.backing {
            context.present(
                *target,
                self.width,
                self.height,
                self.pixmap.data_as_u8_slice(),
            )?;
        }
        Ok(())
    }

    /// Mark the context as holding new drawing and hand it out.
    pub(crate) fn begin_draw(&mut self) -> &mut RenderContext {
        self.pending = true;
        &mut self.ctx
    }

    pub(crate) fn device_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Push a device-space clip layer.
    pub(crate) fn push_clip(&mut self, clip: ClipLayer) {
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_fill_rule(clip.fill);
        self.ctx.push_clip_layer(&clip.path);
        self.clips.push(clip);
    }

    /// Pop clip layers until `depth` remain.
    pub(crate) fn pop_clips_to(&mut self, depth: usize) {
        while self.clips.len() > depth {
            self.clips.pop();
            self.ctx.pop_layer();
        }
    }

    /// Replace every pixel with `color`, dropping pending drawing.
    ///
    /// Only valid without open clips.
    pub(crate) fn fill_all(&mut self, color: Argb) {
        debug_assert!(self.clips.is_empty(), "fill_all ignores clips");
        self.ctx.reset();
        let px = premultiply(color.to_rgba8());
        for dst in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
            dst.copy_from_slice(&px);
        }
        self.pending = false;
        self.has_backdrop = true;
        self.restart();
    }

    /// Rasterize pending drawing into the committed pixels.
    fn commit(&mut self) {
        if !self.pending {
            return;
        }
        for _ in 0..self.clips.len() {
            self.ctx.pop_layer();
        }
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx.reset();
        self.pending = false;
        self.has_backdrop = true;
        self.restart();
        log::trace!("committed {}x{} surface", self.width, self.height);
    }

    /// Seed an empty context with the committed pixels and reopen the clips.
    fn restart(&mut self) {
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_paint_transform(Affine::IDENTITY);
        if self.has_backdrop {
            let data = ImageData {
                data: Blob::from(self.pixmap.data_as_u8_slice().to_vec()),
                format: peniko::ImageFormat::Rgba8,
                alpha_type: ImageAlphaType::AlphaPremultiplied,
                width: u32::from(self.width),
                height: u32::from(self.height),
            };
            self.ctx.set_fill_rule(Fill::NonZero);
            self.ctx.set_paint(CpuImage {
                image: ImageSource::from_peniko_image_data(&data),
                sampler: ImageSampler {
                    quality: ImageQuality::Low,
                    ..ImageSampler::default()
                },
            });
            let rect = self.device_rect();
            self.ctx.fill_rect(&rect);
        }
        for clip in &self.clips {
            self.ctx.set_fill_rule(clip.fill);
            self.ctx.push_clip_layer(&clip.path);
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        if let Backing::Gpu { context, target } = &self.backing {
            context.release_target(*target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::GpuError;
    use crate::gpu::GpuDevice;

    #[derive(Default)]
    struct Frames {
        targets: u64,
        presented: Vec<(GpuTarget, Vec<u8>)>,
        released: Vec<GpuTarget>,
    }

    struct TestDevice(Rc<RefCell<Frames>>);

    impl GpuDevice for TestDevice {
        fn create_target(&mut self, _: u16, _: u16) -> Result<GpuTarget, GpuError> {
            let mut frames = self.0.borrow_mut();
            frames.targets += 1;
            Ok(GpuTarget(frames.targets))
        }

        fn present(
            &mut self,
            target: GpuTarget,
            _: u16,
            _: u16,
            pixels: &[u8],
        ) -> Result<(), GpuError> {
            self.0.borrow_mut().presented.push((target, pixels.to_vec()));
            Ok(())
        }

        fn release_target(&mut self, target: GpuTarget) {
            self.0.borrow_mut().released.push(target);
        }
    }

    struct FailingDevice;

    impl GpuDevice for FailingDevice {
        fn create_target(&mut self, _: u16, _: u16) -> Result<GpuTarget, GpuError> {
            Err(GpuError("out of memory".into()))
        }

        fn present(&mut self, _: GpuTarget, _: u16, _: u16, _: &[u8]) -> Result<(), GpuError> {
            Ok(())
        }
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        let options = SurfaceOptions::default();
        assert!(Surface::new_raster(0, 10, &options).is_err());
        assert!(Surface::new_raster(10, 0, &options).is_err());
        assert!(Surface::new_raster(65_536, 1, &options).is_err());
        assert!(Surface::new_raster(65_535, 1, &options).is_ok());
    }

    #[test]
    fn oversized_surfaces_fail_before_allocating() {
        let options = SurfaceOptions::default();
        assert!(matches!(
            Surface::new_raster(65_535, 65_535, &options),
            Err(RasterError::TooLarge {
                width: 65_535,
                height: 65_535
            })
        ));
        assert!(matches!(
            Surface::new_raster(8193, 8192, &options),
            Err(RasterError::TooLarge { .. })
        ));
    }

    #[test]
    fn new_surface_is_transparent() {
        let mut surface = Surface::new_raster(3, 2, &SurfaceOptions::default()).expect("valid");
        assert!(surface.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_reads_back_in_rgba_order() {
        let mut surface = Surface::new_raster(4, 3, &SurfaceOptions::default()).expect("valid");
        surface.canvas().clear(Argb::RED);
        let mut dst = vec![0; 4 * 3 * 4];
        surface
            .read_pixels_rgba8888(0, 0, 4, 3, &mut dst, 16)
            .expect("in bounds");
        assert!(dst.chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn failed_read_leaves_destination_untouched() {
        let mut surface = Surface::new_raster(4, 4, &SurfaceOptions::default()).expect("valid");
        surface.canvas().clear(Argb::WHITE);
        let mut dst = vec![9; 64];
        assert!(surface.read_pixels_rgba8888(2, 2, 4, 4, &mut dst, 16).is_err());
        assert!(surface.read_pixels_rgba8888(0, 0, 4, 4, &mut dst[..60], 16).is_err());
        assert!(surface.read_pixels_rgba8888(0, 0, 4, 4, &mut dst, 12).is_err());
        assert!(dst.iter().all(|&b| b == 9));
    }

    #[test]
    fn gpu_surface_presents_normalized_frames() {
        let frames = Rc::new(RefCell::new(Frames::default()));
        let context = GpuContext::new(TestDevice(frames.clone()));
        {
            let mut surface =
                Surface::new_gpu(&context, 2, 2, &SurfaceOptions::default()).expect("target");
            assert!(surface.is_gpu());
            surface.canvas().clear(Argb::BLUE);
            surface.flush().expect("presents");
            let frames = frames.borrow();
            let (target, pixels) = frames.presented.last().expect("one frame");
            assert_eq!(*target, GpuTarget(1));
            assert!(pixels.chunks_exact(4).all(|p| p == [0, 0, 255, 255]));
        }
        assert_eq!(frames.borrow().released, [GpuTarget(1)]);
    }

    #[test]
    fn gpu_target_failure_fails_surface_creation() {
        let context = GpuContext::new(FailingDevice);
        assert!(matches!(
            Surface::new_gpu(&context, 4, 4, &SurfaceOptions::default()),
            Err(RasterError::Gpu(_))
        ));
    }
}
