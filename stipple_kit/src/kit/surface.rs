// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surfaces and the canvas calls that draw into them.

use std::sync::Arc;

use stipple_imaging::{
    Argb, BlendMode, ClipOp, FilterMode, ImageFormat, MipmapMode, RectF, SamplingOptions,
};
use stipple_raster::Surface;
use stipple_text::TextCanvasExt;

use super::geometry::path_of;
use super::paint::optional_paint;
use super::{Kit, canvas_surface, decode, matrix, rect};
use crate::{Handle, Kind, KitError};

impl Kit {
    /// A CPU surface of `width` by `height` pixels, initially transparent.
    pub fn make_sw_surface(&mut self, width: u32, height: u32) -> Handle {
        self.call("MakeSWCanvasSurface", |kit| {
            let surface = Surface::new_raster(width, height, &kit.config.surface)?;
            kit.surfaces.insert(surface)
        })
    }

    /// A surface presented through the GPU context.
    ///
    /// The context is created from [`KitConfig::gpu`](crate::KitConfig::gpu)
    /// on the first request.
    pub fn make_gpu_surface(&mut self, width: u32, height: u32) -> Handle {
        self.call("MakeCanvasSurface", |kit| {
            let context = kit.gpu_context()?;
            let surface = Surface::new_gpu(&context, width, height, &kit.config.surface)?;
            kit.surfaces.insert(surface)
        })
    }

    /// Width in pixels.
    pub fn surface_width(&mut self, surface: Handle) -> u32 {
        self.call("Surface_width", |kit| Ok(kit.surfaces.get(surface)?.width()))
    }

    /// Height in pixels.
    pub fn surface_height(&mut self, surface: Handle) -> u32 {
        self.call("Surface_height", |kit| Ok(kit.surfaces.get(surface)?.height()))
    }

    /// Whether the surface presents to a GPU target.
    pub fn surface_is_gpu(&mut self, surface: Handle) -> bool {
        self.call("Surface_isGPU", |kit| Ok(kit.surfaces.get(surface)?.is_gpu()))
    }

    /// The canvas of a surface.
    ///
    /// Every call returns the same handle. It stays valid until the surface
    /// is deleted.
    pub fn surface_get_canvas(&mut self, surface: Handle) -> Handle {
        self.call("Surface_getCanvas", |kit| {
            kit.surfaces.get(surface)?;
            Ok(surface.with_kind(Kind::Canvas))
        })
    }

    /// Commit drawing and present GPU frames.
    pub fn surface_flush(&mut self, surface: Handle) -> bool {
        self.call("Surface_flush", |kit| {
            kit.surfaces.get_mut(surface)?.flush()?;
            Ok(true)
        })
    }

    /// Copy a region as premultiplied RGBA8 with stride `row_bytes`.
    ///
    /// Returns `false` and leaves `dst` untouched when the region leaves the
    /// surface or `dst` is too short.
    pub fn surface_read_pixels(
        &mut self,
        surface: Handle,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        dst: &mut [u8],
        row_bytes: usize,
    ) -> bool {
        self.call("Surface_readPixels", |kit| {
            kit.surfaces
                .get_mut(surface)?
                .read_pixels_rgba8888(x, y, width, height, dst, row_bytes)?;
            Ok(true)
        })
    }

    /// An image of the current pixels.
    pub fn surface_make_image_snapshot(&mut self, surface: Handle) -> Handle {
        self.call("Surface_makeImageSnapshot", |kit| {
            let image = kit.surfaces.get_mut(surface)?.make_image_snapshot()?;
            kit.images.insert(Arc::new(image))
        })
    }

    /// The current pixels encoded into a data object.
    pub fn surface_encode(&mut self, surface: Handle, format: u32) -> Handle {
        self.call("Surface_encodeToData", |kit| {
            let format = decode("image format", format, ImageFormat::from_code)?;
            let bytes = kit.surfaces.get_mut(surface)?.encode(format)?;
            kit.data.insert(bytes.into())
        })
    }

    // Fills.

    /// Replace every pixel inside the clip with `color`.
    pub fn canvas_clear(&mut self, canvas: Handle, color: u32) {
        self.call("Canvas_clear", |kit| {
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .clear(Argb(color));
            Ok(())
        });
    }

    /// Fill the clip with a paint.
    pub fn canvas_draw_paint(&mut self, canvas: Handle, paint: Handle) {
        self.call("Canvas_drawPaint", |kit| {
            let paint = kit.paints.get(paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_paint(paint);
            Ok(())
        });
    }

    /// Fill the clip with a color under a blend mode code.
    pub fn canvas_draw_color(&mut self, canvas: Handle, color: u32, mode: u32) {
        self.call("Canvas_drawColor", |kit| {
            let mode = decode("blend mode", mode, BlendMode::from_code)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_color(Argb(color), mode);
            Ok(())
        });
    }

    // Shapes.

    /// Draw a rectangle.
    pub fn canvas_draw_rect(
        &mut self,
        canvas: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        paint: Handle,
    ) {
        self.call("Canvas_drawRect", |kit| {
            let r = rect(left, top, right, bottom)?;
            let paint = kit.paints.get(paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_rect(r, paint);
            Ok(())
        });
    }

    /// Draw a rounded rectangle.
    pub fn canvas_draw_rrect(
        &mut self,
        canvas: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        rx: f32,
        ry: f32,
        paint: Handle,
    ) {
        self.call("Canvas_drawRRect", |kit| {
            let r = rect(left, top, right, bottom)?;
            let paint = kit.paints.get(paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_rrect(r, rx, ry, paint);
            Ok(())
        });
    }

    /// Draw the ellipse inscribed in a rectangle.
    pub fn canvas_draw_oval(
        &mut self,
        canvas: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        paint: Handle,
    ) {
        self.call("Canvas_drawOval", |kit| {
            let r = rect(left, top, right, bottom)?;
            let paint = kit.paints.get(paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_oval(r, paint);
            Ok(())
        });
    }

    /// Draw a circle.
    pub fn canvas_draw_circle(&mut self, canvas: Handle, cx: f32, cy: f32, r: f32, paint: Handle) {
        self.call("Canvas_drawCircle", |kit| {
            let paint = kit.paints.get(paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_circle(cx, cy, r, paint);
            Ok(())
        });
    }

    /// Stroke a line segment. Fill-only paints are stroked as hairlines.
    pub fn canvas_draw_line(
        &mut self,
        canvas: Handle,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        paint: Handle,
    ) {
        self.call("Canvas_drawLine", |kit| {
            let paint = kit.paints.get(paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_line(x0, y0, x1, y1, paint);
            Ok(())
        });
    }

    /// Draw a path snapshot or the current geometry of a path builder.
    pub fn canvas_draw_path(&mut self, canvas: Handle, path: Handle, paint: Handle) {
        self.call("Canvas_drawPath", |kit| {
            let path = path_of(&kit.path_builders, &kit.paths, path)?;
            let paint = kit.paints.get(paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_path(path, paint);
            Ok(())
        });
    }

    // Images and text.

    /// Draw an image with its top-left corner at `(x, y)`.
    ///
    /// A [`Handle::NULL`] paint draws with full opacity and source-over.
    pub fn canvas_draw_image(
        &mut self,
        canvas: Handle,
        image: Handle,
        x: f32,
        y: f32,
        filter: u32,
        mipmap: u32,
        paint: Handle,
    ) {
        self.call("Canvas_drawImage", |kit| {
            let sampling = sampling(filter, mipmap)?;
            let image = kit.images.get(image)?;
            let paint = optional_paint(&kit.paints, paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_image(image, x, y, sampling, paint);
            Ok(())
        });
    }

    /// Draw the `src` region of an image scaled into `dst`, both given as
    /// `[left, top, right, bottom]`.
    pub fn canvas_draw_image_rect(
        &mut self,
        canvas: Handle,
        image: Handle,
        src: &[f32; 4],
        dst: &[f32; 4],
        filter: u32,
        mipmap: u32,
        paint: Handle,
    ) {
        self.call("Canvas_drawImageRect", |kit| {
            let sampling = sampling(filter, mipmap)?;
            let src = rect(src[0], src[1], src[2], src[3])?;
            let dst = rect(dst[0], dst[1], dst[2], dst[3])?;
            let image = kit.images.get(image)?;
            let paint = optional_paint(&kit.paints, paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_image_rect(image, src, dst, sampling, paint);
            Ok(())
        });
    }

    /// Draw a text blob with its origin at `(x, y)`.
    pub fn canvas_draw_text_blob(
        &mut self,
        canvas: Handle,
        blob: Handle,
        x: f32,
        y: f32,
        paint: Handle,
    ) {
        self.call("Canvas_drawTextBlob", |kit| {
            let blob = kit.text_blobs.get(blob)?;
            let paint = kit.paints.get(paint)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_text_blob(blob, x, y, paint);
            Ok(())
        });
    }

    /// Draw a laid-out paragraph with its top-left corner at `(x, y)`.
    pub fn canvas_draw_paragraph(&mut self, canvas: Handle, paragraph: Handle, x: f32, y: f32) {
        self.call("Canvas_drawParagraph", |kit| {
            let paragraph = kit.paragraphs.get(paragraph)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .draw_paragraph(paragraph, x, y);
            Ok(())
        });
    }

    // State.

    /// Push the transform and clip. Returns the save count before the push.
    pub fn canvas_save(&mut self, canvas: Handle) -> usize {
        self.call("Canvas_save", |kit| {
            Ok(canvas_surface(&mut kit.surfaces, canvas)?.canvas().save())
        })
    }

    /// Pop the most recent save. Does nothing at the base level.
    pub fn canvas_restore(&mut self, canvas: Handle) {
        self.call("Canvas_restore", |kit| {
            canvas_surface(&mut kit.surfaces, canvas)?.canvas().restore();
            Ok(())
        });
    }

    /// Pop saves until the count is `count`, never below one.
    pub fn canvas_restore_to_count(&mut self, canvas: Handle, count: usize) {
        self.call("Canvas_restoreToCount", |kit| {
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .restore_to_count(count);
            Ok(())
        });
    }

    /// Number of saved states, starting at one.
    pub fn canvas_save_count(&mut self, canvas: Handle) -> usize {
        self.call("Canvas_getSaveCount", |kit| {
            Ok(canvas_surface(&mut kit.surfaces, canvas)?.canvas().save_count())
        })
    }

    // Transform.

    /// Pre-concatenate a translation.
    pub fn canvas_translate(&mut self, canvas: Handle, dx: f32, dy: f32) {
        self.call("Canvas_translate", |kit| {
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .translate(dx, dy);
            Ok(())
        });
    }

    /// Pre-concatenate a scale.
    pub fn canvas_scale(&mut self, canvas: Handle, sx: f32, sy: f32) {
        self.call("Canvas_scale", |kit| {
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .scale(sx, sy);
            Ok(())
        });
    }

    /// Pre-concatenate a rotation in degrees.
    pub fn canvas_rotate(&mut self, canvas: Handle, degrees: f32) {
        self.call("Canvas_rotate", |kit| {
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .rotate(degrees);
            Ok(())
        });
    }

    /// Pre-concatenate a skew.
    pub fn canvas_skew(&mut self, canvas: Handle, kx: f32, ky: f32) {
        self.call("Canvas_skew", |kit| {
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .skew(kx, ky);
            Ok(())
        });
    }

    /// Pre-concatenate a row-major 3x3 matrix. `None` means identity.
    pub fn canvas_concat(&mut self, canvas: Handle, m: Option<&[f32]>) -> bool {
        self.call("Canvas_concat", |kit| {
            let m = matrix(m)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .concat(&m);
            Ok(true)
        })
    }

    /// Replace the transform. `None` means identity.
    pub fn canvas_set_matrix(&mut self, canvas: Handle, m: Option<&[f32]>) -> bool {
        self.call("Canvas_setMatrix", |kit| {
            let m = matrix(m)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .set_matrix(&m);
            Ok(true)
        })
    }

    /// Reset the transform to identity.
    pub fn canvas_reset_matrix(&mut self, canvas: Handle) {
        self.call("Canvas_resetMatrix", |kit| {
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .reset_matrix();
            Ok(())
        });
    }

    /// Write the current transform in row-major order.
    pub fn canvas_total_matrix(&mut self, canvas: Handle, out: &mut [f32; 9]) -> bool {
        self.call("Canvas_getTotalMatrix", |kit| {
            *out = canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .total_matrix()
                .0;
            Ok(true)
        })
    }

    // Clipping.

    /// Combine a rectangle into the clip under a clip op code.
    pub fn canvas_clip_rect(
        &mut self,
        canvas: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        op: u32,
        anti_alias: bool,
    ) -> bool {
        self.call("Canvas_clipRect", |kit| {
            let op = decode("clip op", op, ClipOp::from_code)?;
            let r = rect(left, top, right, bottom)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .clip_rect(r, op, anti_alias);
            Ok(true)
        })
    }

    /// Combine a path snapshot or builder into the clip.
    pub fn canvas_clip_path(
        &mut self,
        canvas: Handle,
        path: Handle,
        op: u32,
        anti_alias: bool,
    ) -> bool {
        self.call("Canvas_clipPath", |kit| {
            let op = decode("clip op", op, ClipOp::from_code)?;
            let path = path_of(&kit.path_builders, &kit.paths, path)?;
            canvas_surface(&mut kit.surfaces, canvas)?
                .canvas()
                .clip_path(path, op, anti_alias);
            Ok(true)
        })
    }
}

fn sampling(filter: u32, mipmap: u32) -> Result<SamplingOptions, KitError> {
    Ok(SamplingOptions::new(
        decode("filter mode", filter, FilterMode::from_code)?,
        decode("mipmap mode", mipmap, MipmapMode::from_code)?,
    ))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use stipple_raster::{GpuContext, GpuDevice, GpuError, GpuTarget, RasterError};

    use super::*;
    use crate::KitConfig;

    fn pixel(kit: &mut Kit, surface: Handle, x: i32, y: i32) -> [u8; 4] {
        let mut px = [0; 4];
        assert!(kit.surface_read_pixels(surface, x, y, 1, 1, &mut px, 4), "in bounds");
        px
    }

    #[test]
    fn canvas_handle_follows_its_surface() {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(8, 8);
        let canvas = kit.surface_get_canvas(surface);
        assert_eq!(canvas.kind(), Some(Kind::Canvas));
        assert_eq!(kit.surface_get_canvas(surface), canvas, "stable");
        assert!(kit.is_live(canvas), "live with the surface");
        kit.delete(canvas);
        assert!(matches!(kit.take_last_error(), Some(KitError::InvalidInput(_))));
        kit.delete(surface);
        assert!(!kit.is_live(canvas), "gone with the surface");
        kit.canvas_clear(canvas, 0xFFFF_FFFF);
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::StaleHandle(Kind::Surface))
        ));
    }

    #[test]
    fn surface_handles_are_not_canvases() {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(2, 2);
        kit.canvas_clear(surface, 0xFFFF_FFFF);
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::WrongKind { expected: Kind::Canvas, .. })
        ));
    }

    #[test]
    fn rect_with_paint_reads_back() {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(10, 10);
        let canvas = kit.surface_get_canvas(surface);
        let paint = kit.make_paint();
        kit.paint_set_color(paint, 0xFF00_00FF);
        kit.canvas_draw_rect(canvas, 2.0, 2.0, 6.0, 6.0, paint);
        assert_eq!(pixel(&mut kit, surface, 3, 3), [0, 0, 255, 255]);
        assert_eq!(pixel(&mut kit, surface, 8, 8), [0, 0, 0, 0]);
        assert!(kit.last_error().is_none(), "no failures");
    }

    #[test]
    fn transform_round_trips_through_total_matrix() {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(4, 4);
        let canvas = kit.surface_get_canvas(surface);
        assert_eq!(kit.canvas_save(canvas), 1);
        kit.canvas_translate(canvas, 3.0, 4.0);
        kit.canvas_scale(canvas, 2.0, 2.0);
        let mut m = [0.0; 9];
        assert!(kit.canvas_total_matrix(canvas, &mut m), "read");
        assert_eq!(m, [2.0, 0.0, 3.0, 0.0, 2.0, 4.0, 0.0, 0.0, 1.0]);
        assert!(kit.canvas_set_matrix(canvas, None), "identity");
        kit.canvas_total_matrix(canvas, &mut m);
        assert_eq!(m, [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(!kit.canvas_concat(canvas, Some(&[1.0; 3][..])), "short matrix");
        kit.canvas_restore_to_count(canvas, 1);
        assert_eq!(kit.canvas_save_count(canvas), 1);
    }

    #[test]
    fn clip_codes_are_decoded() {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(10, 10);
        let canvas = kit.surface_get_canvas(surface);
        assert!(!kit.canvas_clip_rect(canvas, 0.0, 0.0, 5.0, 5.0, 2, false), "bad op");
        assert!(kit.canvas_clip_rect(canvas, 0.0, 0.0, 5.0, 5.0, 0, false), "difference");
        kit.canvas_clear(canvas, 0xFF00_FF00);
        assert_eq!(pixel(&mut kit, surface, 2, 2), [0, 0, 0, 0]);
        assert_eq!(pixel(&mut kit, surface, 7, 7), [0, 255, 0, 255]);
    }

    #[test]
    fn path_builders_draw_their_current_geometry() {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(10, 10);
        let canvas = kit.surface_get_canvas(surface);
        let builder = kit.make_path_builder();
        kit.path_add_rect(builder, 0.0, 0.0, 4.0, 4.0);
        let paint = kit.make_paint();
        kit.canvas_draw_path(canvas, builder, paint);
        assert_eq!(pixel(&mut kit, surface, 1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn snapshots_and_encodings_become_shared_objects() {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(3, 2);
        let canvas = kit.surface_get_canvas(surface);
        kit.canvas_clear(canvas, 0xFFFF_0000);
        let image = kit.surface_make_image_snapshot(surface);
        assert_eq!((kit.image_width(image), kit.image_height(image)), (3, 2));
        let png = kit.surface_encode(surface, 0);
        assert!(kit.data_size(png) > 8, "png stream");
        assert_eq!(kit.surface_encode(surface, 1), Handle::NULL, "no jpeg codec");
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::Raster(RasterError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn null_image_paint_draws_plainly() {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(4, 4);
        let canvas = kit.surface_get_canvas(surface);
        let image = kit.make_image_raster(1, 1, &[0, 255, 0, 255], false);
        kit.canvas_draw_image(canvas, image, 2.0, 2.0, 0, 0, Handle::NULL);
        assert_eq!(pixel(&mut kit, surface, 2, 2), [0, 255, 0, 255]);
        assert_eq!(pixel(&mut kit, surface, 1, 1), [0, 0, 0, 0]);
        kit.canvas_draw_image_rect(
            canvas,
            image,
            &[0.0, 0.0, 1.0, 1.0],
            &[0.0, 0.0, 2.0, 2.0],
            0,
            0,
            Handle::NULL,
        );
        assert_eq!(pixel(&mut kit, surface, 1, 1), [0, 255, 0, 255]);
    }

    struct Recorder(Rc<RefCell<Vec<Vec<u8>>>>);

    impl GpuDevice for Recorder {
        fn create_target(&mut self, _: u16, _: u16) -> Result<GpuTarget, GpuError> {
            Ok(GpuTarget(1))
        }

        fn present(&mut self, _: GpuTarget, _: u16, _: u16, pixels: &[u8]) -> Result<(), GpuError> {
            self.0.borrow_mut().push(pixels.to_vec());
            Ok(())
        }
    }

    #[test]
    fn gpu_surfaces_present_on_flush() {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let device = Recorder(Rc::clone(&frames));
        let config = KitConfig::default().with_gpu(move || Ok(GpuContext::new(device)));
        let mut kit = Kit::new(config);
        let surface = kit.make_gpu_surface(2, 1);
        assert!(kit.surface_is_gpu(surface), "gpu backed");
        let canvas = kit.surface_get_canvas(surface);
        kit.canvas_clear(canvas, 0xFF00_00FF);
        assert!(kit.surface_flush(surface), "presented");
        assert_eq!(frames.borrow().as_slice(), &[vec![0, 0, 255, 255, 0, 0, 255, 255]]);
        let second = kit.make_gpu_surface(1, 1);
        assert!(!second.is_null(), "context is reused");
    }

    #[test]
    fn failed_gpu_context_is_remembered() {
        let mut calls = 0;
        let config = KitConfig::default().with_gpu(move || {
            calls += 1;
            Err(GpuError(format!("no adapter ({calls})")))
        });
        let mut kit = Kit::new(config);
        assert_eq!(kit.make_gpu_surface(4, 4), Handle::NULL);
        assert_eq!(kit.make_gpu_surface(4, 4), Handle::NULL);
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::Raster(RasterError::GpuUnavailable))
        ));
        assert!(!kit.make_sw_surface(4, 4).is_null(), "raster still works");
    }
}
