// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-level checks through the flat call surface.

use std::cell::RefCell;
use std::rc::Rc;

use stipple_kit::{Handle, Kit, KitConfig, KitError};
use stipple_raster::{GpuContext, GpuDevice, GpuError, GpuTarget, RasterError};

const OPAQUE_RED: u32 = 0xFFFF_0000;

fn read_all(kit: &mut Kit, surface: Handle, width: u32, height: u32) -> Vec<u8> {
    let row_bytes = width as usize * 4;
    let mut rgba = vec![0; row_bytes * height as usize];
    assert!(
        kit.surface_read_pixels(surface, 0, 0, width, height, &mut rgba, row_bytes),
        "read {:?}",
        kit.last_error()
    );
    rgba
}

struct Frames(Rc<RefCell<Vec<Vec<u8>>>>);

impl GpuDevice for Frames {
    fn create_target(&mut self, _: u16, _: u16) -> Result<GpuTarget, GpuError> {
        Ok(GpuTarget(7))
    }

    fn present(&mut self, _: GpuTarget, _: u16, _: u16, pixels: &[u8]) -> Result<(), GpuError> {
        self.0.borrow_mut().push(pixels.to_vec());
        Ok(())
    }
}

#[test]
fn clear_reaches_every_pixel_on_both_backings() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let device = Frames(Rc::clone(&frames));
    let config = KitConfig::default().with_gpu(move || Ok(GpuContext::new(device)));
    let mut kit = Kit::new(config);

    for surface in [kit.make_sw_surface(5, 3), kit.make_gpu_surface(5, 3)] {
        assert!(!surface.is_null(), "surface created");
        let canvas = kit.surface_get_canvas(surface);
        kit.canvas_clear(canvas, OPAQUE_RED);
        let rgba = read_all(&mut kit, surface, 5, 3);
        assert!(rgba.chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
        assert!(kit.surface_flush(surface), "flush");
    }

    let frames = frames.borrow();
    assert_eq!(frames.len(), 1, "only the gpu surface presents");
    assert_eq!(frames[0].len(), 5 * 3 * 4);
    assert!(frames[0].chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
}

#[test]
fn encoded_surface_decodes_to_the_same_fill() {
    let mut kit = Kit::default();
    let surface = kit.make_sw_surface(6, 4);
    let canvas = kit.surface_get_canvas(surface);
    kit.canvas_clear(canvas, 0x8033_66CC);
    let original = read_all(&mut kit, surface, 6, 4);

    let png = kit.surface_encode(surface, 0);
    let mut bytes = vec![0; kit.data_size(png)];
    kit.data_copy(png, &mut bytes);
    let image = kit.make_image_from_encoded(&bytes);
    assert_eq!(kit.image_width(image), 6);
    assert_eq!(kit.image_height(image), 4);

    let mut decoded = vec![0; original.len()];
    assert!(kit.image_read_pixels(image, 0, 0, 6, 4, &mut decoded, 24), "read");
    for (a, b) in original.iter().zip(&decoded) {
        assert!(a.abs_diff(*b) <= 1, "{a} vs {b}");
    }
}

#[test]
fn gradient_runs_between_its_end_colors() {
    let mut kit = Kit::default();
    let surface = kit.make_sw_surface(64, 1);
    let canvas = kit.surface_get_canvas(surface);
    let colors = [OPAQUE_RED, 0xFF00_00FF];
    let shader = kit.make_linear_gradient(0.0, 0.0, 64.0, 0.0, &colors, None, 0);
    let paint = kit.make_paint();
    kit.paint_set_shader(paint, shader);
    kit.canvas_draw_paint(canvas, paint);

    let rgba = read_all(&mut kit, surface, 64, 1);
    let first = &rgba[..4];
    let last = &rgba[rgba.len() - 4..];
    assert!(first[0] > 240 && first[2] < 16, "{first:?}");
    assert!(last[2] > 240 && last[0] < 16, "{last:?}");
    assert!(rgba.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn color_filter_tints_the_paint() {
    let mut kit = Kit::default();
    let surface = kit.make_sw_surface(2, 2);
    let canvas = kit.surface_get_canvas(surface);
    // Source-in keeps the filter color wherever the paint is opaque.
    let filter = kit.make_color_filter_blend(0xFF00_FF00, 5);
    let paint = kit.make_paint();
    kit.paint_set_color(paint, OPAQUE_RED);
    kit.paint_set_color_filter(paint, filter);
    kit.canvas_draw_rect(canvas, 0.0, 0.0, 2.0, 2.0, paint);

    let rgba = read_all(&mut kit, surface, 2, 2);
    assert!(rgba.chunks_exact(4).all(|px| px == [0, 255, 0, 255]));
}

#[test]
fn images_draw_where_placed() {
    let mut kit = Kit::default();
    let pixels = [0, 0, 255, 255].repeat(4);
    let image = kit.make_image_raster(2, 2, &pixels, false);
    let surface = kit.make_sw_surface(4, 4);
    let canvas = kit.surface_get_canvas(surface);
    kit.canvas_draw_image(canvas, image, 2.0, 2.0, 0, 0, Handle::NULL);

    let rgba = read_all(&mut kit, surface, 4, 4);
    let at = |x: usize, y: usize| &rgba[(y * 4 + x) * 4..][..4];
    assert_eq!(at(0, 0), [0, 0, 0, 0]);
    assert_eq!(at(1, 1), [0, 0, 0, 0]);
    assert_eq!(at(2, 2), [0, 0, 255, 255]);
    assert_eq!(at(3, 3), [0, 0, 255, 255]);
}

#[test]
fn oversized_strides_fail_without_writing() {
    let mut kit = Kit::default();
    let surface = kit.make_sw_surface(4, 4);
    let canvas = kit.surface_get_canvas(surface);
    kit.canvas_clear(canvas, OPAQUE_RED);
    let image = kit.surface_make_image_snapshot(surface);
    let mut rgba = [9_u8; 64];
    for row_bytes in [usize::MAX / 2, usize::MAX] {
        assert!(!kit.surface_read_pixels(surface, 0, 0, 4, 4, &mut rgba, row_bytes));
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::Raster(RasterError::RowBytes { .. }))
        ));
        assert!(!kit.image_read_pixels(image, 0, 0, 4, 4, &mut rgba, row_bytes));
        assert!(matches!(
            kit.take_last_error(),
            Some(KitError::Raster(RasterError::RowBytes { .. }))
        ));
    }
    assert!(rgba.iter().all(|&b| b == 9), "destination untouched");
    assert!(kit.surface_read_pixels(surface, 0, 0, 4, 4, &mut rgba, 16), "sane stride");
}

#[test]
fn huge_surfaces_and_images_give_null() {
    let mut kit = Kit::default();
    assert_eq!(kit.make_sw_surface(65_535, 65_535), Handle::NULL);
    assert!(matches!(
        kit.take_last_error(),
        Some(KitError::Raster(RasterError::TooLarge { .. }))
    ));
    assert_eq!(kit.make_image_raster(65_535, 65_535, &[], false), Handle::NULL);
    assert_eq!(kit.live_objects(), 0);
    assert!(!kit.make_sw_surface(16, 16).is_null(), "small surfaces still work");
}
