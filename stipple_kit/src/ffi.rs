// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The call surface as `extern "C"` functions.
//!
//! Every export runs against a [`Kit`] owned by the calling thread, created
//! with the default configuration on first use. [`install_kit`] replaces it,
//! for example to configure a GPU context factory.
//!
//! Conventions:
//!
//! - Handles are 64-bit integers; 0 is the failure sentinel.
//! - Buffers are passed as a pointer and an element count. A null pointer
//!   is an empty buffer.
//! - Strings are UTF-8 without a terminator, passed as a pointer and a byte
//!   length. Optional strings are null when absent. Strings are returned by
//!   copying into a caller buffer; the return value is the full length in
//!   bytes, so a caller can retry with a larger buffer.
//! - A null matrix pointer means identity.
//!
//! A GPU context factory must not call back into these exports.

#![allow(unsafe_code, reason = "raw pointers from the host are read here")]
#![allow(non_snake_case, reason = "exports keep the binding names")]

use std::cell::RefCell;
use std::slice;

use crate::{Handle, Kit, KitError};

thread_local! {
    static KIT: RefCell<Kit> = RefCell::new(Kit::default());
}

/// Replace this thread's kit, returning the previous one.
pub fn install_kit(kit: Kit) -> Kit {
    KIT.with_borrow_mut(|slot| core::mem::replace(slot, kit))
}

/// Run `f` against this thread's kit.
pub fn with_kit<R>(f: impl FnOnce(&mut Kit) -> R) -> R {
    KIT.with_borrow_mut(f)
}

/// # Safety
///
/// A non-null `ptr` must be valid for reads of `len` elements.
unsafe fn input<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        // SAFETY: upheld by the caller.
        unsafe { slice::from_raw_parts(ptr, len) }
    }
}

/// # Safety
///
/// A non-null `ptr` must be valid for writes of `len` elements.
unsafe fn output<'a, T>(ptr: *mut T, len: usize) -> &'a mut [T] {
    if ptr.is_null() || len == 0 {
        &mut []
    } else {
        // SAFETY: upheld by the caller.
        unsafe { slice::from_raw_parts_mut(ptr, len) }
    }
}

/// # Safety
///
/// A non-null `ptr` must be valid for reads of nine floats.
unsafe fn matrix<'a>(ptr: *const f32) -> Option<&'a [f32]> {
    // SAFETY: upheld by the caller.
    (!ptr.is_null()).then(|| unsafe { slice::from_raw_parts(ptr, 9) })
}

/// # Safety
///
/// A non-null `ptr` must be valid for reads of `len` bytes.
unsafe fn optional_bytes<'a>(ptr: *const u8, len: usize) -> Option<&'a [u8]> {
    // SAFETY: upheld by the caller.
    (!ptr.is_null()).then(|| unsafe { input(ptr, len) })
}

/// Decode an optional UTF-8 argument, recording a failure for invalid
/// input.
fn with_text<T: Default>(
    name: &'static str,
    text: Option<&[u8]>,
    f: impl FnOnce(&mut Kit, Option<&str>) -> T,
) -> T {
    with_kit(|kit| match text.map(core::str::from_utf8).transpose() {
        Ok(text) => f(kit, text),
        Err(_) => kit.fail(name, KitError::InvalidInput("string is not UTF-8")),
    })
}

/// Copy `text` into a caller buffer and return its full length.
fn copy_out(text: Option<String>, dst: &mut [u8]) -> usize {
    let Some(text) = text else {
        return 0;
    };
    let n = text.len().min(dst.len());
    dst[..n].copy_from_slice(&text.as_bytes()[..n]);
    text.len()
}

macro_rules! exports {
    ($($name:ident => $method:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;)*) => {
        $(
            #[doc = concat!("Calls [`Kit::", stringify!($method), "`] on this thread's kit.")]
            #[unsafe(no_mangle)]
            pub extern "C" fn $name($($arg: $ty),*) $(-> $ret)? {
                with_kit(|kit| kit.$method($($arg),*))
            }
        )*
    };
}

exports! {
    Delete => delete(handle: Handle);
    RefCount => ref_count(handle: Handle) -> usize;

    MakePath => make_path_builder() -> Handle;
    Path_moveTo => path_move_to(builder: Handle, x: f32, y: f32);
    Path_lineTo => path_line_to(builder: Handle, x: f32, y: f32);
    Path_quadTo => path_quad_to(builder: Handle, x1: f32, y1: f32, x: f32, y: f32);
    Path_cubicTo => path_cubic_to(
        builder: Handle, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32
    );
    Path_arcTo => path_arc_to(
        builder: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        start_degrees: f32,
        sweep_degrees: f32,
        force_move_to: bool
    ) -> bool;
    Path_close => path_close(builder: Handle);
    Path_reset => path_reset(builder: Handle);
    Path_addRect => path_add_rect(
        builder: Handle, left: f32, top: f32, right: f32, bottom: f32
    ) -> bool;
    Path_addOval => path_add_oval(
        builder: Handle, left: f32, top: f32, right: f32, bottom: f32
    ) -> bool;
    Path_addCircle => path_add_circle(builder: Handle, cx: f32, cy: f32, radius: f32) -> bool;
    Path_addRRect => path_add_rrect(
        builder: Handle, left: f32, top: f32, right: f32, bottom: f32, rx: f32, ry: f32
    ) -> bool;
    Path_setFillType => path_set_fill_type(builder: Handle, code: u32) -> bool;
    Path_getFillType => path_fill_type(path: Handle) -> u32;
    Path_isEmpty => path_is_empty(path: Handle) -> bool;
    Path_equals => path_equals(a: Handle, b: Handle) -> bool;
    PathBuilder_snapshot => path_snapshot(builder: Handle) -> Handle;
    PathBuilder_detach => path_detach(builder: Handle) -> Handle;

    MakePaint => make_paint() -> Handle;
    Paint_copy => paint_copy(paint: Handle) -> Handle;
    Paint_setColor => paint_set_color(paint: Handle, color: u32);
    Paint_getColor => paint_color(paint: Handle) -> u32;
    Paint_setAlphaf => paint_set_alpha_f(paint: Handle, alpha: f32) -> bool;
    Paint_getAlphaf => paint_alpha_f(paint: Handle) -> f32;
    Paint_setAntiAlias => paint_set_anti_alias(paint: Handle, anti_alias: bool);
    Paint_getAntiAlias => paint_anti_alias(paint: Handle) -> bool;
    Paint_setStyle => paint_set_style(paint: Handle, code: u32) -> bool;
    Paint_getStyle => paint_style(paint: Handle) -> u32;
    Paint_setStrokeWidth => paint_set_stroke_width(paint: Handle, width: f32) -> bool;
    Paint_getStrokeWidth => paint_stroke_width(paint: Handle) -> f32;
    Paint_setStrokeMiter => paint_set_stroke_miter(paint: Handle, miter: f32) -> bool;
    Paint_getStrokeMiter => paint_stroke_miter(paint: Handle) -> f32;
    Paint_setStrokeCap => paint_set_stroke_cap(paint: Handle, code: u32) -> bool;
    Paint_getStrokeCap => paint_stroke_cap(paint: Handle) -> u32;
    Paint_setStrokeJoin => paint_set_stroke_join(paint: Handle, code: u32) -> bool;
    Paint_getStrokeJoin => paint_stroke_join(paint: Handle) -> u32;
    Paint_setBlendMode => paint_set_blend_mode(paint: Handle, code: u32) -> bool;
    Paint_getBlendMode => paint_blend_mode(paint: Handle) -> u32;
    Paint_setShader => paint_set_shader(paint: Handle, shader: Handle);
    Paint_setColorFilter => paint_set_color_filter(paint: Handle, filter: Handle);
    MakeShaderColor => make_shader_color(color: u32) -> Handle;
    MakeColorFilterBlend => make_color_filter_blend(color: u32, mode: u32) -> Handle;

    MakeSWCanvasSurface => make_sw_surface(width: u32, height: u32) -> Handle;
    MakeCanvasSurface => make_gpu_surface(width: u32, height: u32) -> Handle;
    Surface_width => surface_width(surface: Handle) -> u32;
    Surface_height => surface_height(surface: Handle) -> u32;
    Surface_isGPU => surface_is_gpu(surface: Handle) -> bool;
    Surface_getCanvas => surface_get_canvas(surface: Handle) -> Handle;
    Surface_flush => surface_flush(surface: Handle) -> bool;
    Surface_makeImageSnapshot => surface_make_image_snapshot(surface: Handle) -> Handle;
    Surface_encodeToData => surface_encode(surface: Handle, format: u32) -> Handle;

    Canvas_clear => canvas_clear(canvas: Handle, color: u32);
    Canvas_drawPaint => canvas_draw_paint(canvas: Handle, paint: Handle);
    Canvas_drawColor => canvas_draw_color(canvas: Handle, color: u32, mode: u32);
    Canvas_drawRect => canvas_draw_rect(
        canvas: Handle, left: f32, top: f32, right: f32, bottom: f32, paint: Handle
    );
    Canvas_drawRRect => canvas_draw_rrect(
        canvas: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        rx: f32,
        ry: f32,
        paint: Handle
    );
    Canvas_drawOval => canvas_draw_oval(
        canvas: Handle, left: f32, top: f32, right: f32, bottom: f32, paint: Handle
    );
    Canvas_drawCircle =>
        canvas_draw_circle(canvas: Handle, cx: f32, cy: f32, r: f32, paint: Handle);
    Canvas_drawLine => canvas_draw_line(
        canvas: Handle, x0: f32, y0: f32, x1: f32, y1: f32, paint: Handle
    );
    Canvas_drawPath => canvas_draw_path(canvas: Handle, path: Handle, paint: Handle);
    Canvas_drawImage => canvas_draw_image(
        canvas: Handle, image: Handle, x: f32, y: f32, filter: u32, mipmap: u32, paint: Handle
    );
    Canvas_drawTextBlob => canvas_draw_text_blob(
        canvas: Handle, blob: Handle, x: f32, y: f32, paint: Handle
    );
    Canvas_drawParagraph => canvas_draw_paragraph(
        canvas: Handle, paragraph: Handle, x: f32, y: f32
    );
    Canvas_save => canvas_save(canvas: Handle) -> usize;
    Canvas_restore => canvas_restore(canvas: Handle);
    Canvas_restoreToCount => canvas_restore_to_count(canvas: Handle, count: usize);
    Canvas_getSaveCount => canvas_save_count(canvas: Handle) -> usize;
    Canvas_translate => canvas_translate(canvas: Handle, dx: f32, dy: f32);
    Canvas_scale => canvas_scale(canvas: Handle, sx: f32, sy: f32);
    Canvas_rotate => canvas_rotate(canvas: Handle, degrees: f32);
    Canvas_skew => canvas_skew(canvas: Handle, kx: f32, ky: f32);
    Canvas_resetMatrix => canvas_reset_matrix(canvas: Handle);
    Canvas_clipRect => canvas_clip_rect(
        canvas: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        op: u32,
        anti_alias: bool
    ) -> bool;
    Canvas_clipPath => canvas_clip_path(
        canvas: Handle, path: Handle, op: u32, anti_alias: bool
    ) -> bool;

    Image_width => image_width(image: Handle) -> u32;
    Image_height => image_height(image: Handle) -> u32;
    Image_encodeToData => image_encode(image: Handle, format: u32) -> Handle;
    Image_makeSubset => image_subset(
        image: Handle, x: i32, y: i32, width: u32, height: u32
    ) -> Handle;
    Data_size => data_size(data: Handle) -> usize;

    FontMgr_countFamilies => font_manager_count_families(manager: Handle) -> usize;
    Typeface_weight => typeface_weight(typeface: Handle) -> f32;
    Typeface_isItalic => typeface_is_italic(typeface: Handle) -> bool;
    MakeFont => make_font(typeface: Handle, size: f32) -> Handle;
    Font_setSize => font_set_size(font: Handle, size: f32) -> bool;
    Font_getSize => font_size(font: Handle) -> f32;
    Font_setScaleX => font_set_scale_x(font: Handle, scale_x: f32) -> bool;
    Font_getScaleX => font_scale_x(font: Handle) -> f32;
    Font_setSkewX => font_set_skew_x(font: Handle, skew_x: f32) -> bool;
    Font_getSkewX => font_skew_x(font: Handle) -> f32;
    Font_setEdging => font_set_edging(font: Handle, code: u32) -> bool;
    Font_getEdging => font_edging(font: Handle) -> u32;
    Font_setTypeface => font_set_typeface(font: Handle, typeface: Handle);
    TextBlob_advance => text_blob_advance(blob: Handle) -> f32;
    TextBlob_glyphCount => text_blob_glyph_count(blob: Handle) -> usize;

    ParagraphBuilder_pushStyle => paragraph_builder_push_style(
        builder: Handle, font_size: f32, color: u32
    ) -> usize;
    ParagraphBuilder_pop => paragraph_builder_pop(builder: Handle);
    ParagraphBuilder_build => paragraph_builder_build(builder: Handle, width: f32) -> Handle;
    Paragraph_layout => paragraph_layout(paragraph: Handle, width: f32) -> bool;
    Paragraph_getHeight => paragraph_height(paragraph: Handle) -> f32;
    Paragraph_getMaxWidth => paragraph_max_width(paragraph: Handle) -> f32;
    Paragraph_getMinIntrinsicWidth => paragraph_min_intrinsic_width(paragraph: Handle) -> f32;
    Paragraph_getMaxIntrinsicWidth => paragraph_max_intrinsic_width(paragraph: Handle) -> f32;
    Paragraph_getLongestLine => paragraph_longest_line(paragraph: Handle) -> f32;
    Paragraph_getAlphabeticBaseline => paragraph_alphabetic_baseline(paragraph: Handle) -> f32;
    Paragraph_getIdeographicBaseline => paragraph_ideographic_baseline(paragraph: Handle) -> f32;
    Paragraph_lineNumber => paragraph_line_count(paragraph: Handle) -> usize;
    Paragraph_didExceedMaxLines => paragraph_did_exceed_max_lines(paragraph: Handle) -> bool;
}

/// Copy the message of the most recent failure into `dst` and return its
/// full length, or 0 when nothing failed.
///
/// # Safety
///
/// A non-null `dst` must be valid for writes of `cap` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Kit_getLastError(dst: *mut u8, cap: usize) -> usize {
    // SAFETY: upheld by the caller.
    let dst = unsafe { output(dst, cap) };
    with_kit(|kit| copy_out(kit.last_error().map(ToString::to_string), dst))
}

/// Forget the most recent failure.
#[unsafe(no_mangle)]
pub extern "C" fn Kit_clearLastError() {
    with_kit(|kit| drop(kit.take_last_error()));
}

// Geometry.

/// Append a polygon from `count` floats laid out as `x0, y0, x1, y1, ...`.
///
/// # Safety
///
/// A non-null `points` must be valid for reads of `count` floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Path_addPoly(
    builder: Handle,
    points: *const f32,
    count: usize,
    close: bool,
) -> bool {
    // SAFETY: upheld by the caller.
    let points = unsafe { input(points, count) };
    with_kit(|kit| kit.path_add_poly(builder, points, close))
}

/// Write `[left, top, right, bottom]` to `out`.
///
/// # Safety
///
/// A non-null `out` must be valid for writes of four floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Path_getBounds(path: Handle, out: *mut f32) -> bool {
    if out.is_null() {
        return with_kit(|kit| {
            kit.fail("Path_getBounds", KitError::InvalidInput("null output"))
        });
    }
    // SAFETY: non-null and valid for four floats per the caller.
    let out = unsafe { &mut *out.cast::<[f32; 4]>() };
    with_kit(|kit| kit.path_bounds(path, out))
}

/// Map a path snapshot through a row-major 3x3 matrix into a new snapshot.
///
/// # Safety
///
/// A non-null `m` must be valid for reads of nine floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Path_transform(path: Handle, m: *const f32) -> Handle {
    // SAFETY: upheld by the caller.
    let m = unsafe { matrix(m) };
    with_kit(|kit| kit.path_transform(path, m))
}

/// Map a path snapshot through a row-major 3x3 matrix in place.
///
/// # Safety
///
/// A non-null `m` must be valid for reads of nine floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Path_transformInPlace(path: Handle, m: *const f32) -> bool {
    // SAFETY: upheld by the caller.
    let m = unsafe { matrix(m) };
    with_kit(|kit| kit.path_transform_in_place(path, m))
}

// Effects.

/// A linear gradient over `count` colors, with optional stop positions.
///
/// # Safety
///
/// A non-null `colors` must be valid for reads of `count` colors, and a
/// non-null `positions` for reads of `count` floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn MakeLinearGradient(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    colors: *const u32,
    positions: *const f32,
    count: usize,
    tile_mode: u32,
) -> Handle {
    // SAFETY: upheld by the caller.
    let (colors, positions) = unsafe {
        (
            input(colors, count),
            (!positions.is_null()).then(|| input(positions, count)),
        )
    };
    with_kit(|kit| kit.make_linear_gradient(x0, y0, x1, y1, colors, positions, tile_mode))
}

// Surfaces and canvases.

/// Copy a region of a surface as premultiplied RGBA8.
///
/// # Safety
///
/// A non-null `dst` must be valid for writes of `dst_len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Surface_readPixels(
    surface: Handle,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    dst: *mut u8,
    dst_len: usize,
    row_bytes: usize,
) -> bool {
    // SAFETY: upheld by the caller.
    let dst = unsafe { output(dst, dst_len) };
    with_kit(|kit| kit.surface_read_pixels(surface, x, y, width, height, dst, row_bytes))
}

/// Draw the `src` region of an image scaled into `dst`.
///
/// # Safety
///
/// `src` and `dst` must each be null or valid for reads of four floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Canvas_drawImageRect(
    canvas: Handle,
    image: Handle,
    src: *const f32,
    dst: *const f32,
    filter: u32,
    mipmap: u32,
    paint: Handle,
) {
    if src.is_null() || dst.is_null() {
        return with_kit(|kit| {
            kit.fail("Canvas_drawImageRect", KitError::InvalidInput("null rectangle"))
        });
    }
    // SAFETY: non-null and valid for four floats per the caller.
    let (src, dst) = unsafe { (&*src.cast::<[f32; 4]>(), &*dst.cast::<[f32; 4]>()) };
    with_kit(|kit| kit.canvas_draw_image_rect(canvas, image, src, dst, filter, mipmap, paint));
}

/// Pre-concatenate a row-major 3x3 matrix.
///
/// # Safety
///
/// A non-null `m` must be valid for reads of nine floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Canvas_concat(canvas: Handle, m: *const f32) -> bool {
    // SAFETY: upheld by the caller.
    let m = unsafe { matrix(m) };
    with_kit(|kit| kit.canvas_concat(canvas, m))
}

/// Replace the transform with a row-major 3x3 matrix.
///
/// # Safety
///
/// A non-null `m` must be valid for reads of nine floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Canvas_setMatrix(canvas: Handle, m: *const f32) -> bool {
    // SAFETY: upheld by the caller.
    let m = unsafe { matrix(m) };
    with_kit(|kit| kit.canvas_set_matrix(canvas, m))
}

/// Write the current transform to `out` in row-major order.
///
/// # Safety
///
/// A non-null `out` must be valid for writes of nine floats.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Canvas_getTotalMatrix(canvas: Handle, out: *mut f32) -> bool {
    if out.is_null() {
        return with_kit(|kit| {
            kit.fail("Canvas_getTotalMatrix", KitError::InvalidInput("null output"))
        });
    }
    // SAFETY: non-null and valid for nine floats per the caller.
    let out = unsafe { &mut *out.cast::<[f32; 9]>() };
    with_kit(|kit| kit.canvas_total_matrix(canvas, out))
}

// Images and data.

/// Decode an encoded image.
///
/// # Safety
///
/// A non-null `bytes` must be valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn MakeImageFromEncoded(bytes: *const u8, len: usize) -> Handle {
    // SAFETY: upheld by the caller.
    let bytes = unsafe { input(bytes, len) };
    with_kit(|kit| kit.make_image_from_encoded(bytes))
}

/// An image from tightly packed RGBA8 pixels.
///
/// # Safety
///
/// A non-null `pixels` must be valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn MakeImage(
    width: u32,
    height: u32,
    pixels: *const u8,
    len: usize,
    premultiplied: bool,
) -> Handle {
    // SAFETY: upheld by the caller.
    let pixels = unsafe { input(pixels, len) };
    with_kit(|kit| kit.make_image_raster(width, height, pixels, premultiplied))
}

/// Copy a region of an image as premultiplied RGBA8.
///
/// # Safety
///
/// A non-null `dst` must be valid for writes of `dst_len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Image_readPixels(
    image: Handle,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    dst: *mut u8,
    dst_len: usize,
    row_bytes: usize,
) -> bool {
    // SAFETY: upheld by the caller.
    let dst = unsafe { output(dst, dst_len) };
    with_kit(|kit| kit.image_read_pixels(image, x, y, width, height, dst, row_bytes))
}

/// A data object holding a copy of `len` bytes.
///
/// # Safety
///
/// A non-null `bytes` must be valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn MakeData(bytes: *const u8, len: usize) -> Handle {
    // SAFETY: upheld by the caller.
    let bytes = unsafe { input(bytes, len) };
    with_kit(|kit| kit.make_data(bytes))
}

/// Copy up to `cap` bytes of a data object into `dst`.
///
/// # Safety
///
/// A non-null `dst` must be valid for writes of `cap` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Data_copy(data: Handle, dst: *mut u8, cap: usize) -> usize {
    // SAFETY: upheld by the caller.
    let dst = unsafe { output(dst, cap) };
    with_kit(|kit| kit.data_copy(data, dst))
}

// Text.

/// A font manager over `count` font buffers.
///
/// # Safety
///
/// `buffers` and `lens` must each be null or valid for reads of `count`
/// elements, and every non-null `buffers[i]` valid for reads of `lens[i]`
/// bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FontMgr_FromData(
    buffers: *const *const u8,
    lens: *const usize,
    count: usize,
) -> Handle {
    // SAFETY: upheld by the caller.
    let (ptrs, lens) = unsafe { (input(buffers, count), input(lens, count)) };
    if ptrs.len() != lens.len() {
        return with_kit(|kit| {
            kit.fail("FontMgr_FromData", KitError::InvalidInput("null buffer list"))
        });
    }
    let buffers: Vec<&[u8]> = ptrs
        .iter()
        .zip(lens)
        // SAFETY: upheld by the caller.
        .map(|(&ptr, &len)| unsafe { input(ptr, len) })
        .collect();
    with_kit(|kit| kit.make_font_manager(&buffers))
}

/// Copy the name of family `index` into `dst`.
///
/// # Safety
///
/// A non-null `dst` must be valid for writes of `cap` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FontMgr_getFamilyName(
    manager: Handle,
    index: usize,
    dst: *mut u8,
    cap: usize,
) -> usize {
    // SAFETY: upheld by the caller.
    let dst = unsafe { output(dst, cap) };
    with_kit(|kit| copy_out(kit.font_manager_family_name(manager, index), dst))
}

/// The face of a family closest to regular weight.
///
/// # Safety
///
/// A non-null `name` must be valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FontMgr_matchFamilyStyle(
    manager: Handle,
    name: *const u8,
    len: usize,
) -> Handle {
    // SAFETY: upheld by the caller.
    let name = unsafe { input(name, len) };
    with_text("FontMgr_matchFamilyStyle", Some(name), |kit, name| {
        kit.font_manager_match_family(manager, name.unwrap_or_default())
    })
}

/// A typeface from face `index` of a font program.
///
/// # Safety
///
/// A non-null `bytes` must be valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Typeface_MakeFreeTypeFaceFromData(
    bytes: *const u8,
    len: usize,
    index: u32,
) -> Handle {
    // SAFETY: upheld by the caller.
    let bytes = unsafe { input(bytes, len) };
    with_kit(|kit| kit.make_typeface(bytes, index))
}

/// Copy the typeface's family name into `dst`.
///
/// # Safety
///
/// A non-null `dst` must be valid for writes of `cap` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Typeface_getFamilyName(
    typeface: Handle,
    dst: *mut u8,
    cap: usize,
) -> usize {
    // SAFETY: upheld by the caller.
    let dst = unsafe { output(dst, cap) };
    with_kit(|kit| copy_out(kit.typeface_family_name(typeface), dst))
}

/// Shape `len` bytes of text in the given encoding.
///
/// # Safety
///
/// A non-null `bytes` must be valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn TextBlob_MakeFromText(
    bytes: *const u8,
    len: usize,
    encoding: u32,
    font: Handle,
) -> Handle {
    // SAFETY: upheld by the caller.
    let bytes = unsafe { input(bytes, len) };
    with_kit(|kit| kit.make_text_blob(bytes, encoding, font))
}

/// A paragraph builder. A null `ellipsis` means no ellipsis.
///
/// # Safety
///
/// A non-null `ellipsis` must be valid for reads of `ellipsis_len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ParagraphBuilder_Make(
    font_manager: Handle,
    font_size: f32,
    color: u32,
    align: u32,
    direction: u32,
    max_lines: usize,
    ellipsis: *const u8,
    ellipsis_len: usize,
) -> Handle {
    // SAFETY: upheld by the caller.
    let ellipsis = unsafe { optional_bytes(ellipsis, ellipsis_len) };
    with_text("ParagraphBuilder_Make", ellipsis, |kit, ellipsis| {
        kit.make_paragraph_builder(
            font_manager,
            font_size,
            color,
            align,
            direction,
            max_lines,
            ellipsis,
        )
    })
}

/// Push a fully specified text style. A null `family` inherits the current
/// family list.
///
/// # Safety
///
/// A non-null `family` must be valid for reads of `family_len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ParagraphBuilder_pushTextStyle(
    builder: Handle,
    font_size: f32,
    color: u32,
    family: *const u8,
    family_len: usize,
    letter_spacing: f32,
    word_spacing: f32,
    height: f32,
) -> usize {
    // SAFETY: upheld by the caller.
    let family = unsafe { optional_bytes(family, family_len) };
    with_text("ParagraphBuilder_pushTextStyle", family, |kit, family| {
        kit.paragraph_builder_push_text_style(
            builder,
            font_size,
            color,
            family,
            letter_spacing,
            word_spacing,
            height,
        )
    })
}

/// Append `len` bytes of UTF-8 text in the current style.
///
/// # Safety
///
/// A non-null `text` must be valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ParagraphBuilder_addText(
    builder: Handle,
    text: *const u8,
    len: usize,
) -> bool {
    // SAFETY: upheld by the caller.
    let text = unsafe { input(text, len) };
    with_kit(|kit| kit.paragraph_builder_add_text(builder, text))
}

/// Copy the visible text of line `index` into `dst`.
///
/// # Safety
///
/// A non-null `dst` must be valid for writes of `cap` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Paragraph_getLineText(
    paragraph: Handle,
    index: usize,
    dst: *mut u8,
    cap: usize,
) -> usize {
    // SAFETY: upheld by the caller.
    let dst = unsafe { output(dst, cap) };
    with_kit(|kit| copy_out(kit.paragraph_line_text(paragraph, index), dst))
}
