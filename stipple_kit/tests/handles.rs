// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle lifetimes and failure sentinels.

use stipple_kit::{Handle, Kind, Kit, KitError};

const DEJAVU: &[u8] = include_bytes!("../../assets/fonts/dejavu/DejaVuSans.ttf");
const UTF8: u32 = 0;

#[test]
fn degenerate_inputs_return_sentinels() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut kit = Kit::default();
    assert_eq!(kit.make_sw_surface(0, 10), Handle::NULL);
    assert_eq!(kit.make_sw_surface(10, 0), Handle::NULL);
    assert_eq!(kit.make_typeface(&[], 0), Handle::NULL);
    assert_eq!(kit.make_font_manager(&[&[][..]]), Handle::NULL);

    let typeface = kit.make_typeface(DEJAVU, 0);
    let font = kit.make_font(typeface, 12.0);
    assert_eq!(kit.make_text_blob(b"", UTF8, font), Handle::NULL);
    assert_eq!(kit.make_text_blob(b"ok", 99, font), Handle::NULL);
    assert!(matches!(
        kit.take_last_error(),
        Some(KitError::UnknownCode { code: 99, .. })
    ));
    assert_eq!(kit.make_font(typeface, -1.0), Handle::NULL);
    assert_eq!(kit.make_gpu_surface(4, 4), Handle::NULL, "no gpu configured");

    // Only the successful calls left objects behind.
    assert_eq!(kit.live_objects(), 2);
}

#[test]
fn deleted_handles_go_stale() {
    let mut kit = Kit::default();
    let paint = kit.make_paint();
    kit.delete(paint);
    assert!(!kit.is_live(paint), "deleted");
    assert_eq!(kit.paint_color(paint), 0);
    assert!(matches!(kit.take_last_error(), Some(KitError::StaleHandle(Kind::Paint))));

    kit.delete(paint);
    assert!(matches!(kit.take_last_error(), Some(KitError::StaleHandle(Kind::Paint))));

    // The slot is reused under a new generation.
    let again = kit.make_paint();
    assert_ne!(again, paint);
    assert!(kit.is_live(again), "fresh handle");
    assert!(!kit.is_live(paint), "old handle stays stale");
}

#[test]
fn consumed_builders_are_reported() {
    let mut kit = Kit::default();
    let builder = kit.make_path_builder();
    kit.path_move_to(builder, 0.0, 0.0);
    kit.path_line_to(builder, 4.0, 4.0);
    let path = kit.path_detach(builder);
    assert!(!path.is_null(), "detached");

    kit.path_line_to(builder, 8.0, 0.0);
    let err = kit.take_last_error();
    assert!(matches!(err, Some(KitError::Consumed(Kind::PathBuilder))), "{err:?}");
    assert!(err.is_some_and(|e| e.is_handle_misuse()), "misuse");
}

#[test]
fn handles_of_another_kind_are_rejected() {
    let mut kit = Kit::default();
    let paint = kit.make_paint();
    let builder = kit.make_path_builder();

    kit.path_close(paint);
    assert!(matches!(
        kit.take_last_error(),
        Some(KitError::WrongKind { expected: Kind::PathBuilder, .. })
    ));

    kit.delete_kind(Kind::Paint, builder);
    assert!(kit.is_live(builder), "not deleted");
    assert!(matches!(kit.take_last_error(), Some(KitError::WrongKind { .. })));

    kit.paint_set_color(Handle::NULL, 0);
    assert!(matches!(kit.take_last_error(), Some(KitError::NullHandle(Some(Kind::Paint)))));
}

#[test]
fn canvases_die_with_their_surface() {
    let mut kit = Kit::default();
    let surface = kit.make_sw_surface(4, 4);
    let canvas = kit.surface_get_canvas(surface);
    assert!(kit.is_live(canvas), "canvas");

    kit.delete(canvas);
    assert!(kit.is_live(surface), "deleting a canvas is refused");
    assert!(kit.take_last_error().is_some(), "reported");

    kit.delete(surface);
    assert!(!kit.is_live(canvas), "stale with its surface");
    assert_eq!(kit.canvas_save_count(canvas), 0);
    assert_eq!(kit.live_objects(), 0);
}

#[test]
fn shared_objects_outlive_their_handles() {
    let mut kit = Kit::default();
    let typeface = kit.make_typeface(DEJAVU, 0);
    let font = kit.make_font(typeface, 16.0);
    assert_eq!(kit.ref_count(typeface), 2);

    kit.delete(typeface);
    assert!(!kit.is_live(typeface), "handle is gone");
    let blob = kit.make_text_blob(b"still here", UTF8, font);
    assert!(kit.text_blob_glyph_count(blob) > 0, "font kept its typeface");
    assert!(kit.text_blob_advance(blob) > 0.0, "advances");
}
