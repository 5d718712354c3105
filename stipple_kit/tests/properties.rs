// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for geometry snapshots and the canvas save stack.

use proptest::prelude::*;
use stipple_kit::{Handle, Kit};

#[derive(Clone, Debug)]
enum PathOp {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    CubicTo(f32, f32, f32, f32, f32, f32),
    Close,
    Rect(f32, f32, f32, f32),
    Circle(f32, f32, f32),
}

fn coord() -> impl Strategy<Value = f32> {
    -100.0_f32..100.0
}

fn path_op() -> impl Strategy<Value = PathOp> {
    prop_oneof![
        (coord(), coord()).prop_map(|(x, y)| PathOp::MoveTo(x, y)),
        (coord(), coord()).prop_map(|(x, y)| PathOp::LineTo(x, y)),
        (coord(), coord(), coord(), coord()).prop_map(|(a, b, c, d)| PathOp::QuadTo(a, b, c, d)),
        (coord(), coord(), coord(), coord(), coord(), coord())
            .prop_map(|(a, b, c, d, e, f)| PathOp::CubicTo(a, b, c, d, e, f)),
        Just(PathOp::Close),
        (coord(), coord(), coord(), coord()).prop_map(|(a, b, c, d)| PathOp::Rect(a, b, c, d)),
        (coord(), coord(), 0.1_f32..50.0).prop_map(|(x, y, r)| PathOp::Circle(x, y, r)),
    ]
}

fn apply(kit: &mut Kit, builder: Handle, op: &PathOp) {
    match *op {
        PathOp::MoveTo(x, y) => kit.path_move_to(builder, x, y),
        PathOp::LineTo(x, y) => kit.path_line_to(builder, x, y),
        PathOp::QuadTo(x1, y1, x, y) => kit.path_quad_to(builder, x1, y1, x, y),
        PathOp::CubicTo(x1, y1, x2, y2, x, y) => kit.path_cubic_to(builder, x1, y1, x2, y2, x, y),
        PathOp::Close => kit.path_close(builder),
        PathOp::Rect(l, t, r, b) => {
            kit.path_add_rect(builder, l, t, r, b);
        }
        PathOp::Circle(x, y, r) => {
            kit.path_add_circle(builder, x, y, r);
        }
    }
}

#[derive(Clone, Debug)]
enum StateOp {
    Translate(f32, f32),
    Scale(f32, f32),
    Rotate(f32),
    Clip(f32, f32, f32, f32),
}

fn state_op() -> impl Strategy<Value = StateOp> {
    prop_oneof![
        (coord(), coord()).prop_map(|(x, y)| StateOp::Translate(x, y)),
        (0.1_f32..4.0, 0.1_f32..4.0).prop_map(|(x, y)| StateOp::Scale(x, y)),
        (-360.0_f32..360.0).prop_map(StateOp::Rotate),
        (0.0_f32..8.0, 0.0_f32..8.0, 0.0_f32..8.0, 0.0_f32..8.0)
            .prop_map(|(a, b, c, d)| StateOp::Clip(a, b, c, d)),
    ]
}

proptest! {
    #[test]
    fn identity_transform_preserves_snapshots(ops in prop::collection::vec(path_op(), 0..24)) {
        let mut kit = Kit::default();
        let builder = kit.make_path_builder();
        for op in &ops {
            apply(&mut kit, builder, op);
        }
        let snapshot = kit.path_snapshot(builder);
        prop_assert!(!snapshot.is_null());
        let identity = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let explicit = kit.path_transform(snapshot, Some(&identity[..]));
        let implicit = kit.path_transform(snapshot, None);
        prop_assert!(kit.path_equals(snapshot, explicit));
        prop_assert!(kit.path_equals(snapshot, implicit));
        prop_assert!(kit.path_equals(snapshot, builder));
    }

    #[test]
    fn save_restore_is_balanced(levels in prop::collection::vec(state_op(), 1..12)) {
        let mut kit = Kit::default();
        let surface = kit.make_sw_surface(8, 8);
        let canvas = kit.surface_get_canvas(surface);
        kit.canvas_translate(canvas, 1.0, 2.0);
        let mut before = [0.0; 9];
        kit.canvas_total_matrix(canvas, &mut before);

        for (depth, op) in levels.iter().enumerate() {
            prop_assert_eq!(kit.canvas_save(canvas), depth + 1);
            match *op {
                StateOp::Translate(x, y) => kit.canvas_translate(canvas, x, y),
                StateOp::Scale(x, y) => kit.canvas_scale(canvas, x, y),
                StateOp::Rotate(deg) => kit.canvas_rotate(canvas, deg),
                StateOp::Clip(l, t, r, b) => {
                    kit.canvas_clip_rect(canvas, l, t, r, b, 1, true);
                }
            }
        }
        for _ in &levels {
            kit.canvas_restore(canvas);
        }
        kit.canvas_restore(canvas);
        prop_assert_eq!(kit.canvas_save_count(canvas), 1);
        prop_assert!(kit.last_error().is_none(), "extra restore is not an error");

        let mut after = [0.0; 9];
        kit.canvas_total_matrix(canvas, &mut after);
        prop_assert_eq!(before, after);

        // Every clip is gone, so a clear reaches every pixel.
        kit.canvas_clear(canvas, 0xFF00_00FF);
        let mut rgba = [0_u8; 8 * 8 * 4];
        prop_assert!(kit.surface_read_pixels(surface, 0, 0, 8, 8, &mut rgba, 32));
        prop_assert!(rgba.chunks_exact(4).all(|px| px == [0, 0, 255, 255]));
    }
}
