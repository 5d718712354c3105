// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path builders and immutable path snapshots.

use stipple_imaging::{FillType, Path, PathBuilder, RectF};

use super::{Kit, decode, matrix, rect};
use crate::handle::Arena;
use crate::{Handle, Kind, KitError};

impl Kit {
    /// A new, empty path builder.
    pub fn make_path_builder(&mut self) -> Handle {
        self.call("MakePath", |kit| kit.path_builders.insert(PathBuilder::new()))
    }

    /// Start a contour at `(x, y)`.
    pub fn path_move_to(&mut self, builder: Handle, x: f32, y: f32) {
        self.call("Path_moveTo", |kit| {
            kit.path_builders.get_mut(builder)?.move_to(x, y);
            Ok(())
        });
    }

    /// Append a line to `(x, y)`.
    pub fn path_line_to(&mut self, builder: Handle, x: f32, y: f32) {
        self.call("Path_lineTo", |kit| {
            kit.path_builders.get_mut(builder)?.line_to(x, y);
            Ok(())
        });
    }

    /// Append a quadratic curve.
    pub fn path_quad_to(&mut self, builder: Handle, x1: f32, y1: f32, x: f32, y: f32) {
        self.call("Path_quadTo", |kit| {
            kit.path_builders.get_mut(builder)?.quad_to(x1, y1, x, y);
            Ok(())
        });
    }

    /// Append a cubic curve.
    pub fn path_cubic_to(
        &mut self,
        builder: Handle,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x: f32,
        y: f32,
    ) {
        self.call("Path_cubicTo", |kit| {
            kit.path_builders
                .get_mut(builder)?
                .cubic_to(x1, y1, x2, y2, x, y);
            Ok(())
        });
    }

    /// Append an arc of the ellipse inscribed in the oval, angles in degrees.
    pub fn path_arc_to(
        &mut self,
        builder: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        start_degrees: f32,
        sweep_degrees: f32,
        force_move_to: bool,
    ) -> bool {
        self.call("Path_arcTo", |kit| {
            let oval = RectF::new(left, top, right, bottom);
            kit.path_builders.get_mut(builder)?.arc_to(
                oval,
                start_degrees,
                sweep_degrees,
                force_move_to,
            )?;
            Ok(true)
        })
    }

    /// Seal the current contour.
    pub fn path_close(&mut self, builder: Handle) {
        self.call("Path_close", |kit| {
            kit.path_builders.get_mut(builder)?.close();
            Ok(())
        });
    }

    /// Clear all geometry and restore the winding fill rule.
    pub fn path_reset(&mut self, builder: Handle) {
        self.call("Path_reset", |kit| {
            kit.path_builders.get_mut(builder)?.reset();
            Ok(())
        });
    }

    /// Append a closed rectangle.
    pub fn path_add_rect(
        &mut self,
        builder: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
    ) -> bool {
        self.call("Path_addRect", |kit| {
            let r = rect(left, top, right, bottom)?;
            kit.path_builders.get_mut(builder)?.add_rect(r);
            Ok(true)
        })
    }

    /// Append a closed ellipse inscribed in the rectangle.
    pub fn path_add_oval(
        &mut self,
        builder: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
    ) -> bool {
        self.call("Path_addOval", |kit| {
            let r = rect(left, top, right, bottom)?;
            kit.path_builders.get_mut(builder)?.add_oval(r)?;
            Ok(true)
        })
    }

    /// Append a closed circle.
    pub fn path_add_circle(&mut self, builder: Handle, cx: f32, cy: f32, radius: f32) -> bool {
        self.call("Path_addCircle", |kit| {
            kit.path_builders.get_mut(builder)?.add_circle(cx, cy, radius)?;
            Ok(true)
        })
    }

    /// Append a rounded rectangle with elliptical corners.
    pub fn path_add_rrect(
        &mut self,
        builder: Handle,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        rx: f32,
        ry: f32,
    ) -> bool {
        self.call("Path_addRRect", |kit| {
            let r = rect(left, top, right, bottom)?;
            kit.path_builders.get_mut(builder)?.add_rrect(r, rx, ry)?;
            Ok(true)
        })
    }

    /// Append a polygon from flat `[x0, y0, x1, y1, ...]` coordinates.
    pub fn path_add_poly(&mut self, builder: Handle, points: &[f32], close: bool) -> bool {
        self.call("Path_addPoly", |kit| {
            kit.path_builders.get_mut(builder)?.add_poly(points, close)?;
            Ok(true)
        })
    }

    /// Select the fill rule by its numeric code.
    pub fn path_set_fill_type(&mut self, builder: Handle, code: u32) -> bool {
        self.call("Path_setFillType", |kit| {
            let fill = decode("fill type", code, FillType::from_code)?;
            kit.path_builders.get_mut(builder)?.set_fill_type(fill);
            Ok(true)
        })
    }

    /// The fill rule code of a builder or snapshot.
    pub fn path_fill_type(&mut self, path: Handle) -> u32 {
        self.call("Path_getFillType", |kit| {
            Ok(kit.resolve_path(path)?.fill_type().code())
        })
    }

    /// Whether a builder or snapshot holds no geometry.
    pub fn path_is_empty(&mut self, path: Handle) -> bool {
        self.call("Path_isEmpty", |kit| Ok(kit.resolve_path(path)?.is_empty()))
    }

    /// Write the bounds of a builder or snapshot as `[left, top, right,
    /// bottom]`. Returns `false` for empty geometry.
    pub fn path_bounds(&mut self, path: Handle, out: &mut [f32; 4]) -> bool {
        self.call("Path_getBounds", |kit| {
            let bounds = kit
                .resolve_path(path)?
                .bounds()
                .ok_or(KitError::InvalidInput("path is empty"))?;
            *out = [bounds.x0, bounds.y0, bounds.x1, bounds.y1];
            Ok(true)
        })
    }

    /// Whether two builders or snapshots hold the same commands and fill
    /// rule.
    pub fn path_equals(&mut self, a: Handle, b: Handle) -> bool {
        self.call("Path_equals", |kit| {
            Ok(kit.resolve_path(a)? == kit.resolve_path(b)?)
        })
    }

    /// An immutable copy of the builder's geometry. The builder stays usable.
    pub fn path_snapshot(&mut self, builder: Handle) -> Handle {
        self.call("PathBuilder_snapshot", |kit| {
            let path = kit.path_builders.get(builder)?.snapshot();
            kit.paths.insert(path)
        })
    }

    /// Move the builder's geometry into a snapshot, consuming the builder
    /// handle.
    pub fn path_detach(&mut self, builder: Handle) -> Handle {
        self.call("PathBuilder_detach", |kit| {
            let mut b = kit.path_builders.consume(builder)?;
            kit.paths.insert(b.detach())
        })
    }

    /// A new snapshot with every point mapped through a row-major 3x3
    /// matrix. `None` means identity.
    pub fn path_transform(&mut self, path: Handle, m: Option<&[f32]>) -> Handle {
        self.call("Path_transform", |kit| {
            let m = matrix(m)?;
            let mapped = kit.paths.get(path)?.transform(&m);
            kit.paths.insert(mapped)
        })
    }

    /// Map a snapshot through a matrix, replacing its content behind the
    /// same handle.
    pub fn path_transform_in_place(&mut self, path: Handle, m: Option<&[f32]>) -> bool {
        self.call("Path_transformInPlace", |kit| {
            let m = matrix(m)?;
            kit.paths.get_mut(path)?.transform_in_place(&m);
            Ok(true)
        })
    }

    fn resolve_path(&self, path: Handle) -> Result<&Path, KitError> {
        path_of(&self.path_builders, &self.paths, path)
    }
}

/// The geometry behind a snapshot or a builder.
pub(super) fn path_of<'a>(
    builders: &'a Arena<PathBuilder>,
    paths: &'a Arena<Path>,
    path: Handle,
) -> Result<&'a Path, KitError> {
    match path.kind() {
        Some(Kind::PathBuilder) => Ok(builders.get(path)?.as_path()),
        _ => paths.get(path),
    }
}
