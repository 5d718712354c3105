// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutable path accumulation and immutable path snapshots.

use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Arc, BezPath, Ellipse, PathEl, Point, Shape};

use crate::{FillType, ImagingError, Matrix, RectF};

/// Flattening tolerance used when converting analytic shapes to curves.
const SHAPE_TOLERANCE: f64 = 0.1;

/// Cubic control-point distance approximating a quarter ellipse.
const KAPPA: f32 = 0.552_284_8;

/// Simple path command enumeration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Move the current point without drawing.
    MoveTo {
        /// X coordinate of the new point.
        x: f32,
        /// Y coordinate of the new point.
        y: f32,
    },
    /// Draw a line from the current point to the given point.
    LineTo {
        /// X coordinate of the line end.
        x: f32,
        /// Y coordinate of the line end.
        y: f32,
    },
    /// Draw a quadratic Bézier curve from the current point to the given
    /// point, using a single control point.
    QuadTo {
        /// X coordinate of the control point.
        x1: f32,
        /// Y coordinate of the control point.
        y1: f32,
        /// X coordinate of the curve end.
        x: f32,
        /// Y coordinate of the curve end.
        y: f32,
    },
    /// Draw a cubic Bézier curve from the current point to the given point,
    /// using two control points.
    CurveTo {
        /// X coordinate of the first control point.
        x1: f32,
        /// Y coordinate of the first control point.
        y1: f32,
        /// X coordinate of the second control point.
        x2: f32,
        /// Y coordinate of the second control point.
        y2: f32,
        /// X coordinate of the curve end.
        x: f32,
        /// Y coordinate of the curve end.
        y: f32,
    },
    /// Close the current subpath.
    Close,
}

impl PathCmd {
    /// Apply `f` to every point of the command, control points included.
    fn map(self, mut f: impl FnMut(f32, f32) -> (f32, f32)) -> Self {
        match self {
            Self::MoveTo { x, y } => {
                let (x, y) = f(x, y);
                Self::MoveTo { x, y }
            }
            Self::LineTo { x, y } => {
                let (x, y) = f(x, y);
                Self::LineTo { x, y }
            }
            Self::QuadTo { x1, y1, x, y } => {
                let (x1, y1) = f(x1, y1);
                let (x, y) = f(x, y);
                Self::QuadTo { x1, y1, x, y }
            }
            Self::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let (x1, y1) = f(x1, y1);
                let (x2, y2) = f(x2, y2);
                let (x, y) = f(x, y);
                Self::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                }
            }
            Self::Close => Self::Close,
        }
    }

    /// Visit every point of the command, control points included.
    fn for_each_point(&self, mut f: impl FnMut(f32, f32)) {
        match *self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => f(x, y),
            Self::QuadTo { x1, y1, x, y } => {
                f(x1, y1);
                f(x, y);
            }
            Self::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                f(x1, y1);
                f(x2, y2);
                f(x, y);
            }
            Self::Close => {}
        }
    }
}

/// Immutable geometry with its fill rule.
///
/// A `Path` owns its command list and does not share state with the
/// [`PathBuilder`] it was taken from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCmd>,
    fill_type: FillType,
}

impl Path {
    /// Wrap an existing command list.
    pub fn from_commands(commands: Vec<PathCmd>, fill_type: FillType) -> Self {
        Self {
            commands,
            fill_type,
        }
    }

    /// The command list.
    pub fn commands(&self) -> &[PathCmd] {
        &self.commands
    }

    /// The fill rule.
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    /// Whether the path has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Bounds of all points, control points included.
    ///
    /// Returns `None` for an empty path.
    pub fn bounds(&self) -> Option<RectF> {
        let mut bounds: Option<RectF> = None;
        for cmd in &self.commands {
            cmd.for_each_point(|x, y| {
                let point = RectF::new(x, y, x, y);
                bounds = Some(bounds.map_or(point, |b| b.union(&point)));
            });
        }
        bounds
    }

    /// A copy with every point mapped through `matrix`.
    ///
    /// Perspective matrices divide each point by its projective weight;
    /// curve control points are mapped the same way as end points.
    pub fn transform(&self, matrix: &Matrix) -> Self {
        let mut out = self.clone();
        out.transform_in_place(matrix);
        out
    }

    /// Map every point through `matrix`, replacing this path's content.
    pub fn transform_in_place(&mut self, matrix: &Matrix) {
        if matrix.is_identity() {
            return;
        }
        for cmd in &mut self.commands {
            *cmd = cmd.map(|x, y| matrix.map_point(x, y));
        }
    }

    /// A copy offset by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        self.transform(&Matrix::translate(dx, dy))
    }

    /// Convert to kurbo's path type.
    ///
    /// Drawing commands that appear before any move are anchored at the
    /// origin.
    pub fn to_bez_path(&self) -> BezPath {
        let mut p = BezPath::new();
        let mut open = false;
        let mut start = Point::ZERO;
        let pt = |x: f32, y: f32| Point::new(f64::from(x), f64::from(y));
        for cmd in &self.commands {
            if !open && !matches!(cmd, PathCmd::MoveTo { .. } | PathCmd::Close) {
                p.move_to(start);
                open = true;
            }
            match *cmd {
                PathCmd::MoveTo { x, y } => {
                    start = pt(x, y);
                    p.move_to(start);
                    open = true;
                }
                PathCmd::LineTo { x, y } => p.line_to(pt(x, y)),
                PathCmd::QuadTo { x1, y1, x, y } => p.quad_to(pt(x1, y1), pt(x, y)),
                PathCmd::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => p.curve_to(pt(x1, y1), pt(x2, y2), pt(x, y)),
                PathCmd::Close => {
                    if open {
                        p.close_path();
                        open = false;
                    }
                }
            }
        }
        p
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "path coordinates are stored as f32"
)]
fn point_f32(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Mutable path accumulator.
///
/// Segment appends after a [`close`](Self::close), or before any
/// [`move_to`](Self::move_to), start a new contour at the last contour
/// start point.
///
/// ```
/// use stipple_imaging::{FillType, PathBuilder};
///
/// let mut builder = PathBuilder::new();
/// builder.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0).close();
/// builder.set_fill_type(FillType::EvenOdd);
///
/// let path = builder.snapshot();
/// assert_eq!(path.commands().len(), 4);
/// assert_eq!(path.fill_type(), FillType::EvenOdd);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    path: Path,
    contour_start: (f32, f32),
    contour_open: bool,
}

impl PathBuilder {
    /// Create an empty builder with the winding fill rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// The fill rule that snapshots will carry.
    pub fn fill_type(&self) -> FillType {
        self.path.fill_type
    }

    /// Select the fill rule.
    pub fn set_fill_type(&mut self, fill_type: FillType) -> &mut Self {
        self.path.fill_type = fill_type;
        self
    }

    /// Whether nothing has been appended since creation or the last reset.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Bounds of all points appended so far.
    pub fn bounds(&self) -> Option<RectF> {
        self.path.bounds()
    }

    /// Read-only view of the accumulated geometry.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    fn ensure_contour(&mut self) {
        if !self.contour_open {
            let (x, y) = self.contour_start;
            self.path.commands.push(PathCmd::MoveTo { x, y });
            self.contour_open = true;
        }
    }

    /// Begin a new contour at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.path.commands.push(PathCmd::MoveTo { x, y });
        self.contour_start = (x, y);
        self.contour_open = true;
        self
    }

    /// Append a line segment.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.ensure_contour();
        self.path.commands.push(PathCmd::LineTo { x, y });
        self
    }

    /// Append a quadratic Bézier segment.
    pub fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) -> &mut Self {
        self.ensure_contour();
        self.path.commands.push(PathCmd::QuadTo { x1, y1, x, y });
        self
    }

    /// Append a cubic Bézier segment.
    pub fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) -> &mut Self {
        self.ensure_contour();
        self.path.commands.push(PathCmd::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
        self
    }

    /// Seal the current contour. Does nothing if no contour is open.
    pub fn close(&mut self) -> &mut Self {
        if self.contour_open {
            self.path.commands.push(PathCmd::Close);
            self.contour_open = false;
        }
        self
    }

    /// Clear all geometry and restore the default fill rule.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    fn push_element(&mut self, el: PathEl) {
        match el {
            PathEl::MoveTo(p) => {
                let (x, y) = point_f32(p);
                self.move_to(x, y);
            }
            PathEl::LineTo(p) => {
                let (x, y) = point_f32(p);
                self.line_to(x, y);
            }
            PathEl::QuadTo(p1, p) => {
                let (x1, y1) = point_f32(p1);
                let (x, y) = point_f32(p);
                self.quad_to(x1, y1, x, y);
            }
            PathEl::CurveTo(p1, p2, p) => {
                let (x1, y1) = point_f32(p1);
                let (x2, y2) = point_f32(p2);
                let (x, y) = point_f32(p);
                self.cubic_to(x1, y1, x2, y2, x, y);
            }
            PathEl::ClosePath => {
                self.close();
            }
        }
    }

    /// Append an elliptical arc inscribed in `oval`.
    ///
    /// Angles are in degrees, measured clockwise from the positive x axis.
    /// The arc start is connected to the current contour with a line unless
    /// `force_move_to` is set or no contour is open.
    pub fn arc_to(
        &mut self,
        oval: RectF,
        start_degrees: f32,
        sweep_degrees: f32,
        force_move_to: bool,
    ) -> Result<&mut Self, ImagingError> {
        if !oval.is_finite() || !start_degrees.is_finite() || !sweep_degrees.is_finite() {
            return Err(ImagingError::NonFinite);
        }
        let oval = oval.sorted().to_kurbo();
        let start = f64::from(start_degrees).to_radians();
        let sweep = f64::from(sweep_degrees).to_radians();
        let arc = Arc::new(
            oval.center(),
            (oval.width() / 2.0, oval.height() / 2.0),
            start,
            sweep,
            0.0,
        );
        let (sin, cos) = start.sin_cos();
        let (x, y) = point_f32(Point::new(
            arc.center.x + arc.radii.x * cos,
            arc.center.y + arc.radii.y * sin,
        ));
        if force_move_to || !self.contour_open {
            self.move_to(x, y);
        } else {
            self.line_to(x, y);
        }
        for el in arc.append_iter(SHAPE_TOLERANCE) {
            self.push_element(el);
        }
        Ok(self)
    }

    /// Append a closed rectangle contour, clockwise from the top-left corner.
    pub fn add_rect(&mut self, rect: RectF) -> &mut Self {
        let r = rect.sorted();
        self.move_to(r.x0, r.y0)
            .line_to(r.x1, r.y0)
            .line_to(r.x1, r.y1)
            .line_to(r.x0, r.y1)
            .close()
    }

    /// Append a closed ellipse contour inscribed in `oval`.
    pub fn add_oval(&mut self, oval: RectF) -> Result<&mut Self, ImagingError> {
        if !oval.is_finite() {
            return Err(ImagingError::NonFinite);
        }
        let ellipse = Ellipse::from_rect(oval.sorted().to_kurbo());
        for el in ellipse.path_elements(SHAPE_TOLERANCE) {
            self.push_element(el);
        }
        Ok(self)
    }

    /// Append a closed circle contour.
    pub fn add_circle(&mut self, cx: f32, cy: f32, radius: f32) -> Result<&mut Self, ImagingError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ImagingError::InvalidRadius);
        }
        self.add_oval(RectF::new(cx - radius, cy - radius, cx + radius, cy + radius))
    }

    /// Append a closed rounded rectangle with elliptical corners.
    ///
    /// Radii are clamped to half the rectangle size; a zero radius on
    /// either axis degenerates to [`add_rect`](Self::add_rect).
    pub fn add_rrect(&mut self, rect: RectF, rx: f32, ry: f32) -> Result<&mut Self, ImagingError> {
        if !rect.is_finite() || !rx.is_finite() || !ry.is_finite() {
            return Err(ImagingError::NonFinite);
        }
        let r = rect.sorted();
        let rx = rx.max(0.0).min(r.width() / 2.0);
        let ry = ry.max(0.0).min(r.height() / 2.0);
        if rx == 0.0 || ry == 0.0 {
            return Ok(self.add_rect(r));
        }
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        let RectF { x0, y0, x1, y1 } = r;
        self.move_to(x0 + rx, y0)
            .line_to(x1 - rx, y0)
            .cubic_to(x1 - rx + kx, y0, x1, y0 + ry - ky, x1, y0 + ry)
            .line_to(x1, y1 - ry)
            .cubic_to(x1, y1 - ry + ky, x1 - rx + kx, y1, x1 - rx, y1)
            .line_to(x0 + rx, y1)
            .cubic_to(x0 + rx - kx, y1, x0, y1 - ry + ky, x0, y1 - ry)
            .line_to(x0, y0 + ry)
            .cubic_to(x0, y0 + ry - ky, x0 + rx - kx, y0, x0 + rx, y0)
            .close();
        Ok(self)
    }

    /// Append a polyline from a flat `[x0, y0, x1, y1, ...]` list.
    pub fn add_poly(&mut self, points: &[f32], close: bool) -> Result<&mut Self, ImagingError> {
        if points.is_empty() || points.len() % 2 != 0 {
            return Err(ImagingError::InvalidPointList(points.len()));
        }
        let mut pairs = points.chunks_exact(2);
        if let Some(first) = pairs.next() {
            self.move_to(first[0], first[1]);
        }
        for p in pairs {
            self.line_to(p[0], p[1]);
        }
        if close {
            self.close();
        }
        Ok(self)
    }

    /// Copy the accumulated geometry into an independent [`Path`].
    pub fn snapshot(&self) -> Path {
        self.path.clone()
    }

    /// Move the accumulated geometry out, leaving the builder reset.
    pub fn detach(&mut self) -> Path {
        let path = core::mem::take(&mut self.path);
        self.reset();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn segments_after_close_restart_at_contour_start() {
        let mut b = PathBuilder::new();
        b.move_to(5.0, 5.0).line_to(10.0, 5.0).close().line_to(0.0, 0.0);
        assert_eq!(
            b.snapshot().commands(),
            &[
                PathCmd::MoveTo { x: 5.0, y: 5.0 },
                PathCmd::LineTo { x: 10.0, y: 5.0 },
                PathCmd::Close,
                PathCmd::MoveTo { x: 5.0, y: 5.0 },
                PathCmd::LineTo { x: 0.0, y: 0.0 },
            ]
        );
    }

    #[test]
    fn reset_restores_default_fill_type() {
        let mut b = PathBuilder::new();
        b.set_fill_type(FillType::InverseEvenOdd).add_rect(RectF::new(0.0, 0.0, 1.0, 1.0));
        b.reset();
        assert!(b.is_empty());
        assert_eq!(b.fill_type(), FillType::Winding);
    }

    #[test]
    fn snapshot_is_independent_of_builder() {
        let mut b = PathBuilder::new();
        b.add_rect(RectF::new(0.0, 0.0, 4.0, 4.0));
        let snap = b.snapshot();
        b.line_to(100.0, 100.0);
        assert_eq!(snap.commands().len(), 5);
        assert_eq!(snap.bounds(), Some(RectF::new(0.0, 0.0, 4.0, 4.0)));
    }

    #[test]
    fn detach_leaves_builder_empty() {
        let mut b = PathBuilder::new();
        b.set_fill_type(FillType::EvenOdd).move_to(1.0, 2.0).line_to(3.0, 4.0);
        let path = b.detach();
        assert_eq!(path.commands().len(), 2);
        assert_eq!(path.fill_type(), FillType::EvenOdd);
        assert!(b.is_empty());
        assert_eq!(b.fill_type(), FillType::Winding);
    }

    #[test]
    fn poly_rejects_odd_and_empty_lists() {
        let mut b = PathBuilder::new();
        assert_eq!(
            b.add_poly(&[1.0, 2.0, 3.0], true).err(),
            Some(ImagingError::InvalidPointList(3))
        );
        assert_eq!(
            b.add_poly(&[], false).err(),
            Some(ImagingError::InvalidPointList(0))
        );
        assert!(b.is_empty());
        b.add_poly(&[0.0, 0.0, 5.0, 0.0, 5.0, 5.0], true)
            .expect("even list is accepted");
        assert_eq!(b.snapshot().commands().last(), Some(&PathCmd::Close));
    }

    #[test]
    fn rrect_radii_are_clamped() {
        let mut b = PathBuilder::new();
        b.add_rrect(RectF::new(0.0, 0.0, 10.0, 4.0), 50.0, 50.0)
            .expect("finite input");
        let bounds = b.bounds().expect("non-empty");
        assert_eq!(bounds, RectF::new(0.0, 0.0, 10.0, 4.0));
    }

    #[test]
    fn circle_stays_within_its_box() {
        let mut b = PathBuilder::new();
        b.add_circle(10.0, 10.0, 5.0).expect("valid radius");
        let bounds = b.bounds().expect("non-empty");
        assert!(bounds.x0 >= 4.99 && bounds.x1 <= 15.01, "bounds {bounds:?}");
        assert!(b.add_circle(0.0, 0.0, -1.0).is_err());
    }

    #[test]
    fn arc_connects_to_open_contour() {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0);
        b.arc_to(RectF::new(0.0, 0.0, 20.0, 20.0), 0.0, 90.0, false)
            .expect("finite arc");
        let cmds = b.snapshot();
        assert_eq!(cmds.commands()[1], PathCmd::LineTo { x: 20.0, y: 10.0 });
        assert!(matches!(
            cmds.commands().last(),
            Some(PathCmd::CurveTo { .. })
        ));
    }

    #[test]
    fn transform_maps_control_points() {
        let mut b = PathBuilder::new();
        b.move_to(1.0, 1.0).quad_to(2.0, 2.0, 3.0, 1.0);
        let moved = b.snapshot().transform(&Matrix::translate(10.0, 0.0));
        assert_eq!(
            moved.commands(),
            &[
                PathCmd::MoveTo { x: 11.0, y: 1.0 },
                PathCmd::QuadTo {
                    x1: 12.0,
                    y1: 2.0,
                    x: 13.0,
                    y: 1.0
                },
            ]
        );
    }

    #[test]
    fn bez_path_conversion_anchors_leading_segments() {
        let path = Path::from_commands(vec![PathCmd::LineTo { x: 1.0, y: 1.0 }], FillType::Winding);
        let bez = path.to_bez_path();
        assert_eq!(bez.elements().len(), 2);
        assert_eq!(bez.elements()[0], PathEl::MoveTo(Point::ZERO));
    }
}
