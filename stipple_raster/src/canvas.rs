// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stateful drawing interface bound to a surface.

use kurbo::{Affine, BezPath, Ellipse, Line, PathEl, Point, Shape, StrokeOpts};
use peniko::{Color, Compose, Fill, Mix};
use stipple_imaging::{
    Argb, BlendMode, ClipOp, FillType, Matrix, Paint, Path, PathBuilder, RectF, SamplingOptions,
};

use crate::Image;
use crate::brush::Brush;
use crate::surface::{ClipLayer, Surface};

/// Flattening tolerance for curves, strokes, and clips, in device pixels.
const TOLERANCE: f64 = 0.1;

/// Drawing interface bound to one [`Surface`].
///
/// A canvas is a view: the transform and clip stack it manipulates belong
/// to the surface.
///
/// ```
/// use stipple_imaging::{Argb, Paint, RectF};
/// use stipple_raster::{Surface, SurfaceOptions};
///
/// let mut surface = Surface::new_raster(8, 8, &SurfaceOptions::default()).unwrap();
/// let mut canvas = surface.canvas();
/// canvas.clear(Argb::WHITE);
/// assert_eq!(canvas.save(), 1);
/// canvas.translate(2.0, 2.0);
/// canvas.draw_rect(RectF::from_xywh(0.0, 0.0, 4.0, 4.0), &Paint::new());
/// canvas.restore();
/// assert_eq!(canvas.save_count(), 1);
/// ```
#[derive(Debug)]
pub struct Canvas<'s> {
    surface: &'s mut Surface,
}

impl<'s> Canvas<'s> {
    pub(crate) fn new(surface: &'s mut Surface) -> Self {
        Self { surface }
    }

    /// Width of the bound surface.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Height of the bound surface.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    // Save stack.

    /// Push a copy of the current transform and clip.
    ///
    /// Returns the save count before the push, so the first save returns 1.
    pub fn save(&mut self) -> usize {
        self.surface.state.push_copy() + 1
    }

    /// Number of saved states plus one for the base state.
    pub fn save_count(&self) -> usize {
        self.surface.state.depth() + 1
    }

    /// Pop the most recent save. A no-op at the base state.
    pub fn restore(&mut self) {
        if self.surface.state.pop().is_some() {
            self.unwind_clips();
        } else {
            log::trace!("restore at base state ignored");
        }
    }

    /// Restore until the save count is `count`. Counts of 0 and 1 both
    /// return to the base state.
    pub fn restore_to_count(&mut self, count: usize) {
        let depth = count.max(1) - 1;
        if self.surface.state.pop_to(depth).count() > 0 {
            self.unwind_clips();
        }
    }

    fn unwind_clips(&mut self) {
        let depth = self.surface.state.top().clip_depth;
        self.surface.pop_clips_to(depth);
    }

    // Transform.

    /// Pre-concatenate a translation.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.concat(&Matrix::translate(dx, dy));
    }

    /// Pre-concatenate a scale.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.concat(&Matrix::scale(sx, sy));
    }

    /// Pre-concatenate a clockwise rotation in degrees.
    pub fn rotate(&mut self, degrees: f32) {
        self.concat(&Matrix::rotate_degrees(degrees));
    }

    /// Pre-concatenate a skew.
    pub fn skew(&mut self, kx: f32, ky: f32) {
        self.concat(&Matrix::skew(kx, ky));
    }

    /// Pre-concatenate `matrix`, so it applies to geometry before the
    /// current transform.
    pub fn concat(&mut self, matrix: &Matrix) {
        let top = self.surface.state.top_mut();
        top.matrix = top.matrix.concat(matrix);
    }

    /// Replace the current transform.
    pub fn set_matrix(&mut self, matrix: &Matrix) {
        self.surface.state.top_mut().matrix = *matrix;
    }

    /// Reset the current transform to identity.
    pub fn reset_matrix(&mut self) {
        self.set_matrix(&Matrix::IDENTITY);
    }

    /// The current transform.
    pub fn total_matrix(&self) -> Matrix {
        self.surface.state.top().matrix
    }

    // Clip.

    /// Combine a rectangle with the current clip.
    pub fn clip_rect(&mut self, rect: RectF, op: ClipOp, anti_alias: bool) {
        let mut builder = PathBuilder::new();
        builder.add_rect(rect.sorted());
        self.clip_path(builder.as_path(), op, anti_alias);
    }

    /// Combine a path with the current clip.
    ///
    /// Inverse fill types flip the operation. Clip edges are always
    /// anti-aliased.
    pub fn clip_path(&mut self, path: &Path, op: ClipOp, _anti_alias: bool) {
        let matrix = self.total_matrix();
        let device = map_path(&path.to_bez_path(), &matrix);
        let difference = (op == ClipOp::Difference) != path.fill_type().is_inverse();
        let clip = if difference {
            // The surface bounds plus the path, under even-odd, leave
            // everything outside the path.
            let mut outside = self.surface.device_rect().to_path(TOLERANCE);
            outside.extend(device.iter());
            ClipLayer {
                path: outside,
                fill: Fill::EvenOdd,
            }
        } else {
            ClipLayer {
                path: device,
                fill: path.fill_type().to_fill(),
            }
        };
        self.surface.push_clip(clip);
        self.surface.state.top_mut().clip_depth = self.surface.clips.len();
    }

    // Fills that cover the clip.

    /// Replace every pixel inside the clip with `color`.
    pub fn clear(&mut self, color: Argb) {
        if self.surface.clips.is_empty() {
            self.surface.fill_all(color);
        } else {
            self.draw_color(color, BlendMode::Src);
        }
    }

    /// Fill the whole clip with `paint`.
    pub fn draw_paint(&mut self, paint: &Paint) {
        let device = self.surface.device_rect().to_path(TOLERANCE);
        let matrix = self.total_matrix();
        self.fill_device(
            &device,
            FillType::Winding,
            &Brush::from_paint(paint),
            matrix.to_affine_lossy(),
            paint.blend_mode(),
        );
    }

    /// Fill the whole clip with a color.
    pub fn draw_color(&mut self, color: Argb, mode: BlendMode) {
        let mut paint = Paint::new();
        paint.set_color(color);
        paint.set_blend_mode(mode);
        self.draw_paint(&paint);
    }

    // Geometry.

    /// Draw a rectangle.
    pub fn draw_rect(&mut self, rect: RectF, paint: &Paint) {
        let local = rect.sorted().to_kurbo().to_path(TOLERANCE);
        self.draw_local(&local, FillType::Winding, paint);
    }

    /// Draw a rectangle with elliptical corners.
    pub fn draw_rrect(&mut self, rect: RectF, rx: f32, ry: f32, paint: &Paint) {
        let mut builder = PathBuilder::new();
        if builder.add_rrect(rect, rx, ry).is_err() {
            log::debug!("draw_rrect skipped non-finite geometry");
            return;
        }
        self.draw_local(&builder.as_path().to_bez_path(), FillType::Winding, paint);
    }

    /// Draw the ellipse inscribed in `oval`.
    pub fn draw_oval(&mut self, oval: RectF, paint: &Paint) {
        let local = Ellipse::from_rect(oval.sorted().to_kurbo()).to_path(TOLERANCE);
        self.draw_local(&local, FillType::Winding, paint);
    }

    /// Draw a circle. Negative or non-finite radii draw nothing.
    pub fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        let mut builder = PathBuilder::new();
        if builder.add_circle(cx, cy, radius).is_err() {
            log::debug!("draw_circle skipped invalid radius {radius}");
            return;
        }
        self.draw_local(&builder.as_path().to_bez_path(), FillType::Winding, paint);
    }

    /// Stroke a line segment, whatever the paint style.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, paint: &Paint) {
        let line = Line::new(
            (f64::from(x0), f64::from(y0)),
            (f64::from(x1), f64::from(y1)),
        );
        self.stroke_local(&line.to_path(TOLERANCE), paint);
    }

    /// Draw a path with its own fill type.
    pub fn draw_path(&mut self, path: &Path, paint: &Paint) {
        self.draw_local(&path.to_bez_path(), path.fill_type(), paint);
    }

    // Images.

    /// Draw an image with its top-left corner at `(x, y)`.
    pub fn draw_image(
        &mut self,
        image: &Image,
        x: f32,
        y: f32,
        sampling: SamplingOptions,
        paint: Option<&Paint>,
    ) {
        #[allow(
            clippy::cast_precision_loss,
            reason = "image dimensions are at most 65535"
        )]
        let rect = RectF::from_xywh(x, y, image.width() as f32, image.height() as f32);
        let place = Matrix::translate(x, y);
        self.draw_image_mapped(image, rect, &place, sampling, paint);
    }

    /// Draw the `src` region of an image scaled into `dst`.
    ///
    /// Empty or non-finite rectangles draw nothing.
    pub fn draw_image_rect(
        &mut self,
        image: &Image,
        src: RectF,
        dst: RectF,
        sampling: SamplingOptions,
        paint: Option<&Paint>,
    ) {
        let (src, dst) = (src.sorted(), dst.sorted());
        if src.is_empty() || dst.is_empty() || !src.is_finite() || !dst.is_finite() {
            log::debug!("draw_image_rect skipped empty rectangle");
            return;
        }
        let place = Matrix::translate(dst.x0, dst.y0)
            .concat(&Matrix::scale(
                dst.width() / src.width(),
                dst.height() / src.height(),
            ))
            .concat(&Matrix::translate(-src.x0, -src.y0));
        self.draw_image_mapped(image, dst, &place, sampling, paint);
    }

    fn draw_image_mapped(
        &mut self,
        image: &Image,
        dst: RectF,
        place: &Matrix,
        sampling: SamplingOptions,
        paint: Option<&Paint>,
    ) {
        let matrix = self.total_matrix();
        let device = map_path(&dst.to_kurbo().to_path(TOLERANCE), &matrix);
        let brush = Brush::from_image(image, sampling, paint);
        let blend = paint.map_or(BlendMode::SrcOver, Paint::blend_mode);
        let image_transform = matrix.concat(place).to_affine_lossy();
        self.fill_device(&device, FillType::Winding, &brush, image_transform, blend);
    }

    // Pipeline.

    /// Fill and/or stroke local geometry according to the paint style.
    fn draw_local(&mut self, local: &BezPath, fill_type: FillType, paint: &Paint) {
        if paint.fills() {
            let matrix = self.total_matrix();
            let device = map_path(local, &matrix);
            self.fill_device(
                &device,
                fill_type,
                &Brush::from_paint(paint),
                matrix.to_affine_lossy(),
                paint.blend_mode(),
            );
        }
        if paint.strokes() {
            self.stroke_local(local, paint);
        }
    }

    /// Stroke local geometry by filling its outline.
    fn stroke_local(&mut self, local: &BezPath, paint: &Paint) {
        let outline = kurbo::stroke(
            local.iter(),
            &paint.to_kurbo_stroke(),
            &StrokeOpts::default(),
            TOLERANCE,
        );
        let matrix = self.total_matrix();
        let device = map_path(&outline, &matrix);
        self.fill_device(
            &device,
            FillType::Winding,
            &Brush::from_paint(paint),
            matrix.to_affine_lossy(),
            paint.blend_mode(),
        );
    }

    /// Fill device-space geometry with `brush`, whose coordinates are mapped
    /// to the device by `brush_transform`.
    fn fill_device(
        &mut self,
        device: &BezPath,
        fill_type: FillType,
        brush: &Brush,
        brush_transform: Affine,
        blend: BlendMode,
    ) {
        let bounds = self.surface.device_rect();
        let ctx = self.surface.begin_draw();
        ctx.set_transform(Affine::IDENTITY);
        ctx.set_paint_transform(brush_transform);
        brush.apply(ctx);
        let fill = fill_type.to_fill();
        if fill_type.is_inverse() {
            // Paint everything, then knock the path out of the group.
            ctx.set_fill_rule(Fill::NonZero);
            ctx.push_layer(None, Some(blend.to_peniko()), None, None, None);
            ctx.fill_rect(&bounds);
            ctx.set_paint(Color::BLACK);
            ctx.set_fill_rule(fill);
            let knockout = peniko::BlendMode::new(Mix::Normal, Compose::DestOut);
            ctx.push_layer(None, Some(knockout), None, None, None);
            ctx.fill_path(device);
            ctx.pop_layer();
            ctx.pop_layer();
        } else if blend == BlendMode::SrcOver {
            ctx.set_fill_rule(fill);
            ctx.fill_path(device);
        } else {
            // Confine the blend to the geometry's own coverage.
            ctx.set_fill_rule(fill);
            ctx.push_layer(Some(device), Some(blend.to_peniko()), None, None, None);
            ctx.fill_rect(&device.bounding_box().intersect(bounds));
            ctx.pop_layer();
        }
    }
}

/// Map a path through a 3×3 matrix. Affine matrices are applied exactly;
/// with perspective every point, control points included, is projected.
fn map_path(path: &BezPath, matrix: &Matrix) -> BezPath {
    if let Some(affine) = matrix.to_affine() {
        return affine * path.clone();
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "device coordinates are projected in f32 like every other coordinate"
    )]
    let map = |p: Point| {
        let (x, y) = matrix.map_point(p.x as f32, p.y as f32);
        Point::new(f64::from(x), f64::from(y))
    };
    path.iter()
        .map(|el| match el {
            PathEl::MoveTo(p) => PathEl::MoveTo(map(p)),
            PathEl::LineTo(p) => PathEl::LineTo(map(p)),
            PathEl::QuadTo(p1, p) => PathEl::QuadTo(map(p1), map(p)),
            PathEl::CurveTo(p1, p2, p) => PathEl::CurveTo(map(p1), map(p2), map(p)),
            PathEl::ClosePath => PathEl::ClosePath,
        })
        .collect()
}
