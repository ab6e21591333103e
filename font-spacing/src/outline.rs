//! Glyph outlines as kurbo paths.

use kurbo::{BezPath, PathEl, Rect, Shape};
use skrifa::outline::OutlinePen;

/// Collects the drawing commands emitted by skrifa into a [`BezPath`].
#[derive(Debug, Default)]
pub(crate) struct BezPathPen {
    path: BezPath,
}

impl BezPathPen {
    pub(crate) fn into_path(self) -> BezPath {
        self.path
    }
}

impl OutlinePen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// The tight bounds of a path, or `None` if it draws nothing measurable.
pub(crate) fn tight_bounds(path: &BezPath) -> Option<Rect> {
    path.segments().next()?;
    if !path.elements().iter().all(is_finite) {
        return None;
    }
    Some(path.bounding_box())
}

fn is_finite(el: &PathEl) -> bool {
    match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => p.is_finite(),
        PathEl::QuadTo(p1, p2) => p1.is_finite() && p2.is_finite(),
        PathEl::CurveTo(p1, p2, p3) => p1.is_finite() && p2.is_finite() && p3.is_finite(),
        PathEl::ClosePath => true,
    }
}
