//! Collecting scaled outlines into kurbo paths.

use kurbo::{BezPath, Point};
use skrifa::outline::OutlinePen;

/// A pen that records outline commands as a [`BezPath`].
///
/// Coordinates are in pixels, with y growing upwards from the baseline.
#[derive(Clone, Debug, Default)]
pub struct BezPathPen {
    path: BezPath,
}

fn as_kurbo_point(x: f32, y: f32) -> Point {
    Point {
        x: x as f64,
        y: y as f64,
    }
}

impl BezPathPen {
    pub fn new() -> BezPathPen {
        BezPathPen {
            path: BezPath::new(),
        }
    }

    pub fn into_inner(self) -> BezPath {
        self.path
    }
}

impl OutlinePen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(as_kurbo_point(x, y))
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(as_kurbo_point(x, y))
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to(as_kurbo_point(cx0, cy0), as_kurbo_point(x, y));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            as_kurbo_point(cx0, cy0),
            as_kurbo_point(cx1, cy1),
            as_kurbo_point(x, y),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{PathEl, Shape};

    #[test]
    fn records_commands() {
        let mut pen = BezPathPen::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(4.0, 0.0);
        pen.quad_to(4.0, 4.0, 0.0, 4.0);
        pen.close();
        let path = pen.into_inner();
        assert_eq!(
            path.elements(),
            [
                PathEl::MoveTo((0.0, 0.0).into()),
                PathEl::LineTo((4.0, 0.0).into()),
                PathEl::QuadTo((4.0, 4.0).into(), (0.0, 4.0).into()),
                PathEl::ClosePath,
            ]
        );
        assert!(path.contains((2.0, 1.0).into()));
        assert!(!path.contains((5.0, 1.0).into()));
    }
}
