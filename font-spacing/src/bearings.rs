//! Moving an outline to reach target side bearings.

use kurbo::{Affine, Vec2};

use crate::document::Glyph;

/// Shifts smaller than this, in font units, are not applied.
const EPSILON: f64 = 1e-3;

/// What [`Glyph::set_side_bearings`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    /// The outline was moved or the advance width changed.
    Applied,
    /// The glyph already had the requested side bearings.
    Unchanged,
    /// Space glyphs are never touched.
    SkippedSpace,
    /// The glyph has no measurable outline.
    SkippedEmpty,
}

impl Adjustment {
    /// `true` if the glyph now has the requested side bearings.
    pub fn is_at_target(self) -> bool {
        matches!(self, Adjustment::Applied | Adjustment::Unchanged)
    }
}

impl Glyph {
    /// Move the outline horizontally so that its left side bearing is `lsb`,
    /// then set the advance width so that its right side bearing is `rsb`.
    ///
    /// Either side may be `None` to leave it alone. The left side is always
    /// handled first, so the right side is measured from the moved outline.
    pub fn set_side_bearings(&mut self, lsb: Option<f64>, rsb: Option<f64>) -> Adjustment {
        if self.is_space() {
            return Adjustment::SkippedSpace;
        }
        let Some(mut bounds) = self.bounds() else {
            return Adjustment::SkippedEmpty;
        };

        let mut changed = false;
        if let Some(lsb) = lsb {
            let shift = lsb - bounds.x0;
            if shift.abs() > EPSILON {
                self.path.apply_affine(Affine::translate(Vec2::new(shift, 0.0)));
                changed = true;
                match self.bounds() {
                    Some(moved) => bounds = moved,
                    None => return Adjustment::Applied,
                }
            }
        }

        if let Some(rsb) = rsb {
            let advance_width = bounds.x1 + rsb;
            if (advance_width - self.advance_width).abs() > EPSILON {
                self.advance_width = advance_width;
                changed = true;
            }
        }

        if changed {
            log::trace!(
                "glyph {} now has lsb {:?} rsb {:?}",
                self.index,
                self.lsb(),
                self.rsb()
            );
            Adjustment::Applied
        } else {
            Adjustment::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{BezPath, Rect, Shape};

    fn rect_glyph(x0: f64, x1: f64, advance: f64) -> Glyph {
        let path = Rect::new(x0, 0.0, x1, 700.0).into_path(0.1);
        Glyph::new(1, path, advance).with_codepoint('H' as u32)
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!((actual - expected).abs() < 1.0, "{actual} != {expected}");
    }

    #[test]
    fn reaches_both_targets() {
        let mut glyph = rect_glyph(60.0, 540.0, 600.0);
        assert_eq!(
            glyph.set_side_bearings(Some(80.0), Some(70.0)),
            Adjustment::Applied
        );
        assert_close(glyph.lsb(), 80.0);
        assert_close(glyph.rsb(), 70.0);
        // width of the outline is preserved
        assert_eq!(glyph.advance_width(), 80.0 + 480.0 + 70.0);
    }

    #[test]
    fn idempotent() {
        let mut glyph = rect_glyph(60.0, 540.0, 600.0);
        glyph.set_side_bearings(Some(12.5), Some(30.0));
        let once = glyph.clone();
        assert_eq!(
            glyph.set_side_bearings(Some(12.5), Some(30.0)),
            Adjustment::Unchanged
        );
        assert_eq!(glyph, once);
    }

    #[test]
    fn one_side_only() {
        let mut glyph = rect_glyph(60.0, 540.0, 600.0);
        glyph.set_side_bearings(None, Some(10.0));
        assert_close(glyph.lsb(), 60.0);
        assert_close(glyph.rsb(), 10.0);

        let mut glyph = rect_glyph(60.0, 540.0, 600.0);
        glyph.set_side_bearings(Some(100.0), None);
        assert_close(glyph.lsb(), 100.0);
        // the advance stays, so the right side shrinks by the shift
        assert_eq!(glyph.advance_width(), 600.0);
        assert_close(glyph.rsb(), 20.0);
    }

    #[test]
    fn moves_control_points() {
        let mut path = BezPath::new();
        path.move_to((100.0, 0.0));
        path.quad_to((150.0, 200.0), (200.0, 0.0));
        path.close_path();
        let mut glyph = Glyph::new(1, path, 300.0);
        glyph.set_side_bearings(Some(0.0), None);
        let elements = glyph.path().elements();
        assert_eq!(
            elements[1],
            kurbo::PathEl::QuadTo((50.0, 200.0).into(), (100.0, 0.0).into())
        );
    }

    #[test]
    fn space_is_immune() {
        let mut glyph = rect_glyph(60.0, 540.0, 600.0);
        glyph.codepoints = vec![0x20];
        let before = glyph.clone();
        assert_eq!(
            glyph.set_side_bearings(Some(5.0), Some(5.0)),
            Adjustment::SkippedSpace
        );
        assert_eq!(glyph, before);

        let mut named = Glyph::new(2, BezPath::new(), 250.0).with_name("space");
        assert_eq!(
            named.set_side_bearings(Some(5.0), Some(5.0)),
            Adjustment::SkippedSpace
        );
    }

    #[test]
    fn empty_outline_is_left_alone() {
        let mut glyph = Glyph::new(1, BezPath::new(), 500.0);
        assert_eq!(
            glyph.set_side_bearings(Some(5.0), Some(5.0)),
            Adjustment::SkippedEmpty
        );
        assert_eq!(glyph.advance_width(), 500.0);
        assert!(!Adjustment::SkippedEmpty.is_at_target());
    }
}
