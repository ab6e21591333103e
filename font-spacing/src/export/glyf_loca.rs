//! Write glyph outlines as `glyf` and `loca` tables.
//!
//! Every glyph becomes a simple TrueType glyph without instructions. Cubic
//! curves, which only come from CFF fonts, are approximated with quadratics.

use kurbo::{BezPath, CubicBez, PathEl, Point};
use write_fonts::{
    read::tables::glyf::CurvePoint,
    tables::glyf::{Bbox, Contour, SimpleGlyph},
};

use crate::{document::Glyph, Error, Result};

/// Maximum distance, in font units, between a cubic and its quadratic approximation.
const CUBIC_TOLERANCE: f64 = 1.0;

/// The encoded outlines plus the values other tables need from them.
#[derive(Clone, Debug, Default)]
pub(crate) struct EncodedGlyphs {
    pub(crate) glyf: Vec<u8>,
    pub(crate) loca: Vec<u8>,
    /// `0` for short offsets, `1` for long ones, as stored in `head`.
    pub(crate) loca_format: u8,
    /// Control box of every glyph; `None` for glyphs without contours.
    pub(crate) bounds: Vec<Option<Bbox>>,
    pub(crate) max_points: u16,
    pub(crate) max_contours: u16,
}

impl EncodedGlyphs {
    /// The union of all glyph bounds.
    pub(crate) fn font_bounds(&self) -> Bbox {
        self.bounds
            .iter()
            .flatten()
            .copied()
            .reduce(Bbox::union)
            .unwrap_or_default()
    }
}

pub(crate) fn encode_glyphs(glyphs: &[Glyph]) -> Result<EncodedGlyphs> {
    let mut out = EncodedGlyphs::default();
    let mut encoded = Vec::with_capacity(glyphs.len());
    let mut max_offset = 0usize;

    for glyph in glyphs {
        let contours = contours(glyph.path());
        let Some(bbox) = control_bounds(&contours) else {
            out.bounds.push(None);
            encoded.push(Vec::new());
            continue;
        };

        let num_points = contours.iter().map(Vec::len).sum::<usize>();
        out.max_points = out.max_points.max(num_points.min(u16::MAX as usize) as u16);
        out.max_contours = out
            .max_contours
            .max(contours.len().min(u16::MAX as usize) as u16);

        let simple = SimpleGlyph {
            bbox,
            contours: contours.into_iter().map(Contour::from).collect(),
            instructions: Vec::new(),
        };
        let bytes = write_fonts::dump_table(&simple).map_err(|e| Error::EncodeGlyph {
            gid: glyph.index(),
            reason: e.to_string(),
        })?;
        max_offset += padded_size(bytes.len());
        out.bounds.push(Some(bbox));
        encoded.push(bytes);
    }

    out.loca_format = if max_offset < 0x1FFFF { 0 } else { 1 };
    if out.loca_format == 0 {
        out.loca.extend_from_slice(&0_u16.to_be_bytes());
        let mut offset = 0usize;
        for g in &encoded {
            let padded_len = padded_size(g.len());
            offset += padded_len;
            out.loca.extend_from_slice(&((offset >> 1) as u16).to_be_bytes());
            out.glyf.extend_from_slice(g);
            if padded_len > g.len() {
                out.glyf.push(0);
            }
        }
    } else {
        out.loca.extend_from_slice(&0_u32.to_be_bytes());
        let mut offset = 0u32;
        for g in &encoded {
            offset += g.len() as u32;
            out.loca.extend_from_slice(&offset.to_be_bytes());
            out.glyf.extend_from_slice(g);
        }
    }

    // A table with no glyph data at all is rejected by some consumers.
    if out.glyf.is_empty() {
        out.glyf.push(0);
    }
    Ok(out)
}

/// The box around every on- and off-curve point, as `glyf` headers require.
fn control_bounds(contours: &[Vec<CurvePoint>]) -> Option<Bbox> {
    contours
        .iter()
        .flatten()
        .map(|p| Bbox {
            x_min: p.x,
            y_min: p.y,
            x_max: p.x,
            y_max: p.y,
        })
        .reduce(Bbox::union)
}

fn padded_size(len: usize) -> usize {
    len + len % 2
}

/// Round half up, the way OpenType compilers do.
fn ot_round(value: f64) -> i16 {
    (value + 0.5)
        .floor()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

fn on_curve(p: Point) -> CurvePoint {
    CurvePoint::on_curve(ot_round(p.x), ot_round(p.y))
}

fn off_curve(p: Point) -> CurvePoint {
    CurvePoint::off_curve(ot_round(p.x), ot_round(p.y))
}

/// Convert a path to TrueType contours of on- and off-curve points.
fn contours(path: &BezPath) -> Vec<Vec<CurvePoint>> {
    let mut contours = Vec::new();
    let mut current = Vec::new();
    let mut last = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                finish_contour(&mut contours, &mut current);
                current.push(on_curve(p));
                last = p;
            }
            PathEl::LineTo(p) => {
                current.push(on_curve(p));
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                current.push(off_curve(p1));
                current.push(on_curve(p2));
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                for (_, _, quad) in CubicBez::new(last, p1, p2, p3).to_quads(CUBIC_TOLERANCE) {
                    current.push(off_curve(quad.p1));
                    current.push(on_curve(quad.p2));
                }
                last = p3;
            }
            PathEl::ClosePath => finish_contour(&mut contours, &mut current),
        }
    }
    finish_contour(&mut contours, &mut current);
    contours
}

/// Close the current contour, dropping a final point that repeats the first.
fn finish_contour(contours: &mut Vec<Vec<CurvePoint>>, current: &mut Vec<CurvePoint>) {
    if current.len() > 1 && current.first() == current.last() {
        current.pop();
    }
    if !current.is_empty() {
        contours.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape};
    use pretty_assertions::assert_eq;

    #[test]
    fn rectangle_contour() {
        let path = Rect::new(10.0, 0.0, 110.0, 50.4).into_path(0.1);
        let contours = contours(&path);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0],
            vec![
                CurvePoint::on_curve(10, 0),
                CurvePoint::on_curve(110, 0),
                CurvePoint::on_curve(110, 50),
                CurvePoint::on_curve(10, 50),
            ]
        );
    }

    #[test]
    fn quadratic_points_are_kept() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.quad_to((50.0, 100.0), (100.0, 0.0));
        path.line_to((0.0, 0.0));
        path.close_path();
        assert_eq!(
            contours(&path),
            vec![vec![
                CurvePoint::on_curve(0, 0),
                CurvePoint::off_curve(50, 100),
                CurvePoint::on_curve(100, 0),
            ]]
        );
    }

    #[test]
    fn cubics_become_quadratics() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        path.close_path();
        let contours = contours(&path);
        assert_eq!(contours.len(), 1);
        let points = &contours[0];
        assert_eq!(points.first(), Some(&CurvePoint::on_curve(0, 0)));
        assert!(points.iter().any(|p| !p.on_curve));
        assert!(points.contains(&CurvePoint::on_curve(100, 0)));
    }

    #[test]
    fn header_covers_off_curve_points() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.quad_to((50.0, 100.0), (100.0, 0.0));
        path.close_path();
        let glyph = Glyph::new(0, path, 120.0);
        // the curve itself only reaches y 50
        assert_eq!(glyph.bounds().map(|r| r.y1), Some(50.0));

        let encoded = encode_glyphs(&[glyph]).unwrap();
        let bbox = Bbox {
            x_min: 0,
            y_min: 0,
            x_max: 100,
            y_max: 100,
        };
        assert_eq!(encoded.bounds, vec![Some(bbox)]);
        // x_min, y_min, x_max, y_max follow numberOfContours in the header
        assert_eq!(encoded.glyf[2..10], [0u8, 0, 0, 0, 0, 100, 0, 100]);
    }

    #[test]
    fn ot_round_half_up() {
        assert_eq!(ot_round(1.5), 2);
        assert_eq!(ot_round(-1.5), -1);
        assert_eq!(ot_round(-1.6), -2);
        assert_eq!(ot_round(1e9), i16::MAX);
    }

    #[test]
    fn empty_glyphs_take_no_space() {
        let glyphs = vec![
            Glyph::new(0, Rect::new(0.0, 0.0, 10.0, 10.0).into_path(0.1), 20.0),
            Glyph::new(1, BezPath::new(), 20.0),
        ];
        let encoded = encode_glyphs(&glyphs).unwrap();
        assert_eq!(encoded.loca_format, 0);
        assert_eq!(encoded.bounds[1], None);
        assert_eq!(encoded.max_points, 4);
        assert_eq!(encoded.max_contours, 1);
        // three short offsets, the last two equal
        assert_eq!(encoded.loca.len(), 6);
        assert_eq!(encoded.loca[2..4], encoded.loca[4..6]);
        assert_eq!(
            encoded.font_bounds(),
            Bbox {
                x_min: 0,
                y_min: 0,
                x_max: 10,
                y_max: 10
            }
        );
    }
}
