//! Encode fixture contours as a minimal `CFF ` table.
//!
//! The table holds a single font with no subroutines, no hints and the
//! default charset. Quadratic contours are raised to cubics.

use write_fonts::read::tables::glyf::CurvePoint;

use crate::BeBuffer;

// charstring operators
const RLINETO: u8 = 5;
const RRCURVETO: u8 = 8;
const ENDCHAR: u8 = 14;
const RMOVETO: u8 = 21;

// DICT operators
const CHARSTRINGS: u8 = 17;
const PRIVATE: u8 = 18;
const DEFAULT_WIDTH_X: u8 = 20;
const NOMINAL_WIDTH_X: u8 = 21;

/// Build a version 1 CFF table with one charstring per glyph.
pub(crate) fn build(font_name: &str, glyphs: &[Vec<Vec<CurvePoint>>]) -> Vec<u8> {
    let header = BeBuffer::new()
        .extend([1u8, 0]) // major, minor
        .push(4u8) // hdrSize
        .push(4u8) // offSize
        .into_vec();
    let names = index(&[font_name.as_bytes().to_vec()]);
    let strings = index(&[]);
    let global_subrs = index(&[]);
    let charstrings = index(&glyphs.iter().map(|g| charstring(g)).collect::<Vec<_>>());
    let private = Dict::default()
        .entry(&[0], DEFAULT_WIDTH_X)
        .entry(&[0], NOMINAL_WIDTH_X)
        .into_vec();

    // every DICT operand takes five bytes, so the size is known up front
    let top_dict_len = Dict::default()
        .entry(&[0], CHARSTRINGS)
        .entry(&[0, 0], PRIVATE)
        .into_vec()
        .len();
    let top_dicts_len = index(&[vec![0; top_dict_len]]).len();
    let charstrings_offset =
        header.len() + names.len() + top_dicts_len + strings.len() + global_subrs.len();
    let private_offset = charstrings_offset + charstrings.len();
    let top_dict = Dict::default()
        .entry(&[charstrings_offset as i32], CHARSTRINGS)
        .entry(&[private.len() as i32, private_offset as i32], PRIVATE)
        .into_vec();

    [
        header,
        names,
        index(&[top_dict]),
        strings,
        global_subrs,
        charstrings,
        private,
    ]
    .concat()
}

/// An INDEX with four byte offsets.
fn index(items: &[Vec<u8>]) -> Vec<u8> {
    if items.is_empty() {
        return vec![0, 0];
    }
    let mut buf = BeBuffer::new().push(items.len() as u16).push(4u8);
    let mut offset = 1u32;
    buf = buf.push(offset);
    for item in items {
        offset += item.len() as u32;
        buf = buf.push(offset);
    }
    for item in items {
        buf = buf.bytes(item);
    }
    buf.into_vec()
}

#[derive(Default)]
struct Dict(BeBuffer);

impl Dict {
    /// Operands are always written as 32-bit integers.
    fn entry(mut self, operands: &[i32], operator: u8) -> Self {
        for operand in operands {
            self.0 = self.0.push(29u8).push(*operand);
        }
        self.0 = self.0.push(operator);
        self
    }

    fn into_vec(self) -> Vec<u8> {
        self.0.into_vec()
    }
}

#[derive(Default)]
struct CharString {
    buf: Vec<u8>,
    current: (i32, i32),
}

impl CharString {
    fn number(&mut self, value: i32) {
        let value = value.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        self.buf.push(28);
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn delta(&mut self, to: (i32, i32)) {
        self.number(to.0 - self.current.0);
        self.number(to.1 - self.current.1);
        self.current = to;
    }

    fn move_to(&mut self, to: (i32, i32)) {
        self.delta(to);
        self.buf.push(RMOVETO);
    }

    fn line_to(&mut self, to: (i32, i32)) {
        self.delta(to);
        self.buf.push(RLINETO);
    }

    /// The cubic equivalent of a quadratic curve, with rounded control points.
    fn quad_to(&mut self, control: (i32, i32), to: (i32, i32)) {
        let two_thirds = |from: (i32, i32)| {
            (
                from.0 + (2.0 * (control.0 - from.0) as f64 / 3.0).round() as i32,
                from.1 + (2.0 * (control.1 - from.1) as f64 / 3.0).round() as i32,
            )
        };
        let c1 = two_thirds(self.current);
        let c2 = two_thirds(to);
        self.delta(c1);
        self.delta(c2);
        self.delta(to);
        self.buf.push(RRCURVETO);
    }
}

/// Contours without an on-curve point are skipped.
fn charstring(contours: &[Vec<CurvePoint>]) -> Vec<u8> {
    let mut cs = CharString::default();
    for contour in contours {
        let Some(start_ix) = contour.iter().position(|p| p.on_curve) else {
            continue;
        };
        let start = (contour[start_ix].x as i32, contour[start_ix].y as i32);
        cs.move_to(start);
        let mut pending: Option<(i32, i32)> = None;
        for point in contour[start_ix + 1..].iter().chain(&contour[..start_ix]) {
            let to = (point.x as i32, point.y as i32);
            if point.on_curve {
                match pending.take() {
                    Some(control) => cs.quad_to(control, to),
                    None => cs.line_to(to),
                }
            } else {
                if let Some(control) = pending {
                    let implied = ((control.0 + to.0) / 2, (control.1 + to.1) / 2);
                    cs.quad_to(control, implied);
                }
                pending = Some(to);
            }
        }
        // the closing line back to the start is implied
        if let Some(control) = pending {
            cs.quad_to(control, start);
        }
    }
    cs.buf.push(ENDCHAR);
    cs.buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_charstring() {
        let rect = vec![
            CurvePoint::on_curve(10, 0),
            CurvePoint::on_curve(110, 0),
            CurvePoint::on_curve(110, 50),
            CurvePoint::on_curve(10, 50),
        ];
        let expected = [
            vec![28, 0, 10, 28, 0, 0, RMOVETO],
            vec![28, 0, 100, 28, 0, 0, RLINETO],
            vec![28, 0, 0, 28, 0, 50, RLINETO],
            vec![28, 0xFF, 0x9C, 28, 0, 0, RLINETO],
            vec![ENDCHAR],
        ]
        .concat();
        assert_eq!(charstring(&[rect]), expected);
    }

    #[test]
    fn empty_index() {
        assert_eq!(index(&[]), vec![0, 0]);
        assert_eq!(
            index(&[vec![7, 8]]),
            vec![0, 1, 4, 0, 0, 0, 1, 0, 0, 0, 3, 7, 8]
        );
    }
}
