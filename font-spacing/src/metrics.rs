//! Vertical metrics measured from the outlines of representative letters.
//!
//! Declared header values are often missing or inaccurate, so the
//! measurements look at what the glyphs actually draw.

use serde::Serialize;

use crate::document::FontDocument;

/// Letters whose tops define the ascender.
pub const ASCENDER_PROBES: [char; 6] = ['d', 'h', 'l', 'b', 'k', 'H'];
/// Letters whose bottoms define the descender.
pub const DESCENDER_PROBES: [char; 4] = ['p', 'q', 'y', 'g'];

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub ascender: f64,
    pub descender: f64,
    pub units_per_em: u16,
    pub x_height: f64,
    pub cap_height: f64,
}

impl Metrics {
    pub fn compute(font: &FontDocument) -> Self {
        let ascender = ASCENDER_PROBES
            .iter()
            .filter_map(|ch| font.glyph_for_char(*ch)?.bounds())
            .map(|bounds| bounds.y1)
            .reduce(f64::max)
            .unwrap_or(font.ascender() as f64);
        let descender = DESCENDER_PROBES
            .iter()
            .filter_map(|ch| font.glyph_for_char(*ch)?.bounds())
            .map(|bounds| bounds.y0)
            .reduce(f64::min)
            .unwrap_or(font.descender() as f64);
        Metrics {
            ascender,
            descender,
            units_per_em: font.units_per_em(),
            x_height: height_of(font, 'x'),
            cap_height: height_of(font, 'H'),
        }
    }
}

fn height_of(font: &FontDocument, ch: char) -> f64 {
    font.glyph_for_char(ch)
        .and_then(|glyph| glyph.bounds())
        .map(|bounds| bounds.height())
        .unwrap_or(0.0)
}

/// The mean of `(lsb + rsb) / 2` over every mapped glyph with an outline,
/// spaces excluded, rounded to the nearest unit.
pub fn average_side_bearing(font: &FontDocument) -> i32 {
    let (sum, count) = font
        .mapped_glyph_ids()
        .into_iter()
        .filter_map(|gid| font.glyph(gid))
        .filter(|glyph| !glyph.is_space())
        .filter_map(|glyph| glyph.side_bearings())
        .fold((0.0, 0usize), |(sum, count), sb| {
            (sum + (sb.lsb + sb.rsb) / 2.0, count + 1)
        });
    if count == 0 {
        return 0;
    }
    (sum / count as f64).round() as i32
}
