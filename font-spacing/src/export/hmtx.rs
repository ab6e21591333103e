//! Build horizontal metrics with one long metric per glyph.

use write_fonts::tables::glyf::Bbox;

use super::push;
use crate::document::Glyph;

/// The `hhea` fields summarizing the horizontal metrics.
///
/// Side bearing and extent values only consider glyphs with contours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct HorizontalExtents {
    pub(super) advance_width_max: u16,
    pub(super) min_lsb: i16,
    pub(super) min_rsb: i16,
    pub(super) x_max_extent: i16,
}

/// Round an advance width to the nearest unit that fits the table.
pub(super) fn advance(glyph: &Glyph) -> u16 {
    (glyph.advance_width() + 0.5)
        .floor()
        .clamp(0.0, u16::MAX as f64) as u16
}

/// `bounds` holds the encoded bounding box of each glyph, in glyph order.
pub(super) fn build(glyphs: &[Glyph], bounds: &[Option<Bbox>]) -> (Vec<u8>, HorizontalExtents) {
    let mut hmtx = Vec::with_capacity(glyphs.len() * 4);
    let mut extents = HorizontalExtents::default();
    let mut side_bearings: Option<(i16, i16, i16)> = None;

    for (glyph, bbox) in glyphs.iter().zip(bounds.iter().copied()) {
        let advance_width = advance(glyph);
        extents.advance_width_max = extents.advance_width_max.max(advance_width);
        let lsb = bbox.map(|b| b.x_min).unwrap_or_default();
        push(&mut hmtx, advance_width);
        push(&mut hmtx, lsb);

        let Some(bbox) = bbox else {
            continue;
        };
        let rsb = (advance_width as i32 - bbox.x_max as i32)
            .clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        let extent = bbox.x_max;
        side_bearings = Some(match side_bearings {
            None => (lsb, rsb, extent),
            Some((min_lsb, min_rsb, max_extent)) => {
                (min_lsb.min(lsb), min_rsb.min(rsb), max_extent.max(extent))
            }
        });
    }

    if let Some((min_lsb, min_rsb, x_max_extent)) = side_bearings {
        extents.min_lsb = min_lsb;
        extents.min_rsb = min_rsb;
        extents.x_max_extent = x_max_extent;
    }
    (hmtx, extents)
}
