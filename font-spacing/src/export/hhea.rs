//! Patch the horizontal header.

use super::{hmtx::HorizontalExtents, write_at, HHEA};
use crate::{Error, Result};

const ASCENDER: usize = 4;
const DESCENDER: usize = 6;
const LINE_GAP: usize = 8;
const ADVANCE_WIDTH_MAX: usize = 10;
const MIN_LEFT_SIDE_BEARING: usize = 12;
const MIN_RIGHT_SIDE_BEARING: usize = 14;
const X_MAX_EXTENT: usize = 16;
const NUMBER_OF_H_METRICS: usize = 34;
const HHEA_LEN: usize = 36;

/// Write the declared ascender and descender, with no line gap.
pub(super) fn sync_vertical_metrics(hhea: &mut [u8], ascender: i16, descender: i16) -> Result<()> {
    check_len(hhea)?;
    write_at(HHEA, hhea, ASCENDER, ascender)?;
    write_at(HHEA, hhea, DESCENDER, descender)?;
    write_at(HHEA, hhea, LINE_GAP, 0i16)
}

/// Store the extents of the rewritten metrics. Every glyph has a long metric.
pub(super) fn finish(hhea: &mut [u8], extents: &HorizontalExtents, num_glyphs: usize) -> Result<()> {
    check_len(hhea)?;
    write_at(HHEA, hhea, ADVANCE_WIDTH_MAX, extents.advance_width_max)?;
    write_at(HHEA, hhea, MIN_LEFT_SIDE_BEARING, extents.min_lsb)?;
    write_at(HHEA, hhea, MIN_RIGHT_SIDE_BEARING, extents.min_rsb)?;
    write_at(HHEA, hhea, X_MAX_EXTENT, extents.x_max_extent)?;
    write_at(
        HHEA,
        hhea,
        NUMBER_OF_H_METRICS,
        num_glyphs.min(u16::MAX as usize) as u16,
    )
}

fn check_len(hhea: &[u8]) -> Result<()> {
    if hhea.len() < HHEA_LEN {
        return Err(Error::MalformedTable(HHEA));
    }
    Ok(())
}
