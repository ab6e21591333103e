//! Patch the font header for the rewritten glyphs.

use write_fonts::tables::glyf::Bbox;

use super::{write_at, HEAD};
use crate::{Error, Result};

pub(super) const CHECKSUM_ADJUSTMENT: usize = 8;
const X_MIN: usize = 36;
const Y_MIN: usize = 38;
const X_MAX: usize = 40;
const Y_MAX: usize = 42;
const INDEX_TO_LOC_FORMAT: usize = 50;
/// The size of a version 1.0 header.
const HEAD_LEN: usize = 54;

/// Store the font bounding box and `loca` format, and clear the checksum
/// adjustment so it can be computed over the finished font.
pub(super) fn finish(head: &mut [u8], bounds: Bbox, loca_format: u8) -> Result<()> {
    check_len(head)?;
    write_at(HEAD, head, CHECKSUM_ADJUSTMENT, 0u32)?;
    write_at(HEAD, head, X_MIN, bounds.x_min)?;
    write_at(HEAD, head, Y_MIN, bounds.y_min)?;
    write_at(HEAD, head, X_MAX, bounds.x_max)?;
    write_at(HEAD, head, Y_MAX, bounds.y_max)?;
    write_at(HEAD, head, INDEX_TO_LOC_FORMAT, loca_format as i16)
}

fn check_len(head: &[u8]) -> Result<()> {
    if head.len() < HEAD_LEN {
        return Err(Error::MalformedTable(HEAD));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::read_u16;

    #[test]
    fn patches_fixed_fields() {
        let mut head = vec![0xFF; HEAD_LEN];
        let bounds = Bbox {
            x_min: -10,
            y_min: -200,
            x_max: 650,
            y_max: 850,
        };
        finish(&mut head, bounds, 1).unwrap();
        assert_eq!(&head[8..12], &[0, 0, 0, 0]);
        assert_eq!(read_u16(&head, X_MIN), Some((-10i16) as u16));
        assert_eq!(read_u16(&head, Y_MAX), Some(850));
        assert_eq!(read_u16(&head, INDEX_TO_LOC_FORMAT), Some(1));
        // untouched
        assert_eq!(read_u16(&head, 52), Some(0xFFFF));
    }

    #[test]
    fn short_table() {
        let mut head = vec![0; 20];
        assert!(matches!(
            finish(&mut head, Bbox::default(), 0),
            Err(Error::MalformedTable(tag)) if tag == HEAD
        ));
    }
}
