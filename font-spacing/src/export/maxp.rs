//! Build a version 1.0 `maxp` table for unhinted TrueType glyphs.

use super::push;

const VERSION_1_0: u32 = 0x0001_0000;

/// Composite and instruction limits are zero since every glyph is simple and
/// all hinting is dropped. One zone is the minimum a rasterizer expects.
pub(super) fn build(num_glyphs: usize, max_points: u16, max_contours: u16) -> Vec<u8> {
    let mut maxp = Vec::with_capacity(32);
    push(&mut maxp, VERSION_1_0);
    push(&mut maxp, num_glyphs.min(u16::MAX as usize) as u16);
    push(&mut maxp, max_points);
    push(&mut maxp, max_contours);
    push(&mut maxp, 0u16); // maxCompositePoints
    push(&mut maxp, 0u16); // maxCompositeContours
    push(&mut maxp, 1u16); // maxZones
    for _ in 0..8 {
        push(&mut maxp, 0u16);
    }
    maxp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{read_u16, read_u32};

    #[test]
    fn version_1_layout() {
        let maxp = build(62, 12, 2);
        assert_eq!(maxp.len(), 32);
        assert_eq!(read_u32(&maxp, 0), Some(VERSION_1_0));
        assert_eq!(read_u16(&maxp, 4), Some(62));
        assert_eq!(read_u16(&maxp, 6), Some(12));
        assert_eq!(read_u16(&maxp, 8), Some(2));
        assert_eq!(read_u16(&maxp, 14), Some(1));
        assert!(maxp[16..].iter().all(|b| *b == 0));
    }
}
