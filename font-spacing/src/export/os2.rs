//! Fill in and synchronize the `OS/2` table.

use write_fonts::types::Tag;

use super::{hmtx, push, write_at, OS2};
use crate::{
    directory::{read_u16, read_u32},
    document::{FontDocument, Glyph},
    Result,
};

const VERSION: usize = 0;
const X_AVG_CHAR_WIDTH: usize = 2;
const US_WEIGHT_CLASS: usize = 4;
const US_WIDTH_CLASS: usize = 6;
const S_TYPO_ASCENDER: usize = 68;
const S_TYPO_DESCENDER: usize = 70;
const S_TYPO_LINE_GAP: usize = 72;
const US_WIN_ASCENT: usize = 74;
const US_WIN_DESCENT: usize = 76;
const UL_CODE_PAGE_RANGE_1: usize = 78;
const UL_CODE_PAGE_RANGE_2: usize = 82;

/// The size of a version 0 table, which ends after the win metrics.
const VERSION_0_LEN: usize = 78;
/// Versions 1 and up add the code page ranges.
const VERSION_1_LEN: usize = 86;
const VERSION_4_LEN: usize = 96;

const DEFAULT_WEIGHT_CLASS: u16 = 400;
const DEFAULT_WIDTH_CLASS: u16 = 5;
/// Code page range bit 0, Latin 1.
const LATIN_1: u32 = 1;
/// Regular
const FS_SELECTION: u16 = 0x0040;

/// Return a table with usable defaults and the document's vertical metrics.
///
/// A missing or truncated table is replaced by a complete version 4 table.
pub(super) fn prepare(existing: Option<&[u8]>, font: &FontDocument) -> Result<Vec<u8>> {
    let mut os2 = match existing {
        Some(data) if data.len() >= VERSION_0_LEN => data.to_vec(),
        Some(_) => {
            log::warn!("OS/2 table is truncated, replacing it");
            new_table(font)
        }
        None => new_table(font),
    };

    if read_u16(&os2, US_WEIGHT_CLASS) == Some(0) {
        write_at(OS2, &mut os2, US_WEIGHT_CLASS, DEFAULT_WEIGHT_CLASS)?;
    }
    if read_u16(&os2, US_WIDTH_CLASS) == Some(0) {
        write_at(OS2, &mut os2, US_WIDTH_CLASS, DEFAULT_WIDTH_CLASS)?;
    }
    let has_code_pages = read_u16(&os2, VERSION).unwrap_or_default() >= 1
        && os2.len() >= VERSION_1_LEN;
    if has_code_pages
        && read_u32(&os2, UL_CODE_PAGE_RANGE_1) == Some(0)
        && read_u32(&os2, UL_CODE_PAGE_RANGE_2) == Some(0)
    {
        write_at(OS2, &mut os2, UL_CODE_PAGE_RANGE_1, LATIN_1)?;
    }

    sync_vertical_metrics(&mut os2, font.ascender(), font.descender())?;
    Ok(os2)
}

/// Typo metrics match `hhea`; win metrics are their unsigned counterparts.
fn sync_vertical_metrics(os2: &mut [u8], ascender: i16, descender: i16) -> Result<()> {
    write_at(OS2, os2, S_TYPO_ASCENDER, ascender)?;
    write_at(OS2, os2, S_TYPO_DESCENDER, descender)?;
    write_at(OS2, os2, S_TYPO_LINE_GAP, 0i16)?;
    write_at(OS2, os2, US_WIN_ASCENT, ascender.max(0) as u16)?;
    write_at(OS2, os2, US_WIN_DESCENT, descender.saturating_neg().max(0) as u16)
}

/// Store the average advance of all glyphs with a non-zero advance.
pub(super) fn finish(os2: &mut [u8], glyphs: &[Glyph]) -> Result<()> {
    let (sum, count) = glyphs
        .iter()
        .map(hmtx::advance)
        .filter(|advance| *advance > 0)
        .fold((0u64, 0u64), |(sum, count), advance| {
            (sum + advance as u64, count + 1)
        });
    let average = if count == 0 {
        0
    } else {
        ((sum as f64 / count as f64).round() as i64).min(i16::MAX as i64) as i16
    };
    write_at(OS2, os2, X_AVG_CHAR_WIDTH, average)
}

fn new_table(font: &FontDocument) -> Vec<u8> {
    let upm = font.units_per_em() as f64;
    let scaled = |ratio: f64| (upm * ratio).round() as i16;
    let metrics = font.metrics();
    let first_char = font.char_map.keys().next().copied().unwrap_or_default();
    let last_char = font.char_map.keys().next_back().copied().unwrap_or_default();

    let mut os2 = Vec::with_capacity(VERSION_4_LEN);
    push(&mut os2, 4u16); // version
    push(&mut os2, 0i16); // xAvgCharWidth, set when serializing
    push(&mut os2, DEFAULT_WEIGHT_CLASS);
    push(&mut os2, DEFAULT_WIDTH_CLASS);
    push(&mut os2, 0u16); // fsType: installable
    push(&mut os2, scaled(0.65)); // ySubscriptXSize
    push(&mut os2, scaled(0.6)); // ySubscriptYSize
    push(&mut os2, 0i16); // ySubscriptXOffset
    push(&mut os2, scaled(0.075)); // ySubscriptYOffset
    push(&mut os2, scaled(0.65)); // ySuperscriptXSize
    push(&mut os2, scaled(0.6)); // ySuperscriptYSize
    push(&mut os2, 0i16); // ySuperscriptXOffset
    push(&mut os2, scaled(0.35)); // ySuperscriptYOffset
    push(&mut os2, scaled(0.05)); // yStrikeoutSize
    push(&mut os2, scaled(0.25)); // yStrikeoutPosition
    push(&mut os2, 0i16); // sFamilyClass
    os2.extend_from_slice(&[0; 10]); // panose
    for range in [1u32, 0, 0, 0] {
        push(&mut os2, range); // ulUnicodeRange, Basic Latin
    }
    push(&mut os2, Tag::new(b"NONE"));
    push(&mut os2, FS_SELECTION);
    push(&mut os2, first_char.min(0xFFFF) as u16);
    push(&mut os2, last_char.min(0xFFFF) as u16);
    // vertical metrics are synchronized afterwards
    os2.extend_from_slice(&[0; 10]);
    push(&mut os2, LATIN_1);
    push(&mut os2, 0u32);
    push(&mut os2, metrics.x_height.round() as i16);
    push(&mut os2, metrics.cap_height.round() as i16);
    push(&mut os2, 0u16); // usDefaultChar
    push(&mut os2, 0x20u16); // usBreakChar
    push(&mut os2, 0u16); // usMaxContext
    os2
}
