//! Hide tables the outline model does not need before the font is parsed.
//!
//! Layout and kerning tables are renamed to [`SENTINEL_TAG`] in a copy of the
//! font. The table data stays where it was; only the directory entry changes,
//! so the parser sees an unknown table and never tries to interpret it.

use std::borrow::Cow;

use write_fonts::types::Tag;

use crate::directory::TableDirectoryMut;

/// The tag given to neutralized tables.
pub const SENTINEL_TAG: Tag = Tag::new(b"VOID");

/// Substitution, positioning, glyph definition, justification, baseline and
/// legacy kerning tables.
pub const NEUTRALIZED_TABLES: [Tag; 6] = [
    Tag::new(b"GSUB"),
    Tag::new(b"GPOS"),
    Tag::new(b"GDEF"),
    Tag::new(b"JSTF"),
    Tag::new(b"BASE"),
    Tag::new(b"kern"),
];

/// Return font data that is safe to hand to the parser.
///
/// The input is never modified. If the table directory cannot be read the
/// original bytes are returned unchanged and parsing is left to report the
/// problem.
pub fn sanitize(data: &[u8]) -> Cow<'_, [u8]> {
    let mut copy = data.to_vec();
    let mut directory = match TableDirectoryMut::new(&mut copy) {
        Ok(directory) => directory,
        Err(e) => {
            log::warn!("not sanitizing font: {e}");
            return Cow::Borrowed(data);
        }
    };

    let mut renamed = 0;
    for index in 0..directory.num_tables() as usize {
        let Some(tag) = directory.tag(index) else {
            continue;
        };
        if NEUTRALIZED_TABLES.contains(&tag) && directory.set_tag(index, SENTINEL_TAG) {
            log::debug!("neutralized table '{tag}'");
            renamed += 1;
        }
    }

    if renamed == 0 {
        Cow::Borrowed(data)
    } else {
        Cow::Owned(copy)
    }
}
