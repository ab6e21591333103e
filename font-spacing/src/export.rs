//! Writing a spaced font back to binary.
//!
//! Export happens in two steps. [`FontDocument::prepare_export`] rewrites the
//! metadata tables kept in the document: it drops stale tables, rebuilds the
//! naming table, names the glyphs and fills in `post` and `OS/2`.
//! [`FontDocument::serialize`] then encodes the outlines as TrueType glyphs,
//! recomputes every table derived from them and assembles the file.
//!
//! Both steps can be repeated; serializing does not change the document.

mod glyf_loca;
mod head;
mod hhea;
mod hmtx;
mod maxp;
mod name;
mod os2;
mod post;

use write_fonts::{
    types::{Scalar, Tag},
    FontBuilder,
};

use crate::{
    directory::TableDirectory,
    document::{FontDocument, Glyph},
    sanitize::{NEUTRALIZED_TABLES, SENTINEL_TAG},
    Error, Result,
};

pub use name::{family_name, postscript_name};

const HEAD: Tag = Tag::new(b"head");
const HHEA: Tag = Tag::new(b"hhea");
const MAXP: Tag = Tag::new(b"maxp");
const OS2: Tag = Tag::new(b"OS/2");
const POST: Tag = Tag::new(b"post");
const NAME: Tag = Tag::new(b"name");
const HMTX: Tag = Tag::new(b"hmtx");
const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");

/// Tables that are never written, besides those hidden when the font was loaded.
///
/// These are AAT layout, CFF outlines, hinting and device metrics that refer
/// to the old outlines, the digital signature and variation data.
pub const DROPPED_TABLES: [Tag; 20] = [
    Tag::new(b"kerx"),
    Tag::new(b"morx"),
    Tag::new(b"mort"),
    Tag::new(b"CFF "),
    Tag::new(b"CFF2"),
    Tag::new(b"VORG"),
    Tag::new(b"hdmx"),
    Tag::new(b"LTSH"),
    Tag::new(b"VDMX"),
    Tag::new(b"fpgm"),
    Tag::new(b"prep"),
    Tag::new(b"cvt "),
    Tag::new(b"DSIG"),
    Tag::new(b"gvar"),
    Tag::new(b"cvar"),
    Tag::new(b"fvar"),
    Tag::new(b"avar"),
    Tag::new(b"HVAR"),
    Tag::new(b"MVAR"),
    Tag::new(b"VVAR"),
];

/// Tables written from the glyphs on every serialization.
const REWRITTEN_TABLES: [Tag; 7] = [GLYF, LOCA, HMTX, MAXP, HEAD, HHEA, OS2];

/// The sum of every table checksum plus this adjustment is constant.
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

fn is_dropped(tag: Tag) -> bool {
    tag == SENTINEL_TAG || NEUTRALIZED_TABLES.contains(&tag) || DROPPED_TABLES.contains(&tag)
}

impl FontDocument {
    /// Prepare the document and write it as a TrueType font.
    pub fn export(&mut self, family: &str) -> Result<Vec<u8>> {
        self.prepare_export(family)?;
        self.serialize()
    }

    /// Bring the metadata tables in line with the glyphs and `family`.
    pub fn prepare_export(&mut self, family: &str) -> Result<()> {
        self.tables.retain(|tag, _| {
            let drop = is_dropped(*tag);
            if drop {
                log::debug!("dropping table '{tag}'");
            }
            !drop
        });

        self.tables.insert(NAME, name::build(family)?);

        for glyph in &mut self.glyphs {
            glyph.name = Some(export_glyph_name(glyph));
        }

        let post = post::prepare(self.table(POST), self.units_per_em);
        self.tables.insert(POST, post);

        let os2 = os2::prepare(self.table(OS2), self)?;
        self.tables.insert(OS2, os2);

        let (ascender, descender) = (self.ascender, self.descender);
        let hhea = self
            .tables
            .get_mut(&HHEA)
            .ok_or(Error::MissingTable(HHEA))?;
        hhea::sync_vertical_metrics(hhea, ascender, descender)?;
        Ok(())
    }

    /// Encode the document as a TrueType font.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        if self.glyphs.is_empty() {
            return Err(Error::EmptyOutput);
        }
        let encoded = glyf_loca::encode_glyphs(&self.glyphs)?;
        let (hmtx, extents) = hmtx::build(&self.glyphs, &encoded.bounds);

        let mut head = self.required_table(HEAD)?.to_vec();
        head::finish(&mut head, encoded.font_bounds(), encoded.loca_format)?;

        let mut hhea = self.required_table(HHEA)?.to_vec();
        hhea::finish(&mut hhea, &extents, self.glyphs.len())?;

        let maxp = maxp::build(self.glyphs.len(), encoded.max_points, encoded.max_contours);

        let mut builder = FontBuilder::new();
        for (tag, data) in &self.tables {
            if is_dropped(*tag) || REWRITTEN_TABLES.contains(tag) {
                continue;
            }
            builder.add_raw(*tag, data.as_slice());
        }
        if let Some(data) = self.table(OS2) {
            let mut os2 = data.to_vec();
            os2::finish(&mut os2, &self.glyphs)?;
            builder.add_raw(OS2, os2);
        }
        builder
            .add_raw(HEAD, head)
            .add_raw(HHEA, hhea)
            .add_raw(MAXP, maxp)
            .add_raw(HMTX, hmtx)
            .add_raw(LOCA, encoded.loca)
            .add_raw(GLYF, encoded.glyf);

        let mut font = builder.build();
        if font.is_empty() {
            return Err(Error::EmptyOutput);
        }
        set_checksum_adjustment(&mut font)?;
        log::debug!(
            "wrote {} glyphs in {} bytes",
            self.glyphs.len(),
            font.len()
        );
        Ok(font)
    }
}

/// The name a glyph is written with: `uniXXXX` for mapped glyphs, else `glyphN`.
fn export_glyph_name(glyph: &Glyph) -> String {
    let name = match glyph.codepoint() {
        Some(codepoint) => format!("uni{codepoint:04X}"),
        None => format!("glyph{}", glyph.index()),
    };
    let name = name
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect::<String>();
    if name.is_empty() {
        return format!("glyph{}", glyph.index());
    }
    name
}

/// Overwrite a big-endian value at a fixed offset in the data of `tag`.
pub(crate) fn write_at<T: Scalar>(tag: Tag, data: &mut [u8], offset: usize, value: T) -> Result<()> {
    let raw = value.to_raw();
    let bytes = raw.as_ref();
    data.get_mut(offset..offset + bytes.len())
        .ok_or(Error::MalformedTable(tag))?
        .copy_from_slice(bytes);
    Ok(())
}

/// Append a big-endian value.
pub(crate) fn push<T: Scalar>(data: &mut Vec<u8>, value: T) {
    data.extend_from_slice(value.to_raw().as_ref());
}

/// The wrapping sum of the data as big-endian `u32`s, zero padded.
fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Store the whole-font checksum adjustment in `head`.
///
/// Expects the adjustment to currently be zero.
fn set_checksum_adjustment(font: &mut [u8]) -> Result<()> {
    let head_offset = TableDirectory::new(font)?
        .find(HEAD)
        .ok_or(Error::MissingTable(HEAD))?
        .offset as usize;
    let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(font));
    write_at(
        HEAD,
        font,
        head_offset + head::CHECKSUM_ADJUSTMENT,
        adjustment,
    )
}
