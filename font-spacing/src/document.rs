//! The in-memory font model.

use std::collections::{BTreeMap, BTreeSet};

use kurbo::{BezPath, Rect};
use skrifa::{
    outline::DrawSettings,
    prelude::{LocationRef, Size},
    raw::{FontRef, TableProvider},
    GlyphId, MetadataProvider,
};
use write_fonts::types::Tag;

use crate::{
    directory::TableDirectory,
    metrics::{self, Metrics},
    outline::{tight_bounds, BezPathPen},
    sanitize::sanitize,
    settings::SideBearings,
    Error, Result,
};

/// Tables whose content is rebuilt from the glyphs when the font is written.
pub(crate) const OUTLINE_TABLES: [Tag; 5] = [
    Tag::new(b"glyf"),
    Tag::new(b"loca"),
    Tag::new(b"CFF "),
    Tag::new(b"CFF2"),
    Tag::new(b"hmtx"),
];

/// A glyph: an outline and an advance width, in font units.
///
/// Bounds and side bearings are always derived from the current outline.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub(crate) index: u32,
    pub(crate) codepoints: Vec<u32>,
    pub(crate) name: Option<String>,
    pub(crate) path: BezPath,
    pub(crate) advance_width: f64,
}

impl Glyph {
    pub fn new(index: u32, path: BezPath, advance_width: f64) -> Self {
        Glyph {
            index,
            codepoints: Vec::new(),
            name: None,
            path,
            advance_width,
        }
    }

    pub fn with_codepoint(mut self, codepoint: u32) -> Self {
        self.codepoints.push(codepoint);
        self.codepoints.sort_unstable();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// The lowest code point mapped to this glyph.
    pub fn codepoint(&self) -> Option<u32> {
        self.codepoints.first().copied()
    }

    pub fn codepoints(&self) -> &[u32] {
        &self.codepoints
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn advance_width(&self) -> f64 {
        self.advance_width
    }

    /// The tight bounding box of the outline.
    ///
    /// `None` for glyphs without a measurable outline.
    pub fn bounds(&self) -> Option<Rect> {
        tight_bounds(&self.path)
    }

    pub fn lsb(&self) -> Option<f64> {
        self.bounds().map(|bounds| bounds.x0)
    }

    pub fn rsb(&self) -> Option<f64> {
        self.bounds().map(|bounds| self.advance_width - bounds.x1)
    }

    pub fn side_bearings(&self) -> Option<SideBearings> {
        self.bounds().map(|bounds| SideBearings {
            lsb: bounds.x0,
            rsb: self.advance_width - bounds.x1,
        })
    }

    /// Space glyphs keep their advance no matter what spacing is applied.
    pub fn is_space(&self) -> bool {
        self.codepoints.contains(&0x20)
            || self.name.as_deref().is_some_and(|name| name.contains("space"))
    }
}

/// A parsed font: glyphs, font-wide values and the remaining tables.
#[derive(Clone, Debug)]
pub struct FontDocument {
    pub(crate) glyphs: Vec<Glyph>,
    pub(crate) char_map: BTreeMap<u32, u32>,
    pub(crate) units_per_em: u16,
    pub(crate) ascender: i16,
    pub(crate) descender: i16,
    pub(crate) tables: BTreeMap<Tag, Vec<u8>>,
    metrics: Metrics,
}

impl FontDocument {
    /// Sanitize and parse a font.
    pub fn load(data: &[u8]) -> Result<Self> {
        Self::parse(&sanitize(data))
    }

    /// Parse font data as is.
    ///
    /// Composite glyphs are flattened and CFF outlines are kept as cubic curves.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let font = FontRef::new(data)?;
        let head = font.head()?;
        let hhea = font.hhea()?;
        let num_glyphs = font.maxp()?.num_glyphs() as u32;

        let char_map = font
            .charmap()
            .mappings()
            .map(|(cp, gid)| (cp, gid.to_u32()))
            .filter(|(_, gid)| *gid != 0 && *gid < num_glyphs)
            .collect::<BTreeMap<_, _>>();
        let mut codepoints = BTreeMap::<u32, Vec<u32>>::new();
        for (cp, gid) in &char_map {
            codepoints.entry(*gid).or_default().push(*cp);
        }

        let outlines = font.outline_glyphs();
        let glyph_metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
        let names = font.glyph_names();

        let glyphs = (0..num_glyphs)
            .map(|index| {
                let gid = GlyphId::new(index);
                let mut pen = BezPathPen::default();
                if let Some(outline) = outlines.get(gid) {
                    let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
                    if let Err(e) = outline.draw(settings, &mut pen) {
                        log::warn!("failed to draw glyph {index}, treating it as empty: {e}");
                        pen = BezPathPen::default();
                    }
                }
                Glyph {
                    index,
                    codepoints: codepoints.remove(&index).unwrap_or_default(),
                    name: names
                        .get(gid)
                        .filter(|name| !name.is_synthesized())
                        .map(|name| name.as_str().to_owned()),
                    path: pen.into_path(),
                    advance_width: glyph_metrics.advance_width(gid).unwrap_or_default() as f64,
                }
            })
            .collect();

        let tables = TableDirectory::new(data)?
            .tables()
            .filter(|(tag, _)| !OUTLINE_TABLES.contains(tag))
            .map(|(tag, bytes)| (tag, bytes.to_vec()))
            .collect();

        let mut document = FontDocument {
            glyphs,
            char_map,
            units_per_em: head.units_per_em(),
            ascender: hhea.ascender().to_i16(),
            descender: hhea.descender().to_i16(),
            tables,
            metrics: Metrics::default(),
        };
        document.metrics = Metrics::compute(&document);
        Ok(document)
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, index: u32) -> Option<&Glyph> {
        self.glyphs.get(index as usize)
    }

    pub fn glyph_mut(&mut self, index: u32) -> Option<&mut Glyph> {
        self.glyphs.get_mut(index as usize)
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }

    /// The glyph mapped to a character, ignoring `.notdef`.
    pub fn glyph_id_for_char(&self, ch: char) -> Option<u32> {
        self.char_map.get(&(ch as u32)).copied()
    }

    pub fn glyph_for_char(&self, ch: char) -> Option<&Glyph> {
        self.glyph_id_for_char(ch).and_then(|gid| self.glyph(gid))
    }

    pub fn glyph_for_char_mut(&mut self, ch: char) -> Option<&mut Glyph> {
        self.glyph_id_for_char(ch)
            .and_then(move |gid| self.glyph_mut(gid))
    }

    /// Ids of every glyph reachable from the character map, without repeats.
    pub(crate) fn mapped_glyph_ids(&self) -> BTreeSet<u32> {
        self.char_map.values().copied().collect()
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// The ascender declared in the `hhea` table.
    pub fn ascender(&self) -> i16 {
        self.ascender
    }

    /// The descender declared in the `hhea` table.
    pub fn descender(&self) -> i16 {
        self.descender
    }

    /// Vertical metrics measured when the font was loaded.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The current side bearings of the glyph for `ch`.
    pub fn side_bearings(&self, ch: char) -> Option<SideBearings> {
        self.glyph_for_char(ch).and_then(Glyph::side_bearings)
    }

    /// See [`metrics::average_side_bearing`].
    pub fn average_side_bearing(&self) -> i32 {
        metrics::average_side_bearing(self)
    }

    /// The raw data of a table that is carried over when the font is written.
    pub fn table(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.get(&tag).map(Vec::as_slice)
    }

    pub fn table_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tables.keys().copied()
    }

    pub(crate) fn required_table(&self, tag: Tag) -> Result<&[u8]> {
        self.table(tag).ok_or(Error::MissingTable(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::SENTINEL_TAG;
    use spacing_test_data::{latin_fixture, latin_font, FontFixture, GlyphSpec};

    #[test]
    fn parse_latin_font() {
        let font = FontDocument::load(&latin_font()).unwrap();
        // .notdef, space, 26 capitals, 26 lowercase, 8 accented
        assert_eq!(font.num_glyphs(), 62);
        assert_eq!(font.units_per_em(), 1000);
        assert_eq!(font.ascender(), 800);
        assert_eq!(font.descender(), -200);

        let h = font.glyph_for_char('H').unwrap();
        assert_eq!(h.name(), Some("H"));
        assert_eq!(h.codepoint(), Some('H' as u32));
        assert_eq!(h.advance_width(), 600.0);
        assert_eq!(h.bounds(), Some(Rect::new(60.0, 0.0, 540.0, 700.0)));
        assert_eq!(h.lsb(), Some(60.0));
        assert_eq!(h.rsb(), Some(60.0));
    }

    #[test]
    fn quadratic_outline_bounds() {
        let font = FontDocument::load(&latin_font()).unwrap();
        let o = font.side_bearings('O').unwrap();
        assert_eq!(o, SideBearings { lsb: 50.0, rsb: 50.0 });
    }

    #[test]
    fn unmapped_characters() {
        let font = FontDocument::load(&latin_font()).unwrap();
        assert!(font.glyph_for_char('ß').is_none());
        assert!(font.side_bearings('ß').is_none());
    }

    #[test]
    fn space_is_detected() {
        let font = FontDocument::load(&latin_font()).unwrap();
        let space = font.glyph_for_char(' ').unwrap();
        assert!(space.is_space());
        assert!(space.bounds().is_none());
        assert!(!font.glyph_for_char('a').unwrap().is_space());

        let nbsp = Glyph::new(3, BezPath::new(), 250.0).with_name("nbspace");
        assert!(nbsp.is_space());
    }

    #[test]
    fn outline_tables_are_not_carried() {
        let font = FontDocument::load(&latin_font()).unwrap();
        for tag in OUTLINE_TABLES {
            assert!(font.table(tag).is_none(), "{tag}");
        }
        assert!(font.table(Tag::new(b"OS/2")).is_some());
        assert!(font.table(Tag::new(b"name")).is_some());
    }

    #[test]
    fn layout_tables_arrive_renamed() {
        let data = latin_fixture()
            .table(Tag::new(b"GSUB"), vec![0; 10])
            .build();
        let font = FontDocument::load(&data).unwrap();
        assert!(font.table(Tag::new(b"GSUB")).is_none());
        assert!(font.table(SENTINEL_TAG).is_some());
    }

    #[test]
    fn not_a_font() {
        assert!(FontDocument::load(b"definitely not a font").is_err());
    }

    #[test]
    fn missing_glyph_names() {
        let data = FontFixture::new()
            .glyph(GlyphSpec::char('x').rect(0, 0, 10, 10))
            .without(Tag::new(b"post"))
            .build();
        let font = FontDocument::load(&data).unwrap();
        assert_eq!(font.glyph_for_char('x').unwrap().name(), None);
    }
}
