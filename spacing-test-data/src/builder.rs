//! Assemble small TrueType fonts in memory.

use std::collections::BTreeSet;

use write_fonts::{
    read::tables::glyf::CurvePoint,
    tables::glyf::{
        Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, Contour, SimpleGlyph, Transform,
    },
    types::{GlyphId16, Tag},
    FontBuilder,
};

use crate::{cff, BeBuffer};

/// One glyph of a [`FontFixture`].
#[derive(Clone, Debug)]
pub struct GlyphSpec {
    pub name: String,
    pub codepoint: Option<u32>,
    pub advance: u16,
    pub contours: Vec<Vec<CurvePoint>>,
    /// Glyph index and offset of each component.
    pub components: Vec<(u16, i16, i16)>,
}

impl GlyphSpec {
    pub fn new(name: &str, codepoint: impl Into<Option<u32>>) -> Self {
        GlyphSpec {
            name: name.to_owned(),
            codepoint: codepoint.into(),
            advance: 500,
            contours: Vec::new(),
            components: Vec::new(),
        }
    }

    /// A glyph named after a character and mapped to it.
    pub fn char(ch: char) -> Self {
        Self::new(&ch.to_string(), ch as u32)
    }

    pub fn advance(mut self, advance: u16) -> Self {
        self.advance = advance;
        self
    }

    /// Add a counter-clockwise rectangle.
    pub fn rect(mut self, x0: i16, y0: i16, x1: i16, y1: i16) -> Self {
        self.contours.push(vec![
            CurvePoint::on_curve(x0, y0),
            CurvePoint::on_curve(x1, y0),
            CurvePoint::on_curve(x1, y1),
            CurvePoint::on_curve(x0, y1),
        ]);
        self
    }

    /// Add a closed quadratic "squircle" touching the given box at the midpoints of its edges.
    pub fn oval(mut self, x0: i16, y0: i16, x1: i16, y1: i16) -> Self {
        let xm = x0 + (x1 - x0) / 2;
        let ym = y0 + (y1 - y0) / 2;
        self.contours.push(vec![
            CurvePoint::on_curve(xm, y0),
            CurvePoint::off_curve(x1, y0),
            CurvePoint::on_curve(x1, ym),
            CurvePoint::off_curve(x1, y1),
            CurvePoint::on_curve(xm, y1),
            CurvePoint::off_curve(x0, y1),
            CurvePoint::on_curve(x0, ym),
            CurvePoint::off_curve(x0, y0),
        ]);
        self
    }

    pub fn contour(mut self, points: Vec<CurvePoint>) -> Self {
        self.contours.push(points);
        self
    }

    /// Reference another glyph, shifted by `dx` and `dy`.
    ///
    /// A glyph with components is written as a composite glyph; its own
    /// contours are ignored in `glyf` fonts.
    pub fn component(mut self, glyph: u16, dx: i16, dy: i16) -> Self {
        self.components.push((glyph, dx, dy));
        self
    }
}

fn bbox(contours: &[Vec<CurvePoint>]) -> Option<Bbox> {
    let mut points = contours.iter().flatten();
    let first = points.next()?;
    let mut bbox = Bbox {
        x_min: first.x,
        y_min: first.y,
        x_max: first.x,
        y_max: first.y,
    };
    for point in points {
        bbox.x_min = bbox.x_min.min(point.x);
        bbox.y_min = bbox.y_min.min(point.y);
        bbox.x_max = bbox.x_max.max(point.x);
        bbox.y_max = bbox.y_max.max(point.y);
    }
    Some(bbox)
}

/// A declarative description of a TrueType font.
///
/// The first glyph is always `.notdef`; glyphs added with [`FontFixture::glyph`]
/// follow in insertion order.
#[derive(Clone, Debug)]
pub struct FontFixture {
    pub family: String,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub weight_class: u16,
    pub glyphs: Vec<GlyphSpec>,
    pub extra_tables: Vec<(Tag, Vec<u8>)>,
    pub omitted_tables: BTreeSet<Tag>,
    /// Write outlines as a `CFF ` table instead of `glyf` and `loca`.
    pub cff: bool,
}

impl Default for FontFixture {
    fn default() -> Self {
        FontFixture {
            family: "Fixture Sans".to_owned(),
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            line_gap: 90,
            weight_class: 400,
            glyphs: vec![GlyphSpec::new(".notdef", None)
                .advance(500)
                .rect(50, 0, 450, 700)],
            extra_tables: Vec::new(),
            omitted_tables: BTreeSet::new(),
            cff: false,
        }
    }
}

impl FontFixture {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn glyph(mut self, glyph: GlyphSpec) -> Self {
        self.glyphs.push(glyph);
        self
    }

    /// Include an additional table verbatim.
    pub fn table(mut self, tag: Tag, data: Vec<u8>) -> Self {
        self.extra_tables.push((tag, data));
        self
    }

    /// Do not emit one of the generated tables.
    pub fn without(mut self, tag: Tag) -> Self {
        self.omitted_tables.insert(tag);
        self
    }

    pub fn weight_class(mut self, weight_class: u16) -> Self {
        self.weight_class = weight_class;
        self
    }

    /// Use cubic CFF outlines; components are flattened into each charstring.
    pub fn cff(mut self) -> Self {
        self.cff = true;
        self
    }

    /// The index of the glyph named `name`.
    pub fn glyph_index(&self, name: &str) -> Option<u16> {
        self.glyphs
            .iter()
            .position(|glyph| glyph.name == name)
            .map(|index| index as u16)
    }

    /// The contours of `glyph` with its components resolved.
    fn contours(&self, glyph: &GlyphSpec) -> Vec<Vec<CurvePoint>> {
        let mut contours = glyph.contours.clone();
        for (index, dx, dy) in &glyph.components {
            let Some(component) = self.glyphs.get(*index as usize) else {
                continue;
            };
            contours.extend(self.contours(component).into_iter().map(|contour| {
                contour
                    .into_iter()
                    .map(|p| CurvePoint {
                        x: p.x + dx,
                        y: p.y + dy,
                        ..p
                    })
                    .collect()
            }));
        }
        contours
    }

    fn bbox(&self, glyph: &GlyphSpec) -> Option<Bbox> {
        bbox(&self.contours(glyph))
    }

    fn encode(&self, glyph: &GlyphSpec) -> Vec<u8> {
        let Some(bbox) = self.bbox(glyph) else {
            return Vec::new();
        };
        let encoded = match glyph.components.split_first() {
            None => write_fonts::dump_table(&SimpleGlyph {
                bbox,
                contours: glyph
                    .contours
                    .iter()
                    .cloned()
                    .map(Contour::from)
                    .collect(),
                instructions: Vec::new(),
            }),
            Some((first, rest)) => {
                let component = |(index, dx, dy): (u16, i16, i16)| {
                    Component::new(
                        GlyphId16::new(index),
                        Anchor::Offset { x: dx, y: dy },
                        Transform::default(),
                        ComponentFlags::default(),
                    )
                };
                let mut composite = CompositeGlyph::new(component(*first), bbox);
                for other in rest {
                    composite.add_component(component(*other), bbox);
                }
                write_fonts::dump_table(&composite)
            }
        };
        encoded.expect("fixture glyphs are valid")
    }

    pub fn build(&self) -> Vec<u8> {
        let bboxes = self
            .glyphs
            .iter()
            .filter_map(|glyph| self.bbox(glyph))
            .collect::<Vec<_>>();
        let x_min = bboxes.iter().map(|b| b.x_min).min().unwrap_or_default();
        let y_min = bboxes.iter().map(|b| b.y_min).min().unwrap_or_default();
        let x_max = bboxes.iter().map(|b| b.x_max).max().unwrap_or_default();
        let y_max = bboxes.iter().map(|b| b.y_max).max().unwrap_or_default();

        let mut tables: Vec<(Tag, Vec<u8>)> = vec![
            (Tag::new(b"head"), self.head([x_min, y_min, x_max, y_max])),
            (Tag::new(b"hhea"), self.hhea()),
            (Tag::new(b"OS/2"), self.os2()),
            (Tag::new(b"hmtx"), self.hmtx()),
            (Tag::new(b"cmap"), self.cmap()),
            (Tag::new(b"name"), self.name()),
            (Tag::new(b"post"), self.post()),
        ];
        if self.cff {
            let contours = self
                .glyphs
                .iter()
                .map(|glyph| self.contours(glyph))
                .collect::<Vec<_>>();
            let font_name = self.family.replace(' ', "");
            tables.push((Tag::new(b"maxp"), self.maxp_cff()));
            tables.push((Tag::new(b"CFF "), cff::build(&font_name, &contours)));
        } else {
            let mut loca = BeBuffer::new().push(0u32);
            let mut glyf = Vec::new();
            for glyph in &self.glyphs {
                glyf.extend_from_slice(&self.encode(glyph));
                loca = loca.push(glyf.len() as u32);
            }
            tables.push((Tag::new(b"maxp"), self.maxp()));
            tables.push((Tag::new(b"loca"), loca.into_vec()));
            tables.push((Tag::new(b"glyf"), glyf));
        }
        tables.retain(|(tag, _)| !self.omitted_tables.contains(tag));
        tables.extend(self.extra_tables.iter().cloned());

        let mut builder = FontBuilder::new();
        for (tag, data) in tables {
            builder.add_raw(tag, data);
        }
        builder.build()
    }

    fn head(&self, [x_min, y_min, x_max, y_max]: [i16; 4]) -> Vec<u8> {
        BeBuffer::new()
            .push(0x0001_0000u32) // version
            .push(0x0001_0000u32) // fontRevision
            .push(0u32) // checksumAdjustment
            .push(0x5F0F_3CF5u32) // magic
            .push(0x000Bu16) // flags
            .push(self.units_per_em)
            .extend([0u32; 4]) // created, modified
            .extend([x_min, y_min, x_max, y_max])
            .push(0u16) // macStyle
            .push(8u16) // lowestRecPPEM
            .push(2i16) // fontDirectionHint
            .push(1i16) // indexToLocFormat
            .push(0i16) // glyphDataFormat
            .into_vec()
    }

    fn hhea(&self) -> Vec<u8> {
        let max_advance = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
        BeBuffer::new()
            .push(0x0001_0000u32)
            .push(self.ascender)
            .push(self.descender)
            .push(self.line_gap)
            .push(max_advance)
            .extend([0i16; 3]) // minLSB, minRSB, xMaxExtent
            .push(1i16) // caretSlopeRise
            .extend([0i16; 6]) // caretSlopeRun, caretOffset, reserved
            .push(0i16) // metricDataFormat
            .push(self.glyphs.len() as u16)
            .into_vec()
    }

    fn maxp(&self) -> Vec<u8> {
        let max_points = self
            .glyphs
            .iter()
            .map(|g| g.contours.iter().map(Vec::len).sum::<usize>())
            .max()
            .unwrap_or(0);
        let max_contours = self
            .glyphs
            .iter()
            .map(|g| g.contours.len())
            .max()
            .unwrap_or(0);
        BeBuffer::new()
            .push(0x0001_0000u32)
            .push(self.glyphs.len() as u16)
            .push(max_points as u16)
            .push(max_contours as u16)
            .extend([0u16; 2]) // composite maxima
            .push(2u16) // maxZones
            .extend([0u16; 8])
            .into_vec()
    }

    /// Version 0.5, which only carries the glyph count.
    fn maxp_cff(&self) -> Vec<u8> {
        BeBuffer::new()
            .push(0x0000_5000u32)
            .push(self.glyphs.len() as u16)
            .into_vec()
    }

    fn os2(&self) -> Vec<u8> {
        let codepoints = self.codepoints();
        let first = codepoints.first().map(|(cp, _)| *cp).unwrap_or(0);
        let last = codepoints.last().map(|(cp, _)| *cp).unwrap_or(0);
        BeBuffer::new()
            .push(4u16) // version
            .push(500i16) // xAvgCharWidth
            .push(self.weight_class)
            .push(5u16) // usWidthClass
            .push(0u16) // fsType
            .extend([650i16, 600, 0, 75, 650, 600, 0, 350, 50, 250]) // sub/superscript, strikeout
            .push(0i16) // sFamilyClass
            .bytes(&[0; 10]) // panose
            .extend([1u32, 0, 0, 0]) // ulUnicodeRange
            .bytes(b"NONE")
            .push(0x0040u16) // fsSelection: REGULAR
            .push(first.min(0xFFFF) as u16)
            .push(last.min(0xFFFF) as u16)
            .push(self.ascender)
            .push(self.descender)
            .push(self.line_gap)
            .push(self.ascender as u16)
            .push(self.descender.unsigned_abs())
            .extend([1u32, 0]) // ulCodePageRange
            .extend([500i16, 700]) // sxHeight, sCapHeight
            .extend([0u16, 32, 0]) // usDefaultChar, usBreakChar, usMaxContext
            .into_vec()
    }

    fn hmtx(&self) -> Vec<u8> {
        let mut buf = BeBuffer::new();
        for glyph in &self.glyphs {
            let lsb = self.bbox(glyph).map(|b| b.x_min).unwrap_or(0);
            buf = buf.push(glyph.advance).push(lsb);
        }
        buf.into_vec()
    }

    fn codepoints(&self) -> Vec<(u32, u16)> {
        let mut mapped = self
            .glyphs
            .iter()
            .enumerate()
            .filter_map(|(gid, g)| g.codepoint.map(|cp| (cp, gid as u16)))
            .filter(|(cp, _)| *cp < 0xFFFF)
            .collect::<Vec<_>>();
        mapped.sort();
        mapped
    }

    /// A format 4 subtable with one segment per mapped code point.
    fn cmap(&self) -> Vec<u8> {
        let mut segments = self
            .codepoints()
            .into_iter()
            .map(|(cp, gid)| (cp as u16, cp as u16, gid.wrapping_sub(cp as u16)))
            .collect::<Vec<_>>();
        segments.push((0xFFFF, 0xFFFF, 1));

        let seg_count = segments.len() as u16;
        let entry_selector = 15 - seg_count.leading_zeros() as u16;
        let search_range = 2 * (1u16 << entry_selector);
        let length = 16 + 8 * seg_count;

        BeBuffer::new()
            .push(0u16) // version
            .push(1u16) // numTables
            .push(3u16)
            .push(1u16)
            .push(12u32)
            .push(4u16) // format
            .push(length)
            .push(0u16) // language
            .push(seg_count * 2)
            .push(search_range)
            .push(entry_selector)
            .push(seg_count * 2 - search_range)
            .extend(segments.iter().map(|s| s.1))
            .push(0u16) // reservedPad
            .extend(segments.iter().map(|s| s.0))
            .extend(segments.iter().map(|s| s.2))
            .extend(segments.iter().map(|_| 0u16))
            .into_vec()
    }

    fn name(&self) -> Vec<u8> {
        let family = self
            .family
            .encode_utf16()
            .flat_map(u16::to_be_bytes)
            .collect::<Vec<_>>();
        let subfamily = "Regular"
            .encode_utf16()
            .flat_map(u16::to_be_bytes)
            .collect::<Vec<_>>();
        BeBuffer::new()
            .push(0u16)
            .push(2u16)
            .push(6u16 + 2 * 12)
            .extend([3u16, 1, 0x409, 1, family.len() as u16, 0])
            .extend([
                3u16,
                1,
                0x409,
                2,
                subfamily.len() as u16,
                family.len() as u16,
            ])
            .bytes(&family)
            .bytes(&subfamily)
            .into_vec()
    }

    /// A version 2.0 table; every name except `.notdef` is stored as a custom string.
    fn post(&self) -> Vec<u8> {
        let mut buf = BeBuffer::new()
            .push(0x0002_0000u32)
            .push(0u32) // italicAngle
            .push(-100i16)
            .push(50i16)
            .extend([0u32; 5])
            .push(self.glyphs.len() as u16);
        let mut custom = Vec::new();
        for glyph in &self.glyphs {
            if glyph.name == ".notdef" {
                buf = buf.push(0u16);
            } else {
                buf = buf.push(258 + custom.len() as u16);
                custom.push(glyph.name.as_str());
            }
        }
        for name in custom {
            buf = buf.push(name.len() as u8).bytes(name.as_bytes());
        }
        buf.into_vec()
    }
}
