//! test data shared between the font-spacing tests.
//!
//! Fonts are assembled in memory from a [`FontFixture`] rather than being
//! checked in as binaries, so each test states the geometry it relies on.

mod be_buffer;
mod builder;
mod cff;

pub use be_buffer::BeBuffer;
pub use builder::{FontFixture, GlyphSpec};

/// Accented letters present in [`latin_fixture`], with their base letter.
pub static ACCENTED: &[(char, char, &str)] = &[
    ('À', 'A', "Agrave"),
    ('Á', 'A', "Aacute"),
    ('Ä', 'A', "Adieresis"),
    ('Ö', 'O', "Odieresis"),
    ('Ĥ', 'H', "Hcircumflex"),
    ('á', 'a', "aacute"),
    ('é', 'e', "eacute"),
    ('ñ', 'n', "ntilde"),
];

/// A font covering `A-Z`, `a-z`, a space and a handful of accented letters.
///
/// Geometry, in a 1000 unit em:
/// - capitals are rectangles from x 60 to 540 and y 0 to 700 with advance 600,
///   except `O` which is a quadratic oval spanning x 50 to 650 with advance 700;
/// - lowercase letters span x 40 to 460 and y 0 to 500 with advance 500;
///   `b d h k l` rise to 720 and `g p q y` descend to -200;
/// - accented letters copy their base and add a mark above it.
pub fn latin_fixture() -> FontFixture {
    let mut font = FontFixture::new().glyph(GlyphSpec::new("space", 0x20).advance(250));
    for ch in 'A'..='Z' {
        font = font.glyph(capital(ch));
    }
    for ch in 'a'..='z' {
        font = font.glyph(lowercase(ch));
    }
    for (ch, base, name) in ACCENTED {
        let base = if base.is_uppercase() {
            capital(*base)
        } else {
            lowercase(*base)
        };
        let mut glyph = base.rect(250, 750, 350, 850);
        glyph.name = name.to_string();
        glyph.codepoint = Some(*ch as u32);
        font = font.glyph(glyph);
    }
    font
}

/// The bytes of [`latin_fixture`].
pub fn latin_font() -> Vec<u8> {
    latin_fixture().build()
}

fn capital(ch: char) -> GlyphSpec {
    match ch {
        'O' => GlyphSpec::char(ch).advance(700).oval(50, 0, 650, 700),
        _ => GlyphSpec::char(ch).advance(600).rect(60, 0, 540, 700),
    }
}

fn lowercase(ch: char) -> GlyphSpec {
    let (y_min, y_max) = match ch {
        'b' | 'd' | 'h' | 'k' | 'l' => (0, 720),
        'g' | 'p' | 'q' | 'y' => (-200, 500),
        _ => (0, 500),
    };
    GlyphSpec::char(ch).advance(500).rect(40, y_min, 460, y_max)
}
