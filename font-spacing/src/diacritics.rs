//! Accented letters that are spaced like their base letter.

use crate::{
    document::FontDocument,
    settings::SideBearings,
    spacing::{self, SpacingReport},
};

/// Base letters and their accented forms from Latin-1 Supplement and
/// Latin Extended-A.
///
/// Forms whose mark changes the width of a side, such as `ď` or `Ł`,
/// are spaced on their own and not listed here.
static DIACRITICS: &[(char, &str)] = &[
    ('A', "ÀÁÂÃÄÅĀĂĄ"),
    ('C', "ÇĆĈĊČ"),
    ('D', "Ď"),
    ('E', "ÈÉÊËĒĔĖĘĚ"),
    ('G', "ĜĞĠĢ"),
    ('H', "Ĥ"),
    ('I', "ÌÍÎÏĨĪĬĮİ"),
    ('J', "Ĵ"),
    ('K', "Ķ"),
    ('L', "ĹĻĽ"),
    ('N', "ÑŃŅŇ"),
    ('O', "ÒÓÔÕÖØŌŎŐ"),
    ('R', "ŔŖŘ"),
    ('S', "ŚŜŞŠ"),
    ('T', "ŢŤ"),
    ('U', "ÙÚÛÜŨŪŬŮŰŲ"),
    ('W', "Ŵ"),
    ('Y', "ÝŶŸ"),
    ('Z', "ŹŻŽ"),
    ('a', "àáâãäåāăą"),
    ('c', "çćĉċč"),
    ('e', "èéêëēĕėęě"),
    ('g', "ĝğġģ"),
    ('h', "ĥ"),
    ('i', "ìíîïĩīĭį"),
    ('j', "ĵ"),
    ('k', "ķ"),
    ('l', "ĺļ"),
    ('n', "ñńņň"),
    ('o', "òóôõöøōŏő"),
    ('r', "ŕŗř"),
    ('s', "śŝşš"),
    ('u', "ùúûüũūŭůűų"),
    ('w', "ŵ"),
    ('y', "ýÿŷ"),
    ('z', "źżž"),
];

/// The accented forms of `base`, in a fixed order. Empty if there are none.
pub fn variants(base: char) -> impl Iterator<Item = char> {
    DIACRITICS
        .iter()
        .find(|(letter, _)| *letter == base)
        .map(|(_, variants)| *variants)
        .unwrap_or_default()
        .chars()
}

/// The base letter an accented form is spaced from.
pub fn base_of(variant: char) -> Option<char> {
    DIACRITICS
        .iter()
        .find(|(_, variants)| variants.contains(variant))
        .map(|(base, _)| *base)
}

/// Give every accented form of `base` the side bearings just resolved for it.
///
/// Forms missing from the font are recorded as such and otherwise ignored.
pub(crate) fn propagate(
    font: &mut FontDocument,
    base: char,
    bearings: SideBearings,
    report: &mut SpacingReport,
) {
    for variant in variants(base) {
        spacing::set(font, variant, Some(bearings.lsb), Some(bearings.rsb), report);
    }
}
