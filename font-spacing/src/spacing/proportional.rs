//! Spacing every letter as a fixed ratio of the master letters.
//!
//! Capitals are derived from `H` and `O`, lowercase letters from `n` and `o`.
//! Each side of a letter follows one [`Rule`].

use crate::{
    document::FontDocument,
    settings::{SideBearings, SpacingSettings},
};

use super::{apply_overrides, set_with_diacritics, SpacingReport};

/// The smallest value the [`Rule::Minimum`] rule produces.
const MINIMUM_SIDE_BEARING: f64 = 5.0;
const MINIMUM_RATIO: f64 = 0.25;
const WIDE_RATIO: f64 = 1.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    /// The stem master's value for this side.
    Stem,
    /// The round master's value for this side.
    Round,
    /// The right side of `n`, for arches.
    Arch,
    /// The mean of the stem and round values for this side.
    Visual,
    /// A quarter of the stem master's left side, never less than five units.
    Minimum,
    /// A stem widened by 15%, for letters with strong vertical rhythm.
    Wide,
}

use Rule::{Arch, Minimum, Round, Stem, Visual, Wide};

#[rustfmt::skip]
static UPPERCASE: [(char, Rule, Rule); 24] = [
    ('A', Minimum, Minimum), ('B', Stem, Visual), ('C', Round, Visual), ('D', Stem, Round),
    ('E', Stem, Visual), ('F', Stem, Visual), ('G', Round, Stem), ('I', Stem, Stem),
    ('J', Minimum, Stem), ('K', Stem, Minimum), ('L', Stem, Minimum), ('M', Wide, Wide),
    ('N', Wide, Wide), ('P', Stem, Round), ('Q', Round, Round), ('R', Stem, Minimum),
    ('S', Visual, Visual), ('T', Minimum, Minimum), ('U', Stem, Stem), ('V', Minimum, Minimum),
    ('W', Minimum, Minimum), ('X', Minimum, Minimum), ('Y', Minimum, Minimum),
    ('Z', Minimum, Minimum),
];

#[rustfmt::skip]
static LOWERCASE: [(char, Rule, Rule); 24] = [
    ('a', Visual, Stem), ('b', Stem, Round), ('c', Round, Visual), ('d', Round, Stem),
    ('e', Round, Visual), ('f', Stem, Minimum), ('g', Round, Stem), ('h', Stem, Arch),
    ('i', Stem, Stem), ('j', Stem, Stem), ('k', Stem, Minimum), ('l', Stem, Stem),
    ('m', Stem, Arch), ('p', Stem, Round), ('q', Round, Stem), ('r', Stem, Minimum),
    ('s', Visual, Visual), ('t', Stem, Minimum), ('u', Arch, Stem), ('v', Minimum, Minimum),
    ('w', Minimum, Minimum), ('x', Minimum, Minimum), ('y', Minimum, Minimum),
    ('z', Minimum, Minimum),
];

/// The values the rules of one case are evaluated against.
struct Reference {
    stem: SideBearings,
    round: SideBearings,
    arch: f64,
}

impl Reference {
    fn uppercase(settings: &SpacingSettings) -> Self {
        let masters = &settings.masters;
        Reference {
            stem: masters.upper_stem,
            round: masters.upper_round,
            arch: masters.upper_stem.rsb,
        }
    }

    /// The right side of `n` is an arch, so a stem on the right of a
    /// lowercase letter is spaced like the left side of `n`.
    fn lowercase(settings: &SpacingSettings) -> Self {
        let masters = &settings.masters;
        Reference {
            stem: SideBearings::new(masters.lower_stem.lsb, masters.lower_stem.lsb),
            round: masters.lower_round,
            arch: masters.lower_stem.rsb,
        }
    }

    fn resolve(&self, left: Rule, right: Rule) -> SideBearings {
        SideBearings {
            lsb: self.value(left, self.stem.lsb, self.round.lsb),
            rsb: self.value(right, self.stem.rsb, self.round.rsb),
        }
    }

    fn value(&self, rule: Rule, stem: f64, round: f64) -> f64 {
        match rule {
            Stem => stem,
            Round => round,
            Arch => self.arch,
            Visual => ((stem + round) / 2.0).round(),
            Minimum => (self.stem.lsb * MINIMUM_RATIO)
                .round()
                .max(MINIMUM_SIDE_BEARING),
            Wide => (stem * WIDE_RATIO).round(),
        }
    }
}

/// Space the font from the master measurements with fixed per-letter ratios.
///
/// The masters are applied first, then every other capital and lowercase
/// letter; each letter is copied onto its accented forms as it is set.
/// Overrides are applied last.
pub fn apply_proportional(font: &mut FontDocument, settings: &SpacingSettings) -> SpacingReport {
    let mut report = SpacingReport::default();
    for (letter, bearings) in settings.masters.iter() {
        set_with_diacritics(font, letter, bearings, &mut report);
    }

    let uppercase = Reference::uppercase(settings);
    for (letter, left, right) in UPPERCASE {
        set_with_diacritics(font, letter, uppercase.resolve(left, right), &mut report);
    }

    let lowercase = Reference::lowercase(settings);
    for (letter, left, right) in LOWERCASE {
        set_with_diacritics(font, letter, lowercase.resolve(left, right), &mut report);
    }

    apply_overrides(font, &settings.overrides, &mut report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Masters;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use spacing_test_data::latin_font;

    fn settings() -> SpacingSettings {
        SpacingSettings::new(Masters {
            upper_stem: SideBearings::new(80.0, 80.0),
            upper_round: SideBearings::new(70.0, 70.0),
            lower_stem: SideBearings::new(40.0, 35.0),
            lower_round: SideBearings::new(45.0, 45.0),
        })
    }

    fn spaced(settings: &SpacingSettings) -> FontDocument {
        let mut font = FontDocument::load(&latin_font()).unwrap();
        apply_proportional(&mut font, settings);
        font
    }

    #[test]
    fn every_letter_has_a_rule() {
        let letters = UPPERCASE
            .iter()
            .chain(LOWERCASE.iter())
            .map(|(ch, _, _)| *ch)
            .chain("HOno".chars())
            .collect::<std::collections::BTreeSet<_>>();
        assert_eq!(letters.len(), 52);
        assert!(letters.iter().all(|ch| ch.is_ascii_alphabetic()));
    }

    #[rstest]
    #[case('H', 80.0, 80.0)]
    #[case('O', 70.0, 70.0)]
    #[case('n', 40.0, 35.0)]
    #[case('o', 45.0, 45.0)]
    #[case('M', 92.0, 92.0)]
    #[case('N', 92.0, 92.0)]
    #[case('T', 20.0, 20.0)]
    #[case('B', 80.0, 75.0)]
    #[case('D', 80.0, 70.0)]
    #[case('h', 40.0, 35.0)]
    #[case('d', 45.0, 40.0)]
    #[case('u', 35.0, 40.0)]
    #[case('a', 43.0, 40.0)]
    #[case('v', 10.0, 10.0)]
    fn derived_values(#[case] ch: char, #[case] lsb: f64, #[case] rsb: f64) {
        let font = spaced(&settings());
        assert_eq!(font.side_bearings(ch), Some(SideBearings::new(lsb, rsb)));
    }

    #[test]
    fn minimum_never_drops_below_five() {
        let mut settings = settings();
        settings.masters.upper_stem = SideBearings::new(12.0, 12.0);
        let font = spaced(&settings);
        assert_eq!(font.side_bearings('T'), Some(SideBearings::new(5.0, 5.0)));
    }

    #[test]
    fn accented_forms_follow_their_base() {
        let font = spaced(&settings());
        assert_eq!(font.side_bearings('Á'), font.side_bearings('A'));
        assert_eq!(font.side_bearings('Ĥ'), Some(SideBearings::new(80.0, 80.0)));
        assert_eq!(font.side_bearings('ñ'), Some(SideBearings::new(40.0, 35.0)));
    }

    #[test]
    fn overrides_win() {
        let settings = settings()
            .with_override('M', Some(1.0), Some(2.0))
            .with_override('Á', None, Some(3.0));
        let font = spaced(&settings);
        assert_eq!(font.side_bearings('M'), Some(SideBearings::new(1.0, 2.0)));
        let a = font.side_bearings('A').unwrap();
        assert_eq!(font.side_bearings('Á'), Some(SideBearings::new(a.lsb, 3.0)));
        // other forms of A still follow A
        assert_eq!(font.side_bearings('À'), Some(a));
    }

    #[test]
    fn space_is_untouched() {
        let font = spaced(&settings());
        assert_eq!(font.glyph_for_char(' ').unwrap().advance_width(), 250.0);
    }
}
