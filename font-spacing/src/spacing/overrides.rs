//! Explicit per-character side bearings.

use std::collections::BTreeMap;

use crate::{document::FontDocument, settings::Override};

use super::{set, SpacingReport};

/// Apply every override to exactly the character it names.
///
/// Overrides are not copied onto accented forms; an accented form can be
/// overridden on its own.
pub fn apply_overrides(
    font: &mut FontDocument,
    overrides: &BTreeMap<char, Override>,
    report: &mut SpacingReport,
) {
    for (ch, over) in overrides {
        if over.is_empty() {
            continue;
        }
        set(font, *ch, over.lsb, over.rsb, report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SideBearings;
    use spacing_test_data::latin_font;

    #[test]
    fn null_side_is_left_alone() {
        let mut font = FontDocument::load(&latin_font()).unwrap();
        let overrides = BTreeMap::from([
            (
                'A',
                Override {
                    lsb: Some(10.0),
                    rsb: None,
                },
            ),
            (
                'B',
                Override {
                    lsb: None,
                    rsb: None,
                },
            ),
        ]);
        let mut report = SpacingReport::default();
        apply_overrides(&mut font, &overrides, &mut report);

        // A keeps its advance, so its right side grows by the shift
        assert_eq!(font.side_bearings('A'), Some(SideBearings::new(10.0, 110.0)));
        assert_eq!(font.side_bearings('B'), Some(SideBearings::new(60.0, 60.0)));
        // accented forms are not affected
        assert_eq!(font.side_bearings('Á'), Some(SideBearings::new(60.0, 60.0)));
        assert_eq!(report.len(), 1);
    }
}
