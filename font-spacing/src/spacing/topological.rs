//! Spacing every letter by the shape of its edges.

use crate::{
    classification::{classified_letters, EdgeCategory},
    document::FontDocument,
    settings::{SideBearings, SpacingSettings},
};

use super::{apply_overrides, set, set_with_diacritics, SpacingReport};

/// The value for one edge, given the stem and bowl masters of the letter's case.
fn edge_value(category: EdgeCategory, stem: SideBearings, bowl: SideBearings) -> f64 {
    match category {
        EdgeCategory::Straight => stem.lsb,
        EdgeCategory::Round => bowl.lsb,
        EdgeCategory::Arch => stem.rsb,
        EdgeCategory::Vertex => (stem.lsb / 2.0).round(),
    }
}

/// Space the font from the master measurements and the edge classification.
///
/// Every classified letter, the masters included, gets the value of its edge
/// categories and passes it on to its accented forms. Overrides are applied
/// next. Finally each master letter that is not overridden gets its exact
/// master measurement back; its accented forms keep the classified values.
pub fn apply_topological(font: &mut FontDocument, settings: &SpacingSettings) -> SpacingReport {
    let masters = &settings.masters;
    let mut report = SpacingReport::default();

    for (letter, classification) in classified_letters() {
        let (stem, bowl) = if letter.is_ascii_uppercase() {
            (masters.upper_stem, masters.upper_round)
        } else {
            (masters.lower_stem, masters.lower_round)
        };
        let bearings = SideBearings {
            lsb: edge_value(classification.left, stem, bowl),
            rsb: edge_value(classification.right, stem, bowl),
        };
        set_with_diacritics(font, letter, bearings, &mut report);
    }

    apply_overrides(font, &settings.overrides, &mut report);

    for (letter, bearings) in masters.iter() {
        if settings.overrides.get(&letter).is_some_and(|o| !o.is_empty()) {
            continue;
        }
        set(
            font,
            letter,
            Some(bearings.lsb),
            Some(bearings.rsb),
            &mut report,
        );
    }
    report
}
