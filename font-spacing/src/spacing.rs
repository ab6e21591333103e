//! Applying a spacing method to a font.
//!
//! Both methods derive the side bearings of every basic Latin letter from four
//! master letters, copy each result onto the accented forms of that letter and
//! finally apply the user's overrides. Applying a method determines every
//! letter it knows about, so methods are not meant to be stacked.

mod overrides;
mod proportional;
mod topological;

use std::{collections::BTreeMap, fmt, str::FromStr};

use thiserror::Error;

use crate::{
    bearings::Adjustment,
    diacritics,
    document::FontDocument,
    settings::{SideBearings, SpacingSettings},
};

pub use overrides::apply_overrides;
pub use proportional::apply_proportional;
pub use topological::apply_topological;

/// What happened to one character during a spacing pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Adjusted(Adjustment),
    /// The font has no glyph for the character.
    Missing,
}

/// The final outcome for every character a spacing pass touched.
///
/// When a character is set more than once, as masters and overridden letters
/// are, only the last outcome is kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpacingReport {
    outcomes: BTreeMap<char, Outcome>,
}

impl SpacingReport {
    pub fn outcome(&self, ch: char) -> Option<Outcome> {
        self.outcomes.get(&ch).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Outcome)> + '_ {
        self.outcomes.iter().map(|(ch, outcome)| (*ch, *outcome))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Characters whose glyph now has the requested side bearings.
    pub fn num_at_target(&self) -> usize {
        self.outcomes
            .values()
            .filter(|outcome| matches!(outcome, Outcome::Adjusted(adj) if adj.is_at_target()))
            .count()
    }

    fn record(&mut self, ch: char, outcome: Outcome) {
        self.outcomes.insert(ch, outcome);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpacingMethod {
    /// Leave the font as it is.
    #[default]
    Original,
    /// Per-letter ratios of the master measurements.
    Proportional,
    /// Values picked by the shape of each letter's edges.
    Topological,
}

impl SpacingMethod {
    pub fn apply(self, font: &mut FontDocument, settings: &SpacingSettings) -> SpacingReport {
        match self {
            SpacingMethod::Original => SpacingReport::default(),
            SpacingMethod::Proportional => apply_proportional(font, settings),
            SpacingMethod::Topological => apply_topological(font, settings),
        }
    }
}

impl FontDocument {
    /// Respace the font with `method`.
    pub fn apply(&mut self, method: SpacingMethod, settings: &SpacingSettings) -> SpacingReport {
        method.apply(self, settings)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown spacing method '{0}', expected original, proportional or topological")]
pub struct UnknownMethod(String);

impl FromStr for SpacingMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(SpacingMethod::Original),
            "proportional" => Ok(SpacingMethod::Proportional),
            "topological" => Ok(SpacingMethod::Topological),
            _ => Err(UnknownMethod(s.to_owned())),
        }
    }
}

impl fmt::Display for SpacingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpacingMethod::Original => "original",
            SpacingMethod::Proportional => "proportional",
            SpacingMethod::Topological => "topological",
        };
        f.write_str(name)
    }
}

/// Set the side bearings of the glyph for `ch` and record what happened.
pub(crate) fn set(
    font: &mut FontDocument,
    ch: char,
    lsb: Option<f64>,
    rsb: Option<f64>,
    report: &mut SpacingReport,
) -> Outcome {
    let outcome = match font.glyph_for_char_mut(ch) {
        Some(glyph) => Outcome::Adjusted(glyph.set_side_bearings(lsb, rsb)),
        None => Outcome::Missing,
    };
    log::debug!("'{ch}': lsb {lsb:?} rsb {rsb:?} -> {outcome:?}");
    report.record(ch, outcome);
    outcome
}

/// Set a base letter and copy the same values onto its accented forms.
fn set_with_diacritics(
    font: &mut FontDocument,
    base: char,
    bearings: SideBearings,
    report: &mut SpacingReport,
) {
    set(font, base, Some(bearings.lsb), Some(bearings.rsb), report);
    diacritics::propagate(font, base, bearings, report);
}
