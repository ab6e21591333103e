//! User supplied spacing parameters.
//!
//! Settings are plain data and are usually read from JSON:
//!
//! ```json
//! {
//!   "masters": {
//!     "H": { "lsb": 80, "rsb": 80 },
//!     "O": { "lsb": 70, "rsb": 70 },
//!     "n": { "lsb": 40, "rsb": 35 },
//!     "o": { "lsb": 45, "rsb": 45 }
//!   },
//!   "overrides": { "A": { "lsb": 10, "rsb": null } }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{document::FontDocument, Error, Result};

/// A left and a right side bearing, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SideBearings {
    pub lsb: f64,
    pub rsb: f64,
}

impl SideBearings {
    pub fn new(lsb: f64, rsb: f64) -> Self {
        SideBearings { lsb, rsb }
    }
}

/// Explicit side bearings for one character. `None` leaves that side alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Override {
    #[serde(default)]
    pub lsb: Option<f64>,
    #[serde(default)]
    pub rsb: Option<f64>,
}

impl Override {
    /// `true` if neither side is set.
    pub fn is_empty(&self) -> bool {
        self.lsb.is_none() && self.rsb.is_none()
    }
}

/// Measurements of the four letters every other value is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Masters {
    #[serde(rename = "H")]
    pub upper_stem: SideBearings,
    #[serde(rename = "O")]
    pub upper_round: SideBearings,
    #[serde(rename = "n")]
    pub lower_stem: SideBearings,
    #[serde(rename = "o")]
    pub lower_round: SideBearings,
}

impl Masters {
    pub const LETTERS: [char; 4] = ['H', 'O', 'n', 'o'];

    /// Each master letter with its measurement.
    pub fn iter(&self) -> impl Iterator<Item = (char, SideBearings)> {
        Self::LETTERS.into_iter().zip([
            self.upper_stem,
            self.upper_round,
            self.lower_stem,
            self.lower_round,
        ])
    }

    /// Read the current side bearings of `H`, `O`, `n` and `o` from a font.
    pub fn measure(font: &FontDocument) -> Result<Self> {
        let measure = |ch: char| font.side_bearings(ch).ok_or(Error::MissingMaster(ch));
        Ok(Masters {
            upper_stem: measure('H')?,
            upper_round: measure('O')?,
            lower_stem: measure('n')?,
            lower_round: measure('o')?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpacingSettings {
    pub masters: Masters,
    #[serde(default)]
    pub overrides: BTreeMap<char, Override>,
}

impl SpacingSettings {
    pub fn new(masters: Masters) -> Self {
        SpacingSettings {
            masters,
            overrides: BTreeMap::new(),
        }
    }

    /// Settings that reproduce the master letters as the font has them.
    pub fn measure(font: &FontDocument) -> Result<Self> {
        Masters::measure(font).map(Self::new)
    }

    pub fn with_override(mut self, ch: char, lsb: Option<f64>, rsb: Option<f64>) -> Self {
        self.overrides.insert(ch, Override { lsb, rsb });
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Settings for both spacing methods, as stored in a settings file.
///
/// A method without settings is seeded from the font with
/// [`SpacingSettings::measure`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpacingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proportional: Option<SpacingSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topological: Option<SpacingSettings>,
}

impl SpacingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
