//! Recomputing the side bearings of Latin letters.
//!
//! A font is loaded into a [`FontDocument`], respaced with one of the
//! [`SpacingMethod`]s and written back out as a TrueType font:
//!
//! ```no_run
//! use font_spacing::{FontDocument, SpacingMethod, SpacingSettings};
//!
//! # fn main() -> Result<(), font_spacing::Error> {
//! let data = std::fs::read("MyFont.ttf").unwrap();
//! let mut font = FontDocument::load(&data)?;
//! let settings = SpacingSettings::measure(&font)?;
//! font.apply(SpacingMethod::Proportional, &settings);
//! let spaced = font.export("My Font")?;
//! # Ok(())
//! # }
//! ```
//!
//! Both methods derive every letter from the measurements of four master
//! letters, `H`, `O`, `n` and `o`. Accented letters follow their base letter
//! and explicit overrides always win.

#![forbid(unsafe_code)]

mod bearings;
pub mod classification;
pub mod diacritics;
pub mod directory;
mod document;
mod error;
mod export;
pub mod metrics;
mod outline;
pub mod sanitize;
mod settings;
pub mod spacing;

pub use bearings::Adjustment;
pub use document::{FontDocument, Glyph};
pub use error::{Error, Result};
pub use export::{family_name, postscript_name, DROPPED_TABLES};
pub use metrics::Metrics;
pub use sanitize::sanitize;
pub use settings::{Masters, Override, SideBearings, SpacingConfig, SpacingSettings};
pub use spacing::{Outcome, SpacingMethod, SpacingReport};

/// Type for a 4-byte tag used to identify font tables.
pub type Tag = write_fonts::types::Tag;
