//! Errors produced while loading, spacing or writing a font.

use skrifa::raw::ReadError;
use thiserror::Error;
use write_fonts::types::Tag;

use crate::directory::DirectoryError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error reading font data: {0}")]
    ReadError(#[from] ReadError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Required table '{0}' is missing")]
    MissingTable(Tag),

    #[error("Table '{0}' is too short to patch")]
    MalformedTable(Tag),

    #[error("Master letter '{0}' has no outline in this font")]
    MissingMaster(char),

    #[error("Encoding glyph {gid} failed: {reason}")]
    EncodeGlyph { gid: u32, reason: String },

    #[error("Serializing the font produced no data")]
    EmptyOutput,

    #[error("Invalid spacing settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
