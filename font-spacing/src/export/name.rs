//! Build a fresh naming table from a family name.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use super::{push, NAME};
use crate::{Error, Result};

const FALLBACK_FAMILY: &str = "Untitled";
const SUBFAMILY: &str = "Regular";
const VERSION_STRING: &str = "Version 1.000";
const MAX_POSTSCRIPT_NAME_LEN: usize = 63;
const MAX_FAMILY_NAME_LEN: usize = 255;
const NAME_RECORD_LEN: u16 = 12;

const FAMILY: u16 = 1;
const SUBFAMILY_ID: u16 = 2;
const UNIQUE_ID: u16 = 3;
const FULL_NAME: u16 = 4;
const VERSION: u16 = 5;
const POSTSCRIPT_NAME: u16 = 6;

/// Macintosh, Roman, English.
const MAC_ROMAN: (u16, u16, u16) = (1, 0, 0);
/// Windows, Unicode BMP, English (United States).
const WINDOWS_UNICODE: (u16, u16, u16) = (3, 1, 0x409);

static EXPORT_COUNT: AtomicU64 = AtomicU64::new(0);

/// The family name with everything but ASCII letters, digits and spaces
/// removed, cut to at most 255 characters.
pub fn family_name(family: &str) -> String {
    let cleaned = family
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == ' ')
        .collect::<String>();
    let shortened = cleaned
        .trim()
        .chars()
        .take(MAX_FAMILY_NAME_LEN)
        .collect::<String>();
    let trimmed = shortened.trim_end();
    if trimmed.is_empty() {
        FALLBACK_FAMILY.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// The PostScript name for the regular style of a cleaned family name.
pub fn postscript_name(family: &str) -> String {
    family
        .chars()
        .filter(|ch| *ch != ' ')
        .chain("-".chars())
        .chain(SUBFAMILY.chars())
        .take(MAX_POSTSCRIPT_NAME_LEN)
        .collect()
}

/// An identifier that differs between exports, even of the same family.
fn unique_id(family: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let count = EXPORT_COUNT.fetch_add(1, Ordering::Relaxed);
    format!("{family}-{millis}-{count}")
}

/// Build a version 0 `name` table for `family`.
///
/// Every string is written for the Macintosh and the Windows platform.
pub(super) fn build(family: &str) -> Result<Vec<u8>> {
    let family = family_name(family);
    let strings = [
        (FAMILY, family.clone()),
        (SUBFAMILY_ID, SUBFAMILY.to_owned()),
        (UNIQUE_ID, unique_id(&family)),
        (FULL_NAME, format!("{family} {SUBFAMILY}")),
        (VERSION, VERSION_STRING.to_owned()),
        (POSTSCRIPT_NAME, postscript_name(&family)),
    ];

    let mut records = Vec::with_capacity(strings.len() * 2);
    for (platform, encoding, language) in [MAC_ROMAN, WINDOWS_UNICODE] {
        for (name_id, string) in &strings {
            // family names are ASCII, which Mac Roman shares
            let bytes = if platform == MAC_ROMAN.0 {
                string.as_bytes().to_vec()
            } else {
                string.encode_utf16().flat_map(u16::to_be_bytes).collect()
            };
            records.push(((platform, encoding, language, *name_id), bytes));
        }
    }
    records.sort_by_key(|(key, _)| *key);

    let count = records.len() as u16;
    let mut name = Vec::new();
    push(&mut name, 0u16); // format
    push(&mut name, count);
    push(&mut name, 6 + count * NAME_RECORD_LEN);
    let mut offset = 0u16;
    for ((platform, encoding, language, name_id), bytes) in &records {
        let len = u16::try_from(bytes.len()).map_err(|_| Error::MalformedTable(NAME))?;
        push(&mut name, *platform);
        push(&mut name, *encoding);
        push(&mut name, *language);
        push(&mut name, *name_id);
        push(&mut name, len);
        push(&mut name, offset);
        offset = offset
            .checked_add(len)
            .ok_or(Error::MalformedTable(NAME))?;
    }
    for (_, bytes) in &records {
        name.extend_from_slice(bytes);
    }
    Ok(name)
}
