//! Rewrite the `post` table as version 3.0, which stores no glyph names.

use super::push;

const VERSION_3_0: u32 = 0x0003_0000;
const HEADER_LEN: usize = 32;

/// Keep the header of an existing table, or create one scaled to the em.
pub(super) fn prepare(existing: Option<&[u8]>, units_per_em: u16) -> Vec<u8> {
    let mut post = match existing.and_then(|data| data.get(..HEADER_LEN)) {
        Some(header) => header.to_vec(),
        None => {
            if existing.is_some() {
                log::warn!("post table is truncated, replacing it");
            }
            default_header(units_per_em)
        }
    };
    post[..4].copy_from_slice(&VERSION_3_0.to_be_bytes());
    post
}

fn default_header(units_per_em: u16) -> Vec<u8> {
    let upm = units_per_em as i32;
    let mut post = Vec::with_capacity(HEADER_LEN);
    push(&mut post, VERSION_3_0);
    push(&mut post, 0u32); // italicAngle
    push(&mut post, (-upm / 10) as i16); // underlinePosition
    push(&mut post, (upm / 20) as i16); // underlineThickness
    push(&mut post, 0u32); // isFixedPitch
    for _ in 0..4 {
        push(&mut post, 0u32); // memory usage hints
    }
    post
}
