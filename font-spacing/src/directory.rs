//! A bounds-checked view of the sfnt table directory.
//!
//! The directory starts with a 12 byte header whose `numTables` field lives at
//! byte offset 4, followed by one 16 byte record per table:
//! `tag`, `checksum`, `offset` and `length`, all big-endian.

use thiserror::Error;
use write_fonts::types::Tag;

const NUM_TABLES_OFFSET: usize = 4;
const RECORDS_OFFSET: usize = 12;
const RECORD_LEN: usize = 16;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("font data is too short to contain a table directory")]
    TruncatedHeader,

    #[error("table directory declares {num_tables} tables but the data ends after {len} bytes")]
    TruncatedRecords { num_tables: u16, len: usize },
}

/// One entry of the table directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl TableRecord {
    fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start.saturating_add(self.length as usize)
    }
}

/// Read-only access to the table records of a font.
#[derive(Clone, Copy, Debug)]
pub struct TableDirectory<'a> {
    data: &'a [u8],
    num_tables: u16,
}

impl<'a> TableDirectory<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, DirectoryError> {
        let num_tables = read_num_tables(data)?;
        Ok(TableDirectory { data, num_tables })
    }

    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }

    pub fn records(&self) -> impl Iterator<Item = TableRecord> + 'a {
        let data = self.data;
        (0..self.num_tables as usize).filter_map(move |i| read_record(data, i))
    }

    pub fn find(&self, tag: Tag) -> Option<TableRecord> {
        self.records().find(|record| record.tag == tag)
    }

    /// The bytes of the table with the given tag, if present and in bounds.
    pub fn table_data(&self, tag: Tag) -> Option<&'a [u8]> {
        self.find(tag).and_then(|record| self.data.get(record.range()))
    }

    /// Every in-bounds table, in directory order.
    ///
    /// Records pointing outside the font are skipped with a warning.
    pub fn tables(&self) -> impl Iterator<Item = (Tag, &'a [u8])> + 'a {
        let data = self.data;
        self.records()
            .filter_map(move |record| match data.get(record.range()) {
                Some(bytes) => Some((record.tag, bytes)),
                None => {
                    log::warn!("table '{}' lies outside the font data, ignoring", record.tag);
                    None
                }
            })
    }
}

/// Mutable access to the tags of the table records.
///
/// Only tags can be rewritten; offsets and lengths are never touched, so the
/// table data stays addressable after a rename.
#[derive(Debug)]
pub struct TableDirectoryMut<'a> {
    data: &'a mut [u8],
    num_tables: u16,
}

impl<'a> TableDirectoryMut<'a> {
    pub fn new(data: &'a mut [u8]) -> Result<Self, DirectoryError> {
        let num_tables = read_num_tables(data)?;
        Ok(TableDirectoryMut { data, num_tables })
    }

    pub fn num_tables(&self) -> u16 {
        self.num_tables
    }

    pub fn tag(&self, index: usize) -> Option<Tag> {
        read_record(self.data, index).map(|record| record.tag)
    }

    /// Overwrite the tag of the record at `index`.
    ///
    /// Returns `false` if there is no such record.
    pub fn set_tag(&mut self, index: usize, tag: Tag) -> bool {
        if index >= self.num_tables as usize {
            return false;
        }
        let start = RECORDS_OFFSET + index * RECORD_LEN;
        match self.data.get_mut(start..start + 4) {
            Some(slot) => {
                slot.copy_from_slice(&tag.to_be_bytes());
                true
            }
            None => false,
        }
    }
}

fn read_num_tables(data: &[u8]) -> Result<u16, DirectoryError> {
    let num_tables = read_u16(data, NUM_TABLES_OFFSET).ok_or(DirectoryError::TruncatedHeader)?;
    if data.len() < RECORDS_OFFSET {
        return Err(DirectoryError::TruncatedHeader);
    }
    let records_end = RECORDS_OFFSET + num_tables as usize * RECORD_LEN;
    if data.len() < records_end {
        return Err(DirectoryError::TruncatedRecords {
            num_tables,
            len: data.len(),
        });
    }
    Ok(num_tables)
}

fn read_record(data: &[u8], index: usize) -> Option<TableRecord> {
    let start = RECORDS_OFFSET + index * RECORD_LEN;
    let tag: [u8; 4] = data.get(start..start + 4)?.try_into().ok()?;
    Some(TableRecord {
        tag: Tag::from_be_bytes(tag),
        checksum: read_u32(data, start + 4)?,
        offset: read_u32(data, start + 8)?,
        length: read_u32(data, start + 12)?,
    })
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes: [u8; 4] = data.get(offset..offset + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}
