//! Structure Table Walker
//!
//! Walks the structure table one record at a time using nothing but header
//! length fields and the double-NUL pool terminator. The walk is lazy and
//! single-pass; a fresh walk needs a fresh [`TableWalker`].
//!
//! A record with an impossible length is reported as an error item and the
//! walker resynchronises at the next double NUL after its header, so one bad
//! record never hides the ones after it.

use crate::error::{DmiError, RecordError};
use crate::structure::{StructureHeader, StructureRecord};

/// Why a walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// An end-of-table (type 127) record was reached
    EndOfTable,
    /// Input ran out before an end-of-table record
    EndedEarly {
        /// Table offset where decoding stopped
        offset: usize,
    },
}

impl WalkEnd {
    /// Whether the table was properly terminated
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::EndOfTable)
    }
}

/// Lazy iterator over the records of a structure table
#[derive(Debug, Clone)]
pub struct TableWalker<'a> {
    data: &'a [u8],
    pos: usize,
    visited: usize,
    end: Option<WalkEnd>,
}

impl<'a> TableWalker<'a> {
    /// Walk `data`, the structure table bytes
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            visited: 0,
            end: None,
        }
    }

    /// Why the walk stopped, once it has
    pub fn end(&self) -> Option<WalkEnd> {
        self.end
    }

    /// Records produced so far, including malformed ones
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Current table offset
    pub fn position(&self) -> usize {
        self.pos
    }

    fn stop(&mut self, end: WalkEnd) {
        if let WalkEnd::EndedEarly { offset } = end {
            log::warn!("structure table ended early at offset {:#x}", offset);
        }
        self.end = Some(end);
        self.pos = self.data.len();
    }

    /// Offset just past the first double NUL at or after `from`
    fn pool_end(&self, from: usize) -> Option<usize> {
        self.data
            .get(from..)?
            .windows(2)
            .position(|w| w == [0, 0])
            .map(|i| from + i + 2)
    }
}

impl<'a> Iterator for TableWalker<'a> {
    type Item = Result<StructureRecord<'a>, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end.is_some() {
            return None;
        }

        let start = self.pos;
        let header = match StructureHeader::from_bytes(&self.data[start..]) {
            Some(header) => header,
            None => {
                self.stop(WalkEnd::EndedEarly { offset: start });
                return None;
            }
        };
        self.visited += 1;

        let remaining = self.data.len() - start;
        let length = header.length as usize;

        if !header.is_well_formed() || length > remaining {
            let error = RecordError {
                offset: start,
                structure_type: header.structure_type,
                handle: header.handle,
                error: DmiError::MalformedRecord {
                    field: "length",
                    offset: 1,
                    length: remaining,
                },
            };
            match self.pool_end(start + StructureHeader::SIZE) {
                Some(next) => self.pos = next,
                None => self.stop(WalkEnd::EndedEarly { offset: start }),
            }
            return Some(Err(error));
        }

        let record = match self.pool_end(start + length) {
            Some(next) => {
                self.pos = next;
                StructureRecord::new(header, start, &self.data[start..next])
            }
            None => {
                // Remainder is this record's string pool
                let record = StructureRecord::new(header, start, &self.data[start..]);
                if !header.is_end_of_table() {
                    self.stop(WalkEnd::EndedEarly { offset: start });
                }
                self.pos = self.data.len();
                record
            }
        };

        if header.is_end_of_table() {
            self.stop(WalkEnd::EndOfTable);
        }

        Some(Ok(record))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Append a record with the given formatted body and strings
    pub(crate) fn push_record(table: &mut Vec<u8>, structure_type: u8, handle: u16, body: &[u8], strings: &[&str]) {
        table.push(structure_type);
        table.push((StructureHeader::SIZE + body.len()) as u8);
        table.extend_from_slice(&handle.to_le_bytes());
        table.extend_from_slice(body);
        for s in strings {
            table.extend_from_slice(s.as_bytes());
            table.push(0);
        }
        if strings.is_empty() {
            table.push(0);
        }
        table.push(0);
    }

    #[test]
    fn test_walk_visits_all_records() {
        let mut table = Vec::new();
        push_record(&mut table, 0, 0x0000, &[1, 2, 0, 0], &["Vendor", "1.0"]);
        push_record(&mut table, 4, 0x0004, &[0; 8], &[]);
        push_record(&mut table, 127, 0xFFFF, &[], &[]);
        // Junk after end-of-table is never reached
        table.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x01]);

        let mut walker = TableWalker::new(&table);
        let records: Vec<_> = walker.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].header.structure_type, 0);
        assert_eq!(records[0].strings().get(2).unwrap(), "1.0");
        assert_eq!(records[1].offset, 4 + 4 + 7 + 4 + 1);
        assert_eq!(records[1].strings().count(), 0);
        assert_eq!(records[2].header.structure_type, 127);
        assert_eq!(walker.end(), Some(WalkEnd::EndOfTable));
        assert_eq!(walker.visited(), 3);
    }

    #[test]
    fn test_walk_truncated_header() {
        let mut table = Vec::new();
        push_record(&mut table, 1, 1, &[0; 4], &[]);
        let cut = table.len();
        table.extend_from_slice(&[2, 8]);

        let mut walker = TableWalker::new(&table);
        assert!(walker.next().unwrap().is_ok());
        assert!(walker.next().is_none());
        assert_eq!(walker.end(), Some(WalkEnd::EndedEarly { offset: cut }));
        assert!(walker.next().is_none());
    }

    #[test]
    fn test_walk_missing_terminator() {
        let mut table = Vec::new();
        push_record(&mut table, 1, 1, &[0; 4], &[]);
        table.extend_from_slice(&[11, 5, 0x20, 0x00, 1, b'O', b'E', b'M']);

        let records: Vec<_> = TableWalker::new(&table).collect();
        assert_eq!(records.len(), 2);
        let oem = records[1].as_ref().unwrap();
        assert_eq!(oem.strings().get(1).unwrap(), "OEM");
    }

    #[test]
    fn test_walk_overlong_record_resyncs() {
        let mut table = Vec::new();
        push_record(&mut table, 2, 0x0200, &[1, 2, 3], &["Board"]);
        let bad = table.len();
        // Declares 0xF0 bytes but only a short body and terminator follow
        table.extend_from_slice(&[17, 0xF0, 0x11, 0x00, 9, 9, 0, 0]);
        push_record(&mut table, 3, 0x0300, &[0; 5], &["Case"]);
        push_record(&mut table, 127, 0xFEFF, &[], &[]);

        let mut walker = TableWalker::new(&table);
        let items: Vec<_> = walker.by_ref().collect();

        assert_eq!(items.len(), 4);
        let err = items[1].as_ref().unwrap_err();
        assert_eq!(err.offset, bad);
        assert_eq!(err.structure_type, 17);
        assert!(matches!(err.error, DmiError::MalformedRecord { field: "length", .. }));
        assert_eq!(items[2].as_ref().unwrap().strings().get(1).unwrap(), "Case");
        assert_eq!(walker.end(), Some(WalkEnd::EndOfTable));
    }

    #[test]
    fn test_walk_short_length_field() {
        let mut table = [5u8, 2, 0x05, 0x00, 0, 0].to_vec();
        push_record(&mut table, 127, 0, &[], &[]);

        let items: Vec<_> = TableWalker::new(&table).collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_err());
        assert!(items[1].is_ok());
    }

    #[test]
    fn test_walk_empty_table() {
        let mut walker = TableWalker::new(&[]);
        assert!(walker.next().is_none());
        assert_eq!(walker.end(), Some(WalkEnd::EndedEarly { offset: 0 }));
    }
}
