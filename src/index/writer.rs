use crate::charset::canonical_cmp;
use crate::error::{Error, Result};
use crate::index::addressing::address_of;
use crate::index::record::encode_record;
use crate::index::types::*;
use crate::ringing::Method;
use crate::utils::write_u32_le;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Records per pointer-table slot the depth heuristic aims for
const RECORDS_PER_SLOT: usize = 10;

/// Pointer depth for a file of `count` records: `floor(log28(count / 10))`,
/// never below zero.
pub fn suggested_depth(count: usize) -> u8 {
    let mut remaining = count / RECORDS_PER_SLOT;
    let mut depth = 0;
    while remaining >= crate::charset::Symbol::COUNT {
        remaining /= crate::charset::Symbol::COUNT;
        depth += 1;
    }
    depth
}

/// Builds a complete method database for one stage.
#[derive(Debug, Clone, Copy)]
pub struct DatabaseWriter {
    header: FileHeader,
}

impl DatabaseWriter {
    pub fn new(stage: u8, depth: u8) -> Self {
        Self {
            header: FileHeader::new(stage, depth),
        }
    }

    /// Writer whose depth suits `count` records
    pub fn for_count(stage: u8, count: usize) -> Self {
        Self::new(stage, suggested_depth(count))
    }

    pub fn header(&self) -> FileHeader {
        self.header
    }

    /// Write the header, pointer table and `methods` in canonical title
    /// order. Returns the number of bytes written.
    pub fn write<W: Write>(&self, out: &mut W, methods: &[Method]) -> Result<u64> {
        let depth = u32::from(self.header.pointer_depth);
        let mut sorted: Vec<&Method> = methods.iter().collect();
        sorted.sort_by(|a, b| canonical_cmp(&a.title, &b.title));

        let records = sorted
            .iter()
            .map(|m| {
                if m.stage != self.header.stage {
                    return Err(Error::Unencodable {
                        detail: format!(
                            "stage {} method in a stage {} file",
                            m.stage, self.header.stage
                        ),
                    });
                }
                encode_record(m)
            })
            .collect::<Result<Vec<_>>>()?;

        let records_start = self.header.records_start();
        let records_len: u64 = records.iter().map(|r| r.len() as u64).sum();
        let total = records_start.saturating_add(records_len);
        if total > u64::from(u32::MAX) {
            return Err(Error::Unencodable {
                detail: format!("file of {total} bytes exceeds 32-bit offsets"),
            });
        }

        // Entry i points at the first record addressing to slot i or later
        let slots = self.header.pointer_slots();
        let mut pointers = Vec::with_capacity(slots as usize);
        let mut offset = records_start;
        for (method, record) in sorted.iter().zip(&records) {
            let slot = address_of(&method.title, depth);
            while (pointers.len() as u64) <= slot {
                pointers.push(offset as u32);
            }
            offset += record.len() as u64;
        }
        while (pointers.len() as u64) < slots {
            pointers.push(total as u32);
        }

        out.write_all(&self.header.to_bytes())?;
        for pointer in pointers {
            write_u32_le(out, pointer)?;
        }
        for record in &records {
            out.write_all(record)?;
        }
        out.flush()?;

        debug!(
            stage = self.header.stage,
            depth,
            records = records.len(),
            bytes = total,
            "wrote method database"
        );
        Ok(total)
    }

    /// Write a database file at `path`, replacing any existing file.
    pub fn write_file(&self, path: &Path, methods: &[Method]) -> Result<u64> {
        let file = File::create(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        self.write(&mut out, methods)
    }
}
