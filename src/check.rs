//! Whole-file consistency checks.
//!
//! Walks every record of a database, decodes it in full and rings its
//! plain course, and also confirms that the records really are in
//! canonical order, since search silently misses titles otherwise.

use crate::charset::canonical_cmp;
use crate::error::Result;
use crate::index::{ByteSource, MethodReader};
use crate::ringing::MethodFault;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What is wrong with one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Problem {
    /// The method decodes but cannot be rung as recorded
    Fault(String),
    /// The title sorts before the previous record's
    OutOfOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordProblem {
    pub offset: u64,
    pub title: String,
    pub problem: Problem,
}

/// Result of checking one database file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub path: PathBuf,
    pub stage: u8,
    pub records: usize,
    pub problems: Vec<RecordProblem>,
    /// Set when the file could not be read to the end
    pub error: Option<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty() && self.error.is_none()
    }
}

impl From<MethodFault> for Problem {
    fn from(fault: MethodFault) -> Self {
        Problem::Fault(fault.to_string())
    }
}

/// Check every record from the first to the end of the file.
///
/// Stops at the first read error, returning it with the problems found so
/// far in `report`.
pub fn check_reader<S: ByteSource>(
    reader: &mut MethodReader<S>,
    report: &mut CheckReport,
) -> Result<()> {
    let header = reader.header().ok_or(crate::Error::NotOpen)?;
    report.stage = header.stage;
    reader.seek(header.records_start())?;

    let mut previous: Option<Vec<u8>> = None;
    while !reader.end_of_file()? {
        let offset = reader.tell()?;
        let method = reader.read_method()?;
        report.records += 1;

        let mut problem = |problem: Problem| {
            report.problems.push(RecordProblem {
                offset,
                title: method.display_title(),
                problem,
            })
        };
        if let Some(prev) = &previous {
            if canonical_cmp(prev, &method.title) == Ordering::Greater {
                problem(Problem::OutOfOrder);
            }
        }
        if let Err(fault) = method.verify() {
            problem(fault.into());
        }
        previous = Some(method.title);
    }
    Ok(())
}

/// Open and check one database file.
pub fn check_file(path: &Path) -> CheckReport {
    let mut report = CheckReport {
        path: path.to_path_buf(),
        ..CheckReport::default()
    };
    let mut reader = MethodReader::default();
    let result = reader
        .open_path(path)
        .and_then(|_| check_reader(&mut reader, &mut report));
    if let Err(err) = result {
        report.error = Some(err.to_string());
    }
    debug!(path = %path.display(), records = report.records, clean = report.is_clean(), "checked");
    report
}

/// Check several files in parallel, keeping the input order.
pub fn check_files(paths: &[PathBuf]) -> Vec<CheckReport> {
    paths.par_iter().map(|p| check_file(p)).collect()
}
