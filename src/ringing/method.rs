use super::notation::format_place_notation;
use super::row::{Bell, BellBitmask, PlaceNotation, Row, MAX_BELLS};
use crate::charset::display_title;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest title, including its terminator
pub const MAX_TITLE_LENGTH: usize = 128;

/// Longest lead, in changes
pub const MAX_NOTATION_LENGTH: usize = 256;

/// A named method as stored in a database record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Raw title in the legacy charset, without terminator
    pub title: Vec<u8>,
    /// Number of bells
    pub stage: u8,
    /// One change per row of a lead
    pub notation: Vec<PlaceNotation>,
    /// Leads in a plain course
    pub lead_count: u16,
    /// Hunt bells (fixed points of the method), one bit per bell
    pub hunt_bells: BellBitmask,
}

/// Why a method cannot be rung as recorded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MethodFault {
    #[error("stage {0} is outside 1..=16")]
    StageOutOfRange(u8),

    #[error("method has no place notation")]
    EmptyNotation,

    #[error("method has a lead count of zero")]
    NoLeads,

    #[error("change {step} ({notation:#06x}) is not valid on this stage")]
    InvalidNotation { step: usize, notation: PlaceNotation },

    #[error("plain course ends at {row} instead of rounds")]
    NotRoundBlock { row: String },
}

impl Method {
    #[inline]
    pub fn lead_length(&self) -> usize {
        self.notation.len()
    }

    /// Rows in a plain course
    #[inline]
    pub fn plain_course_length(&self) -> usize {
        self.lead_length() * self.lead_count as usize
    }

    /// Whether `bell` is marked as a hunt bell
    #[inline]
    pub fn is_hunt_bell(&self, bell: Bell) -> bool {
        (bell as usize) < MAX_BELLS && self.hunt_bells & (1 << bell) != 0
    }

    pub fn display_title(&self) -> String {
        display_title(&self.title)
    }

    pub fn place_notation(&self) -> String {
        format_place_notation(&self.notation, self.stage as usize)
    }

    /// The row reached after one lead from rounds.
    pub fn lead_head(&self) -> Row {
        let mut row = Row::rounds(self.stage as usize);
        for &step in &self.notation {
            if row.apply_notation(step).is_none() {
                break;
            }
        }
        row
    }

    /// Rows of the plain course from rounds, including the closing row.
    pub fn plain_course(&self) -> PlainCourse<'_> {
        PlainCourse {
            method: self,
            row: Row::rounds(self.stage as usize),
            step: 0,
        }
    }

    /// Check the method can be rung as recorded.
    pub fn verify(&self) -> Result<(), MethodFault> {
        if self.stage == 0 || self.stage as usize > MAX_BELLS {
            return Err(MethodFault::StageOutOfRange(self.stage));
        }
        if self.notation.is_empty() {
            return Err(MethodFault::EmptyNotation);
        }
        if self.lead_count == 0 {
            return Err(MethodFault::NoLeads);
        }

        let mut row = Row::rounds(self.stage as usize);
        for _ in 0..self.lead_count {
            for (step, &notation) in self.notation.iter().enumerate() {
                if row.apply_notation(notation).is_none() {
                    return Err(MethodFault::InvalidNotation { step, notation });
                }
            }
        }
        if !row.is_rounds() {
            return Err(MethodFault::NotRoundBlock {
                row: row.to_string(),
            });
        }
        Ok(())
    }
}

/// Iterator over the rows of a plain course.
///
/// Yields `plain_course_length() + 1` rows, stopping early if a change is
/// invalid.
pub struct PlainCourse<'a> {
    method: &'a Method,
    row: Row,
    step: usize,
}

impl Iterator for PlainCourse<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if !self.row.is_valid() || self.step > self.method.plain_course_length() {
            return None;
        }
        let current = self.row;
        if self.step < self.method.plain_course_length() {
            let notation = self.method.notation[self.step % self.method.lead_length()];
            self.row.apply_notation(notation);
        }
        self.step += 1;
        Some(current)
    }
}
