//! Written place notation.
//!
//! `x` (or `-`) is a cross, bell characters list the places made, `.`
//! separates adjacent place changes and `,` splits a method into
//! palindromic halves, each mirrored about its last change:
//! `x16x16x16,12` is Plain Bob Minor.

use super::row::{bell_char, bell_from_char, PlaceNotation, MAX_BELLS};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("unknown bell character '{0}' in place notation")]
    UnknownBell(char),

    #[error("bell '{0}' is beyond the sixteenth")]
    BellOutOfRange(char),
}

pub const CROSS: PlaceNotation = 0;

fn parse_half(text: &str) -> Result<Vec<PlaceNotation>, NotationError> {
    let mut steps = Vec::new();
    let mut current: PlaceNotation = 0;
    for c in text.chars() {
        match c {
            'x' | 'X' | '-' => {
                if current != 0 {
                    steps.push(current);
                    current = 0;
                }
                steps.push(CROSS);
            }
            '.' => {
                if current != 0 {
                    steps.push(current);
                    current = 0;
                }
            }
            c if c.is_whitespace() => {}
            c => {
                let bell = bell_from_char(c).ok_or(NotationError::UnknownBell(c))?;
                if bell as usize >= MAX_BELLS {
                    return Err(NotationError::BellOutOfRange(c));
                }
                current |= 1 << bell;
            }
        }
    }
    if current != 0 {
        steps.push(current);
    }
    Ok(steps)
}

/// Parse written place notation into one bitmask per change.
pub fn parse_place_notation(text: &str) -> Result<Vec<PlaceNotation>, NotationError> {
    if !text.contains(',') {
        return parse_half(text);
    }
    let mut steps = Vec::new();
    for half in text.split(',') {
        let half = parse_half(half)?;
        steps.extend_from_slice(&half);
        if let Some((_, body)) = half.split_last() {
            steps.extend(body.iter().rev());
        }
    }
    Ok(steps)
}

/// Write a single change: `x` for a cross, otherwise the places made.
pub fn format_change(notation: PlaceNotation, stage: usize) -> String {
    if notation == CROSS {
        return "x".to_string();
    }
    (0..stage.min(MAX_BELLS))
        .filter(|&i| notation & (1 << i) != 0)
        .map(|i| bell_char(i as u8))
        .collect()
}

/// Write a whole lead, dotting adjacent place changes apart.
pub fn format_place_notation(steps: &[PlaceNotation], stage: usize) -> String {
    let mut out = String::new();
    let mut after_places = false;
    for &step in steps {
        if step == CROSS {
            out.push('x');
            after_places = false;
        } else {
            if after_places {
                out.push('.');
            }
            out.push_str(&format_change(step, stage));
            after_places = true;
        }
    }
    out
}
