//! Stage names and the per-stage database file names.

use crate::ringing::MAX_BELLS;
use std::path::{Path, PathBuf};

/// Character naming each stage's file, stage 1 first
const STAGE_FILE_CHARS: &[u8; MAX_BELLS] = b"1234567890ETABCD";

const STAGE_NAMES: [&str; MAX_BELLS - 1] = [
    "Two", "Singles", "Minimus", "Doubles", "Minor", "Triples", "Major", "Caters", "Royal",
    "Cinques", "Maximus", "Sextuples", "Fourteen", "Septuples", "Sixteen",
];

/// Conventional name of a stage, for stages 2 to 16
pub fn stage_name(stage: u8) -> Option<&'static str> {
    STAGE_NAMES.get((stage as usize).checked_sub(2)?).copied()
}

/// File name of the database for `stage`, e.g. `methods-E.ccml` for 11
pub fn method_file_name(stage: u8) -> Option<String> {
    let c = STAGE_FILE_CHARS.get((stage as usize).checked_sub(1)?)?;
    Some(format!("methods-{}.ccml", char::from(*c)))
}

pub fn method_file_path(dir: &Path, stage: u8) -> Option<PathBuf> {
    method_file_name(stage).map(|name| dir.join(name))
}

/// Parse a stage given as a number, a stage name or a file character.
///
/// `"8"`, `"major"` and `"E"` (eleven) are all accepted.
pub fn parse_stage(text: &str) -> Option<u8> {
    let text = text.trim();
    if let Ok(stage) = text.parse::<u8>() {
        return (1..=MAX_BELLS as u8).contains(&stage).then_some(stage);
    }
    if let Some(i) = STAGE_NAMES.iter().position(|n| n.eq_ignore_ascii_case(text)) {
        return Some(i as u8 + 2);
    }
    let mut chars = text.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    STAGE_FILE_CHARS
        .iter()
        .position(|&b| char::from(b) == c.to_ascii_uppercase())
        .map(|i| i as u8 + 1)
}
