//! Search-symbol equivalence table for the calculator's legacy charset.
//!
//! Single code units and two-unit (lead + trail) sequences fold to the
//! nearest Latin letter or digit. Anything without a sensible folding is
//! [`Other`], which sorts like a space.

use super::Symbol::{self, *};

/// Fold a single code unit that is not a lead byte.
pub(super) fn single(unit: u8) -> Symbol {
    match unit {
        b'0'..=b'9' => Digit,
        b'A'..=b'Z' => Symbol::from_ascii_upper(unit),
        b'a'..=b'z' => Symbol::from_ascii_upper(unit - (b'a' - b'A')),
        // Bold maths letters and unit prefixes in the control range
        0x1a => A,
        0x1b => B,
        0x1c => C,
        0x1d => D,
        0x0b | 0x1e => E,
        0x01 | 0x1f => F,
        0x08 => G,
        0x06 => K,
        0x05 | 0x07 => M,
        0x03 => N,
        0x02 | 0x0a => P,
        0x09 => T,
        // r, x-bar, x-hat, y-bar, y-hat and friends
        0xcd => R,
        0x90 | 0xc2 | 0xcb => X,
        0xc3 | 0xcc => Y,
        _ => Other,
    }
}

/// Fold a two-unit sequence. `lead` must be a lead byte and `trail` non-zero.
pub(super) fn double(lead: u8, trail: u8) -> Symbol {
    match lead {
        0x7f => match trail {
            0x50 => I,
            0xc7 => P,
            _ => Other,
        },
        0xe5 => upper_extended(trail),
        0xe6 => lower_extended(trail),
        0xe7 => small_and_italic(trail),
        // 0xf7 and 0xf9 have no known printable characters
        _ => Other,
    }
}

/// Accented Latin shared by the upper (0xE5) and lower (0xE6) pages.
fn latin_extended(trail: u8) -> Symbol {
    match trail {
        0x01..=0x06 | 0x21 | 0x22 => A,
        0x08 | 0x23 | 0x24 => C,
        0x26 => D,
        0x09..=0x0c | 0x27 | 0x28 => E,
        0x0d..=0x10 => I,
        0x12 | 0x2a | 0x2b => N,
        0x13..=0x18 | 0x2c => O,
        0x2d => R,
        0x2e | 0x2f => S,
        0x30 => T,
        0x19..=0x1c | 0x31 | 0x32 => U,
        0x1d | 0x20 => Y,
        0x33..=0x35 => Z,
        _ => Other,
    }
}

fn upper_extended(trail: u8) -> Symbol {
    match trail {
        // Superscript, subscript and circled digits
        0xc0..=0xc9 | 0xcd..=0xcf | 0xd0..=0xd9 | 0xdf | 0xf0..=0xf5 | 0xfb..=0xfd => Digit,
        0x9f => A,
        0xb0 => E,
        0xde => N,
        0xa2 => O,
        0xb1 => P,
        0xb2 => R,
        0xb3 => X,
        0xb4 => Y,
        _ => latin_extended(trail),
    }
}

fn lower_extended(trail: u8) -> Symbol {
    match trail {
        // sharp s
        0x1f => S,
        _ => latin_extended(trail),
    }
}

fn small_and_italic(trail: u8) -> Symbol {
    match trail {
        0x30..=0x39 => Digit,
        0x61 | 0x89 | 0xae => A,
        0xaf => B,
        0x65 | 0x96 => E,
        0x95 => F,
        0xa2 | 0xa6 => G,
        0x68 | 0x85 => H,
        0x6b | 0x98 => K,
        0x6c => L,
        0x6d => M,
        0x6e | 0xad => N,
        0x6f => O,
        0x70 | 0xab => P,
        0x9a => R,
        0x73 => S,
        0x74 | 0xa5 => T,
        0x90 => U,
        0x78 => X,
        _ => Other,
    }
}
