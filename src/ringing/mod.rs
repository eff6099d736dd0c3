//! Permutation engine: rows, changes and methods.
//!
//! A change is stored as a bitmask of the positions that make places;
//! every other position swaps with its neighbour. Rows carry their own
//! validity, so a bad change read from a file shows up as an invalid row
//! rather than an error.

pub mod method;
pub mod notation;
pub mod row;

pub use method::{Method, MethodFault, PlainCourse, MAX_NOTATION_LENGTH, MAX_TITLE_LENGTH};
pub use notation::{format_change, format_place_notation, parse_place_notation, NotationError};
pub use row::{
    bell_char, bell_from_char, Bell, BellBitmask, ChangeDirection, Changes, PlaceNotation, Row,
    BELL_CHARS, MAX_BELLS,
};
