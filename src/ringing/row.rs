use std::fmt;
use std::ops::Mul;

/// Maximum number of bells in a row
pub const MAX_BELLS: usize = 16;

/// A bell, numbered from 0 (the treble)
pub type Bell = u8;

/// One bit per bell
pub type BellBitmask = u16;

/// One change: bit `i` set means the bell in position `i` makes a place
pub type PlaceNotation = BellBitmask;

/// Characters used to write bells, treble first
pub const BELL_CHARS: &[u8; 33] = b"1234567890ETABCDFGHJKLMNPQRSUVWYZ";

const _: () = assert!(MAX_BELLS <= BellBitmask::BITS as usize);

/// Which way a bell moves during a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i8)]
pub enum ChangeDirection {
    Down = -1,
    #[default]
    Place = 0,
    Up = 1,
}

/// Per-position movement for one change.
///
/// `forward[i]` is the direction taken by the bell leaving position `i`;
/// `backward[i]` the direction taken by the bell arriving in position `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Changes {
    stage: u8,
    forward: [ChangeDirection; MAX_BELLS],
    backward: [ChangeDirection; MAX_BELLS],
}

impl Changes {
    /// Validate `notation` for `stage` bells and work out the movements.
    ///
    /// Positions without a place pair up left to right; a swapping position
    /// followed by a place, or left over at the end, makes the change
    /// invalid.
    pub fn parse(stage: usize, notation: PlaceNotation) -> Option<Changes> {
        if stage > MAX_BELLS {
            return None;
        }
        let mut changes = Changes {
            stage: stage as u8,
            forward: [ChangeDirection::Place; MAX_BELLS],
            backward: [ChangeDirection::Place; MAX_BELLS],
        };
        let mut pending = false;
        for i in 0..stage {
            let swaps = notation & (1 << i) == 0;
            if pending {
                if !swaps {
                    return None;
                }
                changes.forward[i - 1] = ChangeDirection::Up;
                changes.forward[i] = ChangeDirection::Down;
                changes.backward[i] = ChangeDirection::Up;
                changes.backward[i - 1] = ChangeDirection::Down;
                pending = false;
            } else if swaps {
                pending = true;
            }
        }
        if pending { None } else { Some(changes) }
    }

    pub fn stage(&self) -> usize {
        self.stage as usize
    }

    pub fn forward(&self) -> &[ChangeDirection] {
        &self.forward[..self.stage()]
    }

    pub fn backward(&self) -> &[ChangeDirection] {
        &self.backward[..self.stage()]
    }

    /// Left-hand positions of the swapped pairs
    pub fn swaps(&self) -> impl Iterator<Item = usize> + '_ {
        self.forward()
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == ChangeDirection::Up)
            .map(|(i, _)| i)
    }
}

/// An arrangement of `stage` bells.
///
/// A zero stage marks the row as invalid; applying a bad change produces
/// one instead of an error, so callers check [`Row::is_valid`] before use.
#[derive(Clone, Copy)]
pub struct Row {
    stage: u8,
    bells: [Bell; MAX_BELLS],
}

impl PartialEq for Row {
    fn eq(&self, other: &Row) -> bool {
        self.bells() == other.bells()
    }
}

impl Eq for Row {}

impl std::hash::Hash for Row {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bells().hash(state);
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::invalid()
    }
}

impl Row {
    pub const fn invalid() -> Row {
        Row {
            stage: 0,
            bells: [0; MAX_BELLS],
        }
    }

    /// The identity row, or invalid for a stage outside `1..=16`.
    pub fn rounds(stage: usize) -> Row {
        if stage == 0 || stage > MAX_BELLS {
            return Row::invalid();
        }
        let mut row = Row {
            stage: stage as u8,
            bells: [0; MAX_BELLS],
        };
        for (i, bell) in row.bells[..stage].iter_mut().enumerate() {
            *bell = i as Bell;
        }
        row
    }

    /// Build a row from explicit bells; anything that is not a permutation
    /// of `0..bells.len()` gives an invalid row.
    pub fn from_bells(bells: &[Bell]) -> Row {
        let stage = bells.len();
        if stage == 0 || stage > MAX_BELLS {
            return Row::invalid();
        }
        let mut seen: BellBitmask = 0;
        for &bell in bells {
            if bell as usize >= stage || seen & (1 << bell) != 0 {
                return Row::invalid();
            }
            seen |= 1 << bell;
        }
        let mut row = Row {
            stage: stage as u8,
            bells: [0; MAX_BELLS],
        };
        row.bells[..stage].copy_from_slice(bells);
        row
    }

    /// Parse a row written with bell characters, e.g. `"135264"`.
    pub fn parse(text: &str) -> Row {
        let bells: Option<Vec<Bell>> = text.chars().map(bell_from_char).collect();
        match bells {
            Some(bells) => Row::from_bells(&bells),
            None => Row::invalid(),
        }
    }

    #[inline]
    pub fn stage(&self) -> usize {
        self.stage as usize
    }

    #[inline]
    pub fn bells(&self) -> &[Bell] {
        &self.bells[..self.stage()]
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.stage > 0
    }

    #[inline]
    pub fn invalidate(&mut self) {
        self.stage = 0;
    }

    /// Whether every position holds its own bell. Invalid rows never are.
    pub fn is_rounds(&self) -> bool {
        self.is_valid() && self.bells().iter().enumerate().all(|(i, &b)| b as usize == i)
    }

    /// Bells standing in their home positions
    pub fn fixed_bells(&self) -> BellBitmask {
        self.bells()
            .iter()
            .enumerate()
            .filter(|(i, b)| **b as usize == *i)
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }

    /// Apply one change in place.
    ///
    /// On invalid notation the row is invalidated and `None` returned.
    pub fn apply_notation(&mut self, notation: PlaceNotation) -> Option<Changes> {
        if !self.is_valid() {
            return None;
        }
        match Changes::parse(self.stage(), notation) {
            Some(changes) => {
                for i in changes.swaps() {
                    self.bells.swap(i, i + 1);
                }
                Some(changes)
            }
            None => {
                self.invalidate();
                None
            }
        }
    }

    /// Copy of this row with one change applied
    pub fn with_notation(&self, notation: PlaceNotation) -> Row {
        let mut row = *self;
        row.apply_notation(notation);
        row
    }
}

/// Permutation composition: `(a * b)[i] = a[b[i]]`.
impl Mul for Row {
    type Output = Row;

    fn mul(self, rhs: Row) -> Row {
        if !self.is_valid() || self.stage != rhs.stage {
            return Row::invalid();
        }
        let mut out = self;
        for (i, &b) in rhs.bells().iter().enumerate() {
            out.bells[i] = self.bells[b as usize];
        }
        out
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("<invalid>");
        }
        for &bell in self.bells() {
            write!(f, "{}", bell_char(bell))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row({})", self)
    }
}

/// Character for a bell
pub fn bell_char(bell: Bell) -> char {
    BELL_CHARS
        .get(bell as usize)
        .map(|&c| char::from(c))
        .unwrap_or('?')
}

/// Bell for a character, case-insensitive
pub fn bell_from_char(c: char) -> Option<Bell> {
    let upper = c.to_ascii_uppercase();
    BELL_CHARS
        .iter()
        .position(|&b| char::from(b) == upper)
        .map(|i| i as Bell)
}
