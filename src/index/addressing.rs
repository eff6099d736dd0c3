//! Pointer-table addressing.
//!
//! The pointer table is a 28-way tree flattened into one array. Each node
//! reserves one slot for each stop symbol ([`Symbol::Other`] and
//! [`Symbol::Digit`]) followed by one full subtree per letter, so a title
//! prefix maps to a slot by summing the sizes of the siblings that precede
//! it at every level.

use crate::charset::{symbols, Symbol};

/// Number of slots occupied by a full subtree with `depth` levels remaining.
///
/// `slots(d) = 2 * (1 - 26^d) / (1 - 26) + 26^d`: two stop slots on every
/// level above the leaves plus the final layer of letter leaves. Saturates
/// instead of overflowing for depths far beyond anything a file can hold.
pub fn subtree_slots(depth: u32) -> u64 {
    let leaves = Symbol::LETTER_COUNT.saturating_pow(depth);
    let stops = Symbol::STOP_COUNT.saturating_mul(leaves - 1) / (Symbol::LETTER_COUNT - 1);
    stops.saturating_add(leaves)
}

/// Table slot for a sequence of canonical symbols.
///
/// Only the first `depth` symbols take part. A stop symbol ends the descent
/// at its own slot; running out of symbols ends it at the first slot of the
/// current subtree. The result is always below `subtree_slots(depth)`.
pub fn address_of_symbols<I>(prefix: I, depth: u32) -> u64
where
    I: IntoIterator<Item = Symbol>,
{
    let mut slot = 0u64;
    for (level, symbol) in prefix.into_iter().take(depth as usize).enumerate() {
        let remaining = depth - level as u32 - 1;
        match symbol.letter_index() {
            None => return slot + u64::from(symbol.index()),
            Some(letter) => {
                let preceding = u64::from(letter).saturating_mul(subtree_slots(remaining));
                slot = slot.saturating_add(Symbol::STOP_COUNT + preceding);
            }
        }
    }
    slot
}

/// Table slot for raw title text in the legacy charset.
pub fn address_of(prefix: &[u8], depth: u32) -> u64 {
    address_of_symbols(symbols(prefix), depth)
}
