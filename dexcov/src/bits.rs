//! Decoding of reported coverage bit strings.
//!
//! A coverage record carries one character per code unit of the method body, `'1'` meaning the instruction starting at
//! that code unit has been executed. Older collectors concatenate several candidate strings with `_`, in which case
//! the candidate with the right length is chosen. If no candidate fits, the whole string is used, and is accepted only
//! if it happens to have the right length itself.

use fixedbitset::FixedBitSet;

/// Picks the bit string to use for a method whose body is `expected_len` code units long.
///
/// Returns the first `_`-separated segment having exactly `expected_len` characters, or the whole `raw` string if
/// there is no such segment. The length of the result is not checked here.
pub fn select_segment(raw: &str, expected_len: usize) -> &str {
    if raw.contains('_') {
        raw.split('_').find(|segment| segment.len() == expected_len).unwrap_or(raw)
    } else {
        raw
    }
}

/// Decodes a raw bit string into a bit set of `expected_len` code units.
///
/// Returns `None` when the selected string does not have exactly `expected_len` characters. Any character other than
/// `'1'` is treated as not covered.
pub fn decode(raw: &str, expected_len: usize) -> Option<FixedBitSet> {
    let bits = select_segment(raw, expected_len);
    if bits.len() != expected_len {
        return None;
    }
    let mut set = FixedBitSet::with_capacity(expected_len);
    for (pc, b) in bits.bytes().enumerate() {
        if b == b'1' {
            set.insert(pc);
        }
    }
    Some(set)
}
