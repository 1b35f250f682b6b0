//! Portable scalar implementation of the NORX permutation.

use super::{ROTATIONS, State};
use crate::STATE_WORDS;

/// Column quadruples, processed first in every round.
const COLUMNS: [[usize; 4]; 4] = [[0, 4, 8, 12], [1, 5, 9, 13], [2, 6, 10, 14], [3, 7, 11, 15]];

/// Diagonal quadruples, processed after the columns.
const DIAGONALS: [[usize; 4]; 4] = [[0, 5, 10, 15], [1, 6, 11, 12], [2, 7, 8, 13], [3, 4, 9, 14]];

/// The nonlinear combiner `H(x, y) = (x ^ y) ^ ((x & y) << 1)`.
#[inline(always)]
pub(crate) const fn mix(x: u64, y: u64) -> u64 {
    (x ^ y) ^ ((x & y) << 1)
}

/// The quarter-round `G`.
#[inline(always)]
pub(crate) const fn quarter_round(
    mut a: u64,
    mut b: u64,
    mut c: u64,
    mut d: u64,
) -> (u64, u64, u64, u64) {
    a = mix(a, b);
    d = (a ^ d).rotate_right(ROTATIONS[0]);
    c = mix(c, d);
    b = (b ^ c).rotate_right(ROTATIONS[1]);
    a = mix(a, b);
    d = (a ^ d).rotate_right(ROTATIONS[2]);
    c = mix(c, d);
    b = (b ^ c).rotate_right(ROTATIONS[3]);
    (a, b, c, d)
}

/// One round `F`: column step, then diagonal step.
#[inline(always)]
pub(crate) fn full_round(s: &mut [u64; STATE_WORDS]) {
    for [a, b, c, d] in COLUMNS.into_iter().chain(DIAGONALS) {
        (s[a], s[b], s[c], s[d]) = quarter_round(s[a], s[b], s[c], s[d]);
    }
}

/// Portable implementation of the NORX permutation.
pub(crate) fn permute<const ROUNDS: usize>(state: &mut State) {
    for _ in 0..ROUNDS {
        full_round(&mut state.0);
    }
}
