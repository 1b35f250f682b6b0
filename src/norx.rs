//! # NORX permutation
//!
//! The NORX64 permutation operates on a 1024-bit state as 16 64-bit words, viewed as a 4x4
//! matrix. One round applies the quarter-round `G` to the four columns and then to the four
//! diagonals; the permutation is `ROUNDS` such rounds.

use crate::{RATE_WORDS, STATE_WORDS};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Rotation offsets of the quarter-round, in order of use.
pub(crate) const ROTATIONS: [u32; 4] = [8, 19, 40, 63];

// Always compile portable for benchmarking comparison
mod portable;
#[cfg(target_arch = "x86_64")]
mod sse2;

/// NORX state: 16 u64 words (1024 bits).
///
/// Words `0..12` are the rate, words `12..16` the capacity. Only the permutation touches the
/// capacity after initialization, apart from parameter and domain injection.
///
/// On x86_64 targets the permutation runs on the SSE2 implementation, elsewhere on the portable
/// one.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct State(pub(crate) [u64; STATE_WORDS]);

impl State {
    /// Create a state from raw words.
    #[inline(always)]
    pub const fn from_words(words: [u64; STATE_WORDS]) -> Self {
        Self(words)
    }

    /// The raw state words.
    #[inline(always)]
    pub const fn words(&self) -> &[u64; STATE_WORDS] {
        &self.0
    }

    /// The rate words.
    #[inline(always)]
    pub(crate) fn rate(&self) -> &[u64] {
        &self.0[..RATE_WORDS]
    }

    /// The rate words, mutably.
    #[inline(always)]
    pub(crate) fn rate_mut(&mut self) -> &mut [u64] {
        &mut self.0[..RATE_WORDS]
    }
}

/// Apply the NORX permutation to the state using SSE2 SIMD.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub(crate) fn permute<const ROUNDS: usize>(state: &mut State) {
    // SAFETY: SSE2 is available on all x86_64 targets
    unsafe {
        sse2::permute::<ROUNDS>(state);
    }
}

/// Apply the NORX permutation to the state using portable implementation.
#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub(crate) fn permute<const ROUNDS: usize>(state: &mut State) {
    portable::permute::<ROUNDS>(state);
}

// Public benchmarking functions to compare implementations
#[doc(hidden)]
pub mod bench {
    pub use super::State;

    /// Apply the 4-round permutation using portable implementation (for benchmarking).
    pub fn permute_portable(state: &mut State) {
        super::portable::permute::<{ crate::ROUNDS }>(state);
    }

    /// Apply the 4-round permutation using SIMD implementation (for benchmarking).
    ///
    /// On x86_64, this uses hand-written SSE2.
    /// On other platforms, this is an alias for portable.
    pub fn permute_simd(state: &mut State) {
        #[cfg(target_arch = "x86_64")]
        {
            // SAFETY: SSE2 is available on all x86_64 targets
            unsafe {
                super::sse2::permute::<{ crate::ROUNDS }>(state);
            }
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            super::portable::permute::<{ crate::ROUNDS }>(state);
        }
    }
}
