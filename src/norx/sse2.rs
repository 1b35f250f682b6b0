//! # NORX permutation - SSE2 SIMD implementation
//!
//! SIMD implementation of the NORX permutation using x86-64 SSE2 intrinsics.
//!
//! Each row of the 4x4 state matrix is held in two SSE2 vectors of two u64 lanes:
//! - Row 0: state[0..2],   state[2..4]
//! - Row 1: state[4..6],   state[6..8]
//! - Row 2: state[8..10],  state[10..12]
//! - Row 3: state[12..14], state[14..16]
//!
//! The column step runs all four columns in parallel. For the diagonal step rows 1, 2 and 3 are
//! rotated left by one, two and three lanes, so that the diagonals line up as columns, and
//! rotated back afterwards.

use super::State;
use core::arch::x86_64::*;

/// `H(x, y) = (x ^ y) ^ ((x & y) << 1)` on both lanes.
macro_rules! mix {
    ($x:expr, $y:expr) => {{
        let (x, y) = ($x, $y);
        _mm_xor_si128(_mm_xor_si128(x, y), _mm_slli_epi64::<1>(_mm_and_si128(x, y)))
    }};
}

/// Rotate both lanes right by `$c` bits.
macro_rules! rotr {
    ($x:expr, $c:literal) => {{
        let x = $x;
        _mm_or_si128(_mm_srli_epi64::<$c>(x), _mm_slli_epi64::<{ 64 - $c }>(x))
    }};
}

/// The quarter-round `G` on two lanes. Offsets match `ROTATIONS`.
macro_rules! g {
    ($a:ident, $b:ident, $c:ident, $d:ident) => {
        $a = mix!($a, $b);
        $d = rotr!(_mm_xor_si128($a, $d), 8);
        $c = mix!($c, $d);
        $b = rotr!(_mm_xor_si128($b, $c), 19);
        $a = mix!($a, $b);
        $d = rotr!(_mm_xor_si128($a, $d), 40);
        $c = mix!($c, $d);
        $b = rotr!(_mm_xor_si128($b, $c), 63);
    };
}

/// `(x0, x1 | x2, x3)` becomes `(x1, x2 | x3, x0)`.
macro_rules! lanes_left1 {
    ($lo:ident, $hi:ident) => {
        ($lo, $hi) = (
            _mm_unpacklo_epi64(_mm_unpackhi_epi64($lo, $lo), $hi),
            _mm_unpacklo_epi64(_mm_unpackhi_epi64($hi, $hi), $lo),
        );
    };
}

/// `(x0, x1 | x2, x3)` becomes `(x3, x0 | x1, x2)`.
macro_rules! lanes_left3 {
    ($lo:ident, $hi:ident) => {
        ($lo, $hi) = (
            _mm_unpacklo_epi64(_mm_unpackhi_epi64($hi, $hi), $lo),
            _mm_unpacklo_epi64(_mm_unpackhi_epi64($lo, $lo), $hi),
        );
    };
}

/// Apply the NORX permutation using SSE2 SIMD.
///
/// # Safety
///
/// This function requires SSE2 support, which is available on all x86-64 targets.
/// The caller must ensure the code is running on a compatible CPU.
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn permute<const ROUNDS: usize>(state: &mut State) {
    // SAFETY: All SSE2 intrinsics are safe to use within this function as we have
    // the target_feature(enable = "sse2") attribute and the caller guarantees SSE2 support.
    // Unaligned loads and stores stay within the 16-word state.
    unsafe {
        let ptr = state.0.as_ptr() as *const __m128i;
        let mut r0l = _mm_loadu_si128(ptr.add(0));
        let mut r0h = _mm_loadu_si128(ptr.add(1));
        let mut r1l = _mm_loadu_si128(ptr.add(2));
        let mut r1h = _mm_loadu_si128(ptr.add(3));
        let mut r2l = _mm_loadu_si128(ptr.add(4));
        let mut r2h = _mm_loadu_si128(ptr.add(5));
        let mut r3l = _mm_loadu_si128(ptr.add(6));
        let mut r3h = _mm_loadu_si128(ptr.add(7));

        for _ in 0..ROUNDS {
            // Column step
            g!(r0l, r1l, r2l, r3l);
            g!(r0h, r1h, r2h, r3h);

            // Diagonalize
            lanes_left1!(r1l, r1h);
            (r2l, r2h) = (r2h, r2l);
            lanes_left3!(r3l, r3h);

            // Diagonal step
            g!(r0l, r1l, r2l, r3l);
            g!(r0h, r1h, r2h, r3h);

            // Undiagonalize
            lanes_left3!(r1l, r1h);
            (r2l, r2h) = (r2h, r2l);
            lanes_left1!(r3l, r3h);
        }

        let ptr = state.0.as_mut_ptr() as *mut __m128i;
        _mm_storeu_si128(ptr.add(0), r0l);
        _mm_storeu_si128(ptr.add(1), r0h);
        _mm_storeu_si128(ptr.add(2), r1l);
        _mm_storeu_si128(ptr.add(3), r1h);
        _mm_storeu_si128(ptr.add(4), r2l);
        _mm_storeu_si128(ptr.add(5), r2h);
        _mm_storeu_si128(ptr.add(6), r3l);
        _mm_storeu_si128(ptr.add(7), r3h);
    }
}
