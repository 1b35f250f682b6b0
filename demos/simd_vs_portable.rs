//! Benchmark comparing SIMD vs portable NORX permutation implementations.
//!
//! Runs the 4-round permutation a fixed number of times on both backends,
//! reports throughput in permuted rate bytes, and seals 256 MB through the
//! public API (which uses the SIMD backend on x86_64).
//!
//! Run with: cargo run --release --example simd_vs_portable

use norx_crypto::{KEY_SIZE, NONCE_SIZE, RATE, bench, encrypt_in_place};
use std::time::{Duration, Instant};

const PERMUTATIONS: usize = 4 * 1024 * 1024;
const SEAL_SIZE: usize = 256 * 1024 * 1024; // 256 MB

/// Run the permutation repeatedly, starting from a random state.
fn permute_with_impl<F>(seed: [u64; 16], permute: F) -> (bench::State, Duration)
where
    F: Fn(&mut bench::State),
{
    let mut state = bench::State::from_words(seed);

    let start = Instant::now();
    for _ in 0..PERMUTATIONS {
        permute(&mut state);
    }

    (state, start.elapsed())
}

fn throughput(bytes: usize, duration: Duration) -> f64 {
    (bytes as f64) / duration.as_secs_f64() / (1024.0 * 1024.0)
}

fn main() {
    println!("NORX SIMD vs Portable Benchmark");
    println!("===============================");

    #[cfg(target_arch = "x86_64")]
    println!("Platform: x86_64 - Comparing hand-written SSE2 vs portable\n");

    #[cfg(not(target_arch = "x86_64"))]
    println!("Platform: {} - Both use portable\n", std::env::consts::ARCH);

    let seed: [u64; 16] = std::array::from_fn(|_| rand::random());

    println!("Running SIMD version...");
    let (state_simd, duration_simd) = permute_with_impl(seed, bench::permute_simd);
    let throughput_simd = throughput(PERMUTATIONS * RATE, duration_simd);
    println!("SIMD completed in: {:.2?} ({:.2} MB/s)\n", duration_simd, throughput_simd);

    println!("Running portable version...");
    let (state_portable, duration_portable) = permute_with_impl(seed, bench::permute_portable);
    let throughput_portable = throughput(PERMUTATIONS * RATE, duration_portable);
    println!(
        "Portable completed in: {:.2?} ({:.2} MB/s)\n",
        duration_portable, throughput_portable
    );

    println!("Sealing 256 MB...");
    let key: [u8; KEY_SIZE] = std::array::from_fn(|_| rand::random());
    let nonce: [u8; NONCE_SIZE] = std::array::from_fn(|_| rand::random());
    let mut data = vec![0u8; SEAL_SIZE];
    let start_seal = Instant::now();
    let tag = encrypt_in_place(&key, &nonce, b"", &mut data, b"");
    let duration_seal = start_seal.elapsed();
    println!(
        "Sealed in: {:.2?} ({:.2} MB/s), tag {:02x?}\n",
        duration_seal,
        throughput(SEAL_SIZE, duration_seal),
        &tag[..4]
    );

    let speedup = duration_portable.as_secs_f64() / duration_simd.as_secs_f64();
    println!("===============================");
    println!("Results Summary:");
    println!("===============================");
    println!("SIMD:     {:.2?} ({:.2} MB/s)", duration_simd, throughput_simd);
    println!("Portable: {:.2?} ({:.2} MB/s)", duration_portable, throughput_portable);
    println!("Speedup:  {:.2}x", speedup);

    // Verify both produce the same output
    if state_simd.words() == state_portable.words() {
        println!("\nBoth implementations produce identical results");
    } else {
        println!("\nWARNING: Implementations produce different results!");
    }
}
