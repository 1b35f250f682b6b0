#![no_std]
#![doc = include_str!("../README.md")]

#[cfg(feature = "alloc")]
extern crate alloc;

mod aead_impl;
mod error;
mod norx;

mod rustcrypto_aead;

pub use aead_impl::{Tag, decrypt_in_place, encrypt_in_place, open_into, seal_into, verify};
#[cfg(feature = "alloc")]
pub use aead_impl::{open, seal};
pub use error::Error;
pub use norx::bench;
pub use rustcrypto_aead::{Norx6441, Norx6461, NorxAead};

pub use aead::{self, AeadInPlace, KeyInit}; // For `NorxAead` users

/// NORX state size in 64-bit words.
const STATE_WORDS: usize = 16;

/// Rate in 64-bit words.
const RATE_WORDS: usize = 12;

/// Bytes per state word.
const WORD_BYTES: usize = 8;

/// Word width in bits, bound into the initial state.
const WORD_BITS: u64 = 64;

/// Parallelism degree, bound into the initial state. Only the sequential mode exists.
const PARALLELISM: u64 = 1;

/// NORX rate in bytes (96 bytes = 12 u64 words).
pub const RATE: usize = RATE_WORDS * WORD_BYTES;

/// NORX key size in bytes.
pub const KEY_SIZE: usize = 32;

/// NORX nonce size in bytes.
pub const NONCE_SIZE: usize = 16;

/// NORX tag size in bytes.
pub const TAG_SIZE: usize = 32;

/// Number of permutation rounds of the canonical NORX64-4-1 instance.
pub const ROUNDS: usize = 4;
