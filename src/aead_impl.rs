//! # NORX64-4-1 AEAD implementation
//!
//! This module implements the NORX64 authenticated encryption scheme with associated data as a
//! sponge construction on the NORX permutation. Besides the payload, two pieces of associated
//! data are authenticated: a header, absorbed before the payload, and a trailer, absorbed after
//! it.
//!
//! # Sponge Construction
//!
//! - Rate: 96 bytes (12 words) - data absorbed or encrypted per permutation
//! - Capacity: 32 bytes (4 words) - never exposed
//! - Tag: 32 bytes, squeezed from the rate after two final permutations
//!
//! Every block is preceded by a domain separation tag in the last capacity word and a
//! permutation call, so header, payload and trailer blocks with equal contents never collide.
//!
//! # Usage
//!
//! This module provides `no_std`-compatible in-place encryption/decryption:
//!
//! ```
//! use norx_crypto::{encrypt_in_place, decrypt_in_place, KEY_SIZE, NONCE_SIZE};
//!
//! let key = [0u8; KEY_SIZE];
//! let nonce = [1u8; NONCE_SIZE];
//! let mut data = *b"Secret message";
//!
//! // Encrypt in-place.
//! let tag = encrypt_in_place(&key, &nonce, b"header", &mut data, b"trailer");
//!
//! // Decrypt in-place with authentication.
//! decrypt_in_place(&key, &nonce, b"header", &mut data, b"trailer", &tag)
//!     .expect("authentication failed");
//!
//! assert_eq!(&data, b"Secret message");
//! ```
//!
//! [`seal_into`] and [`open_into`] use the `ciphertext || tag` layout with caller buffers, and with
//! the `alloc` feature [`seal`] and [`open`] return owned buffers. For the RustCrypto traits, use
//! [`NorxAead`](crate::NorxAead).

use crate::norx::{State, permute};
use crate::{
    Error, KEY_SIZE, NONCE_SIZE, PARALLELISM, RATE, ROUNDS, STATE_WORDS, TAG_SIZE, WORD_BITS,
    WORD_BYTES,
};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Authentication tag (32 bytes).
pub type Tag = [u8; TAG_SIZE];

/// Initialization constants `u0..u9` (digits of pi).
pub(crate) const INIT_CONSTANTS: [u64; 10] = [
    0x243F6A8885A308D3,
    0x13198A2E03707344,
    0xA4093822299F31D0,
    0x082EFA98EC4E6C89,
    0xAE8858DC339325A1,
    0x670A134EE52D7FA6,
    0xC4316D80CD967541,
    0xD21DFBF8B630B762,
    0x375A18D261E7F892,
    0x343D1F187D92285B,
];

/// State word receiving the domain separation tags.
const DOMAIN_WORD: usize = STATE_WORDS - 1;

/// First padding byte, placed right after the data.
const PAD_START: u8 = 0x01;

/// Last padding bit, set in the final byte of the block.
const PAD_END: u8 = 0x80;

/// Domain separation tags.
#[allow(dead_code)] // Branch and merge belong to the parallel modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub(crate) enum Domain {
    Header = 1 << 0,
    Payload = 1 << 1,
    Trailer = 1 << 2,
    Final = 1 << 3,
    Branch = 1 << 4,
    Merge = 1 << 5,
}

#[inline(always)]
fn load64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; WORD_BYTES];
    word.copy_from_slice(bytes);
    u64::from_le_bytes(word)
}

#[inline(always)]
fn store64(bytes: &mut [u8], word: u64) {
    bytes.copy_from_slice(&word.to_le_bytes());
}

/// Load key and nonce, bind the parameters and mix everything with one permutation.
pub(crate) fn initialize<const L: usize>(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE]) -> State {
    let u = INIT_CONSTANTS;
    let mut state = State::from_words([
        u[0],
        load64(&nonce[0..8]),
        load64(&nonce[8..16]),
        u[1],
        load64(&key[0..8]),
        load64(&key[8..16]),
        load64(&key[16..24]),
        load64(&key[24..32]),
        u[2],
        u[3],
        u[4],
        u[5],
        u[6] ^ WORD_BITS,
        u[7] ^ L as u64,
        u[8] ^ PARALLELISM,
        u[9] ^ (TAG_SIZE * 8) as u64,
    ]);

    permute::<L>(&mut state);

    state
}

#[inline(always)]
fn inject_domain(state: &mut State, domain: Domain) {
    state.0[DOMAIN_WORD] ^= domain as u64;
}

/// Pad a partial block: `data || 0x01 || 0x00* `, with the top bit of the last byte set.
///
/// `data` must be shorter than [`RATE`].
fn pad(data: &[u8]) -> Zeroizing<[u8; RATE]> {
    let mut block = Zeroizing::new([0u8; RATE]);
    block[..data.len()].copy_from_slice(data);
    block[data.len()] = PAD_START;
    block[RATE - 1] |= PAD_END;
    block
}

fn absorb_block<const L: usize>(state: &mut State, block: &[u8], domain: Domain) {
    inject_domain(state, domain);
    permute::<L>(state);

    for (word, chunk) in state.rate_mut().iter_mut().zip(block.chunks_exact(WORD_BYTES)) {
        *word ^= load64(chunk);
    }
}

/// Absorb associated data. Empty data leaves the state untouched.
pub(crate) fn absorb<const L: usize>(state: &mut State, data: &[u8], domain: Domain) {
    if data.is_empty() {
        return;
    }

    // Process full blocks.
    let mut iter = data.chunks_exact(RATE);
    for block in &mut iter {
        absorb_block::<L>(state, block, domain);
    }

    // The last block is always padded, even when empty.
    let last = pad(iter.remainder());
    absorb_block::<L>(state, last.as_slice(), domain);
}

fn encrypt_block<const L: usize>(state: &mut State, block: &mut [u8]) {
    inject_domain(state, Domain::Payload);
    permute::<L>(state);

    for (word, chunk) in state.rate_mut().iter_mut().zip(block.chunks_exact_mut(WORD_BYTES)) {
        *word ^= load64(chunk);
        store64(chunk, *word);
    }
}

fn decrypt_block<const L: usize>(state: &mut State, block: &mut [u8]) {
    inject_domain(state, Domain::Payload);
    permute::<L>(state);

    for (word, chunk) in state.rate_mut().iter_mut().zip(block.chunks_exact_mut(WORD_BYTES)) {
        let ciphertext = load64(chunk);
        store64(chunk, *word ^ ciphertext);
        *word = ciphertext;
    }
}

/// Decrypt the final partial block.
///
/// The padding of the plaintext is not part of the ciphertext, so the rate is rebuilt from the
/// keystream with the padding applied, and the real ciphertext bytes laid over it. The state
/// then ends up exactly where encryption of the padded block leaves it.
fn decrypt_last_block<const L: usize>(state: &mut State, remainder: &mut [u8]) {
    inject_domain(state, Domain::Payload);
    permute::<L>(state);

    let mut block = Zeroizing::new([0u8; RATE]);
    for (chunk, word) in block.chunks_exact_mut(WORD_BYTES).zip(state.rate()) {
        store64(chunk, *word);
    }

    block[..remainder.len()].copy_from_slice(remainder);
    block[remainder.len()] ^= PAD_START;
    block[RATE - 1] ^= PAD_END;

    for (word, chunk) in state.rate_mut().iter_mut().zip(block.chunks_exact_mut(WORD_BYTES)) {
        let ciphertext = load64(chunk);
        store64(chunk, *word ^ ciphertext);
        *word = ciphertext;
    }

    remainder.copy_from_slice(&block[..remainder.len()]);
}

/// Encrypt the payload in place. An empty payload leaves the state untouched.
pub(crate) fn encrypt_payload<const L: usize>(state: &mut State, buffer: &mut [u8]) {
    if buffer.is_empty() {
        return;
    }

    let mut iter = buffer.chunks_exact_mut(RATE);
    for block in &mut iter {
        encrypt_block::<L>(state, block);
    }

    let remainder = iter.into_remainder();
    let mut last = pad(remainder);
    encrypt_block::<L>(state, last.as_mut_slice());
    remainder.copy_from_slice(&last[..remainder.len()]);
}

/// Decrypt the payload in place. An empty payload leaves the state untouched.
pub(crate) fn decrypt_payload<const L: usize>(state: &mut State, buffer: &mut [u8]) {
    if buffer.is_empty() {
        return;
    }

    let mut iter = buffer.chunks_exact_mut(RATE);
    for block in &mut iter {
        decrypt_block::<L>(state, block);
    }

    decrypt_last_block::<L>(state, iter.into_remainder());
}

/// Squeeze the tag. The final permutation is applied twice.
pub(crate) fn finalize<const L: usize>(state: &mut State) -> Tag {
    inject_domain(state, Domain::Final);
    permute::<L>(state);
    permute::<L>(state);

    let mut tag = [0u8; TAG_SIZE];
    for (chunk, word) in tag.chunks_exact_mut(WORD_BYTES).zip(state.rate()) {
        store64(chunk, *word);
    }
    tag
}

/// OR together the XOR of every byte pair. Never stops early.
#[inline(always)]
fn accumulate_difference(pairs: impl Iterator<Item = (u8, u8)>) -> u8 {
    pairs.fold(0, |acc, (a, b)| acc | (a ^ b))
}

/// Compare two tags in constant time.
///
/// All bytes are scanned regardless of where the first difference is, and the accumulated
/// difference is reduced to a boolean without branching on it.
pub fn verify(a: &Tag, b: &Tag) -> bool {
    let difference = accumulate_difference(a.iter().copied().zip(b.iter().copied()));
    difference.ct_eq(&0).into()
}

pub(crate) fn encrypt_detached<const L: usize>(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    buffer: &mut [u8],
    trailer: &[u8],
) -> Tag {
    let mut state = initialize::<L>(key, nonce);

    absorb::<L>(&mut state, header, Domain::Header);
    encrypt_payload::<L>(&mut state, buffer);
    absorb::<L>(&mut state, trailer, Domain::Trailer);

    finalize::<L>(&mut state)
}

pub(crate) fn decrypt_detached<const L: usize>(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    buffer: &mut [u8],
    trailer: &[u8],
    tag: &Tag,
) -> Result<(), Error> {
    let mut state = initialize::<L>(key, nonce);

    absorb::<L>(&mut state, header, Domain::Header);
    decrypt_payload::<L>(&mut state, buffer);
    absorb::<L>(&mut state, trailer, Domain::Trailer);

    let computed_tag = Zeroizing::new(finalize::<L>(&mut state));
    if verify(&computed_tag, tag) {
        Ok(())
    } else {
        buffer.zeroize();
        Err(Error::AuthenticationFailed)
    }
}

/// Encrypt plaintext using NORX64-4-1 (in-place).
///
/// Encrypts the data in `buffer` in-place and returns the authentication tag, which also covers
/// `header` and `trailer`. The buffer contains plaintext on input and ciphertext on output.
#[must_use]
pub fn encrypt_in_place(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    buffer: &mut [u8],
    trailer: &[u8],
) -> Tag {
    encrypt_detached::<ROUNDS>(key, nonce, header, buffer, trailer)
}

/// Decrypt ciphertext using NORX64-4-1 (in-place).
///
/// Decrypts the data in `buffer` in-place. If authentication fails the buffer is zeroed, so
/// unauthenticated plaintext is never handed out.
pub fn decrypt_in_place(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    buffer: &mut [u8],
    trailer: &[u8],
    tag: &Tag,
) -> Result<(), Error> {
    decrypt_detached::<ROUNDS>(key, nonce, header, buffer, trailer, tag)
}

/// Split `ciphertext || tag`, rejecting inputs shorter than the tag.
fn split_tag(ciphertext_with_tag: &[u8]) -> Result<(&[u8], &Tag), Error> {
    let len = ciphertext_with_tag
        .len()
        .checked_sub(TAG_SIZE)
        .ok_or(Error::MalformedInput)?;
    let (ciphertext, tag) = ciphertext_with_tag.split_at(len);
    let tag = tag.try_into().map_err(|_| Error::MalformedInput)?;
    Ok((ciphertext, tag))
}

/// Encrypt `payload` into `out` as `ciphertext || tag`.
///
/// Returns the number of bytes written, `payload.len() + TAG_SIZE`.
pub fn seal_into(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    payload: &[u8],
    trailer: &[u8],
    out: &mut [u8],
) -> Result<usize, Error> {
    let len = payload.len() + TAG_SIZE;
    let out = out.get_mut(..len).ok_or(Error::BufferTooSmall)?;

    let (ciphertext, tag_out) = out.split_at_mut(payload.len());
    ciphertext.copy_from_slice(payload);
    let tag = encrypt_in_place(key, nonce, header, ciphertext, trailer);
    tag_out.copy_from_slice(&tag);

    Ok(len)
}

/// Decrypt `ciphertext || tag` into `out`.
///
/// Returns the payload length. Inputs shorter than the tag are rejected with
/// [`Error::MalformedInput`] before any key material is touched. On authentication failure the
/// payload region of `out` is zeroed.
pub fn open_into(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    ciphertext_with_tag: &[u8],
    trailer: &[u8],
    out: &mut [u8],
) -> Result<usize, Error> {
    let (ciphertext, tag) = split_tag(ciphertext_with_tag)?;
    let out = out.get_mut(..ciphertext.len()).ok_or(Error::BufferTooSmall)?;

    out.copy_from_slice(ciphertext);
    decrypt_in_place(key, nonce, header, out, trailer, tag)?;

    Ok(ciphertext.len())
}

/// Encrypt `payload` and return `ciphertext || tag`.
#[cfg(feature = "alloc")]
pub fn seal(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    payload: &[u8],
    trailer: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + TAG_SIZE);
    out.extend_from_slice(payload);
    let tag = encrypt_in_place(key, nonce, header, &mut out, trailer);
    out.extend_from_slice(&tag);
    out
}

/// Decrypt `ciphertext || tag` and return the payload.
///
/// Inputs shorter than the tag fail with [`Error::MalformedInput`], tag mismatches with
/// [`Error::AuthenticationFailed`].
#[cfg(feature = "alloc")]
pub fn open(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    ciphertext_with_tag: &[u8],
    trailer: &[u8],
) -> Result<Vec<u8>, Error> {
    let (ciphertext, tag) = split_tag(ciphertext_with_tag)?;

    let mut payload = ciphertext.to_vec();
    decrypt_in_place(key, nonce, header, &mut payload, trailer, tag)?;

    Ok(payload)
}

#[cfg(test)]
mod tests;
