//! # RustCrypto AEAD trait implementation
//!
//! This module provides implementations of the RustCrypto `aead` traits for NORX64. The trait's
//! associated data is absorbed as the NORX header; the trailer is left empty unless one of the
//! `*_with_trailer` methods is used.

use crate::aead_impl::{decrypt_detached, encrypt_detached};
use crate::{Error as NorxError, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use aead::generic_array::GenericArray;
use aead::{
    AeadCore, AeadInPlace, Error, KeyInit, KeySizeUser,
    consts::{U16, U32},
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// NORX64 cipher with `L` permutation rounds, implementing RustCrypto traits.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct NorxAead<const L: usize> {
    key: [u8; KEY_SIZE],
}

/// NORX64-4-1: 4 rounds, the default instance.
pub type Norx6441 = NorxAead<4>;

/// NORX64-6-1: 6 rounds, the high-security instance.
pub type Norx6461 = NorxAead<6>;

impl<const L: usize> KeySizeUser for NorxAead<L> {
    type KeySize = U32;
}

impl<const L: usize> KeyInit for NorxAead<L> {
    fn new(key: &GenericArray<u8, Self::KeySize>) -> Self {
        let mut s = Self {
            key: [0u8; KEY_SIZE],
        };
        s.key.copy_from_slice(key.as_slice());
        s
    }
}

impl<const L: usize> AeadCore for NorxAead<L> {
    type NonceSize = U16;
    type TagSize = U32;
    type CiphertextOverhead = aead::consts::U0;
}

/// Helper to convert between `GenericArray` and built-in array types. v0.14 does not make this
/// conversion easy in any sense.
#[inline(always)]
const fn ga_nonce_to_array(nonce: &GenericArray<u8, U16>) -> &[u8; NONCE_SIZE] {
    // SAFETY: `GenericArray<T, N>` is `#[repr(transparent)]` over `[T; N]`,
    // guaranteeing identical layout. Transmuting `&GenericArray<u8, N>` to
    // `&[u8; N]` preserves the reference lifetime and validity.
    unsafe { core::mem::transmute(nonce) }
}

/// Helper to convert between `GenericArray` and built-in array types.
#[inline(always)]
const fn ga_tag_to_array(tag: &GenericArray<u8, U32>) -> &[u8; TAG_SIZE] {
    // SAFETY: same layout argument as `ga_nonce_to_array`.
    unsafe { core::mem::transmute(tag) }
}

impl<const L: usize> NorxAead<L> {
    /// Encrypt `buffer` in place, authenticating `header` and `trailer`, and return the tag.
    pub fn encrypt_in_place_with_trailer(
        &self,
        nonce: &GenericArray<u8, U16>,
        header: &[u8],
        buffer: &mut [u8],
        trailer: &[u8],
    ) -> GenericArray<u8, U32> {
        let tag = encrypt_detached::<L>(&self.key, ga_nonce_to_array(nonce), header, buffer, trailer);
        GenericArray::from(tag)
    }

    /// Decrypt `buffer` in place, authenticating `header` and `trailer`.
    ///
    /// The buffer is zeroed if authentication fails.
    pub fn decrypt_in_place_with_trailer(
        &self,
        nonce: &GenericArray<u8, U16>,
        header: &[u8],
        buffer: &mut [u8],
        trailer: &[u8],
        tag: &GenericArray<u8, U32>,
    ) -> Result<(), NorxError> {
        decrypt_detached::<L>(
            &self.key,
            ga_nonce_to_array(nonce),
            header,
            buffer,
            trailer,
            ga_tag_to_array(tag),
        )
    }
}

impl<const L: usize> AeadInPlace for NorxAead<L> {
    #[inline]
    fn encrypt_in_place_detached(
        &self,
        nonce: &GenericArray<u8, Self::NonceSize>,
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<GenericArray<u8, Self::TagSize>, Error> {
        Ok(self.encrypt_in_place_with_trailer(nonce, associated_data, buffer, &[]))
    }

    #[inline]
    fn decrypt_in_place_detached(
        &self,
        nonce: &GenericArray<u8, Self::NonceSize>,
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &GenericArray<u8, Self::TagSize>,
    ) -> Result<(), Error> {
        self.decrypt_in_place_with_trailer(nonce, associated_data, buffer, &[], tag)
            .map_err(Error::from)
    }
}
