extern crate std;
use super::*;
use crate::RATE_WORDS;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use std::println;
use std::string::{String, ToString};
use std::vec;
use std::vec::Vec;

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

fn sequential_key() -> [u8; KEY_SIZE] {
    core::array::from_fn(|i| i as u8)
}

fn descending_nonce() -> [u8; NONCE_SIZE] {
    core::array::from_fn(|i| 0xF0u8.wrapping_sub(0x10 * i as u8))
}

fn counting(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i & 0xFF) as u8).collect()
}

/// `seal` over the slice API, for builds without `alloc`.
#[cfg(not(feature = "alloc"))]
fn seal(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    payload: &[u8],
    trailer: &[u8],
) -> Vec<u8> {
    let mut out = vec![0u8; payload.len() + TAG_SIZE];
    let written = seal_into(key, nonce, header, payload, trailer, &mut out).unwrap();
    out.truncate(written);
    out
}

/// `open` over the slice API, for builds without `alloc`.
#[cfg(not(feature = "alloc"))]
fn open(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    ciphertext_with_tag: &[u8],
    trailer: &[u8],
) -> Result<Vec<u8>, Error> {
    let mut out = vec![0u8; ciphertext_with_tag.len().saturating_sub(TAG_SIZE)];
    let len = open_into(key, nonce, header, ciphertext_with_tag, trailer, &mut out)?;
    out.truncate(len);
    Ok(out)
}

/// Lengths around every block boundary up to four blocks.
fn boundary_lengths() -> impl Iterator<Item = usize> {
    (0..=4 * RATE + 1).filter(|len| len % RATE <= 1 || len % RATE >= RATE - 1 || len % 17 == 0)
}

#[test]
fn test_aead_roundtrip() {
    let key = [1u8; KEY_SIZE];
    let nonce = [2u8; NONCE_SIZE];
    let plaintext = b"Hello, NORX AEAD!";

    // Encrypt
    let mut buffer = *plaintext;
    let tag = encrypt_in_place(&key, &nonce, b"header", &mut buffer, b"trailer");

    // Decrypt
    decrypt_in_place(&key, &nonce, b"header", &mut buffer, b"trailer", &tag)
        .expect("Decryption should succeed");

    assert_eq!(&buffer, plaintext);
}

#[test]
fn test_in_place_roundtrip() {
    let key = [42u8; KEY_SIZE];
    let nonce = [99u8; NONCE_SIZE];
    let original_data = b"In-place encryption!";

    let mut buffer = [0u8; 20];
    buffer.copy_from_slice(original_data);

    // Encrypt in-place
    let tag = encrypt_in_place(&key, &nonce, b"metadata", &mut buffer, b"");

    // Buffer should now contain ciphertext (different from plaintext)
    assert_ne!(&buffer[..], original_data);

    // Decrypt in-place
    decrypt_in_place(&key, &nonce, b"metadata", &mut buffer, b"", &tag)
        .expect("Decryption should succeed");

    // Should recover original data
    assert_eq!(&buffer[..], original_data);
}

#[test]
fn test_concrete_scenario() {
    let key = sequential_key();
    let nonce = descending_nonce();
    let data = counting(128);

    let sealed = seal(&key, &nonce, &data, &data, &data);
    assert_eq!(sealed.len(), 128 + TAG_SIZE);

    let expected = hex_to_bytes(
        "aaa5bc9524774f1d20494a7f71aaec457f5397449a04117bd76241466ef1d483\
         311dab7df9a08258f2eed25df80d23798febbd29a152e9fbff9ed46c8c2bf189\
         c3b031b2b58be890375461d9e5efd383ea89bd83f568c890ccbd0dce22343285\
         c181c6bec9682b679e0a30f95ecd11ea9a0df7c2191c6214616dba020fbc352b\
         aa985a33f7c71755d4e30e2a087d794f249b537e8c22c7a26440ec33c16ee5f9",
    );
    assert_eq!(sealed, expected);

    let opened = open(&key, &nonce, &data, &sealed, &data).expect("Decryption should succeed");
    assert_eq!(opened, data);
}

#[test]
fn test_concrete_scenario_six_rounds() {
    let key = sequential_key();
    let nonce = descending_nonce();
    let data = counting(128);

    let mut buffer = data.clone();
    let tag = encrypt_detached::<6>(&key, &nonce, &data, &mut buffer, &data);

    let expected = hex_to_bytes(
        "fc5ab2fa49fb722f21f969efcd0ca1a23426655bf0fdfd188837135c189cec8e\
         3527f84b3d2018941a6d48059fd76a160200390ac581f9761eab7e200b7f700a\
         61b757d0000aad03bbe679e4896e968e4273eb4f7206c0602d56c1d218d95af3\
         1f8f8912f376b0ffc44f51842f71f5094f02cc0f18199dd3b81663c9242f9b3b\
         3c9e2d4e6f44e4fd468763419e2f52ef98f7707ce355e33957e7ad9c9b93c581",
    );
    assert_eq!(&buffer[..], &expected[..128]);
    assert_eq!(&tag[..], &expected[128..]);

    decrypt_detached::<6>(&key, &nonce, &data, &mut buffer, &data, &tag)
        .expect("Decryption should succeed");
    assert_eq!(buffer, data);
}

#[test]
fn test_empty_message() {
    let key = sequential_key();
    let nonce = descending_nonce();

    let sealed = seal(&key, &nonce, &[], &[], &[]);
    assert_eq!(
        sealed,
        hex_to_bytes("b8232a95fcbf46371e0a9dbc0f2628b1b2a31db03e67a9447c63c0b142f11efd")
    );

    let opened = open(&key, &nonce, &[], &sealed, &[]).expect("Decryption should succeed");
    assert!(opened.is_empty());
}

#[test]
fn test_initialization() {
    let state = initialize::<4>(&sequential_key(), &descending_nonce());

    let expected: [u64; 16] = [
        0xba8711725f863724,
        0xbb8882ed3d773248,
        0xceeb86818cb3d43c,
        0xf45245832b95e674,
        0x7819bd83f67b7932,
        0xe6198b371836f784,
        0xb882e9b6e1b138e0,
        0xe08957e0d422064a,
        0xe458f98111297142,
        0xde7853f34955d322,
        0x761c8c5ea1770666,
        0x492076b6ea495278,
        0x96fae669ed196a33,
        0x36237074c9b92f07,
        0xf821aebb63667f84,
        0x66dc767d4dbfe243,
    ];

    assert_eq!(state.words(), &expected);
}

struct TestVector {
    count: usize,
    key: [u8; KEY_SIZE],
    nonce: [u8; NONCE_SIZE],
    plaintext: Vec<u8>,
    header: Vec<u8>,
    trailer: Vec<u8>,
    expected_ciphertext_and_tag: Vec<u8>,
}

fn parse_test_vectors() -> Vec<TestVector> {
    let test_data = include_str!("../../NORX64_4_1_KAT.txt");
    let mut vectors = Vec::new();

    let mut count = 0;
    let mut key_hex = String::new();
    let mut nonce_hex = String::new();
    let mut plaintext_hex = String::new();
    let mut header_hex = String::new();
    let mut trailer_hex = String::new();
    let mut ciphertext_hex = String::new();

    // A trailing blank line flushes the last vector.
    for line in test_data.lines().chain(core::iter::once("")) {
        let line = line.trim();
        if line.is_empty() {
            // Process the test vector
            if !key_hex.is_empty() {
                let mut key = [0u8; KEY_SIZE];
                key.copy_from_slice(&hex_to_bytes(&key_hex));

                let mut nonce = [0u8; NONCE_SIZE];
                nonce.copy_from_slice(&hex_to_bytes(&nonce_hex));

                vectors.push(TestVector {
                    count,
                    key,
                    nonce,
                    plaintext: hex_to_bytes(&plaintext_hex),
                    header: hex_to_bytes(&header_hex),
                    trailer: hex_to_bytes(&trailer_hex),
                    expected_ciphertext_and_tag: hex_to_bytes(&ciphertext_hex),
                });
            }

            // Reset for next test
            key_hex.clear();
            nonce_hex.clear();
            plaintext_hex.clear();
            header_hex.clear();
            trailer_hex.clear();
            ciphertext_hex.clear();
        } else if let Some(stripped) = line.strip_prefix("Count = ") {
            count = stripped.parse().unwrap();
        } else if let Some(stripped) = line.strip_prefix("Key = ") {
            key_hex = stripped.to_string();
        } else if let Some(stripped) = line.strip_prefix("Nonce = ") {
            nonce_hex = stripped.to_string();
        } else if let Some(stripped) = line.strip_prefix("PT = ") {
            plaintext_hex = stripped.to_string();
        } else if let Some(stripped) = line.strip_prefix("AD = ") {
            header_hex = stripped.to_string();
        } else if let Some(stripped) = line.strip_prefix("TR = ") {
            trailer_hex = stripped.to_string();
        } else if let Some(stripped) = line.strip_prefix("CT = ") {
            ciphertext_hex = stripped.to_string();
        }
    }

    vectors
}

#[test]
fn test_all_known_answer_vectors() {
    let vectors = parse_test_vectors();
    assert_eq!(vectors.len(), 256);

    // Under miri, only test every 16th vector to keep test time reasonable
    #[cfg(miri)]
    let test_vectors = vectors.iter().step_by(16);

    #[cfg(not(miri))]
    let test_vectors = vectors.iter();

    for vector in test_vectors {
        // Encrypt in-place
        let mut buffer = vector.plaintext.clone();
        let tag = encrypt_in_place(
            &vector.key,
            &vector.nonce,
            &vector.header,
            &mut buffer,
            &vector.trailer,
        );

        // CT field contains ciphertext + tag concatenated
        let expected_length = vector.plaintext.len() + TAG_SIZE;
        assert_eq!(
            vector.expected_ciphertext_and_tag.len(),
            expected_length,
            "Count {}: Ciphertext+tag length mismatch",
            vector.count
        );

        assert_eq!(
            &buffer,
            &vector.expected_ciphertext_and_tag[..vector.plaintext.len()],
            "Count {}: Ciphertext mismatch",
            vector.count
        );

        assert_eq!(
            &tag[..],
            &vector.expected_ciphertext_and_tag[vector.plaintext.len()..],
            "Count {}: Tag mismatch",
            vector.count
        );

        // Decrypt and verify
        decrypt_in_place(
            &vector.key,
            &vector.nonce,
            &vector.header,
            &mut buffer,
            &vector.trailer,
            &tag,
        )
        .unwrap_or_else(|_| panic!("Count {}: Decryption failed", vector.count));
        assert_eq!(
            &buffer, &vector.plaintext,
            "Count {}: Plaintext mismatch",
            vector.count
        );
    }

    println!("Successfully tested {} test vectors", vectors.len());
}

#[test]
fn test_roundtrip_across_block_boundaries() {
    let mut rng = StdRng::seed_from_u64(1);

    for len in boundary_lengths() {
        let key: [u8; KEY_SIZE] = rng.r#gen();
        let nonce: [u8; NONCE_SIZE] = rng.r#gen();
        let mut header = vec![0u8; rng.gen_range(0..2 * RATE + 2)];
        let mut payload = vec![0u8; len];
        let mut trailer = vec![0u8; rng.gen_range(0..2 * RATE + 2)];
        rng.fill_bytes(&mut header);
        rng.fill_bytes(&mut payload);
        rng.fill_bytes(&mut trailer);

        let sealed = seal(&key, &nonce, &header, &payload, &trailer);
        assert_eq!(sealed.len(), len + TAG_SIZE, "length {len}");

        let opened = open(&key, &nonce, &header, &sealed, &trailer)
            .unwrap_or_else(|_| panic!("length {len}: Decryption failed"));
        assert_eq!(opened, payload, "length {len}: Plaintext mismatch");
    }
}

#[test]
fn test_encrypt_and_decrypt_reach_same_state() {
    let key = sequential_key();
    let nonce = descending_nonce();

    for len in boundary_lengths() {
        let plaintext = counting(len);

        let mut encrypt_state = initialize::<4>(&key, &nonce);
        let mut buffer = plaintext.clone();
        encrypt_payload::<4>(&mut encrypt_state, &mut buffer);

        let mut decrypt_state = initialize::<4>(&key, &nonce);
        decrypt_payload::<4>(&mut decrypt_state, &mut buffer);

        assert_eq!(buffer, plaintext, "length {len}");
        assert_eq!(encrypt_state.words(), decrypt_state.words(), "length {len}");
    }
}

#[test]
fn test_full_rate_message_is_padded() {
    // A message of exactly one rate is followed by a padding-only block, so its state differs
    // from the state after the same block without the extra permutation.
    let key = sequential_key();
    let nonce = descending_nonce();
    let mut buffer = counting(RATE);

    let mut padded = initialize::<4>(&key, &nonce);
    encrypt_payload::<4>(&mut padded, &mut buffer.clone());

    let mut single = initialize::<4>(&key, &nonce);
    encrypt_block::<4>(&mut single, &mut buffer);

    assert_ne!(padded.words(), single.words());
}

#[test]
fn test_authentication_failed() {
    let key = [1u8; KEY_SIZE];
    let nonce = [2u8; NONCE_SIZE];
    let plaintext = b"Hello, NORX!";

    let mut buffer = *plaintext;
    let tag = encrypt_in_place(&key, &nonce, b"test", &mut buffer, b"");

    // Modify the tag to make authentication fail
    let mut bad_tag = tag;
    bad_tag[0] ^= 1;

    let result = decrypt_in_place(&key, &nonce, b"test", &mut buffer, b"", &bad_tag);

    assert_eq!(result, Err(Error::AuthenticationFailed));
    assert_eq!(buffer, [0u8; 12], "Unauthenticated plaintext must be erased");
}

#[test]
fn test_tamper_sensitivity() {
    let key = sequential_key();
    let nonce = descending_nonce();
    let header = counting(40);
    let payload = counting(150);
    let trailer = counting(30);
    let sealed = seal(&key, &nonce, &header, &payload, &trailer);

    // Every bit of the ciphertext and tag.
    for bit in 0..sealed.len() * 8 {
        let mut tampered = sealed.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert_eq!(
            open(&key, &nonce, &header, &tampered, &trailer),
            Err(Error::AuthenticationFailed),
            "ciphertext bit {bit}"
        );
    }

    for bit in 0..header.len() * 8 {
        let mut tampered = header.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert!(open(&key, &nonce, &tampered, &sealed, &trailer).is_err(), "header bit {bit}");
    }

    for bit in 0..trailer.len() * 8 {
        let mut tampered = trailer.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert!(open(&key, &nonce, &header, &sealed, &tampered).is_err(), "trailer bit {bit}");
    }

    for bit in 0..KEY_SIZE * 8 {
        let mut tampered = key;
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert!(open(&tampered, &nonce, &header, &sealed, &trailer).is_err(), "key bit {bit}");
    }

    for bit in 0..NONCE_SIZE * 8 {
        let mut tampered = nonce;
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert!(open(&key, &tampered, &header, &sealed, &trailer).is_err(), "nonce bit {bit}");
    }
}

#[test]
fn test_truncated_and_extended_ciphertext_fail() {
    let key = [5u8; KEY_SIZE];
    let nonce = [6u8; NONCE_SIZE];
    let sealed = seal(&key, &nonce, b"", b"some payload", b"");

    assert!(open(&key, &nonce, b"", &sealed[1..], b"").is_err());
    assert!(open(&key, &nonce, b"", &sealed[..sealed.len() - 1], b"").is_err());

    let mut extended = sealed.clone();
    extended.push(0);
    assert!(open(&key, &nonce, b"", &extended, b"").is_err());
}

#[test]
fn test_deterministic() {
    let key = [9u8; KEY_SIZE];
    let nonce = [10u8; NONCE_SIZE];
    let payload = counting(300);

    let first = seal(&key, &nonce, b"header", &payload, b"trailer");
    let second = seal(&key, &nonce, b"header", &payload, b"trailer");
    assert_eq!(first, second);
}

#[test]
fn test_header_and_trailer_are_separated() {
    let key = [11u8; KEY_SIZE];
    let nonce = [12u8; NONCE_SIZE];

    let as_header = seal(&key, &nonce, b"associated", b"", b"");
    let as_trailer = seal(&key, &nonce, b"", b"", b"associated");
    let as_payload_prefix = seal(&key, &nonce, b"", b"associated", b"");

    assert_ne!(as_header, as_trailer);
    assert_ne!(&as_header[..], &as_payload_prefix[10..]);
}

#[test]
fn test_empty_associated_data_is_not_absorbed() {
    let key = sequential_key();
    let nonce = descending_nonce();

    // Empty data leaves the state untouched.
    let fresh = initialize::<4>(&key, &nonce);
    let mut state = fresh.clone();
    absorb::<4>(&mut state, &[], Domain::Header);
    assert_eq!(state.words(), fresh.words());

    // Absorbing a padding-only block instead yields a different tag.
    let mut skipped = fresh.clone();
    absorb::<4>(&mut skipped, &[], Domain::Header);
    let mut padded = fresh;
    absorb_block::<4>(&mut padded, pad(&[]).as_slice(), Domain::Header);

    assert_ne!(finalize::<4>(&mut skipped), finalize::<4>(&mut padded));
}

#[test]
fn test_absorb_leaves_capacity_to_permutation() {
    let key = sequential_key();
    let nonce = descending_nonce();
    let block = [0xA5u8; RATE];

    let mut absorbed = initialize::<4>(&key, &nonce);
    absorb_block::<4>(&mut absorbed, &block, Domain::Header);

    let mut permuted = initialize::<4>(&key, &nonce);
    inject_domain(&mut permuted, Domain::Header);
    permute::<4>(&mut permuted);

    assert_eq!(absorbed.words()[RATE_WORDS..], permuted.words()[RATE_WORDS..]);
    assert_ne!(absorbed.words()[..RATE_WORDS], permuted.words()[..RATE_WORDS]);
}

#[test]
fn test_padding() {
    let block = pad(&[0xAA, 0xBB]);
    assert_eq!(&block[..3], &[0xAA, 0xBB, PAD_START]);
    assert!(block[3..RATE - 1].iter().all(|&b| b == 0));
    assert_eq!(block[RATE - 1], PAD_END);

    // Both markers share the last byte when one byte of room is left.
    let block = pad(&[0u8; RATE - 1]);
    assert_eq!(block[RATE - 1], PAD_START | PAD_END);

    let block = pad(&[]);
    assert_eq!(block[0], PAD_START);
}

#[test]
fn test_domain_tags() {
    let tags = [
        Domain::Header,
        Domain::Payload,
        Domain::Trailer,
        Domain::Final,
        Domain::Branch,
        Domain::Merge,
    ];
    for (i, tag) in tags.into_iter().enumerate() {
        assert_eq!(tag as u64, 1 << i);
    }
}

#[test]
fn test_verify() {
    let tag: Tag = core::array::from_fn(|i| (i * 7) as u8);
    assert!(verify(&tag, &tag));

    for position in 0..TAG_SIZE {
        for flip in [0x01u8, 0x80, 0xFF] {
            let mut other = tag;
            other[position] ^= flip;
            assert!(!verify(&tag, &other), "byte {position}, flip {flip:#04x}");
        }
    }
}

#[test]
fn test_verify_scans_every_byte() {
    let tag = [0x5Au8; TAG_SIZE];

    for position in 0..TAG_SIZE {
        let mut other = tag;
        other[position] ^= 1;

        let mut visited = 0;
        let difference = accumulate_difference(
            tag.iter()
                .copied()
                .zip(other.iter().copied())
                .inspect(|_| visited += 1),
        );

        assert_eq!(visited, TAG_SIZE, "mismatch at byte {position}");
        assert_eq!(difference, 1);
    }
}

#[test]
fn test_open_rejects_short_input() {
    let key = [1u8; KEY_SIZE];
    let nonce = [2u8; NONCE_SIZE];

    for len in [0, 1, TAG_SIZE - 1] {
        let input = vec![0u8; len];
        assert_eq!(open(&key, &nonce, b"", &input, b""), Err(Error::MalformedInput));

        let mut out = [0u8; 64];
        assert_eq!(
            open_into(&key, &nonce, b"", &input, b"", &mut out),
            Err(Error::MalformedInput)
        );
    }

    // A bare tag is well-formed; it simply fails to authenticate.
    let input = [0u8; TAG_SIZE];
    assert_eq!(open(&key, &nonce, b"", &input, b""), Err(Error::AuthenticationFailed));
}

#[test]
fn test_slice_api() {
    let key = [3u8; KEY_SIZE];
    let nonce = [4u8; NONCE_SIZE];
    let payload = counting(100);

    let mut sealed = [0u8; 100 + TAG_SIZE + 8];
    let written = seal_into(&key, &nonce, b"h", &payload, b"t", &mut sealed).unwrap();
    assert_eq!(written, 100 + TAG_SIZE);
    assert_eq!(&sealed[..written], &seal(&key, &nonce, b"h", &payload, b"t")[..]);

    let mut opened = [0xEEu8; 128];
    let len = open_into(&key, &nonce, b"h", &sealed[..written], b"t", &mut opened).unwrap();
    assert_eq!(&opened[..len], &payload[..]);

    let mut small = [0u8; 100 + TAG_SIZE - 1];
    assert_eq!(
        seal_into(&key, &nonce, b"h", &payload, b"t", &mut small),
        Err(Error::BufferTooSmall)
    );

    let mut small = [0u8; 99];
    assert_eq!(
        open_into(&key, &nonce, b"h", &sealed[..written], b"t", &mut small),
        Err(Error::BufferTooSmall)
    );

    // Failed authentication erases the payload region of the output.
    sealed[0] ^= 1;
    let mut out = [0xEEu8; 100];
    assert_eq!(
        open_into(&key, &nonce, b"h", &sealed[..written], b"t", &mut out),
        Err(Error::AuthenticationFailed)
    );
    assert_eq!(out, [0u8; 100]);
}

#[test]
fn test_slice_roundtrip_on_stack_buffers() {
    const MAX: usize = 2 * RATE + 1;
    let key = sequential_key();
    let nonce = descending_nonce();
    let payload: [u8; MAX] = core::array::from_fn(|i| i as u8);

    for len in boundary_lengths().filter(|len| *len <= MAX) {
        let mut sealed = [0u8; MAX + TAG_SIZE];
        let written =
            seal_into(&key, &nonce, b"h", &payload[..len], b"t", &mut sealed).unwrap();
        assert_eq!(written, len + TAG_SIZE, "length {len}");

        let mut opened = [0u8; MAX];
        let n = open_into(&key, &nonce, b"h", &sealed[..written], b"t", &mut opened).unwrap();
        assert_eq!(&opened[..n], &payload[..len], "length {len}");
    }
}
