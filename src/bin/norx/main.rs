//! # NORX test-vector tool
//!
//! Entry point for the `norx` binary. Parses CLI arguments, initializes
//! logging and runs one of:
//!
//! - `genkat`: print the NORX64-4-1 known-answer table
//! - `check`: regenerate the table, compare it with a reference and verify every round trip
//! - `debug`: dump the buffers of one seal/open cycle on the reference example

mod cli;
mod kat;
mod logging;

use anyhow::{Context, Result, bail};
use clap::Parser;
use norx_crypto::aead::KeyInit;
use norx_crypto::aead::generic_array::GenericArray;
use norx_crypto::{KEY_SIZE, NONCE_SIZE, NorxAead, open};

use cli::{CheckArgs, Commands, DebugArgs, GenkatArgs, NorxCli, Variant};

fn main() -> Result<()> {
    let cli = NorxCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Genkat(args) => genkat(args),
        Commands::Check(args) => check(args),
        Commands::Debug(args) => debug(args),
    }
}

fn genkat(args: GenkatArgs) -> Result<()> {
    let entries = kat::generate();
    let table = kat::render(&entries);

    match args.output {
        Some(path) => {
            std::fs::write(&path, &table)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), entries = entries.len(), "known-answer table written");
        }
        None => print!("{table}"),
    }

    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let reference = match &args.kat {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => kat::SHIPPED.to_string(),
    };
    let expected = kat::blocks(&reference);

    let entries = kat::generate();
    if expected.len() != entries.len() {
        bail!(
            "reference table has {} entries, expected {}",
            expected.len(),
            entries.len()
        );
    }

    for (entry, expected) in entries.iter().zip(&expected) {
        let actual = kat::blocks(&entry.render()).concat();
        if &actual != expected {
            tracing::error!(count = entry.count, "encrypt check failed");
            bail!("fail at encrypt check: {}", entry.count - 1);
        }

        let opened = open(&entry.key, &entry.nonce, &entry.header, &entry.sealed, &entry.trailer)
            .map_err(|err| anyhow::anyhow!("fail at decrypt check: {}: {err}", entry.count - 1))?;
        if opened != entry.payload {
            bail!("fail at msg check: {}", entry.count - 1);
        }

        tracing::debug!(count = entry.count, "entry ok");
    }

    tracing::info!(entries = entries.len(), "known-answer table verified");
    println!("ok");
    Ok(())
}

fn print_bytes(label: &str, bytes: &[u8]) {
    println!("{label}:");
    for line in bytes.chunks(16) {
        let hex: Vec<String> = line.iter().map(|b| format!("{b:02X}")).collect();
        println!("{}", hex.join(" "));
    }
}

/// Seal and open with the given instance, returning `ciphertext || tag` and the opened payload.
fn seal_open<const L: usize>(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    header: &[u8],
    payload: &[u8],
    trailer: &[u8],
) -> (Vec<u8>, Result<Vec<u8>, norx_crypto::Error>) {
    let cipher = NorxAead::<L>::new(&GenericArray::from(*key));
    let nonce = GenericArray::from(*nonce);

    let mut sealed = payload.to_vec();
    let tag = cipher.encrypt_in_place_with_trailer(&nonce, header, &mut sealed, trailer);

    let mut opened = sealed.clone();
    let result = cipher
        .decrypt_in_place_with_trailer(&nonce, header, &mut opened, trailer, &tag)
        .map(|()| opened);

    sealed.extend_from_slice(&tag);
    (sealed, result)
}

fn debug(args: DebugArgs) -> Result<()> {
    let key: [u8; KEY_SIZE] = std::array::from_fn(|i| i as u8);
    let nonce: [u8; NONCE_SIZE] = std::array::from_fn(|i| 0xF0 - 0x10 * i as u8);
    let header: Vec<u8> = (0..128).map(|i| (i & 0xFF) as u8).collect();
    let payload = header.clone();
    let trailer = header.clone();

    tracing::info!(variant = ?args.variant, "running reference example");

    println!("========== SETUP ==========");
    print_bytes("Key", &key);
    print_bytes("Nonce", &nonce);
    print_bytes("Header", &header);
    print_bytes("Message", &payload);
    print_bytes("Trailer", &trailer);

    let (sealed, opened) = match args.variant {
        Variant::Norx6441 => seal_open::<4>(&key, &nonce, &header, &payload, &trailer),
        Variant::Norx6461 => seal_open::<6>(&key, &nonce, &header, &payload, &trailer),
    };

    println!("========== ENCRYPTION ==========");
    print_bytes("Ciphertext + tag", &sealed);

    println!("========== DECRYPTION ==========");
    match &opened {
        Ok(message) => print_bytes("Decrypted message", message),
        Err(err) => println!("Decrypted message: <{err}>"),
    }
    println!("verify: {}", if opened.is_ok() { 0 } else { -1 });

    if opened.as_deref() != Ok(payload.as_slice()) {
        bail!("reference example did not round-trip");
    }
    Ok(())
}

