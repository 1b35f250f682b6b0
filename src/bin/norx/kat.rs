//! Known-answer table of NORX64-4-1.
//!
//! For every length `i` in `0..256` the table seals the first `i` bytes of
//! a fixed message under the first `i` bytes of a fixed header, with an
//! empty trailer. All inputs are affine byte sequences, so the table can be
//! regenerated anywhere.

use norx_crypto::{KEY_SIZE, NONCE_SIZE, seal};

/// Number of entries in the table.
pub const ENTRIES: usize = 256;

/// The table shipped at the crate root.
pub const SHIPPED: &str = include_str!("../../../NORX64_4_1_KAT.txt");

/// One row of the table.
pub struct Entry {
    pub count: usize,
    pub key: [u8; KEY_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    pub header: Vec<u8>,
    pub payload: Vec<u8>,
    pub trailer: Vec<u8>,
    pub sealed: Vec<u8>,
}

impl Entry {
    /// Render in the `Count = / Key = / ...` text format.
    pub fn render(&self) -> String {
        format!(
            "Count = {}\nKey = {}\nNonce = {}\nPT = {}\nAD = {}\nTR = {}\nCT = {}\n",
            self.count,
            hex::encode_upper(self.key),
            hex::encode_upper(self.nonce),
            hex::encode_upper(&self.payload),
            hex::encode_upper(&self.header),
            hex::encode_upper(&self.trailer),
            hex::encode_upper(&self.sealed),
        )
    }
}

fn affine<const N: usize>(multiplier: usize) -> [u8; N] {
    std::array::from_fn(|i| (i * multiplier + 123) as u8)
}

/// Generate the full table.
pub fn generate() -> Vec<Entry> {
    let message: [u8; ENTRIES] = affine(197);
    let header: [u8; ENTRIES] = affine(193);
    let key: [u8; KEY_SIZE] = affine(191);
    let nonce: [u8; NONCE_SIZE] = affine(181);

    (0..ENTRIES)
        .map(|i| {
            let sealed = seal(&key, &nonce, &header[..i], &message[..i], &[]);
            Entry {
                count: i + 1,
                key,
                nonce,
                header: header[..i].to_vec(),
                payload: message[..i].to_vec(),
                trailer: Vec::new(),
                sealed,
            }
        })
        .collect()
}

/// Render the whole table, one blank line after each entry.
pub fn render(entries: &[Entry]) -> String {
    entries.iter().map(|entry| entry.render() + "\n").collect()
}

/// Split a table file into entry blocks, normalized for comparison.
pub fn blocks(table: &str) -> Vec<String> {
    table
        .split("\n\n")
        .map(|block| {
            block
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|block| !block.is_empty())
        .collect()
}
