use core::fmt;

/// Failure of a NORX operation.
///
/// Authentication failure is an ordinary outcome of [`decrypt_in_place`](crate::decrypt_in_place)
/// and [`open_into`](crate::open_into) and is kept distinct from malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The ciphertext is shorter than the authentication tag.
    MalformedInput,
    /// Authentication tag verification failed. Any decrypted output has been erased.
    AuthenticationFailed,
    /// The caller-supplied output buffer cannot hold the result.
    BufferTooSmall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedInput => f.write_str("ciphertext is shorter than the tag"),
            Error::AuthenticationFailed => f.write_str("authentication failed"),
            Error::BufferTooSmall => f.write_str("output buffer too small"),
        }
    }
}

impl core::error::Error for Error {}

impl From<Error> for aead::Error {
    fn from(_: Error) -> Self {
        aead::Error
    }
}
