//! Error types.

use core::fmt;

/// Validation failure on a key, IV or ciphertext buffer.
///
/// Every failure is returned as a value; the cipher never panics on malformed
/// input and never attempts recovery. Note that decrypting with the wrong key
/// is *not* an error: raw Blowfish carries no integrity check, so a wrong key
/// silently yields garbage plaintext.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The secret key is not between 4 and 56 bytes long.
    InvalidKeyLength,
    /// The CBC initialization vector is not exactly 8 bytes long.
    InvalidIvLength,
    /// The buffer passed to decryption is not a multiple of the 8 byte block
    /// size.
    InvalidBlockLength,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeyLength => f.write_str("key length must be between 4 and 56 bytes"),
            Error::InvalidIvLength => f.write_str("IV length must be exactly 8 bytes"),
            Error::InvalidBlockLength => {
                f.write_str("buffer length is not a multiple of the cipher block size")
            }
        }
    }
}

impl core::error::Error for Error {}
