//! Implementation of the [Blowfish] block cipher.
//!
//! Blowfish is a 16-round Feistel cipher with a 64-bit block and a key of
//! 4 to 56 bytes. This crate provides the raw block primitive through the
//! traits of the re-exported [`cipher`] crate, plus whole-buffer [ECB and
//! CBC helpers](#buffer-modes) with zero padding.
//!
//! # ⚠️ Security Warning: Hazmat!
//!
//! This crate does not ensure ciphertexts are authentic! Decrypting with the
//! wrong key silently produces garbage instead of an error, which can lead
//! to serious vulnerabilities!
//!
//! USE AT YOUR OWN RISK!
//!
//! # Example
//! ```
//! use blowfish::Blowfish;
//! use hex_literal::hex;
//!
//! let cipher = Blowfish::new(&hex!("0123456789ABCDEFF0E1D2C3B4A59687")).unwrap();
//!
//! let ciphertext = cipher
//!     .encrypt_cbc(b"7654321 Now is the time for ", &hex!("FEDCBA9876543210"))
//!     .unwrap();
//! assert_eq!(
//!     ciphertext,
//!     hex!(
//!         "6B77B4D63006DEE605B156E274039793"
//!         "58DEB9E7154616D959F1652BD5FF92CC"
//!     )
//! );
//!
//! // Zero padding is lossy: the four NUL bytes appended before encryption
//! // come back as part of the plaintext.
//! let plaintext = cipher
//!     .decrypt_cbc(&ciphertext, &hex!("FEDCBA9876543210"))
//!     .unwrap();
//! assert_eq!(plaintext, b"7654321 Now is the time for \0\0\0\0");
//! ```
//!
//! # Buffer modes
//!
//! [`Blowfish::encrypt_ecb`], [`Blowfish::decrypt_ecb`],
//! [`Blowfish::encrypt_cbc`] and [`Blowfish::decrypt_cbc`] operate on byte
//! buffers of arbitrary length, padding the final block with zero bytes.
//! They require the `alloc` feature (enabled by default).
//!
//! [Blowfish]: https://www.schneier.com/academic/blowfish/

#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub use cipher;

use cipher::{
    AlgorithmName, Block, BlockBackend, BlockCipher, BlockClosure, BlockDecrypt, BlockEncrypt,
    BlockSizeUser, InvalidLength, Key, KeyInit, KeySizeUser, ParBlocksSizeUser,
    consts::{U1, U8, U56},
    inout::InOut,
};

use core::fmt;

#[cfg(feature = "zeroize")]
use cipher::zeroize::{Zeroize, ZeroizeOnDrop};

mod consts;
mod errors;
#[cfg(feature = "alloc")]
mod modes;

pub use errors::Error;

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 8;
/// Initialization vector size in bytes (CBC mode only).
pub const IV_SIZE: usize = 8;
/// Minimum secret key size in bytes.
pub const MIN_KEY_SIZE: usize = 4;
/// Maximum secret key size in bytes.
pub const MAX_KEY_SIZE: usize = 56;

const ROUNDS: usize = 16;

/// Copy of the key the current schedule was derived from.
///
/// Replaces the process-wide `static $keyHash` memoization of the historical
/// implementation: the memo lives in the instance it belongs to, so two
/// independently keyed ciphers can never observe each other's state.
#[derive(Clone)]
struct KeyFingerprint {
    bytes: [u8; MAX_KEY_SIZE],
    len: usize,
}

impl KeyFingerprint {
    fn record(key: &[u8]) -> Self {
        let mut bytes = [0u8; MAX_KEY_SIZE];
        bytes[..key.len()].copy_from_slice(key);
        Self {
            bytes,
            len: key.len(),
        }
    }

    fn matches(&self, key: &[u8]) -> bool {
        self.bytes[..self.len] == *key
    }
}

/// The Blowfish block cipher keyed with a specific secret key.
///
/// Holds the derived subkey state: the 18-word P-array and the four 256-word
/// S-boxes. The state is immutable between [`Blowfish::set_key`] calls;
/// encryption and decryption only read it. A single instance is not safe for
/// concurrent use from multiple threads without external synchronization —
/// re-keying takes `&mut self`, so the borrow checker enforces the
/// single-writer contract, and `Clone` gives each thread its own schedule.
#[derive(Clone)]
pub struct Blowfish {
    p: [u32; 2 + ROUNDS],
    s: [[u32; 256]; 4],
    fingerprint: KeyFingerprint,
}

/// Reads the next big-endian key word, cycling back to the start of the key
/// when it runs out of bytes.
fn next_u32_wrap(key: &[u8], pos: &mut usize) -> u32 {
    let mut word = 0;
    for _ in 0..4 {
        word = word << 8 | u32::from(key[*pos]);
        *pos = (*pos + 1) % key.len();
    }
    word
}

#[inline]
fn read_words(block: &[u8]) -> (u32, u32) {
    let xl = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
    let xr = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);
    (xl, xr)
}

#[inline]
fn write_words(block: &mut [u8], xl: u32, xr: u32) {
    block[..4].copy_from_slice(&xl.to_be_bytes());
    block[4..BLOCK_SIZE].copy_from_slice(&xr.to_be_bytes());
}

impl Blowfish {
    /// Creates a cipher instance by deriving the subkey schedule from `key`.
    ///
    /// The key may be any length in `MIN_KEY_SIZE..=MAX_KEY_SIZE` bytes.
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        if key.len() < MIN_KEY_SIZE || key.len() > MAX_KEY_SIZE {
            return Err(Error::InvalidKeyLength);
        }
        let mut cipher = Self {
            p: consts::P_INIT,
            s: consts::S_INIT,
            fingerprint: KeyFingerprint::record(key),
        };
        cipher.expand_key(key);
        Ok(cipher)
    }

    /// Re-derives the subkey schedule from `key` in place.
    ///
    /// If `key` is identical to the key this instance is already keyed with,
    /// the derivation is skipped and the call is a cheap no-op. The memo is
    /// per instance; use [`Blowfish::new`] for an unconditional derivation.
    ///
    /// CBC chaining state cannot be left dangling by a re-key: the IV is an
    /// explicit argument of every CBC call and no chain block is retained
    /// across calls.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), Error> {
        if key.len() < MIN_KEY_SIZE || key.len() > MAX_KEY_SIZE {
            return Err(Error::InvalidKeyLength);
        }
        if self.fingerprint.matches(key) {
            return Ok(());
        }
        self.p = consts::P_INIT;
        self.s = consts::S_INIT;
        self.expand_key(key);
        self.fingerprint = KeyFingerprint::record(key);
        Ok(())
    }

    /// Key schedule: fold the key into the P-array, then replace every P and
    /// S word with the output of enciphering an evolving all-zero block under
    /// the evolving state.
    fn expand_key(&mut self, key: &[u8]) {
        let mut pos = 0;
        for word in self.p.iter_mut() {
            *word ^= next_u32_wrap(key, &mut pos);
        }
        let mut lr = (0u32, 0u32);
        for i in 0..(2 + ROUNDS) / 2 {
            lr = self.encipher(lr.0, lr.1);
            self.p[2 * i] = lr.0;
            self.p[2 * i + 1] = lr.1;
        }
        for sbox in 0..4 {
            for i in 0..128 {
                lr = self.encipher(lr.0, lr.1);
                self.s[sbox][2 * i] = lr.0;
                self.s[sbox][2 * i + 1] = lr.1;
            }
        }
    }

    /// The Feistel round function F.
    #[inline]
    fn round_function(&self, x: u32) -> u32 {
        let a = self.s[0][(x >> 24) as usize];
        let b = self.s[1][((x >> 16) & 0xff) as usize];
        let c = self.s[2][((x >> 8) & 0xff) as usize];
        let d = self.s[3][(x & 0xff) as usize];
        (a.wrapping_add(b) ^ c).wrapping_add(d)
    }

    /// Enciphers a single 64-bit block given as two big-endian word halves.
    ///
    /// Pure function of the current schedule; any input is legal.
    #[inline]
    pub fn encipher(&self, mut xl: u32, mut xr: u32) -> (u32, u32) {
        for i in 0..ROUNDS {
            let temp = xl ^ self.p[i];
            xl = self.round_function(temp) ^ xr;
            xr = temp;
        }
        (xr ^ self.p[17], xl ^ self.p[16])
    }

    /// Deciphers a single 64-bit block; the exact inverse of
    /// [`Blowfish::encipher`].
    #[inline]
    pub fn decipher(&self, mut xl: u32, mut xr: u32) -> (u32, u32) {
        for i in (2..2 + ROUNDS).rev() {
            let temp = xl ^ self.p[i];
            xl = self.round_function(temp) ^ xr;
            xr = temp;
        }
        (xr ^ self.p[0], xl ^ self.p[1])
    }
}

impl KeySizeUser for Blowfish {
    type KeySize = U56;
}

impl KeyInit for Blowfish {
    fn new(key: &Key<Self>) -> Self {
        // 56 bytes is always a valid key length.
        Self::new_from_slice(key.as_slice()).unwrap()
    }

    fn new_from_slice(key: &[u8]) -> Result<Self, InvalidLength> {
        Blowfish::new(key).map_err(|_| InvalidLength)
    }
}

impl BlockSizeUser for Blowfish {
    type BlockSize = U8;
}

impl BlockCipher for Blowfish {}

impl BlockEncrypt for Blowfish {
    fn encrypt_with_backend(&self, f: impl BlockClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut EncBackend(self))
    }
}

impl BlockDecrypt for Blowfish {
    fn decrypt_with_backend(&self, f: impl BlockClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut DecBackend(self))
    }
}

impl AlgorithmName for Blowfish {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Blowfish")
    }
}

impl fmt::Debug for Blowfish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Blowfish { ... }")
    }
}

struct EncBackend<'a>(&'a Blowfish);

impl BlockSizeUser for EncBackend<'_> {
    type BlockSize = U8;
}

impl ParBlocksSizeUser for EncBackend<'_> {
    type ParBlocksSize = U1;
}

impl BlockBackend for EncBackend<'_> {
    #[inline(always)]
    fn proc_block(&mut self, mut block: InOut<'_, '_, Block<Self>>) {
        let (xl, xr) = read_words(block.get_in());
        let (xl, xr) = self.0.encipher(xl, xr);
        write_words(block.get_out(), xl, xr);
    }
}

struct DecBackend<'a>(&'a Blowfish);

impl BlockSizeUser for DecBackend<'_> {
    type BlockSize = U8;
}

impl ParBlocksSizeUser for DecBackend<'_> {
    type ParBlocksSize = U1;
}

impl BlockBackend for DecBackend<'_> {
    #[inline(always)]
    fn proc_block(&mut self, mut block: InOut<'_, '_, Block<Self>>) {
        let (xl, xr) = read_words(block.get_in());
        let (xl, xr) = self.0.decipher(xl, xr);
        write_words(block.get_out(), xl, xr);
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for Blowfish {
    fn zeroize(&mut self) {
        self.p.zeroize();
        self.s.zeroize();
        self.fingerprint.bytes.zeroize();
        self.fingerprint.len.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl Drop for Blowfish {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for Blowfish {}
