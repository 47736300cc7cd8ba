//! Whole-buffer ECB and CBC operations built on the block primitive.
//!
//! Plaintext buffers are padded on the right with zero bytes to the next
//! multiple of [`BLOCK_SIZE`]. The padding is lossy: decryption returns the
//! padded plaintext and does not strip trailing NUL bytes, since it cannot
//! tell padding apart from plaintext that legitimately ends in zeros.

use alloc::vec::Vec;

use crate::{BLOCK_SIZE, Blowfish, Error, IV_SIZE, read_words, write_words};

/// Length of `len` bytes of input once zero-padded to a whole block count.
#[inline]
fn padded_len(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Reads a block that may be the short tail of a buffer, zero-padding it.
#[inline]
fn read_words_padded(chunk: &[u8]) -> (u32, u32) {
    if chunk.len() == BLOCK_SIZE {
        read_words(chunk)
    } else {
        let mut block = [0u8; BLOCK_SIZE];
        block[..chunk.len()].copy_from_slice(chunk);
        read_words(&block)
    }
}

#[inline]
fn push_words(out: &mut Vec<u8>, xl: u32, xr: u32) {
    let mut block = [0u8; BLOCK_SIZE];
    write_words(&mut block, xl, xr);
    out.extend_from_slice(&block);
}

fn check_iv(iv: &[u8]) -> Result<(u32, u32), Error> {
    if iv.len() != IV_SIZE {
        return Err(Error::InvalidIvLength);
    }
    Ok(read_words(iv))
}

impl Blowfish {
    /// Encrypts `plaintext` in electronic codebook mode.
    ///
    /// The input is zero-padded to a multiple of [`BLOCK_SIZE`] and each
    /// block is enciphered independently, so the output length is a multiple
    /// of 8 and at least the input length. Always succeeds.
    pub fn encrypt_ecb(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(padded_len(plaintext.len()));
        for chunk in plaintext.chunks(BLOCK_SIZE) {
            let (xl, xr) = read_words_padded(chunk);
            let (xl, xr) = self.encipher(xl, xr);
            push_words(&mut out, xl, xr);
        }
        out
    }

    /// Decrypts `ciphertext` in electronic codebook mode.
    ///
    /// The input length must be a multiple of [`BLOCK_SIZE`]. Any zero
    /// padding appended by encryption is left in place.
    pub fn decrypt_ecb(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(Error::InvalidBlockLength);
        }
        let mut out = Vec::with_capacity(ciphertext.len());
        for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
            let (xl, xr) = read_words(chunk);
            let (xl, xr) = self.decipher(xl, xr);
            push_words(&mut out, xl, xr);
        }
        Ok(out)
    }

    /// Encrypts `plaintext` in cipher block chaining mode under `iv`.
    ///
    /// `iv` must be exactly [`IV_SIZE`] bytes. The first block is XORed with
    /// the IV and every following block with the previous ciphertext block
    /// before enciphering. Chaining is explicit per call: no chain block is
    /// retained, so to continue a chain across calls pass the last ciphertext
    /// block of the previous call as the next IV.
    pub fn encrypt_cbc(&self, plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>, Error> {
        let (mut cl, mut cr) = check_iv(iv)?;
        let mut out = Vec::with_capacity(padded_len(plaintext.len()));
        for chunk in plaintext.chunks(BLOCK_SIZE) {
            let (xl, xr) = read_words_padded(chunk);
            (cl, cr) = self.encipher(xl ^ cl, xr ^ cr);
            push_words(&mut out, cl, cr);
        }
        Ok(out)
    }

    /// Decrypts `ciphertext` in cipher block chaining mode under `iv`.
    ///
    /// `iv` must be exactly [`IV_SIZE`] bytes and the input length a multiple
    /// of [`BLOCK_SIZE`].
    pub fn decrypt_cbc(&self, ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>, Error> {
        let (mut cl, mut cr) = check_iv(iv)?;
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(Error::InvalidBlockLength);
        }
        let mut out = Vec::with_capacity(ciphertext.len());
        for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
            let (xl, xr) = read_words(chunk);
            let (pl, pr) = self.decipher(xl, xr);
            push_words(&mut out, pl ^ cl, pr ^ cr);
            (cl, cr) = (xl, xr);
        }
        Ok(out)
    }
}
