// src/core/crypto.rs
//! Pure cryptographic primitives. No I/O, no database
//!
//! AES-128-CBC with PKCS#7 padding. Everything here works on in-memory
//! buffers. There is no authentication tag: CBC gives confidentiality only,
//! so tampering with an artifact is detected only when it happens to break
//! the padding. An authenticated codec can be plugged in through
//! [`CipherCodec`], at the cost of a different on-disk framing.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use crate::aliases::{Aes128CbcDec, Aes128CbcEnc, Iv};
use crate::consts::{BLOCK_SIZE, IV_LEN, KEY_LEN};
use crate::core::key::Key;
use crate::enums::EncryptionAlgorithm;
use crate::error::CryptoError;
use crate::CoreResult as Result;

/// Block-cipher capability used by the pipeline
pub trait CipherCodec: Send + Sync {
    fn algorithm(&self) -> EncryptionAlgorithm;

    /// Encrypt under a freshly generated IV; returns `(iv, ciphertext)`
    fn encrypt(&self, plaintext: &[u8], key: &Key) -> Result<(Iv, Vec<u8>)>;

    fn decrypt(&self, ciphertext: &[u8], key: &Key, iv: &[u8]) -> Result<Vec<u8>>;
}

/// The default codec: AES-128-CBC, PKCS#7
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes128Cbc;

impl CipherCodec for Aes128Cbc {
    fn algorithm(&self) -> EncryptionAlgorithm {
        EncryptionAlgorithm::Aes128Cbc
    }

    fn encrypt(&self, plaintext: &[u8], key: &Key) -> Result<(Iv, Vec<u8>)> {
        let iv = generate_iv();
        let ciphertext = encrypt_to_vec(plaintext, key.expose_secret(), &iv);
        Ok((iv, ciphertext))
    }

    fn decrypt(&self, ciphertext: &[u8], key: &Key, iv: &[u8]) -> Result<Vec<u8>> {
        decrypt_to_vec(ciphertext, key.expose_secret(), iv)
    }
}

/// Fresh random IV for a single encryption
pub fn generate_iv() -> Iv {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);
    iv
}

/// Deterministic given key + iv + plaintext.
/// Output length is the plaintext length rounded up to the next full block
/// (an exact multiple still gains one whole padding block).
pub fn encrypt_to_vec(plaintext: &[u8], key: &[u8; KEY_LEN], iv: &Iv) -> Vec<u8> {
    Aes128CbcEnc::new(&(*key).into(), &(*iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt and strip PKCS#7 padding
pub fn decrypt_to_vec(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        }
        .into());
    }
    if iv.len() != IV_LEN {
        return Err(CryptoError::InvalidIvLength {
            expected: IV_LEN,
            actual: iv.len(),
        }
        .into());
    }
    let cipher = Aes128CbcDec::new_from_slices(key, iv).map_err(|_| {
        CryptoError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        }
    })?;
    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Padding)?;
    Ok(plaintext)
}

/// Ciphertext length for a plaintext of `len` bytes
pub fn padded_len(len: usize) -> usize {
    (len / BLOCK_SIZE + 1) * BLOCK_SIZE
}

/// On-disk framing: `IV (16 bytes) ‖ ciphertext`
pub fn frame(iv: &Iv, ciphertext: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(ciphertext);
    out
}

/// Split an encrypted artifact into `(iv, ciphertext)`
pub fn split_frame(framed: &[u8]) -> Result<(&[u8], &[u8])> {
    // smallest valid artifact: IV plus one padding block
    if framed.len() < IV_LEN + BLOCK_SIZE {
        return Err(CryptoError::TruncatedFrame { len: framed.len() }.into());
    }
    Ok(framed.split_at(IV_LEN))
}
