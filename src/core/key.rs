// src/core/key.rs
//! Key generation and hex representation
//!
//! Every ingested image gets its own freshly drawn 128-bit key.
//! Keys are never derived from user input and never reused.

use std::fmt;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::consts::KEY_LEN;
use crate::error::CryptoError;

/// 128-bit AES key; zeroized on drop, redacted in `Debug`
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Key(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Key(arr))
    }

    /// Parse the fixed-width (32 char) hex form stored in the registry
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let mut bytes = hex::decode(hex_str)?;
        let key = Key::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    pub fn expose_secret(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Lowercase hex, always `2 * KEY_LEN` characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key([REDACTED])")
    }
}

/// Source of fresh symmetric keys
pub trait KeySource: Send + Sync {
    fn new_key(&self) -> Key;
}

/// Draws keys from the thread-local CSPRNG (reseeded from the OS).
///
/// The RNG panics if the operating system cannot supply entropy; there is
/// no safe way to continue in that case.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsKeySource;

impl KeySource for OsKeySource {
    fn new_key(&self) -> Key {
        generate_key()
    }
}

/// Generate a new random 128-bit key
#[inline]
pub fn generate_key() -> Key {
    let mut bytes = [0u8; KEY_LEN];
    rand::rng().fill_bytes(&mut bytes);
    let key = Key(bytes);
    bytes.zeroize();
    key
}
