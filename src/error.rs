// src/error.rs
//! Public error type for the entire crate

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Cipher-level failures: bad key/IV material, padding, framing
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("padding validation failed (wrong key, corrupted or truncated ciphertext)")]
    Padding,

    #[error("encrypted artifact too short to hold an IV and one block: {len} bytes")]
    TruncatedFrame { len: usize },

    #[error("key is not valid hex: {0}")]
    InvalidKeyHex(#[from] hex::FromHexError),

    #[error("decrypted bytes do not match the source artifact")]
    SelfCheckMismatch,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("crypto operation failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid upload name: {0:?}")]
    InvalidName(String),

    #[error("registry error: {0}")]
    Registry(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CoreError {
    pub(crate) fn storage(path: impl AsRef<Path>, source: io::Error) -> Self {
        CoreError::Storage {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Short taxonomy label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Storage { .. } => "storage",
            CoreError::Crypto(_) => "crypto",
            CoreError::NotFound(_) => "not_found",
            CoreError::InvalidName(_) => "invalid_name",
            CoreError::Registry(_) => "registry",
            CoreError::Config(_) => "config",
        }
    }
}
