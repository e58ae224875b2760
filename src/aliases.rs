// src/aliases.rs
//! Concrete cipher types and fixed-size buffers used throughout the crate

use crate::consts::IV_LEN;

/// AES-128 in CBC mode, encrypt direction
pub type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

/// AES-128 in CBC mode, decrypt direction
pub type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Initialization vector. Not secret; stored as the artifact prefix
pub type Iv = [u8; IV_LEN];
