// src/lib.rs
//! encrypted-image-vault: encrypt uploaded images at rest, serve them back
//!
//! Features:
//! - Fresh AES-128 key per image, fresh IV per encryption (CBC, PKCS#7)
//! - Encrypted artifacts framed as `IV ‖ ciphertext`
//! - Source, encrypted and decrypted copies kept per record
//! - SQLite record registry holding paths and the hex key
//! - Optional HTTP surface (`server` feature)
//!
//! CBC provides confidentiality only. There is no authentication tag and
//! keys are stored in plain hex next to the record.

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod db;
pub mod enums;
pub mod error;
#[cfg(feature = "server")]
pub mod http;
pub mod pipeline;

// Re-export everything users need at the crate root
pub use config::load as load_config;
pub use crate::core::{
    generate_key, Aes128Cbc, ArtifactStore, CipherCodec, Key, KeySource, OsKeySource,
};
pub use db::{ImageRecord, MemoryRegistry, NewImageRecord, RecordRegistry, SqliteRegistry};
pub use enums::{ArtifactKind, IngestStage, NamingPolicy};
pub use error::{CoreError, CryptoError};
pub use pipeline::{EncryptionPipeline, ImagePreview, RecoveredImage};

pub type CoreResult<T> = std::result::Result<T, CoreError>;
