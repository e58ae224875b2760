// src/consts.rs
//! Shared constants: cipher parameters, on-disk layout, defaults

/// AES-128 key length in bytes
pub const KEY_LEN: usize = 16;

/// CBC initialization vector length in bytes (one AES block)
pub const IV_LEN: usize = 16;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Suffix appended to the upload name for encrypted artifacts
pub const ENCRYPTED_SUFFIX: &str = ".enc";

// Area names match the archived layout: uploads/, encrypted/, decrypt/
pub const DEFAULT_SOURCE_DIR: &str = "uploads";
pub const DEFAULT_ENCRYPTED_DIR: &str = "encrypted";
pub const DEFAULT_DECRYPTED_DIR: &str = "decrypt";

/// Default directory holding the three artifact areas
pub const DEFAULT_ARTIFACT_ROOT: &str = "data";

/// Default SQLite registry file
pub const DEFAULT_REGISTRY_DB: &str = "data/images.db";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3030;

/// Default upload size limit (20 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Config file consulted when `IMAGE_VAULT_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "image-vault.toml";

// Environment variables
pub const ENV_CONFIG: &str = "IMAGE_VAULT_CONFIG";
pub const ENV_ROOT: &str = "IMAGE_VAULT_ROOT";
pub const ENV_DB: &str = "IMAGE_VAULT_DB";
pub const ENV_PORT: &str = "IMAGE_VAULT_PORT";
