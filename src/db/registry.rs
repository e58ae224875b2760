// src/db/registry.rs
//! The record registry contract
//!
//! A record ties an id to its three artifact paths and the hex key. Records
//! are created once, fully populated, and never updated.

use std::path::PathBuf;
use std::sync::Arc;

use crate::CoreResult as Result;

/// A registered image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: i64,
    pub source_path: PathBuf,
    pub encrypted_path: PathBuf,
    pub key_hex: String,
    pub decrypted_path: PathBuf,
    pub created_at: String,
}

/// The four fields handed to the registry plus the creation stamp; the id is
/// assigned on insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageRecord {
    pub source_path: PathBuf,
    pub encrypted_path: PathBuf,
    pub key_hex: String,
    pub decrypted_path: PathBuf,
    /// `YYYY-MM-DD HH:MM:SS` UTC, stored verbatim
    pub created_at: String,
}

impl NewImageRecord {
    /// Stamp the fields with the current UTC time
    pub fn new(
        source_path: PathBuf,
        encrypted_path: PathBuf,
        key_hex: String,
        decrypted_path: PathBuf,
    ) -> Self {
        Self {
            source_path,
            encrypted_path,
            key_hex,
            decrypted_path,
            created_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn into_record(self, id: i64) -> ImageRecord {
        ImageRecord {
            id,
            source_path: self.source_path,
            encrypted_path: self.encrypted_path,
            key_hex: self.key_hex,
            decrypted_path: self.decrypted_path,
            created_at: self.created_at,
        }
    }
}

/// Durable metadata store keyed by record id
pub trait RecordRegistry: Send + Sync {
    /// Persist a complete record and return its freshly assigned id
    fn insert(&self, record: &NewImageRecord) -> Result<i64>;

    fn lookup(&self, id: i64) -> Result<Option<ImageRecord>>;

    /// All records, ascending by id
    fn list(&self) -> Result<Vec<ImageRecord>>;
}

impl<T: RecordRegistry + ?Sized> RecordRegistry for Arc<T> {
    fn insert(&self, record: &NewImageRecord) -> Result<i64> {
        (**self).insert(record)
    }

    fn lookup(&self, id: i64) -> Result<Option<ImageRecord>> {
        (**self).lookup(id)
    }

    fn list(&self) -> Result<Vec<ImageRecord>> {
        (**self).list()
    }
}
