// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Artifact kinds, the ingestion state machine, naming policy
//! and the cipher identifier.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported encryption algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum EncryptionAlgorithm {
    #[default]
    Aes128Cbc,
    // Future (changes framing, adds a tag):
    // Aes128Gcm,
}

/// The three physical copies kept per image record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Source,
    Encrypted,
    Decrypted,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Source => "source",
            ArtifactKind::Encrypted => "encrypted",
            ArtifactKind::Decrypted => "decrypted",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ingestion progress. `Registered` is the only successful terminal state;
/// any failure ends the ingestion at whatever stage it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestStage {
    Received,
    SourceStored,
    KeyGenerated,
    Encrypted,
    EncryptedStored,
    Decrypted,
    DecryptedStored,
    Registered,
}

impl IngestStage {
    pub fn as_str(self) -> &'static str {
        match self {
            IngestStage::Received => "received",
            IngestStage::SourceStored => "source_stored",
            IngestStage::KeyGenerated => "key_generated",
            IngestStage::Encrypted => "encrypted",
            IngestStage::EncryptedStored => "encrypted_stored",
            IngestStage::Decrypted => "decrypted",
            IngestStage::DecryptedStored => "decrypted_stored",
            IngestStage::Registered => "registered",
        }
    }
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an upload name becomes the artifact file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NamingPolicy {
    /// Use the upload name as-is; a repeated name overwrites earlier artifacts
    #[default]
    Original,
    /// Prefix with a UTC timestamp so repeated names never collide
    Timestamped,
}

impl NamingPolicy {
    pub fn apply(self, name: &str, now: DateTime<Utc>) -> String {
        match self {
            NamingPolicy::Original => name.to_owned(),
            NamingPolicy::Timestamped => {
                format!("{}-{name}", now.format("%Y%m%dT%H%M%S%.6fZ"))
            }
        }
    }
}
