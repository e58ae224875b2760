// src/pipeline.rs
//! Ingestion and retrieval workflows
//!
//! Ingestion walks a fixed sequence of stages (see [`IngestStage`]) and stops
//! at the first failure. The registry insert is the last step, so a record
//! exists only for ingestions that wrote all three artifacts. Files written
//! before a failure are left behind as orphans; nothing references them.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::core::crypto::{frame, split_frame, Aes128Cbc, CipherCodec};
use crate::core::key::{Key, KeySource, OsKeySource};
use crate::core::store::{sanitize_name, ArtifactStore};
use crate::db::registry::{ImageRecord, NewImageRecord, RecordRegistry};
use crate::enums::{ArtifactKind, IngestStage, NamingPolicy};
use crate::error::{CoreError, CryptoError};
use crate::CoreResult as Result;

/// One entry of the listing: the id and the base64 of the source artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePreview {
    pub id: i64,
    pub data: String,
}

/// Decrypted artifact bytes plus the file name to offer for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct EncryptionPipeline<R> {
    store: ArtifactStore,
    registry: R,
    codec: Box<dyn CipherCodec>,
    keys: Box<dyn KeySource>,
    naming: NamingPolicy,
}

impl<R: RecordRegistry> EncryptionPipeline<R> {
    /// AES-128-CBC codec, OS-seeded keys, upload names kept as-is
    pub fn new(store: ArtifactStore, registry: R) -> Self {
        Self {
            store,
            registry,
            codec: Box::new(Aes128Cbc),
            keys: Box::new(OsKeySource),
            naming: NamingPolicy::default(),
        }
    }

    pub fn from_config(config: &Config, registry: R) -> Self {
        Self::new(ArtifactStore::from_config(config), registry)
            .with_naming(config.storage.naming)
    }

    pub fn with_codec(mut self, codec: impl CipherCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn with_key_source(mut self, keys: impl KeySource + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Encrypt and persist an upload, then register it.
    ///
    /// Returns the registered record. On error no record has been created.
    pub fn ingest(&self, upload_name: &str, payload: &[u8]) -> Result<ImageRecord> {
        let name = self
            .naming
            .apply(&sanitize_name(upload_name)?, chrono::Utc::now());

        let mut stage = IngestStage::Received;
        let result = self.run_ingest(&name, payload, &mut stage);

        match &result {
            Ok(record) => info!(
                id = record.id,
                name = %name,
                len = payload.len(),
                algorithm = ?self.codec.algorithm(),
                encrypted = %record.encrypted_path.display(),
                "image ingested"
            ),
            Err(e) => warn!(
                name = %name,
                stage = %stage,
                kind = e.kind(),
                error = %e,
                "ingestion aborted"
            ),
        }
        result
    }

    fn run_ingest(
        &self,
        name: &str,
        payload: &[u8],
        stage: &mut IngestStage,
    ) -> Result<ImageRecord> {
        // Earlier records keep pointing at these paths but lose their bytes
        if self.store.path_for(ArtifactKind::Source, name)?.exists() {
            warn!(
                name = %name,
                naming = ?self.naming,
                "artifacts with this name already exist and will be overwritten"
            );
        }
        let source_path = self.store.write(ArtifactKind::Source, name, payload)?;
        advance(stage, IngestStage::SourceStored, name);

        let key = self.keys.new_key();
        advance(stage, IngestStage::KeyGenerated, name);

        let (iv, ciphertext) = self.codec.encrypt(payload, &key)?;
        advance(stage, IngestStage::Encrypted, name);

        let framed = frame(&iv, &ciphertext);
        let encrypted_path = self.store.write(ArtifactKind::Encrypted, name, &framed)?;
        advance(stage, IngestStage::EncryptedStored, name);

        // Decrypt what actually landed on disk: a failure here is a defect in
        // this crate, not bad input
        let plaintext = self
            .decrypt_artifact(&encrypted_path, &key)
            .and_then(|plaintext| {
                if plaintext == payload {
                    Ok(plaintext)
                } else {
                    Err(CryptoError::SelfCheckMismatch.into())
                }
            })
            .inspect_err(|e| {
                error!(
                    name = %name,
                    error = %e,
                    "self-check decrypt failed; encode/decode mismatch (defect)"
                )
            })?;
        advance(stage, IngestStage::Decrypted, name);

        let decrypted_path = self
            .store
            .write(ArtifactKind::Decrypted, name, &plaintext)?;
        advance(stage, IngestStage::DecryptedStored, name);

        let new_record =
            NewImageRecord::new(source_path, encrypted_path, key.to_hex(), decrypted_path);
        let id = self.registry.insert(&new_record)?;
        advance(stage, IngestStage::Registered, name);

        Ok(new_record.into_record(id))
    }

    /// Fetch a registered record; unknown ids are `NotFound`
    pub fn record(&self, id: i64) -> Result<ImageRecord> {
        self.registry
            .lookup(id)?
            .ok_or_else(|| CoreError::NotFound(format!("image {id}")))
    }

    /// Bytes of the decrypted artifact. Pure read, no cipher work.
    pub fn recover(&self, id: i64) -> Result<Vec<u8>> {
        self.recover_named(id).map(|image| image.bytes)
    }

    pub fn recover_named(&self, id: i64) -> Result<RecoveredImage> {
        let record = self.record(id)?;
        let bytes = self.store.read(&record.decrypted_path)?;
        let file_name = record
            .decrypted_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("image-{id}"));
        Ok(RecoveredImage { file_name, bytes })
    }

    /// Decrypt the encrypted artifact at read time; nothing is written
    pub fn decrypt_on_demand(&self, id: i64) -> Result<Vec<u8>> {
        self.decrypt_record(&self.record(id)?)
    }

    /// Check that decrypting `encrypted_path` with the stored key reproduces
    /// the source artifact byte for byte
    pub fn verify(&self, id: i64) -> Result<()> {
        let record = self.record(id)?;
        let recovered = self.decrypt_record(&record)?;
        let source = self.store.read(&record.source_path)?;
        if recovered == source {
            Ok(())
        } else {
            Err(CryptoError::SelfCheckMismatch.into())
        }
    }

    /// Every record paired with its base64-encoded source artifact.
    /// Records whose source file is gone are skipped.
    pub fn list_previews(&self) -> Result<Vec<ImagePreview>> {
        let records = self.registry.list()?;
        let previews = records
            .into_iter()
            .filter_map(|record| match self.store.read(&record.source_path) {
                Ok(bytes) => Some(ImagePreview {
                    id: record.id,
                    data: STANDARD.encode(bytes),
                }),
                Err(e) => {
                    warn!(id = record.id, error = %e, "source artifact missing, skipped");
                    None
                }
            })
            .collect();
        Ok(previews)
    }

    fn decrypt_record(&self, record: &ImageRecord) -> Result<Vec<u8>> {
        let key = Key::from_hex(&record.key_hex)?;
        self.decrypt_artifact(&record.encrypted_path, &key)
    }

    fn decrypt_artifact(&self, path: &Path, key: &Key) -> Result<Vec<u8>> {
        let framed = self.store.read(path)?;
        let (iv, ciphertext) = split_frame(&framed)?;
        self.codec.decrypt(ciphertext, key, iv)
    }
}

fn advance(stage: &mut IngestStage, next: IngestStage, name: &str) {
    debug!(name = %name, from = %stage, to = %next, "ingest stage");
    *stage = next;
}
