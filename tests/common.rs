// tests/common.rs
//! Shared test utilities: logging setup and a throwaway vault

#![allow(dead_code)] // each test binary uses a different subset

use std::io;
use std::sync::{Arc, Mutex};

use encrypted_image_vault::{ArtifactStore, EncryptionPipeline, MemoryRegistry};
use tempfile::TempDir;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Test-friendly logging; respects RUST_LOG, safe to call repeatedly
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// Run `f` under a thread-local subscriber and return everything it logged
pub fn capture_logs<F: FnOnce()>(f: F) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A pipeline over a fresh temp directory and an in-memory registry
pub struct TestVault {
    pub dir: TempDir,
    pub registry: Arc<MemoryRegistry>,
    pub pipeline: MemPipeline,
}

pub type MemPipeline = EncryptionPipeline<Arc<MemoryRegistry>>;

impl TestVault {
    pub fn new() -> Self {
        Self::with_pipeline(|p| p)
    }

    /// Build the vault, letting the caller swap codec, key source or naming
    pub fn with_pipeline<F>(configure: F) -> Self
    where
        F: FnOnce(MemPipeline) -> MemPipeline,
    {
        init_tracing();
        let dir = tempfile::tempdir().expect("create temp dir");
        let registry = Arc::new(MemoryRegistry::new());
        let store = ArtifactStore::new(dir.path());
        let pipeline = configure(EncryptionPipeline::new(store, Arc::clone(&registry)));
        Self {
            dir,
            registry,
            pipeline,
        }
    }
}

/// Deterministic, non-trivial bytes
pub fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8).collect()
}
