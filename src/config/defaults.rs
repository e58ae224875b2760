// src/config/defaults.rs
use crate::config::app::{Paths, Server, Storage};
use crate::consts::{
    DEFAULT_ARTIFACT_ROOT, DEFAULT_DECRYPTED_DIR, DEFAULT_ENCRYPTED_DIR, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_PORT, DEFAULT_REGISTRY_DB, DEFAULT_SOURCE_DIR,
};
use crate::enums::NamingPolicy;

pub fn default_paths() -> Paths {
    Paths {
        artifact_root: DEFAULT_ARTIFACT_ROOT.into(),
        registry_db: DEFAULT_REGISTRY_DB.into(),
        source_dir: DEFAULT_SOURCE_DIR.into(),
        encrypted_dir: DEFAULT_ENCRYPTED_DIR.into(),
        decrypted_dir: DEFAULT_DECRYPTED_DIR.into(),
    }
}

pub fn default_server() -> Server {
    Server {
        port: DEFAULT_PORT,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        cors_permissive: true,
    }
}

pub fn default_storage() -> Storage {
    Storage {
        naming: NamingPolicy::Original,
    }
}
