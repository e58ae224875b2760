// src/core/store.rs
//! Artifact storage on the local file system
//!
//! Each record has three physically distinct files, one per area:
//!
//! ```text
//! <root>/<source_dir>/<name>          uploaded plaintext
//! <root>/<encrypted_dir>/<name>.enc   IV (16 bytes) ‖ CBC ciphertext
//! <root>/<decrypted_dir>/<name>       recovered plaintext
//! ```
//!
//! Writes go to a temp file in the destination directory and are renamed
//! into place, so a reader never sees a partially written artifact. A file
//! with the same derived name is silently replaced.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::Config;
use crate::consts::{
    DEFAULT_DECRYPTED_DIR, DEFAULT_ENCRYPTED_DIR, DEFAULT_SOURCE_DIR, ENCRYPTED_SUFFIX,
};
use crate::enums::ArtifactKind;
use crate::error::CoreError;
use crate::CoreResult as Result;

/// Directory names of the three areas, relative to the store root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaLayout {
    pub source: String,
    pub encrypted: String,
    pub decrypted: String,
}

impl Default for AreaLayout {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_DIR.into(),
            encrypted: DEFAULT_ENCRYPTED_DIR.into(),
            decrypted: DEFAULT_DECRYPTED_DIR.into(),
        }
    }
}

impl AreaLayout {
    fn dir(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Source => &self.source,
            ArtifactKind::Encrypted => &self.encrypted,
            ArtifactKind::Decrypted => &self.decrypted,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    layout: AreaLayout,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_layout(root, AreaLayout::default())
    }

    pub fn with_layout<P: AsRef<Path>>(root: P, layout: AreaLayout) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            layout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_layout(&config.paths.artifact_root, config.paths.layout())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn area_dir(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(self.layout.dir(kind))
    }

    /// Where an artifact of `kind` for `hint` lives (nothing is created)
    pub fn path_for(&self, kind: ArtifactKind, hint: &str) -> Result<PathBuf> {
        Ok(self.area_dir(kind).join(file_name(kind, hint)?))
    }

    /// Write `bytes` as the `kind` artifact for `hint`, returning its absolute path
    pub fn write(&self, kind: ArtifactKind, hint: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = file_name(kind, hint)?;
        let dir = self.area_dir(kind);
        fs::create_dir_all(&dir).map_err(|e| CoreError::storage(&dir, e))?;
        let dir = fs::canonicalize(&dir).map_err(|e| CoreError::storage(&dir, e))?;
        let target = dir.join(name);

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| CoreError::storage(&dir, e))?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| CoreError::storage(tmp.path(), e))?;
        tmp.persist(&target)
            .map_err(|e| CoreError::storage(&target, e.error))?;

        tracing::trace!(
            kind = %kind,
            path = %target.display(),
            len = bytes.len(),
            "artifact written"
        );
        Ok(target)
    }

    /// Read a whole artifact. Missing or unreadable files are `NotFound`.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        fs::read(path).map_err(|e| {
            CoreError::NotFound(format!("artifact {} ({})", path.display(), e.kind()))
        })
    }
}

/// Reduce an upload name to a bare file name; rejects anything that would
/// escape the area directory
///
/// Surrounding whitespace is dropped, so `" cat.png"` becomes `cat.png`.
pub fn sanitize_name(hint: &str) -> Result<String> {
    let trimmed = hint.trim();
    // treat both separators as path separators, whatever the host OS
    let last = trimmed
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    match last {
        "" | "." | ".." => Err(CoreError::InvalidName(hint.to_owned())),
        name if name.contains('\0') => Err(CoreError::InvalidName(hint.to_owned())),
        name => Ok(name.to_owned()),
    }
}

fn file_name(kind: ArtifactKind, hint: &str) -> Result<String> {
    let name = sanitize_name(hint)?;
    Ok(match kind {
        ArtifactKind::Encrypted => format!("{name}{ENCRYPTED_SUFFIX}"),
        ArtifactKind::Source | ArtifactKind::Decrypted => name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_only_the_final_component() {
        assert_eq!(sanitize_name("cat.png").unwrap(), "cat.png");
        assert_eq!(sanitize_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_name(r"C:\Users\me\dog.jpg").unwrap(), "dog.jpg");
    }

    #[test]
    fn sanitize_trims_surrounding_whitespace_only() {
        assert_eq!(sanitize_name(" cat.png").unwrap(), "cat.png");
        assert_eq!(sanitize_name("cat.png \n").unwrap(), "cat.png");
        assert_eq!(sanitize_name("my cat.png").unwrap(), "my cat.png");
    }

    #[test]
    fn sanitize_rejects_empty_and_dot_names() {
        for bad in ["", "   ", ".", "..", "dir/", "a/.."] {
            assert!(
                matches!(sanitize_name(bad), Err(CoreError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn encrypted_names_get_the_enc_suffix() {
        let store = ArtifactStore::new("/srv/vault");
        assert_eq!(
            store.path_for(ArtifactKind::Encrypted, "cat.png").unwrap(),
            PathBuf::from("/srv/vault/encrypted/cat.png.enc")
        );
        assert_eq!(
            store.path_for(ArtifactKind::Decrypted, "cat.png").unwrap(),
            PathBuf::from("/srv/vault/decrypt/cat.png")
        );
        assert_eq!(
            store.path_for(ArtifactKind::Source, "cat.png").unwrap(),
            PathBuf::from("/srv/vault/uploads/cat.png")
        );
    }
}
