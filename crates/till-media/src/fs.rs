//! # Filesystem Artifact Store
//!
//! Keeps every artifact as `{root}/{name}`.
//!
//! ## Write Path
//! ```text
//!  save("receipt_ab12.pdf", bytes)
//!     │
//!     ▼  write {root}/.receipt_ab12.pdf.7.partial
//!     │
//!     ▼  rename → {root}/receipt_ab12.pdf
//! ```
//!
//! Readers see either the old file, no file, or the complete new one. The
//! temporary name starts with `.`, which no [`ArtifactName`] can, so a
//! half-written file is never served.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};
use crate::{ArtifactStore, StoredArtifact};
use till_core::ArtifactName;

/// [`ArtifactStore`] over a local directory.
#[derive(Debug)]
pub struct FsArtifactStore {
    root: PathBuf,
    sequence: AtomicU64,
}

impl FsArtifactStore {
    /// Opens the store at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> MediaResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root)
            .await
            .map_err(|source| MediaError::Root {
                path: root.clone(),
                source,
            })?;

        info!(root = %root.display(), "Artifact store ready");

        Ok(FsArtifactStore {
            root,
            sequence: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &ArtifactName) -> PathBuf {
        self.root.join(name.as_str())
    }

    fn partial_path_of(&self, name: &ArtifactName) -> PathBuf {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(".{}.{}.partial", name, n))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save(&self, name: &ArtifactName, bytes: &[u8]) -> MediaResult<StoredArtifact> {
        let path = self.path_of(name);
        let partial = self.partial_path_of(name);

        if let Err(source) = fs::write(&partial, bytes).await {
            // Best effort; the write error is the one reported
            let _ = fs::remove_file(&partial).await;
            return Err(MediaError::io(name.as_str(), source));
        }
        fs::rename(&partial, &path)
            .await
            .map_err(|source| MediaError::io(name.as_str(), source))?;

        debug!(name = %name, size = bytes.len(), "Artifact saved");

        Ok(StoredArtifact {
            name: name.clone(),
            location: path.display().to_string(),
            size: bytes.len(),
        })
    }

    async fn load(&self, name: &ArtifactName) -> MediaResult<Option<Vec<u8>>> {
        let path = self.path_of(name);

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(MediaError::io(name.as_str(), source)),
        }

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            // Raced with something removing the file
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(MediaError::io(name.as_str(), source)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
