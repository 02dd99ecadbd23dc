//! # In-Memory Artifact Store
//!
//! Keeps artifacts in a map. Used by tests and for running without a
//! writable disk.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::MediaResult;
use crate::{ArtifactStore, StoredArtifact};
use till_core::ArtifactName;

/// [`ArtifactStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        MemoryArtifactStore::default()
    }

    /// Number of stored artifacts.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// Stored names, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn save(&self, name: &ArtifactName, bytes: &[u8]) -> MediaResult<StoredArtifact> {
        self.blobs
            .write()
            .await
            .insert(name.as_str().to_string(), bytes.to_vec());

        Ok(StoredArtifact {
            name: name.clone(),
            location: format!("memory:{}", name),
            size: bytes.len(),
        })
    }

    async fn load(&self, name: &ArtifactName) -> MediaResult<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(name.as_str()).cloned())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
