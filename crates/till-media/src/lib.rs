//! # till-media: Artifact Storage for Till
//!
//! Persists receipts and code images and reads them back by name.
//!
//! ## Store Interface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Arc<dyn ArtifactStore>                            │
//! │                                                                         │
//! │  save(&ArtifactName, &[u8]) ──► StoredArtifact { name, location, size } │
//! │  load(&ArtifactName)        ──► Option<Vec<u8>>                        │
//! │                                                                         │
//! │        ┌──────────────────────┐        ┌──────────────────────┐        │
//! │        │   FsArtifactStore    │        │ MemoryArtifactStore  │        │
//! │        │  {MEDIA_ROOT}/{name} │        │  HashMap<name, blob> │        │
//! │        │  (production)        │        │  (tests)             │        │
//! │        └──────────────────────┘        └──────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Names are [`ArtifactName`]s, so they are already known to be bare file
//! names. Saving an existing name overwrites it. Nothing is ever deleted.

pub mod error;
pub mod fs;
pub mod memory;

pub use error::{MediaError, MediaResult};
pub use fs::FsArtifactStore;
pub use memory::MemoryArtifactStore;

use async_trait::async_trait;
use till_core::ArtifactName;

/// Receipt of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub name: ArtifactName,
    /// Where the bytes live, for logs only (a path or `memory:`).
    pub location: String,
    pub size: usize,
}

/// Named blob storage.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Writes `bytes` under `name`, replacing any previous content.
    async fn save(&self, name: &ArtifactName, bytes: &[u8]) -> MediaResult<StoredArtifact>;

    /// Reads the artifact called `name`, or `None` when there is none.
    async fn load(&self, name: &ArtifactName) -> MediaResult<Option<Vec<u8>>>;
}
