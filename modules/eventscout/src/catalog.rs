//! Catalog persistence: the full event list as one JSON document.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use eventscout_common::Event;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// The persisted catalog, or an empty one when nothing usable exists.
    /// Never fails.
    async fn load(&self) -> Vec<Event>;

    /// Replace the persisted catalog wholesale.
    async fn save(&self, events: &[Event]) -> Result<()>;
}

/// JSON file store. Saves go through a temp file in the same directory and
/// a rename, so readers see either the old catalog or the new one.
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogStore for JsonCatalogStore {
    async fn load(&self) -> Vec<Event> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No catalog yet, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Catalog unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Event>>(&bytes) {
            Ok(events) => events,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Catalog corrupt, starting empty");
                Vec::new()
            }
        }
    }

    async fn save(&self, events: &[Event]) -> Result<()> {
        let json = serde_json::to_vec_pretty(events).context("Failed to serialize catalog")?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &json))
            .await
            .context("Catalog writer task panicked")??;

        info!(path = %self.path.display(), count = events.len(), "Catalog saved");
        Ok(())
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.write_all(b"\n"))
        .and_then(|_| tmp.as_file().sync_all())
        .context("Failed to write catalog")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
