//! Conversation history persistence
//!
//! One flat JSON array of messages on disk. The store loads it once at
//! process start, the loop appends to the in-memory copy, and the
//! whole sequence is written back once at process end. Saves go
//! through a temp file and rename so a crash mid-write never corrupts
//! the existing log.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use quill_provider::Message;

/// History storage errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored log exists but cannot be parsed. Deliberately not
    /// recovered here: the caller decides between a fresh start and an
    /// abort.
    #[error("history file is corrupt: {0}")]
    Corrupt(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// Durable store for the ordered message sequence
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored history; a missing file is an empty sequence
    pub async fn load(&self) -> Result<Vec<Message>> {
        if !self.path.exists() {
            debug!("no history at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let messages =
            serde_json::from_str::<Vec<Message>>(&content).map_err(HistoryError::Corrupt)?;
        debug!("loaded {} messages from {:?}", messages.len(), self.path);
        Ok(messages)
    }

    /// Persist the full sequence, atomically with respect to crashes
    pub async fn save(&self, messages: &[Message]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(messages)
            .map_err(|e| HistoryError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

        // Write-to-temp-then-rename keeps the previous log intact if
        // the process dies mid-write.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("saved {} messages to {:?}", messages.len(), self.path);
        Ok(())
    }

    /// Discard the stored history. Idempotent.
    pub async fn clear(&self) -> Result<bool> {
        if self.path.exists() {
            tokio::fs::remove_file(&self.path).await?;
            debug!("cleared history at {:?}", self.path);
            Ok(true)
        } else {
            warn!("no history to clear at {:?}", self.path);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("history.json"))
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_distinguishable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{broken").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, HistoryError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[Message::user("hi")]).await.unwrap();

        assert!(store.clear().await.unwrap());
        assert!(!store.clear().await.unwrap());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("deep/nested/history.json"));
        store.save(&[Message::system("sys")]).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[Message::user("hi")]).await.unwrap();
        assert!(!dir.path().join("history.json.tmp").exists());
    }
}
