//! Path helpers for quill's on-disk state

use std::path::PathBuf;

/// Quill data directory (~/.quill)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .expect("failed to locate home directory")
        .join(".quill")
}

/// Config file location
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Conversation history location
pub fn history_path() -> PathBuf {
    data_dir().join("history.json")
}

/// Default sandbox root for tool side effects
pub fn sandbox_path() -> PathBuf {
    data_dir().join("workspace")
}

/// Ensure directory exists
pub async fn ensure_dir(path: &PathBuf) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}
