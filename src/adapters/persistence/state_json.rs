//! Implements SequencePort using a JSON file.
//!
//! Tracks the last issued number per `{PREFIX}-{year}` key (e.g. `COT-2025`).

use crate::domain::{DocumentKind, DomainError};
use crate::ports::SequencePort;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::error;

/// State: "COT-2025" -> last issued number
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateData {
    last_numbers: HashMap<String, u32>,
}

/// JSON file-based sequence storage.
pub struct StateJson {
    path: std::path::PathBuf,
    cache: tokio::sync::Mutex<StateData>,
}

impl StateJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::Mutex::new(StateData::default()),
        }
    }

    /// Load state from disk. Call after construction or when path changes.
    ///
    /// A missing file starts the sequence at zero. An unreadable or corrupt
    /// file is an error: restarting would reissue existing document ids.
    pub async fn load(&self) -> Result<(), DomainError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(s) => serde_json::from_str(&s).map_err(|e| {
                error!(path = %self.path.display(), error = %e, "sequence file is corrupt");
                DomainError::State(format!(
                    "corrupt sequence file {}: {}",
                    self.path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => StateData::default(),
            Err(e) => {
                return Err(DomainError::State(format!(
                    "read sequence file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        *self.cache.lock().await = data;
        Ok(())
    }

    /// Atomic save using write-replace:
    /// temp file, sync_all, then rename over the target.
    async fn save(&self, data: &StateData) -> Result<(), DomainError> {
        let json =
            serde_json::to_string_pretty(data).map_err(|e| DomainError::State(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::State(format!("create state dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::State(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::State(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::State(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::State(format!("atomic rename failed: {}", e)))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SequencePort for StateJson {
    async fn next_number(&self, kind: DocumentKind, year: i32) -> Result<u32, DomainError> {
        // Held across the save so two callers never get the same number.
        let mut cache = self.cache.lock().await;
        let key = format!("{}-{}", kind.prefix(), year);
        let next = cache.last_numbers.get(&key).copied().unwrap_or(0) + 1;
        cache.last_numbers.insert(key.clone(), next);
        if let Err(e) = self.save(&cache).await {
            cache.last_numbers.insert(key, next - 1);
            return Err(e);
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn numbers_increment_per_kind_and_year() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateJson::new(dir.path().join("state.json"));
        state.load().await.unwrap();

        assert_eq!(state.next_number(DocumentKind::Cotizacion, 2025).await.unwrap(), 1);
        assert_eq!(state.next_number(DocumentKind::Cotizacion, 2025).await.unwrap(), 2);
        assert_eq!(state.next_number(DocumentKind::Informe, 2025).await.unwrap(), 1);
        assert_eq!(state.next_number(DocumentKind::Cotizacion, 2026).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn numbers_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let state = StateJson::new(&path);
        state.load().await.unwrap();
        state.next_number(DocumentKind::Proyecto, 2025).await.unwrap();
        state.next_number(DocumentKind::Proyecto, 2025).await.unwrap();

        let reopened = StateJson::new(&path);
        reopened.load().await.unwrap();
        assert_eq!(
            reopened.next_number(DocumentKind::Proyecto, 2025).await.unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn corrupt_file_refuses_to_restart_numbering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let state = StateJson::new(&path);
        state.load().await.unwrap();
        for _ in 0..5 {
            state.next_number(DocumentKind::Cotizacion, 2025).await.unwrap();
        }

        std::fs::write(&path, "{ truncated").unwrap();
        let reopened = StateJson::new(&path);
        assert!(matches!(reopened.load().await, Err(DomainError::State(_))));
    }

    #[tokio::test]
    async fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be: reading it fails with something other than NotFound.
        let state = StateJson::new(dir.path());
        assert!(matches!(state.load().await, Err(DomainError::State(_))));
    }
}
