//! Filesystem-backed byte fetcher.

use std::future::Future;
use std::path::{Path, PathBuf};

use proedit_audio::ByteFetcher;
use proedit_core::{ProEditError, Result};
use tracing::debug;

/// Resolves source ids as paths relative to a media root.
/// Absolute ids are used as-is.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, source_id: &str) -> PathBuf {
        self.root.join(source_id)
    }
}

impl Default for FileFetcher {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ByteFetcher for FileFetcher {
    fn fetch(&self, source_id: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
        let path = self.resolve(source_id);
        let source_id = source_id.to_owned();
        async move {
            let bytes = tokio::fs::read(&path).await.map_err(|e| ProEditError::Fetch {
                source_id: source_id.clone(),
                reason: e.to_string(),
            })?;
            debug!(source = %source_id, bytes = bytes.len(), "Source fetched");
            Ok(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_file_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("proedit-fetch-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("clip.wav"), b"RIFF").unwrap();

        let fetcher = FileFetcher::new(&dir);
        assert_eq!(fetcher.fetch("clip.wav").await.unwrap(), b"RIFF");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let fetcher = FileFetcher::new(std::env::temp_dir());
        let err = fetcher
            .fetch("proedit-definitely-missing.mp3")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProEditError::Fetch { ref source_id, .. } if source_id == "proedit-definitely-missing.mp3"
        ));
    }
}
