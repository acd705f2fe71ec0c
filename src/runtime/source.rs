/// Where per-item metadata comes from at runtime
///
/// Fetching is the only suspension point of a hover session. Any failure
/// (missing document, unreadable file, malformed JSON) is a `FetchError`
/// that the session treats as "no metadata" for that interaction.
use std::future::Future;
use std::path::{Component, Path, PathBuf};

use crate::content::data::ItemMetadata;
use crate::error::FetchError;

/// Fetches `metadata.json` documents by URL
pub trait MetadataSource: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<ItemMetadata, FetchError>> + Send;
}

/// Serves item URLs from a site directory on disk
///
/// `/lager/item-1/metadata.json` resolves to
/// `<root>/lager/item-1/metadata.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a URL onto the site root; `None` if it would escape it
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = Path::new(url.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl MetadataSource for DirectorySource {
    async fn fetch(&self, url: &str) -> Result<ItemMetadata, FetchError> {
        let path = self.resolve(url).ok_or_else(|| FetchError::Unavailable {
            url: url.to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path escapes the site root",
            ),
        })?;

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Unavailable {
                url: url.to_string(),
                source,
            })?;

        ItemMetadata::from_slice(&bytes).map_err(|source| FetchError::Malformed {
            url: url.to_string(),
            source,
        })
    }
}
