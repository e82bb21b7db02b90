//! Block resolution: presence-based cache with network fallback.

use crate::block::BlockDocument;
use crate::consts::BLOCK_FILE_EXT;
use crate::error::ExtractError;
use config::NodeConfig;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolves block documents by height, caching raw response bytes under
/// `<out_dir>/<height>.block`.
///
/// The cache is trusted as immutable and append-only: a file's presence alone
/// decides reuse, with no checksum or re-validation. Concurrent runs sharing
/// one cache directory are not coordinated; overlapping heights are
/// last-writer-wins.
pub struct BlockSource {
    client: reqwest::Client,
    url: String,
    out_dir: PathBuf,
}

impl BlockSource {
    pub fn new(node: &NodeConfig, out_dir: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(node.timeout_secs))
            .build()
            .map_err(ExtractError::Client)?;

        Ok(Self {
            client,
            url: node.url.clone(),
            out_dir: out_dir.as_ref().to_path_buf(),
        })
    }

    /// Return the block document for `height`, from cache if present,
    /// otherwise fetched and persisted verbatim before parsing.
    pub async fn resolve(&self, height: u64) -> Result<BlockDocument, ExtractError> {
        let cache_path = self.out_dir.join(format!("{height}.{BLOCK_FILE_EXT}"));

        let bytes = match tokio::fs::read(&cache_path).await {
            Ok(bytes) => {
                tracing::debug!(height, path = %cache_path.display(), "block cache hit");
                bytes
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.fetch_and_persist(height, &cache_path).await?
            }
            Err(source) => {
                return Err(ExtractError::Persist {
                    path: cache_path,
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(ExtractError::Parse)
    }

    async fn fetch_and_persist(
        &self,
        height: u64,
        cache_path: &Path,
    ) -> Result<Vec<u8>, ExtractError> {
        tracing::debug!(height, url = %self.url, "fetching block");

        let response = self
            .client
            .get(&self.url)
            .query(&[("height", height)])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|source| ExtractError::Fetch { height, source })?;

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ExtractError::Fetch { height, source })?;

        // Persist the raw response before parsing so a later parse failure
        // still leaves the bytes around for inspection and reuse.
        tokio::fs::write(cache_path, &bytes)
            .await
            .map_err(|source| ExtractError::Persist {
                path: cache_path.to_path_buf(),
                source,
            })?;

        Ok(bytes.to_vec())
    }
}
