use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;

use crate::core::config::FetchConfig;
use crate::core::downloader::ArtifactRef;
use crate::core::error::MetaResult;
use crate::core::http::Fetch;

/// `assetIndex` pointer inside a version JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub sha1: String,
    pub url: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub total_size: Option<u64>,
}

impl AssetIndexInfo {
    pub fn artifact(&self) -> MetaResult<ArtifactRef> {
        let artifact = ArtifactRef::sha1(self.url.as_str(), &self.sha1)?;
        Ok(match self.size {
            Some(size) => artifact.with_size(size),
            None => artifact,
        })
    }
}

/// Top-level asset index JSON structure.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
    /// Pre-1.7 indexes lay assets out by logical path.
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    #[serde(default)]
    pub map_to_resources: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

impl AssetObject {
    /// `<first two hex chars>/<hash>`, the object store layout.
    pub fn object_path(&self) -> String {
        let prefix = self.hash.get(..2).unwrap_or(&self.hash);
        format!("{}/{}", prefix, self.hash)
    }

    /// Reference to this object under `config.resources_url`.
    pub fn artifact(&self, config: &FetchConfig) -> MetaResult<ArtifactRef> {
        let url = format!(
            "{}/{}",
            config.resources_url.trim_end_matches('/'),
            self.object_path()
        );
        Ok(ArtifactRef::sha1(url, &self.hash)?.with_size(self.size))
    }
}

impl AssetIndex {
    pub fn decode(bytes: &[u8]) -> MetaResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Verify the index against its pointer, then decode it.
    pub async fn fetch<F: Fetch + ?Sized>(info: &AssetIndexInfo, fetch: &F) -> MetaResult<Self> {
        let resource = info.artifact()?.verify_and_open(fetch).await?;
        let index = Self::decode(&resource.into_bytes())?;
        info!("Asset index {} lists {} objects", info.id, index.objects.len());
        Ok(index)
    }

    pub fn total_size(&self) -> u64 {
        self.objects.values().map(|o| o.size).sum()
    }
}
