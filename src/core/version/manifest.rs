// ─── Version Manifest ───
// Top-level index of published versions.

use serde::Deserialize;
use tracing::info;

use crate::core::config::FetchConfig;
use crate::core::downloader::ArtifactRef;
use crate::core::error::{MetaError, MetaResult};
use crate::core::http::Fetch;

#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub latest: Option<LatestVersions>,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub release_time: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
}

impl VersionEntry {
    /// Reference to this version's JSON. Only v2 manifests carry a checksum.
    pub fn metadata_ref(&self) -> MetaResult<ArtifactRef> {
        let sha1 = self.sha1.as_deref().ok_or_else(|| {
            MetaError::Resolution(format!("version {} has no sha1 checksum", self.id))
        })?;
        ArtifactRef::sha1(self.url.as_str(), sha1)
    }
}

impl VersionManifest {
    pub fn decode(bytes: &[u8]) -> MetaResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Fetch and decode the manifest. It has no published digest, so it is
    /// not verified.
    pub async fn fetch<F: Fetch + ?Sized>(fetch: &F, url: &str) -> MetaResult<Self> {
        info!("Fetching version manifest from {}", url);
        let manifest = Self::decode(&fetch.fetch(url).await?)?;
        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Fetch the manifest from the URL configured in `config`.
    pub async fn load<F: Fetch + ?Sized>(fetch: &F, config: &FetchConfig) -> MetaResult<Self> {
        Self::fetch(fetch, &config.manifest_url).await
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn releases(&self) -> Vec<&VersionEntry> {
        self.versions
            .iter()
            .filter(|v| v.version_type == "release")
            .collect()
    }

    pub fn latest_release(&self) -> Option<&VersionEntry> {
        self.latest
            .as_ref()
            .and_then(|latest| self.find_version(&latest.release))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http::testing::MemoryFetcher;

    const MANIFEST: &str = r#"{
        "latest": { "release": "1.20.4", "snapshot": "24w03a" },
        "versions": [
            {
                "id": "24w03a",
                "type": "snapshot",
                "url": "https://example.com/24w03a.json",
                "time": "2024-01-17T13:15:01+00:00",
                "releaseTime": "2024-01-17T13:06:09+00:00",
                "sha1": "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
                "complianceLevel": 1
            },
            {
                "id": "1.20.4",
                "type": "release",
                "url": "https://example.com/1.20.4.json",
                "releaseTime": "2023-12-07T12:56:20+00:00",
                "sha1": "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
            },
            {
                "id": "1.8.9",
                "type": "release",
                "url": "https://example.com/1.8.9.json"
            }
        ]
    }"#;

    #[test]
    fn finds_versions_and_latest_release() {
        let manifest = VersionManifest::decode(MANIFEST.as_bytes()).unwrap();
        assert_eq!(manifest.releases().len(), 2);
        assert_eq!(manifest.latest_release().unwrap().id, "1.20.4");
        assert_eq!(
            manifest.find_version("24w03a").unwrap().release_time.as_deref(),
            Some("2024-01-17T13:06:09+00:00")
        );
        assert!(manifest.find_version("0.0.1").is_none());
    }

    #[test]
    fn entry_without_checksum_has_no_metadata_ref() {
        let manifest = VersionManifest::decode(MANIFEST.as_bytes()).unwrap();
        let legacy = manifest.find_version("1.8.9").unwrap();
        assert!(matches!(
            legacy.metadata_ref(),
            Err(MetaError::Resolution(_))
        ));

        let current = manifest.find_version("1.20.4").unwrap();
        assert_eq!(current.metadata_ref().unwrap().url, "https://example.com/1.20.4.json");
    }

    #[tokio::test]
    async fn fetch_decodes_manifest() {
        let fetcher = MemoryFetcher::default().with("mem://manifest", MANIFEST);
        let manifest = VersionManifest::fetch(&fetcher, "mem://manifest").await.unwrap();
        assert_eq!(manifest.versions.len(), 3);

        let err = VersionManifest::fetch(&fetcher, "mem://nope").await.unwrap_err();
        assert!(matches!(err, MetaError::Fetch(_)));

        let config = FetchConfig {
            manifest_url: "mem://manifest".into(),
            ..FetchConfig::default()
        };
        let loaded = VersionManifest::load(&fetcher, &config).await.unwrap();
        assert_eq!(loaded.latest.unwrap().snapshot, "24w03a");
    }
}
