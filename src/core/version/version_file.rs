// ─── Version File ───
// Typed model of a launcher version JSON.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::info;

use crate::core::assets::AssetIndexInfo;
use crate::core::downloader::ArtifactRef;
use crate::core::error::{MetaError, MetaResult};
use crate::core::http::Fetch;
use crate::core::launch::{Argument, ArgumentValue};
use crate::core::maven::MavenArtifact;
use crate::core::version::manifest::VersionEntry;
use crate::core::version::rules::Rule;

/// Keys of the top-level `downloads` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadKind {
    Client,
    ClientMappings,
    Server,
    ServerMappings,
}

impl DownloadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadKind::Client => "client",
            DownloadKind::ClientMappings => "client_mappings",
            DownloadKind::Server => "server",
            DownloadKind::ServerMappings => "server_mappings",
        }
    }
}

/// A fully parsed version JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchMetadata {
    pub id: String,
    pub main_class: String,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: BTreeMap<String, ArtifactRef>,
    pub asset_index: AssetIndexInfo,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default, rename = "type")]
    pub version_type: Option<String>,
    #[serde(default)]
    pub release_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<Argument>,
    #[serde(default)]
    pub jvm: Vec<Argument>,
}

// ─── Library Entry ───

#[derive(Debug, Deserialize)]
pub struct LibraryEntry {
    /// `group:artifact:version[:classifier]`
    pub name: String,
    #[serde(default)]
    pub downloads: LibraryDownloads,
    /// OS name → native classifier (may contain `${arch}`).
    #[serde(default)]
    pub natives: HashMap<String, String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub extract: Option<LibraryExtract>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<ArtifactRef>,
    #[serde(default)]
    pub classifiers: HashMap<String, ArtifactRef>,
}

/// Paths to skip when unpacking a native archive.
#[derive(Debug, Default, Deserialize)]
pub struct LibraryExtract {
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl LibraryEntry {
    pub fn coordinate(&self) -> MetaResult<MavenArtifact> {
        MavenArtifact::parse(&self.name)
    }
}

impl LaunchMetadata {
    pub fn decode(bytes: &[u8]) -> MetaResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Verify the version JSON referenced by a manifest entry and decode it.
    pub async fn fetch<F: Fetch + ?Sized>(entry: &VersionEntry, fetch: &F) -> MetaResult<Self> {
        let resource = entry.metadata_ref()?.verify_and_open(fetch).await?;
        let metadata = Self::decode(&resource.into_bytes())?;
        info!(
            "Loaded version {} ({} libraries)",
            metadata.id,
            metadata.libraries.len()
        );
        Ok(metadata)
    }

    pub fn download(&self, kind: DownloadKind) -> Option<&ArtifactRef> {
        self.downloads.get(kind.as_str())
    }

    fn required_download(&self, kind: DownloadKind) -> MetaResult<&ArtifactRef> {
        self.download(kind)
            .ok_or(MetaError::MissingDownload(kind.as_str()))
    }

    /// The client jar. A document without one cannot be launched.
    pub fn client_jar(&self) -> MetaResult<&ArtifactRef> {
        self.required_download(DownloadKind::Client)
    }

    pub fn client_mappings(&self) -> MetaResult<&ArtifactRef> {
        self.required_download(DownloadKind::ClientMappings)
    }

    pub fn server(&self) -> MetaResult<&ArtifactRef> {
        self.required_download(DownloadKind::Server)
    }

    pub fn server_mappings(&self) -> MetaResult<&ArtifactRef> {
        self.required_download(DownloadKind::ServerMappings)
    }

    /// Game argument templates, falling back to the legacy
    /// space-separated `minecraftArguments` string.
    pub fn game_arguments(&self) -> Vec<Argument> {
        match &self.arguments {
            Some(args) => args.game.clone(),
            None => self
                .minecraft_arguments
                .as_deref()
                .map(|s| {
                    s.split_whitespace()
                        .map(|token| Argument::Plain(ArgumentValue::Single(token.to_string())))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// JVM argument templates. Legacy documents have none.
    pub fn jvm_arguments(&self) -> &[Argument] {
        self.arguments
            .as_ref()
            .map(|args| args.jvm.as_slice())
            .unwrap_or(&[])
    }
}
