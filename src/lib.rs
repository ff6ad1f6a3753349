//! Resolves launcher version metadata into platform-specific,
//! checksum-verified artifact lists and launch argument tokens.
//!
//! Resolution is pure: callers pass a decoded [`LaunchMetadata`] and an
//! explicit [`PlatformContext`]. Only [`ArtifactRef::verify_and_open`]
//! performs I/O, through a caller-supplied [`Fetch`] implementation.

pub mod core;

pub use crate::core::assets::{AssetIndex, AssetIndexInfo, AssetObject};
pub use crate::core::config::FetchConfig;
pub use crate::core::downloader::{
    partition_results, verify_all, verify_all_with_config, ArtifactRef, Digest, DigestAlgorithm,
    VerifiedResource,
};
pub use crate::core::error::{FetchError, MetaError, MetaResult};
pub use crate::core::http::{Fetch, HttpFetcher};
pub use crate::core::launch::{format_argument, format_arguments, substitute, Argument, ArgumentValue};
pub use crate::core::maven::MavenArtifact;
pub use crate::core::platform::{OsFamily, PlatformContext};
pub use crate::core::version::{
    applicable_libraries, library_artifacts, resolve, DownloadKind, LaunchMetadata, LibraryEntry,
    Rule, RuleAction, VersionEntry, VersionManifest,
};
pub use crate::core::version::rules::{argument_rules_apply, matches};
