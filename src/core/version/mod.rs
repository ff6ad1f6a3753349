pub mod manifest;
pub mod resolver;
pub mod rules;
pub mod version_file;

pub use manifest::{LatestVersions, VersionEntry, VersionManifest};
pub use resolver::{applicable_libraries, library_artifacts, resolve};
pub use rules::{OsRule, Rule, RuleAction};
pub use version_file::{
    Arguments, DownloadKind, LaunchMetadata, LibraryDownloads, LibraryEntry, LibraryExtract,
};
