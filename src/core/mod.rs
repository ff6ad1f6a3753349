// ─── launchermeta core ───
// Resolution of launcher version metadata into platform-specific plans.
//
// Architecture:
//   core/
//     platform   : OS family / arch / feature context
//     version/   : version manifest, version JSON model, rules, resolver
//     launch/    : argument templates + substitution
//     downloader/: checksum-verified resources + batch verification
//     assets/    : asset index pointer + document
//     maven/     : library coordinates
//     http       : fetch boundary + reqwest fetcher
//     config     : fetch settings

pub mod assets;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod launch;
pub mod maven;
pub mod platform;
pub mod version;
