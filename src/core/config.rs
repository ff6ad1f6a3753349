use serde::{Deserialize, Serialize};

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";
pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

const APP_USER_AGENT: &str = concat!("launchermeta/", env!("CARGO_PKG_VERSION"));

/// Settings for the HTTP fetch layer and batch verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Maximum number of parallel verify-and-open calls.
    pub concurrency: usize,
    /// Per-request timeout. `None` leaves reqwest's default in place.
    pub timeout_secs: Option<u64>,
    pub manifest_url: String,
    pub resources_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: APP_USER_AGENT.to_string(),
            concurrency: 8,
            timeout_secs: None,
            manifest_url: VERSION_MANIFEST_URL.to_string(),
            resources_url: RESOURCES_URL.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }
}
