use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::core::config::FetchConfig;
use crate::core::downloader::{ArtifactRef, VerifiedResource};
use crate::core::error::{MetaError, MetaResult};
use crate::core::http::Fetch;

/// Verify-and-open many artifacts concurrently using `buffer_unordered`.
///
/// Each artifact is paired with its own outcome; completion order is not
/// the input order. Failures are returned, never retried.
pub async fn verify_all<'a, F>(
    artifacts: impl IntoIterator<Item = &'a ArtifactRef>,
    fetch: &F,
    concurrency: usize,
) -> Vec<(&'a ArtifactRef, MetaResult<VerifiedResource>)>
where
    F: Fetch + ?Sized,
{
    let artifacts: Vec<&ArtifactRef> = artifacts.into_iter().collect();
    let concurrency = concurrency.max(1);
    info!(
        "Verifying {} artifacts, concurrency={}",
        artifacts.len(),
        concurrency
    );

    let results: Vec<_> = stream::iter(artifacts)
        .map(|artifact| async move {
            let result = artifact.verify_and_open(fetch).await;
            (artifact, result)
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        warn!("{} artifact verifications failed", failed);
    }
    results
}

/// [`verify_all`] with the concurrency limit taken from `config`.
pub async fn verify_all_with_config<'a, F>(
    artifacts: impl IntoIterator<Item = &'a ArtifactRef>,
    fetch: &F,
    config: &FetchConfig,
) -> Vec<(&'a ArtifactRef, MetaResult<VerifiedResource>)>
where
    F: Fetch + ?Sized,
{
    verify_all(artifacts, fetch, config.concurrency).await
}

/// Split batch outcomes into successes and failures.
pub fn partition_results<'a>(
    results: Vec<(&'a ArtifactRef, MetaResult<VerifiedResource>)>,
) -> (
    Vec<(&'a ArtifactRef, VerifiedResource)>,
    Vec<(&'a ArtifactRef, MetaError)>,
) {
    let mut ok = Vec::new();
    let mut failed = Vec::new();
    for (artifact, result) in results {
        match result {
            Ok(resource) => ok.push((artifact, resource)),
            Err(e) => failed.push((artifact, e)),
        }
    }
    (ok, failed)
}
