// ─── Dependency Resolver ───
// Picks the libraries and native classifiers that apply to a platform.

use tracing::debug;

use crate::core::downloader::ArtifactRef;
use crate::core::platform::PlatformContext;
use crate::core::version::rules;
use crate::core::version::version_file::{LaunchMetadata, LibraryEntry};

impl LibraryEntry {
    pub fn is_allowed_for(&self, ctx: &PlatformContext) -> bool {
        rules::matches(&self.rules, ctx)
    }

    /// Native classifier for `ctx`, taken from the first OS alias present in
    /// `natives`. `${arch}` is replaced by the context's pointer width; a
    /// classifier that needs it yields `None` when `ctx` has no arch.
    pub fn native_classifier_for(&self, ctx: &PlatformContext) -> Option<String> {
        let classifier = ctx
            .os
            .native_aliases()
            .iter()
            .find_map(|alias| self.natives.get(*alias))?;
        if !classifier.contains("${arch}") {
            return Some(classifier.clone());
        }
        match ctx.pointer_width() {
            Some(width) => Some(classifier.replace("${arch}", width)),
            None => {
                debug!(
                    "No arch to expand native classifier {} for {}",
                    classifier, self.name
                );
                None
            }
        }
    }

    /// Main artifact (if any) followed by the native artifact (if any).
    pub fn artifacts_for(&self, ctx: &PlatformContext) -> Vec<&ArtifactRef> {
        let mut artifacts = Vec::with_capacity(2);
        if let Some(artifact) = &self.downloads.artifact {
            artifacts.push(artifact);
        }
        if let Some(classifier) = self.native_classifier_for(ctx) {
            match self.downloads.classifiers.get(&classifier) {
                Some(native) => {
                    debug!("Selected native {} for {}", classifier, self.name);
                    artifacts.push(native);
                }
                None => debug!("Native classifier {} missing for {}", classifier, self.name),
            }
        }
        artifacts
    }
}

/// Libraries whose rules allow `ctx`, in document order.
pub fn applicable_libraries<'a>(
    doc: &'a LaunchMetadata,
    ctx: &PlatformContext,
) -> Vec<&'a LibraryEntry> {
    doc.libraries
        .iter()
        .filter(|lib| {
            let allowed = lib.is_allowed_for(ctx);
            if !allowed {
                debug!("Skipping library (OS rule): {}", lib.name);
            }
            allowed
        })
        .collect()
}

pub fn library_artifacts<'a>(entry: &'a LibraryEntry, ctx: &PlatformContext) -> Vec<&'a ArtifactRef> {
    entry.artifacts_for(ctx)
}

/// Ordered artifact list for `ctx`. Duplicates are kept.
pub fn resolve<'a>(doc: &'a LaunchMetadata, ctx: &PlatformContext) -> Vec<&'a ArtifactRef> {
    let libraries = applicable_libraries(doc, ctx);
    let artifacts: Vec<&ArtifactRef> = libraries
        .iter()
        .flat_map(|lib| lib.artifacts_for(ctx))
        .collect();

    debug!(
        "Resolved {} artifacts from {} libraries ({} allowed) for {}",
        artifacts.len(),
        doc.libraries.len(),
        libraries.len(),
        ctx.os
    );
    artifacts
}
