pub mod batch;
pub mod resource;

pub use batch::{partition_results, verify_all, verify_all_with_config};
pub use resource::{ArtifactRef, Digest, DigestAlgorithm, VerifiedResource};
