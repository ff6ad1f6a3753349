// ─── Verified Resources ───
// Pairs a locator with an expected digest and checks the payload before
// handing it out.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{Cursor, Read};

use serde::{Deserialize, Deserializer};
use sha1::Sha1;
use sha2::{Digest as _, Sha256};
use tracing::{debug, warn};

use crate::core::error::{MetaError, MetaResult};
use crate::core::http::Fetch;

/// Hash algorithm used to check an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    pub fn digest(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha1 => Sha1::digest(bytes).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha1 => write!(f, "SHA-1"),
            DigestAlgorithm::Sha256 => write!(f, "SHA-256"),
        }
    }
}

/// Raw digest bytes, parsed from the hex form used in manifests.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    pub fn from_hex(value: &str, algorithm: DigestAlgorithm) -> MetaResult<Self> {
        let bytes = hex::decode(value.trim()).map_err(|e| MetaError::InvalidDigest {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        if bytes.len() != algorithm.output_len() {
            return Err(MetaError::InvalidDigest {
                value: value.to_string(),
                reason: format!(
                    "expected {} bytes for {}, got {}",
                    algorithm.output_len(),
                    algorithm,
                    bytes.len()
                ),
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A downloadable file identified by URL + digest.
///
/// Two refs are equal when locator and digest match; `path` and `size` are
/// informational.
#[derive(Debug, Clone)]
pub struct ArtifactRef {
    pub url: String,
    pub digest: Digest,
    pub algorithm: DigestAlgorithm,
    /// Relative placement hint (libraries only).
    pub path: Option<String>,
    pub size: Option<u64>,
}

impl PartialEq for ArtifactRef {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url && self.digest == other.digest
    }
}

impl Eq for ArtifactRef {}

impl Hash for ArtifactRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
        self.digest.hash(state);
    }
}

#[derive(Deserialize)]
struct RawArtifact {
    url: String,
    sha1: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    size: Option<u64>,
}

impl<'de> Deserialize<'de> for ArtifactRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawArtifact::deserialize(deserializer)?;
        let mut artifact =
            ArtifactRef::sha1(raw.url, &raw.sha1).map_err(serde::de::Error::custom)?;
        artifact.path = raw.path;
        artifact.size = raw.size;
        Ok(artifact)
    }
}

impl ArtifactRef {
    pub fn new(url: impl Into<String>, digest: Digest, algorithm: DigestAlgorithm) -> Self {
        Self {
            url: url.into(),
            digest,
            algorithm,
            path: None,
            size: None,
        }
    }

    /// Build a SHA-1 ref from the hex checksum found in manifests.
    pub fn sha1(url: impl Into<String>, sha1_hex: &str) -> MetaResult<Self> {
        let digest = Digest::from_hex(sha1_hex, DigestAlgorithm::Sha1)?;
        Ok(Self::new(url, digest, DigestAlgorithm::Sha1))
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Check an in-memory payload against the declared digest.
    pub fn verify(&self, bytes: &[u8]) -> MetaResult<()> {
        let actual = self.algorithm.digest(bytes);
        if actual != self.digest.as_bytes() {
            warn!("{} mismatch for {}", self.algorithm, self.url);
            return Err(MetaError::Integrity {
                url: self.url.clone(),
                algorithm: self.algorithm,
                expected: self.digest.to_hex(),
                actual: hex::encode(actual),
            });
        }
        Ok(())
    }

    /// Fetch the payload and verify it before returning it.
    ///
    /// Transport failures come back unchanged as [`MetaError::Fetch`]; a
    /// digest mismatch is [`MetaError::Integrity`]. Nothing is cached, so
    /// every call fetches again.
    pub async fn verify_and_open<F: Fetch + ?Sized>(
        &self,
        fetch: &F,
    ) -> MetaResult<VerifiedResource> {
        let bytes = fetch.fetch(&self.url).await?;
        self.verify(&bytes)?;
        debug!("Verified {} ({} bytes)", self.url, bytes.len());
        Ok(VerifiedResource {
            url: self.url.clone(),
            inner: Cursor::new(bytes),
        })
    }
}

/// Payload whose digest has already been checked, positioned at the start.
#[derive(Debug)]
pub struct VerifiedResource {
    url: String,
    inner: Cursor<Vec<u8>>,
}

impl VerifiedResource {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Read for VerifiedResource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}
