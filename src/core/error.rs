use thiserror::Error;

use crate::core::downloader::DigestAlgorithm;

/// Transport-level failure reported by a [`Fetch`](crate::core::http::Fetch)
/// implementation. Retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Download failed for {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// HTTP status code, when the failure came from a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
        }
    }
}

/// Central error type for metadata resolution.
/// Every fallible operation returns `Result<T, MetaError>`.
#[derive(Debug, Error)]
pub enum MetaError {
    // ── Decode ──────────────────────────────────────────
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid digest {value:?}: {reason}")]
    InvalidDigest { value: String, reason: String },

    #[error("Invalid library coordinate: {0}")]
    InvalidCoordinate(String),

    // ── Network ─────────────────────────────────────────
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // ── Integrity ───────────────────────────────────────
    #[error("{algorithm} mismatch for {url}: expected {expected}, got {actual}")]
    Integrity {
        url: String,
        algorithm: DigestAlgorithm,
        expected: String,
        actual: String,
    },

    // ── Resolution ──────────────────────────────────────
    #[error("Invalid launch metadata: no `{0}` download available")]
    MissingDownload(&'static str),

    #[error("Resolution error: {0}")]
    Resolution(String),
}

impl MetaError {
    /// `true` when retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MetaError::Fetch(_) | MetaError::Http(_))
    }
}

/// Convenience alias used throughout the crate.
pub type MetaResult<T> = Result<T, MetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_error_reports_both_digests() {
        let err = MetaError::Integrity {
            url: "https://example.com/a.jar".into(),
            algorithm: DigestAlgorithm::Sha1,
            expected: "aa".into(),
            actual: "bb".into(),
        };
        let text = err.to_string();
        assert!(text.contains("SHA-1"));
        assert!(text.contains("expected aa"));
        assert!(text.contains("got bb"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn fetch_errors_keep_status_code() {
        let err = FetchError::Status {
            url: "https://example.com".into(),
            status: 404,
        };
        assert_eq!(err.status_code(), Some(404));

        let wrapped: MetaError = err.into();
        assert!(wrapped.is_retryable());
        assert!(wrapped.to_string().contains("HTTP 404"));
    }
}
