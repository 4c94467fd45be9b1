//! Error types for advert ingestion

use adsync_common::AdsyncError;
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Longest response body excerpt carried in a status error
const MAX_BODY_EXCERPT: usize = 512;

/// Database step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStage {
    Connect,
    Begin,
    Stage,
    Commit,
    Query,
}

impl std::fmt::Display for PersistStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistStage::Connect => write!(f, "connect"),
            PersistStage::Begin => write!(f, "begin transaction"),
            PersistStage::Stage => write!(f, "stage insert"),
            PersistStage::Commit => write!(f, "commit"),
            PersistStage::Query => write!(f, "query"),
        }
    }
}

/// Broad category of a failed run, used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error or non-success HTTP status
    Transport,
    /// Response body did not have the expected shape
    MalformedResponse,
    /// Writing the batch failed; nothing from the batch was kept
    Persistence,
    /// Configuration or schema provisioning
    Setup,
}

/// Ingestion error
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Advert API request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Advert API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed advert API response: {0}")]
    MalformedResponse(String),

    #[error("Database {stage} failed{}: {source}", advert_suffix(.advert_id))]
    Persistence {
        stage: PersistStage,
        advert_id: Option<i64>,
        #[source]
        source: sqlx::Error,
    },

    #[error("Schema setup failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Common(#[from] AdsyncError),
}

fn advert_suffix(advert_id: &Option<i64>) -> String {
    match advert_id {
        Some(id) => format!(" for advert {}", id),
        None => String::new(),
    }
}

impl IngestError {
    pub fn request(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.into(),
            source,
        }
    }

    /// Build a status error, keeping only the start of the response body
    pub fn status(status: reqwest::StatusCode, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        Self::Status { status, body }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn persistence(stage: PersistStage, source: sqlx::Error) -> Self {
        Self::Persistence {
            stage,
            advert_id: None,
            source,
        }
    }

    pub fn staging(advert_id: i64, source: sqlx::Error) -> Self {
        Self::Persistence {
            stage: PersistStage::Stage,
            advert_id: Some(advert_id),
            source,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            IngestError::Request { .. } | IngestError::Status { .. } => FailureKind::Transport,
            IngestError::MalformedResponse(_) => FailureKind::MalformedResponse,
            IngestError::Persistence { .. } => FailureKind::Persistence,
            IngestError::Migration(_) | IngestError::Common(_) => FailureKind::Setup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_is_truncated() {
        let body = "x".repeat(MAX_BODY_EXCERPT * 2);
        let err = IngestError::status(reqwest::StatusCode::BAD_GATEWAY, &body);

        match err {
            IngestError::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
                assert_eq!(body.len(), MAX_BODY_EXCERPT + 3);
                assert!(body.ends_with("..."));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_staging_error_names_the_advert() {
        let err = IngestError::staging(43, sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), FailureKind::Persistence);
        assert!(err.to_string().contains("stage insert failed for advert 43"));
    }

    #[test]
    fn test_kinds() {
        let status = IngestError::status(reqwest::StatusCode::UNAUTHORIZED, "");
        assert_eq!(status.kind(), FailureKind::Transport);
        assert_eq!(IngestError::malformed("x").kind(), FailureKind::MalformedResponse);
        assert_eq!(
            IngestError::from(AdsyncError::config("bad")).kind(),
            FailureKind::Setup
        );
    }
}
