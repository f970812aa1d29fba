// src/error.rs

use thiserror::Error;

use crate::schema::DocumentCategory;

/// A document could not be obtained. Always scoped to one category.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no document link found for {0}")]
    NoLink(DocumentCategory),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Worth retrying: timeouts, transport failures, 5xx and 429.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout { .. } | FetchError::Http { .. } => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::NoLink(_) => false,
        }
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// A fetched document did not yield a usable table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no row matched the header heuristic")]
    MissingHeader,

    #[error("could not read tables from PDF: {0}")]
    Unreadable(String),
}

/// Why a category is absent from the run's results.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
