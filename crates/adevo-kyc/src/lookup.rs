use adevo_core::{Bvn, IdentityRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by an identity provider.
///
/// `Display` is the message shown to the user, unaltered.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0}")]
    Rejected(String),

    #[error("identity provider returned {status}: {body}")]
    Server { status: u16, body: String },

    #[cfg(feature = "http")]
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "http")]
    #[error("identity provider sent malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolves a BVN to the verified identity behind it.
///
/// Implementations are called at most once per submitted identifier and
/// must not retry on their own.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn lookup(&self, bvn: &Bvn) -> Result<IdentityRecord, LookupError>;
}
