use adevo_core::{DisputeDetails, IdentityRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported while drafting a letter.
///
/// `Display` is the message shown to the user, unaltered.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Rejected(String),

    #[error("the letter service returned an empty draft")]
    EmptyResponse,

    #[error("letter service returned {status}: {body}")]
    Server { status: u16, body: String },

    #[cfg(feature = "http")]
    #[error("letter service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "http")]
    #[error("letter service sent malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Drafts a formal complaint letter for a dispute.
///
/// Called once per submitted dispute; implementations must not retry.
#[async_trait]
pub trait LetterGenerator: Send + Sync {
    async fn generate(
        &self,
        identity: &IdentityRecord,
        details: &DisputeDetails,
    ) -> Result<String, GenerationError>;
}
