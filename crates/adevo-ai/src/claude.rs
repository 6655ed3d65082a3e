//! LLM letter drafter using the Anthropic Messages API.

use std::time::Duration;

use adevo_core::{DisputeDetails, IdentityRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::generator::{GenerationError, LetterGenerator};
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Drafts letters by prompting a Claude model.
pub struct ClaudeDrafter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ClaudeDrafter {
    /// `base_url` should be like `https://api.anthropic.com` (no trailing slash).
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn request_body<'a>(&'a self, user_prompt: String) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.2,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: user_prompt,
            }],
        }
    }
}

/// Join the text blocks of a response into the letter.
fn letter_text(response: MessagesResponse) -> Result<String, GenerationError> {
    let text = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("");
    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text.to_string())
}

fn rejection(status: u16, body: String) -> GenerationError {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => GenerationError::Rejected(envelope.error.message),
        Err(_) => GenerationError::Server { status, body },
    }
}

#[async_trait]
impl LetterGenerator for ClaudeDrafter {
    async fn generate(
        &self,
        identity: &IdentityRecord,
        details: &DisputeDetails,
    ) -> Result<String, GenerationError> {
        let user_prompt = build_user_prompt(identity, details);
        debug!(prompt = %user_prompt, "letter prompt");

        let url = format!("{}/v1/messages", self.base_url);
        info!(url = %url, model = %self.model, reference = %details.transaction_id, "requesting letter draft");
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(user_prompt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "letter draft rejected");
            return Err(rejection(status.as_u16(), body));
        }

        let body = resp.text().await?;
        let letter = letter_text(serde_json::from_str(&body)?)?;
        info!(chars = letter.len(), "letter draft received");
        Ok(letter)
    }
}
