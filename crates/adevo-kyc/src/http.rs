//! HTTP client for a KYC service exposing BVN lookups.

use std::time::Duration;

use adevo_core::{Bvn, IdentityRecord};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::lookup::{IdentityLookup, LookupError};

/// KYC service client.
///
/// Expects `GET {base_url}/api/v1/bvn/{bvn}` to answer with an
/// [`IdentityRecord`] as camelCase JSON, or a non-2xx status with a
/// `{"message": "..."}` body that is shown to the user as-is.
pub struct HttpLookup {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpLookup {
    /// Create a client for the given KYC base URL.
    ///
    /// `base_url` should be like `https://kyc.example.com` (no trailing slash).
    pub fn new(base_url: String, token: Option<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url_for(&self, bvn: &Bvn) -> String {
        format!("{}/api/v1/bvn/{}", self.base_url, bvn.as_str())
    }
}

/// Turn a non-success response body into the user-facing error.
fn rejection(status: u16, body: String) -> LookupError {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) if !parsed.message.trim().is_empty() => LookupError::Rejected(parsed.message),
        _ => LookupError::Server { status, body },
    }
}

#[async_trait]
impl IdentityLookup for HttpLookup {
    async fn lookup(&self, bvn: &Bvn) -> Result<IdentityRecord, LookupError> {
        info!(base_url = %self.base_url, bvn = %bvn.masked(), "requesting BVN details");
        let mut request = self.client.get(self.url_for(bvn));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "BVN lookup rejected");
            return Err(rejection(status.as_u16(), body));
        }

        let body = resp.text().await?;
        let record: IdentityRecord = serde_json::from_str(&body)?;
        info!(accounts = record.linked_accounts.len(), "BVN details received");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpLookup {
        HttpLookup::new(base_url.into(), None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn trims_trailing_slash() {
        let lookup = client("https://kyc.example.com/");
        assert_eq!(lookup.base_url, "https://kyc.example.com");
    }

    #[test]
    fn builds_lookup_url() {
        let lookup = client("https://kyc.example.com");
        let bvn = Bvn::parse("12345678901").unwrap();
        assert_eq!(
            lookup.url_for(&bvn),
            "https://kyc.example.com/api/v1/bvn/12345678901"
        );
    }

    #[test]
    fn provider_message_is_passed_through() {
        let err = rejection(404, r#"{"message": "BVN not found"}"#.into());
        assert_eq!(err.to_string(), "BVN not found");
    }

    #[test]
    fn unstructured_body_reports_status() {
        let err = rejection(502, "Bad Gateway".into());
        assert!(matches!(err, LookupError::Server { status: 502, .. }));
    }

    #[test]
    fn record_parses_from_provider_json() {
        let json = r#"{
            "firstName": "AMAKA",
            "middleName": "",
            "lastName": "EZE",
            "phoneNumber": "08098765432",
            "dateOfBirth": "02-Feb-1990",
            "bvn": "22222222222",
            "linkedAccounts": [
                {"bankName": "Kuda Bank", "accountNumber": "2009876543"}
            ]
        }"#;
        let record: IdentityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.full_name(), "AMAKA EZE");
        assert_eq!(record.linked_accounts[0].masked_number(), "******6543");
    }
}
