//! Provider selection from flags and environment.

use std::time::Duration;

use adevo_ai::claude::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use adevo_ai::{ClaudeDrafter, LetterGenerator, TemplateDrafter};
use adevo_kyc::{FixtureLookup, HttpLookup, IdentityLookup};
use anyhow::Context;
use clap::Args;
use tracing::info;

/// External service settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct ProviderArgs {
    /// Identity (BVN) service base URL. The built-in demo provider is used when unset.
    #[arg(long, env = "ADEVO_KYC_URL", global = true)]
    pub kyc_url: Option<String>,

    /// Bearer token for the identity service.
    #[arg(long, env = "ADEVO_KYC_TOKEN", global = true, hide_env_values = true)]
    pub kyc_token: Option<String>,

    /// Anthropic API base URL.
    #[arg(long, env = "ADEVO_LLM_URL", global = true, default_value = DEFAULT_BASE_URL)]
    pub llm_url: String,

    /// Anthropic API key. Letters are drafted from the built-in template when unset.
    #[arg(long, env = "ADEVO_LLM_API_KEY", global = true, hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Model used to draft letters.
    #[arg(long, env = "ADEVO_LLM_MODEL", global = true, default_value = DEFAULT_MODEL)]
    pub llm_model: String,

    /// Request timeout for both services, in seconds.
    #[arg(long, env = "ADEVO_HTTP_TIMEOUT_SECS", global = true, default_value_t = 30)]
    pub http_timeout_secs: u64,
}

/// The two ports the flows call out to.
pub struct Providers {
    pub lookup: Box<dyn IdentityLookup>,
    pub drafter: Box<dyn LetterGenerator>,
    pub lookup_kind: &'static str,
    pub drafter_kind: &'static str,
}

impl ProviderArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn providers(&self) -> anyhow::Result<Providers> {
        let (lookup, lookup_kind): (Box<dyn IdentityLookup>, _) = match &self.kyc_url {
            Some(url) => {
                let client = HttpLookup::new(url.clone(), self.kyc_token.clone(), self.timeout())
                    .context("building identity service client")?;
                (Box::new(client), "http")
            }
            None => (Box::new(FixtureLookup::demo()), "demo"),
        };

        let (drafter, drafter_kind): (Box<dyn LetterGenerator>, _) = match &self.llm_api_key {
            Some(key) => {
                let client = ClaudeDrafter::new(
                    self.llm_url.clone(),
                    key.clone(),
                    self.llm_model.clone(),
                    self.timeout(),
                )
                .context("building letter drafting client")?;
                (Box::new(client), "llm")
            }
            None => (Box::new(TemplateDrafter::new()), "template"),
        };

        info!(lookup = lookup_kind, drafter = drafter_kind, "providers configured");
        Ok(Providers {
            lookup,
            drafter,
            lookup_kind,
            drafter_kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        providers: ProviderArgs,
    }

    fn parse(args: &[&str]) -> ProviderArgs {
        let mut argv = vec!["adevo"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().providers
    }

    #[test]
    fn defaults_point_at_anthropic() {
        let args = parse(&[]);
        assert_eq!(args.llm_url, DEFAULT_BASE_URL);
        assert_eq!(args.llm_model, DEFAULT_MODEL);
    }

    #[test]
    fn timeout_is_configurable() {
        let args = parse(&["--http-timeout-secs", "5"]);
        assert_eq!(args.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn offline_providers_without_endpoints() {
        let mut args = parse(&[]);
        args.kyc_url = None;
        args.llm_api_key = None;
        let providers = args.providers().unwrap();
        assert_eq!(providers.lookup_kind, "demo");
        assert_eq!(providers.drafter_kind, "template");
    }

    #[test]
    fn remote_providers_when_configured() {
        let args = parse(&[
            "--kyc-url",
            "https://kyc.example.com/",
            "--kyc-token",
            "secret",
            "--llm-api-key",
            "test-key",
        ]);
        let providers = args.providers().unwrap();
        assert_eq!(providers.lookup_kind, "http");
        assert_eq!(providers.drafter_kind, "llm");
    }
}
