//! Service configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::stripe::{StripeClient, StripeClientOptions};
use crate::workflow::CustomerMatch;

/// Service name reported by the liveness endpoint.
pub const SERVICE_NAME: &str = "stripe-backend";

/// Port used when `SERVER_PORT` is unset.
pub const DEFAULT_PORT: u16 = 3001;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Host to bind (default: "0.0.0.0").
    pub listen_host: String,

    /// Port to listen on (default: 3001).
    pub port: u16,

    /// Stripe secret API key (optional; payments fail without it).
    pub stripe_api_key: Option<String>,

    /// Stripe API base URL.
    pub stripe_api_base: String,

    /// Timeout for outbound Stripe requests in seconds.
    pub stripe_timeout_seconds: u64,

    /// How to choose between customers sharing an email.
    pub customer_match: CustomerMatch,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_host: std::env::var("LISTEN_HOST").unwrap_or(defaults.listen_host),
            port: parse_env("SERVER_PORT").unwrap_or(defaults.port),
            stripe_api_key: load_stripe_api_key(),
            stripe_api_base: std::env::var("STRIPE_API_BASE").unwrap_or(defaults.stripe_api_base),
            stripe_timeout_seconds: parse_env("STRIPE_TIMEOUT_SECONDS")
                .unwrap_or(defaults.stripe_timeout_seconds),
            customer_match: parse_env("CUSTOMER_MATCH").unwrap_or(defaults.customer_match),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or(defaults.cors_origins),
            max_body_bytes: parse_env("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
        }
    }

    /// Address to bind the HTTP listener to.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.port)
    }

    /// Whether a Stripe secret key is available.
    #[must_use]
    pub fn has_stripe_key(&self) -> bool {
        self.stripe_api_key.is_some()
    }

    /// Options for the Stripe client.
    #[must_use]
    pub fn stripe_options(&self) -> StripeClientOptions {
        StripeClientOptions {
            base_url: self.stripe_api_base.clone(),
            timeout: Duration::from_secs(self.stripe_timeout_seconds),
        }
    }
}

/// Parse an environment variable, logging and ignoring malformed values.
fn parse_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, value = %raw, error = %e, "Ignoring invalid configuration value");
            None
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Load the Stripe key from the environment or a secrets file.
fn load_stripe_api_key() -> Option<String> {
    if let Some(key) = std::env::var("STRIPE_SECRET_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
    {
        return Some(key);
    }

    let secret_paths = [".secrets/stripe.json", "../.secrets/stripe.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<StripeSecrets>(path) {
            tracing::info!(path = %path, "Loaded Stripe secrets from file");
            return Some(secrets.api_key);
        }
    }

    None
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            stripe_api_key: None,
            stripe_api_base: StripeClient::BASE_URL.into(),
            stripe_timeout_seconds: 80,
            customer_match: CustomerMatch::First,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
        }
    }
}
