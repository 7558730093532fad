//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TRADEWIND_API_BASE_URL` - Base URL of the remote store API
//! - `TRADEWIND_API_TOKEN` - Store API access token (high entropy)
//!
//! ## Optional
//! - `TRADEWIND_LINE_CAP` - Per-line quantity cap (default: 10)

use secrecy::SecretString;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

use crate::cart::StockGuard;
use crate::cart::stock::DEFAULT_LINE_CAP;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct StoreConfig {
    /// Base URL of the remote store API; always ends with a slash so
    /// endpoint paths join underneath it.
    pub api_base_url: Url,
    /// Store API access token.
    pub api_token: SecretString,
    /// Per-line quantity cap for the stock guard.
    pub line_cap: u32,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_token", &"[REDACTED]")
            .field("line_cap", &self.line_cap)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid,
    /// or if the token fails validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw_base = get_required_env("TRADEWIND_API_BASE_URL")?;
        let api_base_url = parse_base_url(&raw_base)?;
        let api_token = get_validated_secret("TRADEWIND_API_TOKEN")?;
        let line_cap = match std::env::var("TRADEWIND_LINE_CAP") {
            Ok(value) => value.parse::<u32>().map_err(|e| {
                ConfigError::InvalidEnvVar("TRADEWIND_LINE_CAP".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_LINE_CAP,
        };

        Ok(Self {
            api_base_url,
            api_token,
            line_cap,
        })
    }

    /// Stock guard configured with this store's line cap.
    #[must_use]
    pub const fn stock_guard(&self) -> StockGuard {
        StockGuard::with_cap(self.line_cap)
    }
}

/// Parse and normalize the API base URL; a trailing slash is required for
/// `Url::join` to treat the last path segment as a directory.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar("TRADEWIND_API_BASE_URL".to_string(), e.to_string()))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API tokens have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
