//! Runtime configuration for the contact endpoint
//!
//! Values come from compile-time defaults, overridable through environment
//! variables when the binary starts:
//!
//! ```bash
//! PUBLIC_KEY_PATH=/srv/keys/recipient.asc \
//! DEFAULT_RECIPIENT=security@example.com \
//! PORT=8080 \
//! pgp-mailto
//! ```

use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// DEFAULTS - Override through the environment in deployment
// =============================================================================

/// Armored public key the messages are encrypted to
pub const PUBLIC_KEY_PATH: &str = "./recipient-pub-key.asc";

/// HTTP listen port
pub const HTTP_PORT: u16 = 5000;

/// Upper bound on one encryption call
pub const ENCRYPTION_TIMEOUT_SECS: u64 = 10;

/// Largest request body accepted
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// =============================================================================

/// Configuration for the contact handler
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Location of the recipient's ASCII-armored public key
    pub public_key_path: PathBuf,
    /// Port for the HTTP server
    pub port: u16,
    /// Recipient used when a submission does not name one
    pub default_recipient: Option<String>,
    /// Timeout applied to the encryption step
    pub encryption_timeout: Duration,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
    /// Whether raw diagnostics are returned in the `details` field
    pub expose_error_details: bool,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self::new(PUBLIC_KEY_PATH)
    }
}

impl ContactConfig {
    /// Creates a configuration for the given key file with default settings
    pub fn new(public_key_path: impl Into<PathBuf>) -> Self {
        Self {
            public_key_path: public_key_path.into(),
            port: HTTP_PORT,
            default_recipient: None,
            encryption_timeout: Duration::from_secs(ENCRYPTION_TIMEOUT_SECS),
            max_body_bytes: MAX_BODY_BYTES,
            expose_error_details: true,
        }
    }

    /// Sets the fallback recipient address
    pub fn with_default_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.default_recipient = Some(recipient.into());
        self
    }

    /// Sets the encryption timeout
    pub fn with_encryption_timeout(mut self, timeout: Duration) -> Self {
        self.encryption_timeout = timeout;
        self
    }

    /// Builds the configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new(
            lookup("PUBLIC_KEY_PATH").unwrap_or_else(|| PUBLIC_KEY_PATH.to_string()),
        );

        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            default_recipient: lookup("DEFAULT_RECIPIENT").filter(|r| !r.trim().is_empty()),
            encryption_timeout: lookup("ENCRYPTION_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.encryption_timeout),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            expose_error_details: lookup("EXPOSE_ERROR_DETAILS")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(defaults.expose_error_details),
            ..defaults
        }
    }
}
