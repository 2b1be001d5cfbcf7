//! Contact form handler
//!
//! Runs one submission through the pipeline and maps the outcome to a status
//! code and JSON body:
//!
//! | Outcome              | Status | Body                                   |
//! |----------------------|--------|----------------------------------------|
//! | `OPTIONS`            | 200    | empty                                  |
//! | success              | 200    | `{success: true, mailtoUrl}`           |
//! | bad input            | 400    | `{error}`                              |
//! | other method         | 405    | `{error}`                              |
//! | pipeline failure     | 500    | `{success: false, error, details}`     |
//!
//! Steps run strictly in order: validate, load key, compose plaintext,
//! encrypt, normalize, build the mailto link. The first failure ends the
//! request.

use crate::config::ContactConfig;
use crate::engine::{EncryptionPrimitive, EncryptionResult, SequoiaEngine};
use crate::envelope::PlaintextEnvelope;
use crate::error::{ContactError, Result};
use crate::keys::{KeyLoader, PublicKeyMaterial};
use crate::mailto;
use crate::normalize::normalize;
use crate::request::ContactRequest;
use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Successful response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
    #[serde(rename = "mailtoUrl")]
    pub mailto_url: String,
}

/// Response body for 500 errors
#[derive(Debug, Serialize, Deserialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
    pub details: String,
}

/// Response body for 400 and 405 errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientErrorBody {
    pub error: String,
}

/// Transport-independent response
#[derive(Debug)]
pub struct ContactResponse {
    pub status: StatusCode,
    pub body: Option<serde_json::Value>,
}

impl ContactResponse {
    fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|_| {
            serde_json::json!({ "success": false, "error": "Internal error" })
        });
        Self {
            status,
            body: Some(body),
        }
    }
}

/// Handler for contact form submissions
pub struct ContactHandler {
    config: ContactConfig,
    key_loader: KeyLoader,
    engine: Arc<dyn EncryptionPrimitive>,
}

impl ContactHandler {
    /// Creates a handler backed by the Sequoia engine
    pub fn new(config: ContactConfig) -> Self {
        Self::with_engine(config, Arc::new(SequoiaEngine::new()))
    }

    /// Creates a handler with a specific encryption primitive
    pub fn with_engine(config: ContactConfig, engine: Arc<dyn EncryptionPrimitive>) -> Self {
        Self {
            key_loader: KeyLoader::new(config.public_key_path.clone()),
            config,
            engine,
        }
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// Handles one request
    pub async fn handle(&self, method: &Method, body: &[u8]) -> ContactResponse {
        match *method {
            Method::OPTIONS => ContactResponse::empty(StatusCode::OK),
            Method::POST => match self.process(body).await {
                Ok(mailto_url) => ContactResponse::json(
                    StatusCode::OK,
                    &SuccessBody {
                        success: true,
                        mailto_url,
                    },
                ),
                Err(e) => self.error_response(&e),
            },
            _ => self.error_response(&ContactError::MethodNotAllowed(method.to_string())),
        }
    }

    /// Runs the pipeline and returns the mailto URL
    pub async fn process(&self, body: &[u8]) -> Result<String> {
        let contact = ContactRequest::from_json(body)?
            .validate(self.config.default_recipient.as_deref())?;
        debug!(recipient = %contact.recipient, "Validated contact submission");

        let key = self.key_loader.load().await?;
        let envelope = PlaintextEnvelope::from(&contact);
        let result = self.encrypt(envelope, key).await?;
        let armored = normalize(&result)?;

        let url = mailto::compose(&contact.recipient, contact.subject_line.as_deref(), &armored);
        info!(
            recipient = %contact.recipient,
            ciphertext_len = armored.as_str().len(),
            "Built encrypted mailto link"
        );
        Ok(url)
    }

    /// Runs the primitive on the blocking pool, bounded by the configured timeout
    async fn encrypt(
        &self,
        envelope: PlaintextEnvelope,
        key: PublicKeyMaterial,
    ) -> Result<EncryptionResult> {
        let engine = Arc::clone(&self.engine);
        let timeout = self.config.encryption_timeout;
        let task = tokio::task::spawn_blocking(move || engine.encrypt(&envelope, &key));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ContactError::Encryption(format!(
                "encryption task failed: {}",
                e
            ))),
            Err(_) => Err(ContactError::Encryption(format!(
                "encryption timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }

    /// Maps an error to its response
    pub fn error_response(&self, err: &ContactError) -> ContactResponse {
        let status = err.status();
        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %err, "Rejected request");
            return ContactResponse::json(
                status,
                &ClientErrorBody {
                    error: err.summary(),
                },
            );
        }

        error!(status = status.as_u16(), error = %err, "Encryption pipeline failed");
        let details = if self.config.expose_error_details {
            err.to_string()
        } else {
            err.summary()
        };
        ContactResponse::json(
            status,
            &FailureBody {
                success: false,
                error: err.summary(),
                details,
            },
        )
    }
}
