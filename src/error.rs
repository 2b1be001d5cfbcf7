//! Error types for the contact pipeline

use hyper::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning a contact submission into a mailto link
#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Public key not found at {}", .0.display())]
    KeyNotFound(PathBuf),

    #[error("Key parse error: {0}")]
    KeyParse(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Output extraction error: {0}")]
    OutputExtraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContactError {
    /// HTTP status the handler answers with for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short, stable message suitable for the `error` field of a response
    pub fn summary(&self) -> String {
        match self {
            ContactError::Validation(msg) => msg.clone(),
            ContactError::MethodNotAllowed(_) => "Method Not Allowed. Use POST.".to_string(),
            ContactError::KeyNotFound(_) => "Server key file not found.".to_string(),
            ContactError::KeyParse(_) | ContactError::Encryption(_) => {
                "PGP encryption error.".to_string()
            }
            _ => "Server-side encryption failed.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
