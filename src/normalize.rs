//! Extraction of armored ciphertext from an encryption result
//!
//! Encryption results do not have one guaranteed shape, so the armored text is
//! pulled out by a fixed, ordered list of extractors. The first candidate that
//! passes [`check_armor`] wins. When none does, the request fails; a partial
//! or unarmored string never leaves this module.

use crate::engine::{EncryptionResult, Payload};
use crate::error::{ContactError, Result};
use tracing::{debug, warn};

/// Literal first line of every accepted ciphertext
pub const ARMOR_HEADER: &str = "-----BEGIN PGP MESSAGE-----";

/// Shortest ciphertext accepted
pub const MIN_ARMORED_LEN: usize = 50;

/// Produces a candidate string from an encryption result, if it can
pub type Extractor = fn(&EncryptionResult) -> Option<String>;

/// Extraction strategies in the order they are tried
pub const STRATEGIES: &[(&str, Extractor)] = &[
    ("data", from_data_field),
    ("message.write", from_message_write),
    ("to_string", from_display),
];

/// Validated ASCII-armored ciphertext
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmoredCiphertext(String);

impl ArmoredCiphertext {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Runs the extractor chain over `result`
pub fn normalize(result: &EncryptionResult) -> Result<ArmoredCiphertext> {
    for (name, extract) in STRATEGIES {
        let Some(candidate) = extract(result).filter(|c| !c.is_empty()) else {
            debug!(strategy = *name, "Extractor produced nothing");
            continue;
        };

        match check_armor(&candidate) {
            Ok(()) => {
                debug!(strategy = *name, len = candidate.len(), "Extracted armored ciphertext");
                return Ok(ArmoredCiphertext(candidate));
            }
            Err(reason) => {
                warn!(strategy = *name, len = candidate.len(), reason, "Rejected extractor output");
            }
        }
    }

    Err(ContactError::OutputExtraction(
        "Encryption failed: Could not retrieve PGP armored block.".to_string(),
    ))
}

/// Structural check applied to every candidate
pub fn check_armor(candidate: &str) -> std::result::Result<(), &'static str> {
    if candidate.is_empty() {
        Err("empty")
    } else if candidate.len() < MIN_ARMORED_LEN {
        Err("too short")
    } else if !candidate.starts_with(ARMOR_HEADER) {
        Err("missing armor header")
    } else {
        Ok(())
    }
}

/// `data` is used only when it is already text
fn from_data_field(result: &EncryptionResult) -> Option<String> {
    match &result.data {
        Some(Payload::Text(text)) => Some(text.clone()),
        _ => None,
    }
}

fn from_message_write(result: &EncryptionResult) -> Option<String> {
    let message = result.message.as_ref()?;
    match message.write() {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(error = %e, "Message serialization failed");
            None
        }
    }
}

/// Last resort: the whole result as a string, but only if that is already armor.
/// Byte payloads must be valid UTF-8 as a whole; nothing is lossily replaced.
fn from_display(result: &EncryptionResult) -> Option<String> {
    let text = match &result.data {
        Some(Payload::Bytes(bytes)) => String::from_utf8(bytes.clone()).ok()?,
        _ => result.to_string(),
    };
    check_armor(&text).ok().map(|_| text)
}
