//! mailto: URI composition

use crate::normalize::ArmoredCiphertext;

/// Subject used when the submission does not supply one
pub const DEFAULT_SUBJECT: &str = "[PGP] Secure Message";

/// Builds `mailto:{recipient}?subject={subject}&body={body}`.
///
/// Subject and body are percent-encoded; the recipient is inserted as given.
pub fn compose(recipient: &str, subject: Option<&str>, body: &ArmoredCiphertext) -> String {
    let subject = subject.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SUBJECT);
    format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        urlencoding::encode(subject),
        urlencoding::encode(body.as_str())
    )
}
