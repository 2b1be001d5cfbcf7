//! Plaintext composition

use crate::request::ValidatedContact;
use std::fmt;

/// The text that gets encrypted: a `From:` line, a blank line, then the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaintextEnvelope(String);

impl PlaintextEnvelope {
    pub fn compose(name: &str, email: &str, message: &str) -> Self {
        Self(format!("From: {} <{}>\n\n{}", name, email, message))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&ValidatedContact> for PlaintextEnvelope {
    fn from(contact: &ValidatedContact) -> Self {
        Self::compose(&contact.name, &contact.email, &contact.message)
    }
}

impl fmt::Display for PlaintextEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose() {
        let envelope = PlaintextEnvelope::compose("Ann", "ann@x.com", "hi");
        assert_eq!(envelope.as_str(), "From: Ann <ann@x.com>\n\nhi");
    }

    #[test]
    fn test_message_kept_verbatim() {
        let envelope = PlaintextEnvelope::compose("A", "a@b", "line one\nline two\n\n-- \nsig");
        assert!(envelope.as_str().ends_with("\n\nline one\nline two\n\n-- \nsig"));
    }
}
