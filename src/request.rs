//! Contact form submission and its validation

use crate::error::{ContactError, Result};
use serde::Deserialize;

/// Raw contact form submission as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default, rename = "subjectLine")]
    pub subject_line: Option<String>,
}

/// A submission that passed validation, with the recipient resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContact {
    pub name: String,
    pub email: String,
    pub message: String,
    pub recipient: String,
    pub subject_line: Option<String>,
}

impl ContactRequest {
    /// Parses a JSON request body
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|_| ContactError::Validation("Invalid JSON data.".to_string()))
    }

    /// Checks required fields and resolves the recipient.
    ///
    /// `email` is deliberately not format-checked; it is carried as an opaque
    /// string into the plaintext. A missing recipient falls back to
    /// `default_recipient`; with neither, the request is rejected.
    pub fn validate(self, default_recipient: Option<&str>) -> Result<ValidatedContact> {
        let (name, email, message) = match (
            non_empty(self.name),
            non_empty(self.email),
            non_empty(self.message),
        ) {
            (Some(name), Some(email), Some(message)) => (name, email, message),
            _ => {
                return Err(ContactError::Validation(
                    "Missing required fields: name, email, or message.".to_string(),
                ))
            }
        };

        let recipient = non_empty(self.recipient)
            .or_else(|| non_empty(default_recipient.map(str::to_string)))
            .ok_or_else(|| {
                ContactError::Validation("Missing required field: recipient.".to_string())
            })?;
        check_recipient(&recipient)?;

        Ok(ValidatedContact {
            name,
            email,
            message,
            recipient,
            subject_line: non_empty(self.subject_line),
        })
    }
}

/// The recipient is placed verbatim before the `?` of the mailto link, so it
/// must not carry URI delimiters that could start or split the query.
fn check_recipient(recipient: &str) -> Result<()> {
    let invalid = recipient
        .chars()
        .any(|c| matches!(c, '?' | '&' | '#' | '%') || c.is_whitespace() || c.is_control());
    if invalid {
        return Err(ContactError::Validation(
            "Invalid recipient address.".to_string(),
        ));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> ContactRequest {
        ContactRequest {
            name: Some("Ann".into()),
            email: Some("ann@x.com".into()),
            message: Some("hi".into()),
            recipient: Some("bob@y.com".into()),
            subject_line: None,
        }
    }

    #[test]
    fn test_valid_request() {
        let contact = full_request().validate(None).unwrap();
        assert_eq!(contact.name, "Ann");
        assert_eq!(contact.recipient, "bob@y.com");
        assert!(contact.subject_line.is_none());
    }

    #[test]
    fn test_missing_required_fields() {
        let cases: [fn(&mut ContactRequest); 6] = [
            |r| r.name = None,
            |r| r.email = None,
            |r| r.message = None,
            |r| r.name = Some(String::new()),
            |r| r.email = Some(String::new()),
            |r| r.message = Some(String::new()),
        ];
        for strip in cases {
            let mut request = full_request();
            strip(&mut request);
            let err = request.validate(Some("fallback@y.com")).unwrap_err();
            assert!(matches!(err, ContactError::Validation(ref m) if m.contains("Missing required")));
        }
    }

    #[test]
    fn test_email_is_not_format_checked() {
        let mut request = full_request();
        request.email = Some("not an address".into());
        assert_eq!(request.validate(None).unwrap().email, "not an address");
    }

    #[test]
    fn test_recipient_fallback() {
        let mut request = full_request();
        request.recipient = Some(String::new());
        let contact = request.clone().validate(Some("sec@y.com")).unwrap();
        assert_eq!(contact.recipient, "sec@y.com");

        let err = request.validate(None).unwrap_err();
        assert!(err.to_string().contains("recipient"));
    }

    #[test]
    fn test_recipient_with_uri_delimiters_rejected() {
        for recipient in [
            "bob@y.com?body=PLAINTEXT-secret&x=",
            "bob@y.com&body=x",
            "bob@y.com#frag",
            "bob@y.com%3Fbody=x",
            "bob @y.com",
            "bob@y.com\r\nBcc: eve@z.com",
        ] {
            let mut request = full_request();
            request.recipient = Some(recipient.into());
            let err = request.validate(None).unwrap_err();
            assert!(matches!(err, ContactError::Validation(ref m) if m == "Invalid recipient address."));
        }
    }

    #[test]
    fn test_default_recipient_is_checked_too() {
        let mut request = full_request();
        request.recipient = None;
        let err = request.validate(Some("sec@y.com?cc=eve@z.com")).unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
    }

    #[test]
    fn test_from_json_field_names() {
        let body = br#"{"name":"Ann","email":"ann@x.com","message":"hi","recipient":"bob@y.com","subjectLine":"Hello"}"#;
        let request = ContactRequest::from_json(body).unwrap();
        assert_eq!(request.subject_line.as_deref(), Some("Hello"));

        let contact = request.validate(None).unwrap();
        assert_eq!(contact.subject_line.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        for body in [&b"not json"[..], b"[1,2]", b"\"text\""] {
            let err = ContactRequest::from_json(body).unwrap_err();
            assert!(matches!(err, ContactError::Validation(ref m) if m == "Invalid JSON data."));
        }
    }
}
