//! OpenPGP encryption engine
//!
//! The engine hands back an [`EncryptionResult`] without interpreting it.
//! Turning that result into a validated armored string is the job of
//! [`crate::normalize`], which copes with every shape the result can take:
//!
//! - `data` holding the armored text directly
//! - `data` holding raw bytes, with a lazily serialized `message` alongside
//! - nothing usable except the result's own string form

use crate::envelope::PlaintextEnvelope;
use crate::error::{ContactError, Result};
use crate::keys::PublicKeyMaterial;
use sequoia_openpgp as openpgp;
use openpgp::armor;
use openpgp::policy::StandardPolicy;
use openpgp::serialize::stream::{Encryptor, LiteralWriter, Message, Recipient};
use std::fmt;
use std::io::Write;
use tracing::debug;

/// Contents of the `data` field of an encryption result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

/// A message object that is only serialized to armored text on request
pub trait ArmoredMessage: fmt::Debug + Send + Sync {
    fn write(&self) -> Result<String>;
}

/// Raw output of an encryption call
#[derive(Debug, Default)]
pub struct EncryptionResult {
    pub data: Option<Payload>,
    pub message: Option<Box<dyn ArmoredMessage>>,
}

impl fmt::Display for EncryptionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.data, &self.message) {
            (Some(Payload::Text(text)), _) => f.write_str(text),
            (Some(Payload::Bytes(bytes)), _) => match std::str::from_utf8(bytes) {
                Ok(text) => f.write_str(text),
                Err(_) => write!(f, "[{} bytes of binary data]", bytes.len()),
            },
            (None, Some(_)) => f.write_str("[sealed OpenPGP message]"),
            (None, None) => f.write_str("[empty encryption result]"),
        }
    }
}

/// Asymmetric encryption to a recipient public key
pub trait EncryptionPrimitive: Send + Sync {
    fn encrypt(
        &self,
        plaintext: &PlaintextEnvelope,
        key: &PublicKeyMaterial,
    ) -> Result<EncryptionResult>;
}

/// Binary OpenPGP packets, armored when written
#[derive(Clone)]
pub struct SealedMessage {
    packets: Vec<u8>,
}

impl SealedMessage {
    pub fn new(packets: Vec<u8>) -> Self {
        Self { packets }
    }

    pub fn packets(&self) -> &[u8] {
        &self.packets
    }
}

impl fmt::Debug for SealedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedMessage")
            .field("len", &self.packets.len())
            .finish()
    }
}

impl ArmoredMessage for SealedMessage {
    fn write(&self) -> Result<String> {
        let mut writer = armor::Writer::new(Vec::new(), armor::Kind::Message)
            .map_err(|e| ContactError::Encryption(format!("armor writer failed: {}", e)))?;
        writer.write_all(&self.packets)?;
        let armored = writer
            .finalize()
            .map_err(|e| ContactError::Encryption(format!("armor finalize failed: {}", e)))?;

        String::from_utf8(armored)
            .map_err(|e| ContactError::Encryption(format!("armor output not UTF-8: {}", e)))
    }
}

/// Sequoia-backed encryption to every valid transport-encryption subkey
#[derive(Debug, Default)]
pub struct SequoiaEngine;

impl SequoiaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl EncryptionPrimitive for SequoiaEngine {
    fn encrypt(
        &self,
        plaintext: &PlaintextEnvelope,
        key: &PublicKeyMaterial,
    ) -> Result<EncryptionResult> {
        let policy = StandardPolicy::new();
        let recipients: Vec<Recipient<'_>> = key
            .cert()
            .keys()
            .with_policy(&policy, None)
            .supported()
            .alive()
            .revoked(false)
            .for_transport_encryption()
            .map(Into::into)
            .collect();

        if recipients.is_empty() {
            return Err(ContactError::Encryption(
                "public key has no usable encryption subkey".to_string(),
            ));
        }

        let mut sink = Vec::new();
        let message = Message::new(&mut sink);
        let message = Encryptor::for_recipients(message, recipients)
            .build()
            .map_err(|e| ContactError::Encryption(format!("encryptor failed: {}", e)))?;
        let mut message = LiteralWriter::new(message)
            .build()
            .map_err(|e| ContactError::Encryption(format!("literal writer failed: {}", e)))?;
        message
            .write_all(plaintext.as_str().as_bytes())
            .map_err(|e| ContactError::Encryption(format!("write failed: {}", e)))?;
        message
            .finalize()
            .map_err(|e| ContactError::Encryption(format!("finalize failed: {}", e)))?;

        // Armor is requested explicitly; the binary form is kept as the lazy message.
        let sealed = SealedMessage::new(sink);
        let armored = sealed.write()?;
        debug!(
            plaintext_len = plaintext.as_str().len(),
            packets_len = sealed.packets().len(),
            armored_len = armored.len(),
            "Encrypted message"
        );

        Ok(EncryptionResult {
            data: Some(Payload::Text(armored)),
            message: Some(Box::new(sealed)),
        })
    }
}
