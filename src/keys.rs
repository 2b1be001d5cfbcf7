//! Recipient public key loading
//!
//! The key is read from disk on every request. Nothing is cached between
//! requests, so replacing the file on disk takes effect immediately at the
//! cost of one read and parse per submission.

use crate::error::{ContactError, Result};
use sequoia_openpgp as openpgp;
use openpgp::parse::Parse;
use openpgp::Cert;
use std::path::PathBuf;
use tracing::{debug, info};

/// Armor header expected at the top of the key file
pub const PUBLIC_KEY_ARMOR_HEADER: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";

/// A parsed recipient certificate, owned by a single request
#[derive(Debug, Clone)]
pub struct PublicKeyMaterial {
    cert: Cert,
}

impl PublicKeyMaterial {
    /// Parses an ASCII-armored public key
    pub fn from_armored(armored: &str) -> Result<Self> {
        if !armored.trim_start().starts_with(PUBLIC_KEY_ARMOR_HEADER) {
            return Err(ContactError::KeyParse(
                "content is not an ASCII-armored public key".to_string(),
            ));
        }

        let cert = Cert::from_bytes(armored.as_bytes())
            .map_err(|e| ContactError::KeyParse(format!("invalid public key: {}", e)))?;

        Ok(Self { cert })
    }

    pub fn cert(&self) -> &Cert {
        &self.cert
    }

    /// Hex fingerprint of the primary key
    pub fn fingerprint(&self) -> String {
        self.cert.fingerprint().to_hex()
    }
}

/// Loads the recipient key from a fixed path
#[derive(Debug, Clone)]
pub struct KeyLoader {
    path: PathBuf,
}

impl KeyLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads and parses the key file.
    ///
    /// Existence is checked before reading so a missing file is reported as
    /// [`ContactError::KeyNotFound`] rather than a generic I/O failure.
    pub async fn load(&self) -> Result<PublicKeyMaterial> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(ContactError::KeyNotFound(self.path.clone()));
        }

        let bytes = tokio::fs::read(&self.path).await?;
        let armored = String::from_utf8(bytes)
            .map_err(|_| ContactError::KeyParse("key file is not UTF-8 armored text".to_string()))?;
        debug!(path = %self.path.display(), len = armored.len(), "Read public key file");

        let key = PublicKeyMaterial::from_armored(&armored)?;
        info!(fingerprint = %key.fingerprint(), "Loaded recipient public key");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_load_valid_key() {
        let (_dir, path) = test_support::write_key_file(&test_support::armored_public_key());
        let key = KeyLoader::new(&path).load().await.expect("key should load");
        assert!(!key.fingerprint().is_empty());
        assert!(!key.cert().is_tsk());
    }

    #[tokio::test]
    async fn test_missing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.asc");
        let err = KeyLoader::new(&path).load().await.unwrap_err();
        match err {
            ContactError::KeyNotFound(p) => assert_eq!(p, path),
            other => panic!("expected KeyNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unarmored_content() {
        let (_dir, path) = test_support::write_key_file("this is not a key");
        let err = KeyLoader::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ContactError::KeyParse(_)));
    }

    #[tokio::test]
    async fn test_binary_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.gpg");
        std::fs::write(&path, [0x99, 0x01, 0x0d, 0xff, 0xfe, 0x80]).unwrap();

        let err = KeyLoader::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ContactError::KeyParse(_)));
        assert_eq!(err.summary(), "PGP encryption error.");
    }

    #[tokio::test]
    async fn test_corrupt_armor_body() {
        let corrupt = format!(
            "{}\n\nAAAAnot-really-base64!!\n-----END PGP PUBLIC KEY BLOCK-----\n",
            PUBLIC_KEY_ARMOR_HEADER
        );
        let (_dir, path) = test_support::write_key_file(&corrupt);
        let err = KeyLoader::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ContactError::KeyParse(_)));
    }

    #[tokio::test]
    async fn test_reload_picks_up_replaced_file() {
        let (_dir, path) = test_support::write_key_file(&test_support::armored_public_key());
        let loader = KeyLoader::new(&path);
        let first = loader.load().await.unwrap().fingerprint();

        std::fs::write(&path, test_support::armored_public_key()).unwrap();
        let second = loader.load().await.unwrap().fingerprint();
        assert_ne!(first, second);
    }
}
