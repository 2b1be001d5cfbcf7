//! Key fixtures shared by the unit tests

use crate::keys::PublicKeyMaterial;
use sequoia_openpgp as openpgp;
use openpgp::cert::prelude::*;
use openpgp::serialize::SerializeInto;
use openpgp::Cert;
use std::path::PathBuf;
use tempfile::TempDir;

pub const KEY_FILE_NAME: &str = "recipient-pub-key.asc";

fn armor(cert: &Cert) -> String {
    let bytes = cert.armored().to_vec().expect("serialize armored cert");
    String::from_utf8(bytes).expect("armor is UTF-8")
}

/// Freshly generated public key with an encryption subkey, armored
pub fn armored_public_key() -> String {
    let (cert, _) = CertBuilder::general_purpose(Some("Recipient <recipient@example.com>"))
        .set_cipher_suite(CipherSuite::Cv25519)
        .generate()
        .expect("keygen");
    armor(&cert)
}

pub fn public_key_material() -> PublicKeyMaterial {
    PublicKeyMaterial::from_armored(&armored_public_key()).expect("parse generated key")
}

/// Key that can certify and sign but not encrypt
pub fn signing_only_key_material() -> PublicKeyMaterial {
    let (cert, _) = CertBuilder::new()
        .add_userid("Signer <signer@example.com>")
        .add_signing_subkey()
        .set_cipher_suite(CipherSuite::Cv25519)
        .generate()
        .expect("keygen");
    PublicKeyMaterial::from_armored(&armor(&cert)).expect("parse generated key")
}

/// Writes `contents` to a key file inside a fresh temporary directory
pub fn write_key_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(KEY_FILE_NAME);
    std::fs::write(&path, contents).expect("write key file");
    (dir, path)
}
