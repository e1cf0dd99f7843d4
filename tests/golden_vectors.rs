//! Golden test vector validation
//!
//! The vectors in testdata/golden-vectors.json were generated with
//! OpenSSL (`enc -aes-256-cbc -md md5`) and every envelope was verified
//! to decrypt with OpenSSL reading the "Salted__" header. Matching them
//! byte for byte pins this implementation to the wire format.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GoldenVector {
    /// Base64 of the plaintext bytes
    plaintext: String,
    /// Base64 of the passphrase bytes
    passphrase: String,
    /// Base64 of the 8-byte salt
    salt: String,
    /// The armored envelope exactly as an interoperating tool emits it
    envelope: String,
    comment: String,
}

fn load_golden_vectors() -> Vec<GoldenVector> {
    let json_data = include_str!("../testdata/golden-vectors.json");
    serde_json::from_str(json_data).expect("failed to parse golden vectors")
}

#[test]
fn test_golden_vectors() {
    let vectors = load_golden_vectors();
    assert!(!vectors.is_empty(), "no golden vectors loaded");

    for (i, vector) in vectors.iter().enumerate() {
        let plaintext = BASE64_STANDARD
            .decode(&vector.plaintext)
            .expect("failed to decode plaintext");
        let passphrase = BASE64_STANDARD
            .decode(&vector.passphrase)
            .expect("failed to decode passphrase");
        let salt: [u8; 8] = BASE64_STANDARD
            .decode(&vector.salt)
            .expect("failed to decode salt")
            .try_into()
            .expect("salt must be 8 bytes");

        // Deterministic encryption must reproduce the envelope exactly
        let envelope = cryptext::secretcrypt::encrypt_deterministic(&passphrase, &plaintext, &salt);
        let armored = cryptext::armor::wrap(&envelope);
        assert_eq!(
            armored, vector.envelope,
            "vector {} ({}): envelope mismatch",
            i, vector.comment
        );

        // And the externally produced envelope must open to the same plaintext
        let opened = cryptext::textcrypt::open_bytes(&passphrase, &vector.envelope)
            .unwrap_or_else(|e| panic!("vector {} ({}): open failed: {}", i, vector.comment, e));
        assert_eq!(
            opened, plaintext,
            "vector {} ({}): plaintext mismatch",
            i, vector.comment
        );
    }
}

/// Every golden envelope decodes to "Salted__" + salt + 16k ciphertext bytes.
#[test]
fn test_golden_vectors_envelope_shape() {
    for vector in load_golden_vectors() {
        let raw = BASE64_STANDARD
            .decode(&vector.envelope)
            .expect("envelope must be valid base64");
        assert_eq!(&raw[..8], b"Salted__");
        assert_eq!(
            BASE64_STANDARD.encode(&raw[8..16]),
            vector.salt,
            "embedded salt must match the declared salt"
        );
        let ciphertext_len = raw.len() - 16;
        assert!(ciphertext_len >= 16);
        assert_eq!(ciphertext_len % 16, 0);
    }
}
