//! String-level seal/open operations
//!
//! The API the surrounding application calls: passphrase and message in,
//! armored envelope out, and the reverse. Composes [`crate::secretcrypt`]
//! with [`crate::armor`] and adds the UTF-8 check on decrypted bytes.
//!
//! Both operations are stateless and reentrant; nothing is cached
//! between calls.

use crate::armor;
use crate::error::{CryptextError, ErrorCategory, ErrorKind, Result};
use crate::secretcrypt;

/// Encrypt a message, returning the armored envelope
pub fn seal(passphrase: &[u8], plaintext: &str) -> Result<String> {
    let envelope = secretcrypt::encrypt(passphrase, plaintext.as_bytes())?;
    Ok(armor::wrap(&envelope))
}

/// Decrypt an armored envelope, returning the message text
///
/// Fails with the `InvalidEncoding` kind when the decrypted bytes are
/// not valid UTF-8. Since the format carries no authentication tag this
/// usually means a wrong passphrase whose garbage output slipped past
/// the padding check; it can also mean the envelope legitimately holds
/// binary data, in which case [`open_bytes`] is the right call.
pub fn open(passphrase: &[u8], armored: &str) -> Result<String> {
    let plaintext = open_bytes(passphrase, armored)?;
    // Deliberately no source on this error: FromUtf8Error owns the
    // decrypted bytes and must not travel up with the failure.
    String::from_utf8(plaintext).map_err(|_| {
        CryptextError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidEncoding,
            "wrong passphrase or corrupted input",
        )
    })
}

/// Decrypt an armored envelope, returning the raw plaintext bytes
pub fn open_bytes(passphrase: &[u8], armored: &str) -> Result<Vec<u8>> {
    let envelope = armor::unwrap(armored)?;
    secretcrypt::decrypt(passphrase, &envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let sealed = seal(b"correct horse", "attack at dawn").unwrap();

        // Every armored envelope starts with base64("Salted__")
        assert!(sealed.starts_with("U2FsdGVkX1"));

        let opened = open(b"correct horse", &sealed).unwrap();
        assert_eq!(opened, "attack at dawn");
    }

    #[test]
    fn test_seal_is_randomized() {
        let a = seal(b"pass", "same message").unwrap();
        let b = seal(b"pass", "same message").unwrap();

        assert_ne!(a, b);
        assert_eq!(open(b"pass", &a).unwrap(), "same message");
        assert_eq!(open(b"pass", &b).unwrap(), "same message");
    }

    #[test]
    fn test_unicode_round_trip() {
        let message = "héllo wörld — 攻撃は夜明けに";
        let sealed = seal("päßword".as_bytes(), message).unwrap();
        let opened = open("päßword".as_bytes(), &sealed).unwrap();
        assert_eq!(opened, message);
    }

    /// Known armored envelope produced by OpenSSL with a fixed salt.
    #[test]
    fn test_opens_externally_produced_envelope() {
        let sealed = "U2FsdGVkX18BAgMEBQYHCD5IgBtnwUdwbewMP6Toiu0=";
        let opened = open(b"correct horse", sealed).unwrap();
        assert_eq!(opened, "attack at dawn");
    }

    #[test]
    fn test_wrong_passphrase() {
        // Fixed-salt envelope so the failure is deterministic.
        let sealed = "U2FsdGVkX18BAgMEBQYHCD5IgBtnwUdwbewMP6Toiu0=";
        let err = open(b"wrong horse", sealed).expect_err("expected decryption failure");
        assert!(matches!(
            err.kind,
            Some(ErrorKind::InvalidPadding) | Some(ErrorKind::InvalidEncoding)
        ));
    }

    #[test]
    fn test_not_base64() {
        let err = open(b"pass", "not-base64!!").expect_err("expected armor failure");
        assert_eq!(err.kind, Some(ErrorKind::MalformedEnvelope));
    }

    #[test]
    fn test_too_short() {
        // Valid base64, but fewer than 32 raw bytes
        let armored = armor::wrap(b"short");
        let err = open(b"pass", &armored).expect_err("expected truncation failure");
        assert_eq!(err.kind, Some(ErrorKind::MalformedEnvelope));
    }

    #[test]
    fn test_binary_plaintext_needs_open_bytes() {
        let payload: Vec<u8> = vec![0xff, 0xfe, 0x00, 0x01, 0x80];
        let envelope = secretcrypt::encrypt(b"pass", &payload).unwrap();
        let sealed = armor::wrap(&envelope);

        // Text-level open refuses non-UTF-8 plaintext...
        let err = open(b"pass", &sealed).expect_err("expected encoding failure");
        assert_eq!(err.kind, Some(ErrorKind::InvalidEncoding));

        // ...while the byte-level open returns it unchanged.
        assert_eq!(open_bytes(b"pass", &sealed).unwrap(), payload);
    }
}
