//! Text armoring for binary envelopes
//!
//! The legacy format armors the whole binary envelope with standard
//! base64 (padded, `+`/`/` alphabet) and nothing else: no version
//! prefix, no whitespace. The "Salted__" marker inside the binary
//! envelope is what identifies the data, and it is validated by
//! [`crate::secretcrypt::decrypt`], not here. The armored string is
//! plain ASCII and safe for clipboards, text areas, and shells.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::{CryptextError, ErrorCategory, ErrorKind, Result};

/// Armor an envelope, returning the base64 string
pub fn wrap(body: &[u8]) -> String {
    STANDARD.encode(body)
}

/// Unarmor a base64 string, returning the binary envelope
pub fn unwrap(armored: &str) -> Result<Vec<u8>> {
    STANDARD.decode(armored).map_err(|e| {
        CryptextError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::MalformedEnvelope,
            format!("base64 decoding failed: {}", e),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let bytes = b"Salted__12345678some ciphertext!";
        let armored = wrap(bytes);
        let unwrapped = unwrap(&armored).unwrap();
        assert_eq!(bytes, &unwrapped[..]);
    }

    #[test]
    fn test_known_encoding() {
        // The marker must armor to the prefix every envelope starts with.
        assert_eq!(&wrap(b"Salted__")[..10], "U2FsdGVkX1");
    }

    #[test]
    fn test_ascii_only() {
        let bytes: Vec<u8> = (0..=255).collect();
        let armored = wrap(&bytes);
        assert!(armored.is_ascii());
        assert!(!armored.contains(' '));
        assert!(!armored.contains('\n'));
    }

    #[test]
    fn test_bad_base64() {
        let result = unwrap("not-base64!!");
        let err = result.expect_err("expected base64 decode error");
        assert_eq!(err.kind, Some(ErrorKind::MalformedEnvelope));
        assert!(err.source_error().is_some());
    }

    #[test]
    fn test_embedded_whitespace_rejected() {
        let armored = wrap(b"Salted__12345678xxxxxxxxxxxxxxxx");
        let mangled = format!("{}\n{}", &armored[..10], &armored[10..]);
        assert!(unwrap(&mangled).is_err());
    }
}
