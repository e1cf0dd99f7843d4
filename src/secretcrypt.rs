//! Envelope encryption/decryption (legacy OpenSSL salted format)
//!
//! This module implements passphrase-based encryption using:
//! - the legacy MD5 stretch in [`crate::keyderive`] for key derivation
//! - AES-256-CBC with PKCS#7 padding for the cipher
//!
//! The binary format is:
//! - marker: 8 bytes, the ASCII string "Salted__"
//! - salt: 8 bytes
//! - ciphertext: a positive multiple of 16 bytes, padding included
//!
//! The format carries no authentication tag. A wrong passphrase is
//! detected only by the padding check on decryption, which a random key
//! passes with probability of roughly 1/256; callers expecting text get
//! a second, much stronger check from UTF-8 validation. That residual
//! false-accept rate is a property of the format, shared by every other
//! implementation of it.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::TryRng;
use rand::rngs::SysRng;

use crate::error::{CryptextError, ErrorCategory, ErrorKind, Result};
use crate::keyderive::{self, SALT_LEN};

/// ASCII marker prepended to every envelope
const MAGIC: &[u8; 8] = b"Salted__";

/// AES block size in bytes
const BLOCK_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Encrypt plaintext with a passphrase using a fresh random salt
///
/// Returns the binary envelope: marker(8) + salt(8) + ciphertext.
///
/// The salt comes from the operating system's random source on every
/// call, so encrypting the same plaintext twice yields unrelated
/// envelopes. A failure to obtain randomness is fatal and not retried.
pub fn encrypt(passphrase: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    SysRng.try_fill_bytes(&mut salt).map_err(|e| {
        CryptextError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::RandomUnavailable,
            "system random source unavailable",
            e,
        )
    })?;

    Ok(encrypt_deterministic(passphrase, plaintext, &salt))
}

/// Encrypt plaintext with a passphrase using a caller-provided salt
///
/// This function is ONLY for testing purposes to generate deterministic
/// output. NEVER use this in production - always use `encrypt()` which
/// generates a random salt.
pub fn encrypt_deterministic(
    passphrase: &[u8],
    plaintext: &[u8],
    salt: &[u8; SALT_LEN],
) -> Vec<u8> {
    let keys = keyderive::derive(passphrase, salt);

    // PKCS#7 always pads: block-aligned plaintext gains a full extra
    // block, so the ciphertext is never empty.
    let ciphertext = Aes256CbcEnc::new(keys.key().into(), keys.iv().into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut envelope = Vec::with_capacity(MAGIC.len() + SALT_LEN + ciphertext.len());
    envelope.extend_from_slice(MAGIC);
    envelope.extend_from_slice(salt);
    envelope.extend_from_slice(&ciphertext);

    envelope
}

/// Decrypt a binary envelope with a passphrase
pub fn decrypt(passphrase: &[u8], envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.len() < MAGIC.len() + SALT_LEN + BLOCK_LEN {
        return Err(CryptextError::with_kind(
            ErrorCategory::User,
            ErrorKind::MalformedEnvelope,
            "envelope shorter than marker, salt and one cipher block; likely truncated",
        ));
    }

    let (marker, rest) = envelope.split_at(MAGIC.len());
    if marker != MAGIC {
        return Err(CryptextError::with_kind(
            ErrorCategory::User,
            ErrorKind::MalformedEnvelope,
            "input does not begin with the salted envelope marker",
        ));
    }

    let (salt, ciphertext) = rest.split_at(SALT_LEN);
    let salt: [u8; SALT_LEN] = salt
        .try_into()
        .map_err(|_| CryptextError::new(ErrorCategory::Internal, "salt slice length mismatch"))?;

    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CryptextError::with_kind(
            ErrorCategory::User,
            ErrorKind::MalformedEnvelope,
            "ciphertext length is not a multiple of the cipher block size",
        ));
    }

    let keys = keyderive::derive(passphrase, &salt);
    let plaintext = Aes256CbcDec::new(keys.key().into(), keys.iv().into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| {
            CryptextError::with_kind(
                ErrorCategory::User,
                ErrorKind::InvalidPadding,
                "wrong passphrase or corrupted input",
            )
        })?;

    Ok(plaintext)
}
