//! Key derivation from a passphrase (legacy OpenSSL EVP_BytesToKey scheme)
//!
//! Derives a 256-bit AES key and a 128-bit IV from a passphrase and an
//! 8-byte salt by repeatedly hashing `previous-digest || passphrase || salt`
//! with MD5 until 48 bytes have been produced.
//!
//! This is the derivation used by `openssl enc -md md5` and by CryptoJS
//! when encrypting with a password string. It is a single hash pass with
//! no iteration count and a long-broken digest, and is far too fast to
//! resist offline brute force by modern standards. It is kept exactly as
//! specified because every existing envelope in the wild was produced
//! with it; substituting a stronger KDF would be a new, incompatible
//! envelope format rather than an improvement to this one.

use md5::{Digest, Md5};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length of salt in bytes
pub const SALT_LEN: usize = 8;

/// Length of the derived AES key in bytes
pub const KEY_LEN: usize = 32;

/// Length of the derived IV in bytes
pub const IV_LEN: usize = 16;

/// Key and IV derived from a (passphrase, salt) pair.
///
/// The material is zeroized when dropped and never printed by `Debug`.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyMaterial {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl KeyMaterial {
    /// The 32-byte AES-256 key.
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// The 16-byte CBC initialization vector.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// Derive key and IV from a passphrase and salt.
///
/// Pure and deterministic: the same inputs always yield the same
/// material. The 48-byte working buffer and intermediate digest are
/// wiped before returning.
pub fn derive(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> KeyMaterial {
    let mut material = Zeroizing::new(Vec::with_capacity(KEY_LEN + IV_LEN));
    let mut block = [0u8; 16];

    while material.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        if !material.is_empty() {
            hasher.update(block);
        }
        hasher.update(passphrase);
        hasher.update(salt);
        block.copy_from_slice(&hasher.finalize());
        material.extend_from_slice(&block);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&material[..KEY_LEN]);
    iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);
    block.zeroize();

    KeyMaterial { key, iv }
}
