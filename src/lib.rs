//! Cryptext - Passphrase-based text encryption using the legacy OpenSSL
//! salted envelope format (interoperable with CryptoJS and
//! `openssl enc -aes-256-cbc -md md5`).

#![forbid(unsafe_code)]

pub mod armor;
pub mod error;
pub mod file_ops;
pub mod keyderive;
pub mod passphrase;
pub mod secretcrypt;
pub mod textcrypt;
