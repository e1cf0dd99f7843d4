//! File encryption/decryption operations
//!
//! This module provides high-level file operations for sealing,
//! opening, and updating text files in the armored envelope format.
//!
//! This layer plays the role the interactive application plays for the
//! core: it rejects empty passphrases and empty plaintext before
//! sealing (the conditions under which the application disables its
//! submit control) and maps every failure to a terminal, user-facing
//! error.

use crate::error::{CryptextError, ErrorCategory, ErrorKind, Result};
use crate::passphrase::PassphraseReader;
use crate::textcrypt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use zeroize::Zeroizing;

/// Encrypt a text file with a passphrase
///
/// Reads plaintext from `input_path`, seals it using a passphrase from
/// `passphrase_reader`, and writes the armored envelope to `output_path`.
/// The input must be non-empty UTF-8 text.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let plaintext = read_text_file(input_path, "plaintext")?;
    if plaintext.is_empty() {
        return Err(CryptextError::with_kind(
            ErrorCategory::User,
            ErrorKind::EmptyInput,
            format!("refusing to encrypt empty file {}", input_path.display()),
        ));
    }
    let passphrase = read_non_empty_passphrase(passphrase_reader)?;
    let sealed = textcrypt::seal(&passphrase, &plaintext)
        .map_err(|e| e.with_context("encryption failed"))?;
    write_file_secure(output_path, sealed.as_bytes())
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;

    Ok(())
}

/// Decrypt an envelope file with a passphrase
///
/// Reads an armored envelope from `input_path`, opens it using a
/// passphrase from `passphrase_reader`, and writes the plaintext to
/// `output_path`. Surrounding whitespace in the envelope file (a
/// trailing newline from an editor, say) is tolerated.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let armored = read_text_file(input_path, "encrypted")?;
    let passphrase = read_non_empty_passphrase(passphrase_reader)?;
    let plaintext = textcrypt::open(&passphrase, armored.trim())
        .map_err(|e| e.with_context("failed to decrypt"))?;
    write_file_secure(output_path, plaintext.as_bytes())
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    Ok(())
}

/// Update an envelope file with new plaintext using the same passphrase
///
/// This function:
/// 1. Opens the existing envelope at `crypt_path` to validate the passphrase
/// 2. Reads new plaintext from `plain_path`
/// 3. Seals the new plaintext with the validated passphrase
/// 4. Atomically writes to `crypt_path` (tempfile + fsync + rename)
///
/// The atomic write ensures that either the old envelope or the new one
/// exists, never a partial file. The validation step prevents an
/// accidental passphrase change from locking the user out of future
/// updates.
pub fn update_file(
    plain_path: &Path,
    crypt_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let armored = read_text_file(crypt_path, "encrypted")?;
    let passphrase = read_non_empty_passphrase(passphrase_reader)?;

    // Validate passphrase by opening the existing envelope (discard plaintext)
    textcrypt::open(&passphrase, armored.trim())
        .map_err(|e| e.with_context("failed to decrypt existing file"))?;

    let new_plaintext = read_text_file(plain_path, "plaintext")?;
    if new_plaintext.is_empty() {
        return Err(CryptextError::with_kind(
            ErrorCategory::User,
            ErrorKind::EmptyInput,
            format!("refusing to encrypt empty file {}", plain_path.display()),
        ));
    }
    let new_sealed = textcrypt::seal(&passphrase, &new_plaintext)
        .map_err(|e| e.with_context("failed to encrypt"))?;

    // Great, let's re-write it (atomically).
    let crypt_dir = crypt_path.parent().ok_or_else(|| {
        CryptextError::with_kind(
            ErrorCategory::User,
            ErrorKind::Io,
            "crypt_path has no parent directory",
        )
    })?;
    let mut temp_file = tempfile::NamedTempFile::new_in(crypt_dir).map_err(|e| {
        CryptextError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to create tempfile",
            e,
        )
    })?;

    temp_file.write_all(new_sealed.as_bytes()).map_err(|e| {
        CryptextError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write to tempfile",
            e,
        )
    })?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file.flush().map_err(|e| {
        CryptextError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to flush tempfile",
            e,
        )
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        CryptextError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    // Atomically rename temp file to target (persist with restrictive permissions)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = temp_file
            .as_file()
            .metadata()
            .map_err(|e| {
                CryptextError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to get tempfile metadata",
                    e,
                )
            })?
            .permissions();
        perms.set_mode(0o600);
        temp_file.as_file().set_permissions(perms).map_err(|e| {
            CryptextError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to set tempfile permissions",
                e,
            )
        })?;
    }
    temp_file.persist(crypt_path).map_err(|e| {
        CryptextError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", crypt_path.display()),
            e,
        )
    })?;
    Ok(())
}

/// Read a file that must contain UTF-8 text
fn read_text_file(path: &Path, what: &str) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
    String::from_utf8(bytes).map_err(|e| {
        CryptextError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("{} file {} is not valid UTF-8", what, path.display()),
            e,
        )
    })
}

/// Read a passphrase, rejecting empty ones before any cryptography runs
fn read_non_empty_passphrase(
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<Zeroizing<Vec<u8>>> {
    let passphrase = passphrase_reader.read_passphrase()?;
    if passphrase.is_empty() {
        return Err(CryptextError::with_kind(
            ErrorCategory::User,
            ErrorKind::EmptyInput,
            "passphrase must not be empty",
        ));
    }
    Ok(passphrase)
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| {
                CryptextError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Io,
                    format!("failed to open {}", path.display()),
                    e,
                )
            })?;

        file.write_all(contents).map_err(|e| {
            CryptextError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(|e| {
            CryptextError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

fn read_error(path: &Path, err: io::Error) -> CryptextError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    CryptextError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
