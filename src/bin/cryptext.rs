//! Cryptext CLI - Passphrase-based text encryption
//!
//! Command-line interface for sealing and opening text files in the
//! OpenSSL salted envelope format (AES-256-CBC with the legacy MD5 key
//! derivation), interoperable with `openssl enc -aes-256-cbc -md md5`
//! and with CryptoJS password-mode encryption.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use cryptext::file_ops;
use cryptext::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};

#[derive(Parser)]
#[command(name = "cryptext")]
#[command(version)]
#[command(about = "Passphrase-based text encryption.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a text file
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the encrypted text to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Decrypt an encrypted file
    #[command(alias = "d")]
    Decrypt {
        /// Path to the file whose contents is to be decrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the decrypted text to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Update an encrypted file with new content, while validating
    /// that the passphrase is not accidentally changed.
    #[command(alias = "u")]
    Update {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the existing encrypted file to replace
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt { input, output } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::encrypt_file(&input, &output, &mut *reader)
        }
        Commands::Decrypt { input, output } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::decrypt_file(&input, &output, &mut *reader)
        }
        Commands::Update { input, output } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::update_file(&input, &output, &mut *reader)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPassphraseReader)
    }
}
