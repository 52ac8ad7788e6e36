//! Error types for the IMAP engine.

use thiserror::Error;

/// Errors that can occur during IMAP operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error during network operations. Also covers the peer closing
    /// the connection before a tagged completion line arrived
    /// (`io::ErrorKind::UnexpectedEof`).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake or encryption error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Invalid DNS name for TLS.
    #[error("Invalid DNS name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// Authentication failed (LOGIN refused by the server).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Protocol violation or a command failure the caller cannot recover
    /// from (failed SEARCH, failed body FETCH, undecodable response).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid session state for the requested operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
