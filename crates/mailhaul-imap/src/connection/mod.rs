//! IMAP connection management.
//!
//! This module provides connection handling for IMAP servers, including:
//! - TLS transport setup
//! - Line-oriented framing and tag correlation
//! - Type-state client
//! - High-level session façade

mod client;
mod framed;
mod session;
mod stream;

pub use client::{Authenticated, Client, NotAuthenticated, SelectOutcome, Selected};
pub use framed::{LineStream, ResponseAccumulator};
pub use session::Session;
pub use stream::{ImapStream, connect_tls, create_tls_connector};
