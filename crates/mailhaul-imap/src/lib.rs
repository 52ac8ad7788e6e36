//! # mailhaul-imap
//!
//! A minimal IMAP4 client engine for bulk-downloading mail over TLS.
//!
//! This is not a general-purpose IMAP library. It implements exactly the
//! protocol subset a bulk downloader needs: an encrypted session, tagged
//! commands correlated to their completion lines, and decoders for the four
//! response shapes the downloader consumes (folder listings, message id
//! sets, header fields, message bodies). Literals, continuation requests,
//! UTF-7 folder names, IDLE and pipelining are out of scope, and the engine
//! never retries: exactly one command is in flight at a time and every
//! failure is surfaced to the caller.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailhaul_imap::Session;
//!
//! #[tokio::main]
//! async fn main() -> mailhaul_imap::Result<()> {
//!     let mut session = Session::connect("imap.example.com", 993).await?;
//!     session.login("user@example.com", "password").await?;
//!
//!     for folder in session.list().await? {
//!         if !session.select(&folder).await? {
//!             continue; // folder refused, skip it
//!         }
//!         for id in session.search().await? {
//!             let header = session.fetch_header(id).await?;
//!             let body = session.fetch_body(id).await?;
//!             println!("{}: {} lines", header.subject, body.len());
//!         }
//!         session.expunge().await?;
//!     }
//!
//!     session.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection States
//!
//! The low-level [`Client`] uses the type-state pattern to enforce valid
//! IMAP operations at compile time:
//!
//! ```text
//! ┌─────────────────────┐
//! │   NotAuthenticated  │ ─── login() ───→ Authenticated
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    Authenticated    │ ─── select() ───→ Selected
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │      Selected       │ ─── close() ───→ Authenticated
//! └─────────────────────┘
//! ```
//!
//! [`Session`] wraps the type-state client behind a `&mut self` API and
//! adds the terminal `LoggedOut` state.
//!
//! ## Modules
//!
//! - [`command`]: IMAP command rendering and tag generation
//! - [`connection`]: TLS transport, line-oriented framing, client, session
//! - [`parser`]: completion-line outcomes and payload decoders

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;

pub use command::{Command, TagGenerator};
pub use connection::{
    Authenticated, Client, ImapStream, LineStream, NotAuthenticated, ResponseAccumulator,
    SelectOutcome, Selected, Session, connect_tls, create_tls_connector,
};
pub use error::{Error, Result};
pub use parser::{Header, Outcome, decode};
