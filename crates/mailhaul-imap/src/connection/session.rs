//! High-level IMAP session façade.
//!
//! `Session` wraps the type-state [`Client`] behind a `&mut self` API so an
//! orchestration loop can drive the whole verb set without threading
//! clients through ownership changes. State transitions are managed
//! internally:
//!
//! ```text
//! NotAuthenticated → Authenticated → (Selected ⇄ Authenticated) → LoggedOut
//! ```
//!
//! There is no transition out of `LoggedOut`; dropping the session releases
//! the transport, whatever state it is in. The engine never retries and
//! never reconnects.

use tokio::io::{AsyncRead, AsyncWrite};

use super::client::{Authenticated, Client, NotAuthenticated, SelectOutcome, Selected};
use super::stream::{ImapStream, connect_tls};
use crate::parser::Header;
use crate::{Error, Result};

/// Current state of the session.
enum State<S> {
    /// Greeting consumed, not yet authenticated.
    NotAuthenticated(Client<S, NotAuthenticated>),
    /// Authenticated, no folder selected.
    Authenticated(Client<S, Authenticated>),
    /// Folder selected.
    Selected(Client<S, Selected>),
    /// Session over; the transport may already be gone.
    LoggedOut,
}

impl<S> State<S> {
    const fn name(&self) -> &'static str {
        match self {
            Self::NotAuthenticated(_) => "not authenticated",
            Self::Authenticated(_) => "authenticated",
            Self::Selected(_) => "selected",
            Self::LoggedOut => "logged out",
        }
    }
}

/// High-level IMAP session.
///
/// Exactly one command is in flight at any time: every verb takes
/// `&mut self` and is awaited to completion before the next can be issued.
pub struct Session<S> {
    state: State<S>,
    /// Name of the currently selected folder.
    folder: Option<String>,
}

impl Session<ImapStream> {
    /// Connects to a server over TLS and consumes the greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection, the TLS handshake, or the
    /// greeting read fails. No retries are attempted.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        tracing::debug!("connecting to {host}:{port}");
        let stream = connect_tls(host, port).await?;
        let client = Client::from_stream(stream).await?;
        Ok(Self::new(client))
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-connected client.
    #[must_use]
    pub fn new(client: Client<S, NotAuthenticated>) -> Self {
        Self {
            state: State::NotAuthenticated(client),
            folder: None,
        }
    }

    /// Authenticates with the server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the server refuses the credentials. A
    /// refusal is fatal; the session cannot be reused.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        match std::mem::replace(&mut self.state, State::LoggedOut) {
            State::NotAuthenticated(client) => {
                let client = client.login(username, password).await?;
                self.state = State::Authenticated(client);
                Ok(())
            }
            other => {
                let message = format!("LOGIN not valid in {} state", other.name());
                self.state = other;
                Err(Error::InvalidState(message))
            }
        }
    }

    /// Lists every folder on the server.
    ///
    /// A refused LIST yields an empty list rather than an error. This
    /// mirrors the engine's documented asymmetry: LIST failures are
    /// swallowed while SEARCH and body FETCH failures are fatal.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or outside the authenticated
    /// and selected states.
    pub async fn list(&mut self) -> Result<Vec<String>> {
        match &mut self.state {
            State::Authenticated(client) => client.list().await,
            State::Selected(client) => client.list().await,
            other => Err(Error::InvalidState(format!(
                "LIST not valid in {} state",
                other.name()
            ))),
        }
    }

    /// Opens a folder, closing any previously selected one first.
    ///
    /// Returns `Ok(false)` if the server refuses the folder; the session
    /// stays authenticated so the caller can skip it and continue.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or before authentication.
    pub async fn select(&mut self, folder: &str) -> Result<bool> {
        let client = match std::mem::replace(&mut self.state, State::LoggedOut) {
            State::Authenticated(client) => client,
            State::Selected(client) => {
                self.folder = None;
                client.close().await?
            }
            other => {
                let message = format!("SELECT not valid in {} state", other.name());
                self.state = other;
                return Err(Error::InvalidState(message));
            }
        };

        match client.select(folder).await? {
            SelectOutcome::Selected(client) => {
                self.state = State::Selected(client);
                self.folder = Some(folder.to_string());
                Ok(true)
            }
            SelectOutcome::Refused(client) => {
                self.state = State::Authenticated(client);
                Ok(false)
            }
        }
    }

    /// Enumerates every message id in the selected folder.
    ///
    /// # Errors
    ///
    /// A refused SEARCH is fatal and surfaces as [`Error::Protocol`].
    pub async fn search(&mut self) -> Result<Vec<u32>> {
        match &mut self.state {
            State::Selected(client) => client.search().await,
            other => Err(Error::InvalidState(format!(
                "SEARCH not valid in {} state",
                other.name()
            ))),
        }
    }

    /// Fetches the decoded header fields of one message.
    pub async fn fetch_header(&mut self, id: u32) -> Result<Header> {
        match &mut self.state {
            State::Selected(client) => client.fetch_header(id).await,
            other => Err(Error::InvalidState(format!(
                "FETCH not valid in {} state",
                other.name()
            ))),
        }
    }

    /// Fetches the text body of one message.
    ///
    /// # Errors
    ///
    /// A refused FETCH is fatal and surfaces as [`Error::Protocol`].
    pub async fn fetch_body(&mut self, id: u32) -> Result<Vec<String>> {
        match &mut self.state {
            State::Selected(client) => client.fetch_body(id).await,
            other => Err(Error::InvalidState(format!(
                "FETCH not valid in {} state",
                other.name()
            ))),
        }
    }

    /// Marks one message as deleted.
    pub async fn delete(&mut self, id: u32) -> Result<()> {
        match &mut self.state {
            State::Selected(client) => client.mark_deleted(id).await,
            other => Err(Error::InvalidState(format!(
                "STORE not valid in {} state",
                other.name()
            ))),
        }
    }

    /// Expunges deleted messages and deselects the folder.
    pub async fn expunge(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::LoggedOut) {
            State::Selected(client) => {
                let client = client.close().await?;
                self.state = State::Authenticated(client);
                self.folder = None;
                Ok(())
            }
            other => {
                let message = format!("CLOSE not valid in {} state", other.name());
                self.state = other;
                Err(Error::InvalidState(message))
            }
        }
    }

    /// Ends the session.
    ///
    /// Valid in any state, and a no-op if the session is already logged
    /// out. There is no way back: further verbs fail with
    /// [`Error::InvalidState`].
    pub async fn logout(&mut self) -> Result<()> {
        self.folder = None;
        match std::mem::replace(&mut self.state, State::LoggedOut) {
            State::NotAuthenticated(client) => client.logout().await,
            State::Authenticated(client) => client.logout().await,
            State::Selected(client) => client.logout().await,
            State::LoggedOut => Ok(()),
        }
    }

    /// Returns true once the session has logged out.
    #[must_use]
    pub const fn is_logged_out(&self) -> bool {
        matches!(self.state, State::LoggedOut)
    }

    /// Returns the currently selected folder, if any.
    #[must_use]
    pub fn selected_folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state.name())
            .field("folder", &self.folder)
            .finish()
    }
}
