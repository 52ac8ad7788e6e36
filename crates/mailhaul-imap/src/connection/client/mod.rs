//! Type-state IMAP client connection.
//!
//! Uses the type-state pattern to enforce valid state transitions at compile
//! time. The IMAP connection states are:
//!
//! - `NotAuthenticated`: Initial state after connection
//! - `Authenticated`: After successful LOGIN
//! - `Selected`: After successful SELECT
//!
//! Each state only exposes methods that are valid for that state. The
//! client takes `&mut self` for every command, so a session can never have
//! more than one command in flight.

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod selected;
mod states;

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};

pub use self::authenticated::SelectOutcome;
pub use self::states::{Authenticated, NotAuthenticated, Selected};
use super::framed::{LineStream, ResponseAccumulator};
use crate::command::{Command, TagGenerator};
use crate::parser::{Outcome, decode};
use crate::Result;

/// IMAP client connection with type-state.
///
/// The type parameter `State` tracks the connection state at compile time.
pub struct Client<S, State> {
    pub(crate) stream: LineStream<S>,
    pub(crate) tag_gen: TagGenerator,
    _state: PhantomData<State>,
}

// Manual Debug implementation since LineStream doesn't implement Debug
impl<S, State> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .finish_non_exhaustive()
    }
}

/// Shared implementation for all states.
impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Rebuilds the client with a different state marker.
    pub(crate) fn into_state<Next>(self) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            _state: PhantomData,
        }
    }

    /// Issues a fresh tag, sends the command, and collects its response.
    ///
    /// This is the universal primitive underneath every protocol verb: one
    /// tagged write followed by a blocking read up to and including the
    /// completion line.
    pub(crate) async fn transact(&mut self, command: &Command) -> Result<Outcome> {
        let tag = self.tag_gen.next();
        self.stream.write_command(&command.serialize(&tag)).await?;

        let mut accumulator = ResponseAccumulator::new(&tag);
        let lines = accumulator.read_until_tag(&mut self.stream).await?;
        Ok(Outcome::of(lines))
    }

    /// Shared LIST implementation; exposed per state where LIST is valid.
    pub(crate) async fn list_folders(&mut self) -> Result<Vec<String>> {
        let outcome = self.transact(&Command::List).await?;
        if !outcome.succeeded {
            // A refused LIST is treated as "no folders", not an error.
            tracing::warn!("LIST rejected, continuing with no folders: {}", outcome.completion);
            return Ok(Vec::new());
        }
        Ok(decode::folders(&outcome.payload))
    }

    /// Gracefully ends the session.
    ///
    /// Valid in any state. The server's response is read on a best-effort
    /// basis; many servers drop the connection right after the BYE.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.tag_gen.next();
        self.stream
            .write_command(&Command::Logout.serialize(&tag))
            .await?;

        let mut accumulator = ResponseAccumulator::new(&tag);
        let _ = accumulator.read_until_tag(&mut self.stream).await;

        Ok(())
    }
}
