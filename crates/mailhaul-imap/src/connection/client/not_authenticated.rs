//! Implementation for the not-authenticated state.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::framed::LineStream;
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new client from a connected stream.
    ///
    /// Reads and discards lines until the server's untagged greeting (a
    /// line containing `*`) has been consumed.
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut stream = LineStream::new(stream);

        loop {
            let line = stream.read_line().await?;
            if line.contains('*') {
                tracing::debug!("server greeting: {line}");
                break;
            }
        }

        Ok(Self {
            stream,
            tag_gen: TagGenerator::default(),
            _state: PhantomData,
        })
    }

    /// Authenticates with the server using LOGIN.
    ///
    /// Consumes self and returns an authenticated client on success. A
    /// refusal is fatal: the connection is dropped with the client.
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        let outcome = self
            .transact(&Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        if !outcome.succeeded {
            return Err(Error::Auth(outcome.completion));
        }

        Ok(self.into_state())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use tokio_test::io::Builder;

    use super::*;

    #[tokio::test]
    async fn test_from_stream_consumes_greeting() {
        let mock = Builder::new().read(b"* OK IMAP4 ready\r\n").build();
        let client = Client::from_stream(mock).await.unwrap();
        assert_eq!(client.tag_gen.issued(), 0);
    }

    #[tokio::test]
    async fn test_from_stream_discards_lines_before_greeting() {
        let mock = Builder::new()
            .read(b"warming up\r\n")
            .read(b"* OK ready\r\n")
            .build();
        assert!(Client::from_stream(mock).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_success() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A1 LOGIN user secret\r\n")
            .read(b"A1 OK LOGIN completed\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        assert!(client.login("user", "secret").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_refused() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A1 LOGIN user wrong\r\n")
            .read(b"A1 NO [AUTHENTICATIONFAILED] invalid credentials\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let err = client.login("user", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }
}
