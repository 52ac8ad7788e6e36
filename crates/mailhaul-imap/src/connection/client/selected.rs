//! Implementation for the selected state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, Selected};
use crate::command::Command;
use crate::parser::{Header, decode};
use crate::{Error, Result};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Lists every folder on the server.
    pub async fn list(&mut self) -> Result<Vec<String>> {
        self.list_folders().await
    }

    /// Enumerates every message id in the selected folder.
    ///
    /// A refused SEARCH is fatal for the folder: unlike LIST, there is no
    /// meaningful empty result to fall back to, so it surfaces as
    /// [`Error::Protocol`]. A folder with no messages decodes to an empty
    /// vector, not an error.
    pub async fn search(&mut self) -> Result<Vec<u32>> {
        let outcome = self.transact(&Command::SearchAll).await?;
        if !outcome.succeeded {
            return Err(Error::Protocol(format!(
                "SEARCH failed: {}",
                outcome.completion
            )));
        }
        decode::message_ids(&outcome.payload)
    }

    /// Fetches the From and Subject header fields of one message.
    pub async fn fetch_header(&mut self, id: u32) -> Result<Header> {
        let outcome = self.transact(&Command::FetchHeader { id }).await?;
        decode::header(&outcome.payload)
    }

    /// Fetches the text body of one message.
    ///
    /// A refused FETCH is fatal and surfaces as [`Error::Protocol`].
    pub async fn fetch_body(&mut self, id: u32) -> Result<Vec<String>> {
        let outcome = self.transact(&Command::FetchBody { id }).await?;
        if !outcome.succeeded {
            return Err(Error::Protocol(format!(
                "FETCH BODY[TEXT] failed: {}",
                outcome.completion
            )));
        }
        Ok(decode::body(&outcome.payload))
    }

    /// Marks one message as deleted.
    ///
    /// The completion status is not inspected; deletion is best-effort and
    /// takes effect at the next CLOSE.
    pub async fn mark_deleted(&mut self, id: u32) -> Result<()> {
        let _ = self.transact(&Command::MarkDeleted { id }).await?;
        Ok(())
    }

    /// Expunges deleted messages and deselects the folder.
    ///
    /// Consumes self and returns the client in the authenticated state.
    pub async fn close(mut self) -> Result<Client<S, Authenticated>> {
        let _ = self.transact(&Command::Close).await?;
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
    use crate::connection::client::SelectOutcome;

    async fn selected(mock: tokio_test::io::Mock) -> Client<tokio_test::io::Mock, Selected> {
        let client = Client::from_stream(mock).await.unwrap();
        let client = client.login("u", "p").await.unwrap();
        match client.select("INBOX").await.unwrap() {
            SelectOutcome::Selected(client) => client,
            SelectOutcome::Refused(_) => panic!("mock refused SELECT"),
        }
    }

    fn select_preamble(builder: &mut Builder) -> &mut Builder {
        builder
            .read(b"* OK ready\r\n")
            .write(b"A1 LOGIN u p\r\n")
            .read(b"A1 OK\r\n")
            .write(b"A2 SELECT \"INBOX\"\r\n")
            .read(b"A2 OK [READ-WRITE] SELECT completed\r\n")
    }

    #[tokio::test]
    async fn test_search_decodes_ids() {
        let mut builder = Builder::new();
        select_preamble(&mut builder)
            .write(b"A3 SEARCH ALL\r\n")
            .read(b"* SEARCH 4 5 9\r\n")
            .read(b"A3 OK SEARCH completed\r\n");

        let mut client = selected(builder.build()).await;
        assert_eq!(client.search().await.unwrap(), vec![4, 5, 9]);
    }

    #[tokio::test]
    async fn test_search_failure_is_fatal() {
        let mut builder = Builder::new();
        select_preamble(&mut builder)
            .write(b"A3 SEARCH ALL\r\n")
            .read(b"A3 BAD unknown command\r\n");

        let mut client = selected(builder.build()).await;
        assert!(matches!(
            client.search().await.unwrap_err(),
            Error::Protocol(_)
        ));
    }

    #[tokio::test]
    async fn test_fetch_body_failure_is_fatal() {
        let mut builder = Builder::new();
        select_preamble(&mut builder)
            .write(b"A3 FETCH 7 BODY[TEXT]\r\n")
            .read(b"A3 NO no such message\r\n");

        let mut client = selected(builder.build()).await;
        assert!(matches!(
            client.fetch_body(7).await.unwrap_err(),
            Error::Protocol(_)
        ));
    }

    #[tokio::test]
    async fn test_mark_deleted_ignores_completion_status() {
        let mut builder = Builder::new();
        select_preamble(&mut builder)
            .write(b"A3 STORE 7 +FLAGS (\\Deleted)\r\n")
            .read(b"A3 NO STORE refused\r\n");

        let mut client = selected(builder.build()).await;
        assert!(client.mark_deleted(7).await.is_ok());
    }

    #[tokio::test]
    async fn test_close_returns_to_authenticated() {
        let mut builder = Builder::new();
        select_preamble(&mut builder)
            .write(b"A3 CLOSE\r\n")
            .read(b"A3 OK CLOSE completed\r\n")
            .write(b"A4 LIST \"\" *\r\n")
            .read(b"A4 OK LIST completed\r\n");

        let client = selected(builder.build()).await;
        let mut client = client.close().await.unwrap();
        assert!(client.list().await.unwrap().is_empty());
    }
}
