//! Implementation for the authenticated state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, Selected};
use crate::Result;
use crate::command::Command;

/// Result of a SELECT attempt.
///
/// A refused SELECT is not an error: the server stays in the authenticated
/// state and the caller gets the client back so it can skip the folder and
/// move on to the next one.
pub enum SelectOutcome<S> {
    /// The folder was opened; the client is now in the selected state.
    Selected(Client<S, Selected>),
    /// The server refused the folder; the client stays authenticated.
    Refused(Client<S, Authenticated>),
}

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Lists every folder on the server.
    ///
    /// A refused LIST yields an empty list rather than an error; this
    /// mirrors the non-fatal LIST failure policy of the engine.
    pub async fn list(&mut self) -> Result<Vec<String>> {
        self.list_folders().await
    }

    /// Opens a folder for read-write access.
    ///
    /// Consumes self; the returned [`SelectOutcome`] hands the client back
    /// in whichever state the server left it.
    pub async fn select(mut self, folder: &str) -> Result<SelectOutcome<S>> {
        let outcome = self
            .transact(&Command::Select {
                folder: folder.to_string(),
            })
            .await?;

        if outcome.succeeded {
            Ok(SelectOutcome::Selected(self.into_state()))
        } else {
            tracing::debug!("SELECT {folder:?} refused: {}", outcome.completion);
            Ok(SelectOutcome::Refused(self))
        }
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

    async fn authenticated(mock: tokio_test::io::Mock) -> Client<tokio_test::io::Mock, Authenticated> {
        let client = Client::from_stream(mock).await.unwrap();
        client.login("u", "p").await.unwrap()
    }

    fn login_preamble(builder: &mut Builder) -> &mut Builder {
        builder
            .read(b"* OK ready\r\n")
            .write(b"A1 LOGIN u p\r\n")
            .read(b"A1 OK\r\n")
    }

    #[tokio::test]
    async fn test_list_decodes_folder_names() {
        let mut builder = Builder::new();
        login_preamble(&mut builder)
            .write(b"A2 LIST \"\" *\r\n")
            .read(b"* LIST (\\HasNoChildren) \"/\" \"INBOX\"\r\n")
            .read(b"* LIST (\\HasNoChildren) \"/\" \"Sent\"\r\n")
            .read(b"A2 OK LIST completed\r\n");

        let mut client = authenticated(builder.build()).await;
        let folders = client.list().await.unwrap();
        assert_eq!(folders, vec!["INBOX".to_string(), "Sent".to_string()]);
    }

    #[tokio::test]
    async fn test_list_refusal_is_empty_not_error() {
        let mut builder = Builder::new();
        login_preamble(&mut builder)
            .write(b"A2 LIST \"\" *\r\n")
            .read(b"A2 NO LIST not allowed\r\n");

        let mut client = authenticated(builder.build()).await;
        let folders = client.list().await.unwrap();
        assert!(folders.is_empty());
    }

    #[tokio::test]
    async fn test_select_refused_keeps_authenticated_client() {
        let mut builder = Builder::new();
        login_preamble(&mut builder)
            .write(b"A2 SELECT \"Missing\"\r\n")
            .read(b"A2 NO no such folder\r\n");

        let client = authenticated(builder.build()).await;
        match client.select("Missing").await.unwrap() {
            SelectOutcome::Refused(_) => {}
            SelectOutcome::Selected(_) => panic!("expected refusal"),
        }
    }
}
