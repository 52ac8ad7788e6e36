//! Integration tests for the IMAP engine.
//!
//! These tests use a mock stream to simulate IMAP server responses
//! without requiring a real server connection.

#![allow(clippy::unwrap_used)]

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use mailhaul_imap::{Client, Error, Session};

/// Mock stream that returns predefined responses and captures every
/// command the client sends.
struct MockStream {
    /// Responses to return (in order).
    responses: Cursor<Vec<u8>>,
    /// Captured commands sent by the client.
    sent: Arc<Mutex<Vec<u8>>>,
}

impl MockStream {
    fn new(responses: &str) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let stream = Self {
            responses: Cursor::new(responses.as_bytes().to_vec()),
            sent: Arc::clone(&sent),
        };
        (stream, sent)
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let data = self.responses.get_ref();
        let pos = usize::try_from(self.responses.position()).unwrap();

        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let remaining = &data[pos..];
        let to_read = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..to_read]);
        self.responses.set_position((pos + to_read) as u64);

        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.sent.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

async fn session_over(responses: &str) -> (Session<MockStream>, Arc<Mutex<Vec<u8>>>) {
    let (stream, sent) = MockStream::new(responses);
    let client = Client::from_stream(stream).await.unwrap();
    (Session::new(client), sent)
}

#[tokio::test]
async fn full_download_scenario() {
    let (mut session, sent) = session_over(concat!(
        "* OK ready\r\n",
        "A1 OK\r\n",
        "* LIST (\\HasNoChildren) \"/\" \"INBOX\"\r\n",
        "A2 OK\r\n",
        "A3 OK\r\n",
        "* SEARCH 7\r\n",
        "A4 OK\r\n",
        "* 7 FETCH (BODY[HEADER.FIELDS (from subject)] {57}\r\n",
        "Subject: Hello, World!\r\n",
        "From: Jane Doe <jane@example.com>\r\n",
        "A5 OK\r\n",
        "* 7 FETCH (BODY[TEXT] {25}\r\n",
        "Dear reader,\r\n",
        "so long.\r\n",
        "A6 OK\r\n",
        "A7 OK\r\n",
        "* BYE\r\n",
        "A8 OK\r\n",
    ))
    .await;

    session.login("u", "p").await.unwrap();

    let folders = session.list().await.unwrap();
    assert_eq!(folders, vec!["INBOX".to_string()]);

    assert!(session.select("INBOX").await.unwrap());
    assert_eq!(session.selected_folder(), Some("INBOX"));

    let ids = session.search().await.unwrap();
    assert_eq!(ids, vec![7]);

    let header = session.fetch_header(7).await.unwrap();
    assert_eq!(header.subject, "Hello--World-");
    assert_eq!(header.sender, "jane@example.com");

    let body = session.fetch_body(7).await.unwrap();
    assert_eq!(body, vec!["Dear reader,".to_string(), "so long.".to_string()]);

    session.expunge().await.unwrap();
    assert_eq!(session.selected_folder(), None);

    session.logout().await.unwrap();
    assert!(session.is_logged_out());

    // Tags are issued strictly in sequence, one per command.
    let sent = String::from_utf8(sent.lock().unwrap().clone()).unwrap();
    assert_eq!(
        sent,
        concat!(
            "A1 LOGIN u p\r\n",
            "A2 LIST \"\" *\r\n",
            "A3 SELECT \"INBOX\"\r\n",
            "A4 SEARCH ALL\r\n",
            "A5 FETCH 7 (BODY[HEADER.FIELDS (from subject)])\r\n",
            "A6 FETCH 7 BODY[TEXT]\r\n",
            "A7 CLOSE\r\n",
            "A8 LOGOUT\r\n",
        )
    );
}

#[tokio::test]
async fn untagged_noise_is_collected_with_the_response() {
    let (mut session, _sent) = session_over(concat!(
        "* OK ready\r\n",
        "A1 OK\r\n",
        "* 12 EXISTS\r\n",
        "* LIST (\\HasNoChildren) \"/\" \"Archive\"\r\n",
        "A2 OK\r\n",
    ))
    .await;

    session.login("u", "p").await.unwrap();

    // The EXISTS line has no quotes, so the folder decoder degrades it to
    // the whole line; the real entry still comes through. Interleaved
    // untagged data never breaks correlation.
    let folders = session.list().await.unwrap();
    assert_eq!(folders, vec!["* 12 EXISTS".to_string(), "Archive".to_string()]);
}

#[tokio::test]
async fn refused_login_is_an_auth_error() {
    let (mut session, _sent) =
        session_over("* OK ready\r\nA1 NO [AUTHENTICATIONFAILED] denied\r\n").await;

    let err = session.login("u", "bad").await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}

#[tokio::test]
async fn refused_list_is_an_empty_folder_set() {
    let (mut session, _sent) =
        session_over("* OK ready\r\nA1 OK\r\nA2 NO LIST refused\r\n").await;

    session.login("u", "p").await.unwrap();
    assert!(session.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn refused_select_skips_the_folder_and_keeps_the_session_usable() {
    let (mut session, _sent) = session_over(concat!(
        "* OK ready\r\n",
        "A1 OK\r\n",
        "A2 NO no such folder\r\n",
        "A3 OK\r\n",
    ))
    .await;

    session.login("u", "p").await.unwrap();

    assert!(!session.select("Missing").await.unwrap());
    assert_eq!(session.selected_folder(), None);

    // Still authenticated: the next SELECT goes through.
    assert!(session.select("INBOX").await.unwrap());
}

#[tokio::test]
async fn refused_search_is_a_protocol_error() {
    let (mut session, _sent) = session_over(concat!(
        "* OK ready\r\n",
        "A1 OK\r\n",
        "A2 OK\r\n",
        "A3 BAD SEARCH refused\r\n",
    ))
    .await;

    session.login("u", "p").await.unwrap();
    assert!(session.select("INBOX").await.unwrap());

    assert!(matches!(
        session.search().await.unwrap_err(),
        Error::Protocol(_)
    ));
}

#[tokio::test]
async fn refused_body_fetch_is_a_protocol_error() {
    let (mut session, _sent) = session_over(concat!(
        "* OK ready\r\n",
        "A1 OK\r\n",
        "A2 OK\r\n",
        "A3 NO no such message\r\n",
    ))
    .await;

    session.login("u", "p").await.unwrap();
    assert!(session.select("INBOX").await.unwrap());

    assert!(matches!(
        session.fetch_body(99).await.unwrap_err(),
        Error::Protocol(_)
    ));
}

#[tokio::test]
async fn connection_drop_before_completion_line_is_an_eof_error() {
    let (mut session, _sent) = session_over("* OK ready\r\n* still going\r\n").await;

    let err = session.login("u", "p").await.unwrap_err();
    match err {
        Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
        other => panic!("expected EOF error, got {other:?}"),
    }
}

#[tokio::test]
async fn verbs_outside_their_state_are_rejected() {
    let (mut session, _sent) = session_over("* OK ready\r\nA1 OK\r\n").await;

    // Selected-only verbs before SELECT.
    assert!(matches!(
        session.search().await.unwrap_err(),
        Error::InvalidState(_)
    ));
    assert!(matches!(
        session.fetch_header(1).await.unwrap_err(),
        Error::InvalidState(_)
    ));
    assert!(matches!(
        session.delete(1).await.unwrap_err(),
        Error::InvalidState(_)
    ));
    assert!(matches!(
        session.expunge().await.unwrap_err(),
        Error::InvalidState(_)
    ));

    session.login("u", "p").await.unwrap();

    // A second LOGIN is rejected without disturbing the session.
    assert!(matches!(
        session.login("u", "p").await.unwrap_err(),
        Error::InvalidState(_)
    ));
    assert!(!session.is_logged_out());
}

#[tokio::test]
async fn logout_is_terminal_and_idempotent() {
    let (mut session, _sent) = session_over("* OK ready\r\nA1 OK\r\nA2 OK\r\n").await;

    session.login("u", "p").await.unwrap();
    session.logout().await.unwrap();
    assert!(session.is_logged_out());

    // Idempotent: a second logout is a no-op.
    session.logout().await.unwrap();

    // No transition back out of LoggedOut.
    assert!(matches!(
        session.list().await.unwrap_err(),
        Error::InvalidState(_)
    ));
    assert!(matches!(
        session.select("INBOX").await.unwrap_err(),
        Error::InvalidState(_)
    ));
}
