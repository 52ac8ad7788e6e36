//! Folder and message iteration.
//!
//! Walks every folder the session can see, downloads each message into its
//! own directory, and optionally marks it deleted. Any fatal engine error
//! aborts the run; a refused SELECT only skips that folder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use mailhaul_imap::Session;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, warn};

/// What to download and where to put it.
#[derive(Debug, Clone)]
pub struct Options {
    /// Restrict the download to these folders (ignored when `all` is set
    /// or the list is empty).
    pub folders: Vec<String>,
    /// Delete messages after downloading.
    pub delete: bool,
    /// Download all folders.
    pub all: bool,
    /// Directory the per-folder trees are created under.
    pub root: PathBuf,
}

/// Downloads everything the options ask for, then logs the session out.
///
/// Each message lands in `<root>/<folder>/<n>_<sender>_<subject>/content.txt`
/// where `n` counts downloaded messages across the whole run. The subject
/// has already been made path-safe by the engine's header decoder.
pub async fn run<S>(session: &mut Session<S>, options: &Options) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut folders = session.list().await?;
    if !options.all && !options.folders.is_empty() {
        folders.retain(|folder| options.folders.contains(folder));
    }

    tokio::fs::create_dir_all(&options.root)
        .await
        .with_context(|| format!("creating {}", options.root.display()))?;

    let mut count = 0usize;

    for folder in folders {
        let folder_dir = options.root.join(&folder);
        tokio::fs::create_dir_all(&folder_dir)
            .await
            .with_context(|| format!("creating {}", folder_dir.display()))?;

        if !session.select(&folder).await? {
            warn!("skipping folder {folder:?}: SELECT refused");
            continue;
        }

        let ids = session.search().await?;
        info!("downloading {} messages from {folder:?}", ids.len());

        for id in ids {
            let header = session.fetch_header(id).await?;

            let message_dir =
                folder_dir.join(format!("{count}_{}_{}", header.sender, header.subject));
            count += 1;
            tokio::fs::create_dir_all(&message_dir)
                .await
                .with_context(|| format!("creating {}", message_dir.display()))?;

            let body = session.fetch_body(id).await?;
            let mut content = body.join("\n");
            content.push('\n');
            tokio::fs::write(message_dir.join("content.txt"), content)
                .await
                .with_context(|| format!("writing message {id} in {folder:?}"))?;

            if options.delete {
                session.delete(id).await?;
            }
        }

        session.expunge().await?;
    }

    session.logout().await?;
    info!("downloaded {count} messages");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mailhaul_imap::Client;
    use tokio_test::io::Builder;

    use super::*;

    #[tokio::test]
    async fn test_run_writes_one_directory_per_message() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A1 LOGIN u p\r\n")
            .read(b"A1 OK\r\n")
            .write(b"A2 LIST \"\" *\r\n")
            .read(b"* LIST (\\HasNoChildren) \"/\" \"INBOX\"\r\nA2 OK\r\n")
            .write(b"A3 SELECT \"INBOX\"\r\n")
            .read(b"A3 OK\r\n")
            .write(b"A4 SEARCH ALL\r\n")
            .read(b"* SEARCH 7\r\nA4 OK\r\n")
            .write(b"A5 FETCH 7 (BODY[HEADER.FIELDS (from subject)])\r\n")
            .read(b"* 7 FETCH (BODY[HEADER.FIELDS (from subject)] {57}\r\nSubject: Hi there\r\nFrom: Jane <jane@example.com>\r\nA5 OK\r\n")
            .write(b"A6 FETCH 7 BODY[TEXT]\r\n")
            .read(b"* 7 FETCH (BODY[TEXT] {12}\r\nhello world\r\nA6 OK\r\n")
            .write(b"A7 CLOSE\r\n")
            .read(b"A7 OK\r\n")
            .write(b"A8 LOGOUT\r\n")
            .read(b"A8 OK\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let mut session = Session::new(client);

        let root = tempfile::tempdir().unwrap();
        let options = Options {
            folders: Vec::new(),
            delete: false,
            all: true,
            root: root.path().join("IMAP"),
        };

        run(&mut session, &options).await.unwrap();
        assert!(session.is_logged_out());

        let message_dir = root
            .path()
            .join("IMAP")
            .join("INBOX")
            .join("0_jane@example.com_Hi-there");
        let content = std::fs::read_to_string(message_dir.join("content.txt")).unwrap();
        assert_eq!(content, "hello world\n");
    }

    #[tokio::test]
    async fn test_run_respects_folder_restriction() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A1 LOGIN u p\r\n")
            .read(b"A1 OK\r\n")
            .write(b"A2 LIST \"\" *\r\n")
            .read(b"* LIST () \"/\" \"INBOX\"\r\n* LIST () \"/\" \"Spam\"\r\nA2 OK\r\n")
            .write(b"A3 SELECT \"Spam\"\r\n")
            .read(b"A3 OK\r\n")
            .write(b"A4 SEARCH ALL\r\n")
            .read(b"* SEARCH\r\nA4 OK\r\n")
            .write(b"A5 CLOSE\r\n")
            .read(b"A5 OK\r\n")
            .write(b"A6 LOGOUT\r\n")
            .read(b"A6 OK\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let mut session = Session::new(client);

        let root = tempfile::tempdir().unwrap();
        let options = Options {
            folders: vec!["Spam".to_string()],
            delete: false,
            all: false,
            root: root.path().join("IMAP"),
        };

        run(&mut session, &options).await.unwrap();

        // Only the requested folder was visited or created.
        assert!(root.path().join("IMAP").join("Spam").is_dir());
        assert!(!root.path().join("IMAP").join("INBOX").exists());
    }
}
