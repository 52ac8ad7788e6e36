//! IMAP command rendering.
//!
//! Every command is a single CRLF-terminated line prefixed with a freshly
//! issued tag. This engine speaks a fixed nine-verb subset; there is no
//! astring quoting or literal support.

mod tag;

pub use tag::TagGenerator;

use std::fmt::Write;

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// LIST command enumerating every folder (`LIST "" *`).
    List,
    /// SELECT command opening a folder read-write.
    Select {
        /// Folder to select.
        folder: String,
    },
    /// SEARCH command enumerating every message id (`SEARCH ALL`).
    SearchAll,
    /// FETCH of the From and Subject header fields.
    FetchHeader {
        /// Message sequence number.
        id: u32,
    },
    /// FETCH of the text body.
    FetchBody {
        /// Message sequence number.
        id: u32,
    },
    /// STORE adding the `\Deleted` flag.
    MarkDeleted {
        /// Message sequence number.
        id: u32,
    },
    /// CLOSE command (expunge and deselect).
    Close,
    /// LOGOUT command.
    Logout,
}

impl Command {
    /// Renders the command as a wire line: `<tag> <text>\r\n`.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut line = String::with_capacity(64);
        let _ = write!(line, "{tag} ");
        match self {
            Self::Login { username, password } => {
                let _ = write!(line, "LOGIN {username} {password}");
            }
            Self::List => line.push_str("LIST \"\" *"),
            Self::Select { folder } => {
                let _ = write!(line, "SELECT \"{folder}\"");
            }
            Self::SearchAll => line.push_str("SEARCH ALL"),
            Self::FetchHeader { id } => {
                let _ = write!(line, "FETCH {id} (BODY[HEADER.FIELDS (from subject)])");
            }
            Self::FetchBody { id } => {
                let _ = write!(line, "FETCH {id} BODY[TEXT]");
            }
            Self::MarkDeleted { id } => {
                let _ = write!(line, "STORE {id} +FLAGS (\\Deleted)");
            }
            Self::Close => line.push_str("CLOSE"),
            Self::Logout => line.push_str("LOGOUT"),
        }
        line.push_str("\r\n");
        line.into_bytes()
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
    use super::*;

    fn text(command: &Command) -> String {
        String::from_utf8(command.serialize("A1")).unwrap()
    }

    #[test]
    fn test_login() {
        let cmd = Command::Login {
            username: "user".into(),
            password: "secret".into(),
        };
        assert_eq!(text(&cmd), "A1 LOGIN user secret\r\n");
    }

    #[test]
    fn test_list() {
        assert_eq!(text(&Command::List), "A1 LIST \"\" *\r\n");
    }

    #[test]
    fn test_select_quotes_folder() {
        let cmd = Command::Select {
            folder: "INBOX/Sub".into(),
        };
        assert_eq!(text(&cmd), "A1 SELECT \"INBOX/Sub\"\r\n");
    }

    #[test]
    fn test_search_all() {
        assert_eq!(text(&Command::SearchAll), "A1 SEARCH ALL\r\n");
    }

    #[test]
    fn test_fetch_header() {
        assert_eq!(
            text(&Command::FetchHeader { id: 12 }),
            "A1 FETCH 12 (BODY[HEADER.FIELDS (from subject)])\r\n"
        );
    }

    #[test]
    fn test_fetch_body() {
        assert_eq!(
            text(&Command::FetchBody { id: 12 }),
            "A1 FETCH 12 BODY[TEXT]\r\n"
        );
    }

    #[test]
    fn test_mark_deleted() {
        assert_eq!(
            text(&Command::MarkDeleted { id: 3 }),
            "A1 STORE 3 +FLAGS (\\Deleted)\r\n"
        );
    }

    #[test]
    fn test_close_and_logout() {
        assert_eq!(text(&Command::Close), "A1 CLOSE\r\n");
        assert_eq!(text(&Command::Logout), "A1 LOGOUT\r\n");
    }

    #[test]
    fn test_tag_prefixes_line() {
        let rendered = String::from_utf8(Command::Close.serialize("A42")).unwrap();
        assert!(rendered.starts_with("A42 "));
        assert!(rendered.ends_with("\r\n"));
    }
}
