//! Payload decoders for the four response shapes the engine consumes.
//!
//! Each decoder assumes the payload shape produced by one specific command.
//! The rules are deliberately position-based and fragile; they match the
//! observable behaviour of the wire exchanges this engine issues, not the
//! full IMAP grammar. Malformed folder lines yield degenerate names rather
//! than errors.

use crate::{Error, Result};

/// Decoded header fields of one message: a path-safe subject and the bare
/// sender address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Subject with every character outside `[A-Za-z0-9]` replaced by `-`,
    /// safe for use as a path segment.
    pub subject: String,
    /// The address between the first `<` and the first `>` of the From line.
    pub sender: String,
}

/// Decodes a `LIST "" *` payload into folder names.
///
/// Each payload line is split on `"` and the last non-empty segment is the
/// folder name. Lines without quotes decode to themselves; fully degenerate
/// lines decode to an empty name. Server order is preserved, nothing is
/// deduplicated, and no hierarchy is parsed.
#[must_use]
pub fn folders(payload: &[String]) -> Vec<String> {
    payload
        .iter()
        .map(|line| {
            line.rsplit('"')
                .find(|segment| !segment.is_empty())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Decodes a `SEARCH ALL` payload into message ids.
///
/// Takes the first payload line, skips the untagged marker and the `SEARCH`
/// keyword echo, and parses the remaining tokens as integers in order. An
/// empty id list (`* SEARCH` with no ids) decodes to an empty vector.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if a token is not a valid message id.
pub fn message_ids(payload: &[String]) -> Result<Vec<u32>> {
    let Some(line) = payload.first() else {
        return Ok(Vec::new());
    };

    line.split(' ')
        .skip(2)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<u32>().map_err(|_| {
                Error::Protocol(format!("bad message id in SEARCH response: {token:?}"))
            })
        })
        .collect()
}

/// Decodes a `FETCH <id> (BODY[HEADER.FIELDS (from subject)])` payload.
///
/// The line positions are fixed by the requested field order: payload line 1
/// is the Subject line, payload line 2 the From line. Reordering the fields
/// in the FETCH item list would break this decoder; that coupling is
/// intentional.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the payload is too short or the From line
/// carries no `<address>`.
pub fn header(payload: &[String]) -> Result<Header> {
    let subject_line = payload
        .get(1)
        .ok_or_else(|| Error::Protocol("header response has no subject line".to_string()))?;
    let subject = subject_line
        .strip_prefix("Subject: ")
        .unwrap_or(subject_line)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    let from_line = payload
        .get(2)
        .ok_or_else(|| Error::Protocol("header response has no sender line".to_string()))?;
    let open = from_line
        .find('<')
        .ok_or_else(|| Error::Protocol(format!("no address in sender line: {from_line:?}")))?;
    let close = from_line
        .find('>')
        .ok_or_else(|| Error::Protocol(format!("no address in sender line: {from_line:?}")))?;
    let sender = from_line
        .get(open + 1..close)
        .ok_or_else(|| Error::Protocol(format!("malformed sender line: {from_line:?}")))?
        .to_string();

    Ok(Header { subject, sender })
}

/// Decodes a `FETCH <id> BODY[TEXT]` payload.
///
/// The payload lines from index 1 (past the FETCH marker line) to the end
/// constitute the body, in server order. No MIME parsing, no transfer
/// encoding decoding.
#[must_use]
pub fn body(payload: &[String]) -> Vec<String> {
    payload.get(1..).unwrap_or_default().to_vec()
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
    use proptest::prelude::*;

    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_folders_quoted_names() {
        let payload = lines(&[
            "* LIST (\\HasNoChildren) \"/\" \"INBOX\"",
            "* LIST (\\HasNoChildren) \"/\" \"INBOX/Sub\"",
        ]);
        assert_eq!(folders(&payload), lines(&["INBOX", "INBOX/Sub"]));
    }

    #[test]
    fn test_folders_preserve_server_order_and_duplicates() {
        let payload = lines(&[
            "* LIST () \"/\" \"b\"",
            "* LIST () \"/\" \"a\"",
            "* LIST () \"/\" \"b\"",
        ]);
        assert_eq!(folders(&payload), lines(&["b", "a", "b"]));
    }

    #[test]
    fn test_folders_degenerate_lines() {
        // No quotes: the whole line becomes the name. Only quotes: empty name.
        let payload = lines(&["no quotes here", "\"\""]);
        assert_eq!(folders(&payload), lines(&["no quotes here", ""]));
    }

    #[test]
    fn test_message_ids() {
        let payload = lines(&["* SEARCH 1 2 3"]);
        assert_eq!(message_ids(&payload).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_message_ids_empty_search() {
        let payload = lines(&["* SEARCH"]);
        assert_eq!(message_ids(&payload).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_message_ids_empty_payload() {
        assert_eq!(message_ids(&[]).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_message_ids_rejects_garbage() {
        let payload = lines(&["* SEARCH 1 two 3"]);
        assert!(matches!(message_ids(&payload), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_header_decoding() {
        let payload = lines(&[
            "* 12 FETCH (BODY[HEADER.FIELDS (from subject)] {64}",
            "Subject: Hello, World!",
            "From: Jane Doe <jane@example.com>",
        ]);
        let header = header(&payload).unwrap();
        assert_eq!(header.subject, "Hello--World-");
        assert_eq!(header.sender, "jane@example.com");
    }

    #[test]
    fn test_header_without_subject_prefix_is_sanitized_as_is() {
        let payload = lines(&["* 1 FETCH", "Re: hi", "From: <a@b.c>"]);
        let header = header(&payload).unwrap();
        assert_eq!(header.subject, "Re--hi");
        assert_eq!(header.sender, "a@b.c");
    }

    #[test]
    fn test_header_too_short() {
        assert!(matches!(
            header(&lines(&["* 1 FETCH"])),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn test_header_sender_without_brackets() {
        let payload = lines(&["* 1 FETCH", "Subject: x", "From: nobody"]);
        assert!(matches!(header(&payload), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_body_skips_marker_line() {
        let payload = lines(&["* 7 FETCH (BODY[TEXT] {23}", "first line", "second line"]);
        assert_eq!(body(&payload), lines(&["first line", "second line"]));
    }

    #[test]
    fn test_body_of_empty_payload() {
        assert!(body(&[]).is_empty());
        assert!(body(&lines(&["* 7 FETCH"])).is_empty());
    }

    proptest! {
        #[test]
        fn sanitized_subject_is_path_safe(subject in ".*") {
            let payload = vec![
                "* 1 FETCH (BODY[HEADER.FIELDS (from subject)] {0}".to_string(),
                format!("Subject: {subject}"),
                "From: Jane Doe <jane@example.com>".to_string(),
            ];
            let header = header(&payload).unwrap();
            prop_assert!(
                header
                    .subject
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
            );
        }
    }
}
