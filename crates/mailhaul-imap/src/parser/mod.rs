//! Completion-line outcomes and payload decoders.
//!
//! A response is the ordered sequence of lines the server sent up to and
//! including the first line carrying the issuing command's tag. [`Outcome`]
//! splits that sequence into the completion line and the decodable payload;
//! the [`decode`] functions turn payloads into values. Keeping the decoders
//! behind this module seam means a stricter IMAP parser could replace them
//! without touching the transaction layer.

pub mod decode;

pub use decode::Header;

/// The result of a tagged command, derived from its collected response.
///
/// Success is the presence of the literal substring `"OK"` anywhere in the
/// completion line. The tag on that line is not re-verified, and `NO` and
/// `BAD` are not distinguished; callers get a coarse succeeded/failed
/// signal plus the payload lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the completion line reported success.
    pub succeeded: bool,
    /// The completion line itself (the last collected line).
    pub completion: String,
    /// The remaining lines, in arrival order.
    pub payload: Vec<String>,
}

impl Outcome {
    /// Splits a collected response into completion line and payload.
    #[must_use]
    pub fn of(mut lines: Vec<String>) -> Self {
        let completion = lines.pop().unwrap_or_default();
        Self {
            succeeded: completion.contains("OK"),
            completion,
            payload: lines,
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
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_ok_completion_succeeds() {
        let outcome = Outcome::of(lines(&["* 3 EXISTS", "A1 OK SELECT completed"]));
        assert!(outcome.succeeded);
        assert_eq!(outcome.payload, lines(&["* 3 EXISTS"]));
    }

    #[test]
    fn test_ok_anywhere_in_line_succeeds() {
        let outcome = Outcome::of(lines(&["A1 completed OK"]));
        assert!(outcome.succeeded);
    }

    #[test]
    fn test_no_completion_fails() {
        let outcome = Outcome::of(lines(&["A1 NO [AUTHENTICATIONFAILED] go away"]));
        assert!(!outcome.succeeded);
        assert!(outcome.payload.is_empty());
    }

    #[test]
    fn test_bad_completion_fails() {
        let outcome = Outcome::of(lines(&["* 1 EXISTS", "A1 BAD parse error"]));
        assert!(!outcome.succeeded);
        assert_eq!(outcome.payload.len(), 1);
    }

    #[test]
    fn test_completion_line_excluded_from_payload() {
        let outcome = Outcome::of(lines(&["* a", "* b", "A7 OK done"]));
        assert_eq!(outcome.payload, lines(&["* a", "* b"]));
        assert_eq!(outcome.completion, "A7 OK done");
    }

    #[test]
    fn test_empty_response_fails() {
        let outcome = Outcome::of(Vec::new());
        assert!(!outcome.succeeded);
        assert!(outcome.payload.is_empty());
    }
}
