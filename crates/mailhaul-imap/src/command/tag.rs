//! IMAP command tag generator.
//!
//! Tags are used to match commands with their completion lines.

use std::sync::atomic::{AtomicU32, Ordering};

/// Tag generator for IMAP commands.
///
/// The counter starts at zero and is incremented before each command, so
/// the first issued tag is `"A1"`, then `"A2"`, and so on. Tags are never
/// reused within a session.
#[derive(Debug)]
pub struct TagGenerator {
    counter: AtomicU32,
    prefix: char,
}

impl TagGenerator {
    /// Creates a new tag generator with the given prefix.
    #[must_use]
    pub const fn new(prefix: char) -> Self {
        Self {
            counter: AtomicU32::new(0),
            prefix,
        }
    }

    /// Increments the counter and returns the next tag.
    ///
    /// # Panics
    ///
    /// Panics if the tag counter would overflow u32::MAX. In practice, this
    /// would require 4+ billion tags in a single session, which is unrealistic.
    #[must_use]
    pub fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        // If we've wrapped, the session is invalid
        if n == u32::MAX {
            panic!("tag counter overflow: generated {n} tags in this session");
        }
        format!("{}{}", self.prefix, n + 1)
    }

    /// Returns the number of tags issued so far.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new('A')
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

    #[test]
    fn test_tag_generation() {
        let generator = TagGenerator::default();
        assert_eq!(generator.next(), "A1");
        assert_eq!(generator.next(), "A2");
        assert_eq!(generator.next(), "A3");
    }

    #[test]
    fn test_custom_prefix() {
        let generator = TagGenerator::new('T');
        assert_eq!(generator.next(), "T1");
        assert_eq!(generator.next(), "T2");
    }

    #[test]
    fn test_issued() {
        let generator = TagGenerator::default();
        assert_eq!(generator.issued(), 0);
        let _ = generator.next();
        assert_eq!(generator.issued(), 1);
    }

    #[test]
    fn test_monotonic_sequence() {
        let generator = TagGenerator::default();
        for n in 1..=100u32 {
            assert_eq!(generator.next(), format!("A{n}"));
        }
    }

    #[test]
    fn test_uniqueness() {
        let generator = TagGenerator::default();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..10000 {
            let tag = generator.next();
            assert!(seen.insert(tag), "duplicate tag generated");
        }
    }

    #[test]
    #[should_panic(expected = "tag counter overflow")]
    fn test_overflow_detection() {
        let generator = TagGenerator::default();
        generator.counter.store(u32::MAX, Ordering::Relaxed);
        let _ = generator.next();
    }
}
