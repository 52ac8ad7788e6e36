//! Type-state markers for IMAP client connection states.
//!
//! Used with the type-state pattern to enforce valid IMAP state transitions
//! at compile time.

/// Marker type for the not-authenticated state.
///
/// In this state, only LOGIN (and LOGOUT) are valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Marker type for the authenticated state.
///
/// In this state, folder operations (LIST, SELECT) are valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// Marker type for the selected state.
///
/// In this state, message operations (SEARCH, FETCH, STORE, CLOSE) are
/// valid against the currently selected folder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selected;

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

    fn _assert_send<T: Send>() {}
    fn _assert_sync<T: Sync>() {}

    #[test]
    fn test_state_markers_are_send_sync() {
        _assert_send::<NotAuthenticated>();
        _assert_sync::<NotAuthenticated>();
        _assert_send::<Authenticated>();
        _assert_sync::<Authenticated>();
        _assert_send::<Selected>();
        _assert_sync::<Selected>();
    }
}
