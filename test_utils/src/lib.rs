//! Utility helpers for tests.

pub mod fixtures;

pub use fixtures::{blob, big_blob, spawn_at, BlobBuilder};

/// Assert that every message in `expected` was emitted, in order, and
/// nothing else.
///
/// # Panics
/// Panics with both message lists if they differ.
pub fn assert_messages(log: &skirmish::EventLog, expected: &[&str]) {
    let actual = log.messages();
    assert_eq!(
        actual, expected,
        "emitted messages {actual:?} differ from {expected:?}"
    );
}
