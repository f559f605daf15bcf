//! Opaque entity identifiers.
//!
//! An [`Entity`] carries no data of its own. The numeric value gives every
//! entity a place in a strict total order, which the turn scheduler walks
//! with wraparound.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity identifier with type safety.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Entity(pub u64);

impl Entity {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl From<u64> for Entity {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
