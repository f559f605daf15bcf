//! Part (component) types attached to entities.
//!
//! Each entity holds at most one part per [`Kind`]. The [`Blob`] kind
//! carries everything the action rules read: the energy budget, its per-turn
//! regeneration, remaining armor, offensive damage and whether the entity is
//! big enough to crush others.

use serde::{Deserialize, Serialize};

use crate::macros::parts;

/// Typed access to one variant of [`Part`].
pub trait PartType: Sized {
    /// Kind tag the type is stored under.
    const KIND: Kind;

    /// Borrows the payload if `part` holds this type.
    fn from_part(part: &Part) -> Option<&Self>;

    /// Mutably borrows the payload if `part` holds this type.
    fn from_part_mut(part: &mut Part) -> Option<&mut Self>;
}

/// Combat and movement attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blob {
    /// Action budget. The entity may act while this is non-negative.
    pub energy: i32,
    /// Energy credited at the start of each of the entity's turns.
    pub power: i32,
    /// Remaining health; the entity is destroyed once it reaches zero.
    pub armor: i32,
    /// Damage dealt by the entity's shots.
    pub damage: i32,
    /// Big entities crush small ones they walk into.
    pub big: bool,
}

impl Blob {
    /// Blob with the given armor and every other attribute zeroed.
    #[must_use]
    pub const fn with_armor(armor: i32) -> Self {
        Self {
            energy: 0,
            power: 0,
            armor,
            damage: 0,
            big: false,
        }
    }
}

/// Human-readable description used in log output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desc {
    /// Display name.
    pub name: String,
}

impl Desc {
    /// Creates a description with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

parts! {
    /// Combat attributes, see [`Blob`].
    Blob(Blob),
    /// Naming information, see [`Desc`].
    Desc(Desc),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn part_reports_its_kind() {
        assert_eq!(Part::from(Blob::default()).kind(), Kind::Blob);
        assert_eq!(Part::from(Desc::new("rock")).kind(), Kind::Desc);
    }

    #[rstest]
    fn typed_access_matches_variant() {
        let mut part = Part::from(Blob::with_armor(7));
        assert_eq!(Blob::from_part(&part).map(|b| b.armor), Some(7));
        assert!(Desc::from_part(&part).is_none());

        if let Some(blob) = Blob::from_part_mut(&mut part) {
            blob.armor = 3;
        }
        assert_eq!(part, Part::Blob(Blob::with_armor(3)));
    }

    #[rstest]
    fn missing_blob_fields_default_when_deserialised() {
        let blob: Blob = serde_json::from_str(r#"{"armor": 10}"#)
            .expect("blob JSON should parse");
        assert_eq!(blob, Blob::with_armor(10));
    }
}
