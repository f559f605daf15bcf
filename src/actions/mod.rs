//! Turn scheduling and action rules.
//!
//! There is no stored phase. Whose turn it is follows from the turn cursor
//! and the entity order, and whether they may act follows from their
//! energy. An outer loop polls [`ActionSystem::active_entity`] and
//! [`is_ready`], issues [`ActionSystem::walk`] or [`ActionSystem::shoot`]
//! for ready entities and calls [`ActionSystem::next_entity`] otherwise.
//!
//! Every action runs to completion against the [`World`] it is handed and
//! reports through the [`Hooks`](crate::hooks::Hooks) collaborator.

mod combat;
mod movement;
mod turn;

use thiserror::Error;

use crate::config::Rules;
use crate::entity::Entity;
use crate::parts::{Blob, Kind};
use crate::spatial::SpatialError;
use crate::store::StoreError;
use crate::world::{World, WorldError};

pub use combat::{damage, damage_at, DamageOutcome, ShotOutcome};
pub use movement::{blocks_movement, can_crush, crush_damage};
pub use turn::{is_ready, start_turn_update};

/// Structural failure while resolving an action.
///
/// Rule rejections are not errors; they come back as `Ok(false)` or a
/// [`ShotOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Store or spatial lookup failed.
    #[error(transparent)]
    World(#[from] WorldError),
    /// The actor lacks a part the action needs.
    #[error("entity {entity} has no {kind:?} part")]
    MissingPart {
        /// Acting entity.
        entity: Entity,
        /// Kind that was missing.
        kind: Kind,
    },
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        Self::World(err.into())
    }
}

impl From<SpatialError> for ActionError {
    fn from(err: SpatialError) -> Self {
        Self::World(err.into())
    }
}

/// Turn cursor plus the rule parameters every action reads.
#[derive(Debug, Clone, Default)]
pub struct ActionSystem {
    cursor: Option<Entity>,
    rules: Rules,
}

impl ActionSystem {
    /// Creates a scheduler on which nobody has acted yet.
    #[must_use]
    pub const fn new(rules: Rules) -> Self {
        Self {
            cursor: None,
            rules,
        }
    }

    /// Rules in force.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The entity that acted last, or `None` before the first turn.
    #[must_use]
    pub const fn cursor(&self) -> Option<Entity> {
        self.cursor
    }
}

fn require_blob(world: &World, entity: Entity) -> Result<Blob, ActionError> {
    world
        .blob(entity)?
        .copied()
        .ok_or(ActionError::MissingPart {
            entity,
            kind: Kind::Blob,
        })
}

fn require_blob_mut(world: &mut World, entity: Entity) -> Result<&mut Blob, ActionError> {
    world
        .store
        .get_as_mut::<Blob>(entity)?
        .ok_or(ActionError::MissingPart {
            entity,
            kind: Kind::Blob,
        })
}
