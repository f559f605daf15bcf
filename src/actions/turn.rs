//! Turn order and energy bookkeeping.

use log::{trace, warn};

use crate::entity::Entity;
use crate::parts::Blob;
use crate::store::StoreError;
use crate::world::World;

use super::ActionSystem;

/// Whether the entity may act: it has a Blob with non-negative energy.
///
/// Entities without a Blob, and entities that no longer exist, are simply
/// not ready.
#[must_use]
pub fn is_ready(world: &World, entity: Entity) -> bool {
    match world.blob(entity) {
        Ok(Some(blob)) => blob.energy >= 0,
        Ok(None) => false,
        Err(err) => {
            warn!("readiness check failed ({err}); treating as not ready");
            false
        }
    }
}

/// Credits the entity's power to its energy. Entities without a Blob are
/// left alone.
pub fn start_turn_update(world: &mut World, entity: Entity) {
    match world.store.get_as_mut::<Blob>(entity) {
        Ok(Some(blob)) => {
            blob.energy += blob.power;
            trace!("{entity} starts turn with {} energy", blob.energy);
        }
        Ok(None) => trace!("{entity} has no blob; no energy credited"),
        Err(err) => warn!("turn start skipped: {err}"),
    }
}

impl ActionSystem {
    /// The entity immediately after the cursor. Before anyone has acted
    /// this is the smallest entity. Does not move the cursor.
    ///
    /// # Errors
    /// Returns [`StoreError::NoEntities`] if the world is empty.
    pub fn active_entity(&self, world: &World) -> Result<Entity, StoreError> {
        match self.cursor {
            Some(previous) => world.store.entity_after(previous),
            None => world.store.first().ok_or(StoreError::NoEntities),
        }
    }

    /// Advances the cursor one entity and starts the turn of the entity
    /// that becomes active, which is returned.
    ///
    /// On the very first call the largest entity stands in as the previous
    /// actor, so the smallest entity's turn is the one opened.
    ///
    /// # Errors
    /// Returns [`StoreError::NoEntities`] if the world is empty; the cursor
    /// is left untouched.
    pub fn next_entity(&mut self, world: &mut World) -> Result<Entity, StoreError> {
        let previous = match self.cursor {
            Some(cursor) => world.store.entity_after(cursor)?,
            None => world.store.last().ok_or(StoreError::NoEntities)?,
        };
        self.cursor = Some(previous);
        let active = self.active_entity(world)?;
        start_turn_update(world, active);
        trace!("turn passes to {}", world.describe(active));
        Ok(active)
    }
}
