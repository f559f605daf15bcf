//! Walking, blocking and crushing.

use log::{debug, info};

use crate::constants::CRUSH_ARMOR_DIVISOR;
use crate::entity::Entity;
use crate::hooks::Hooks;
use crate::location::HexDir;
use crate::parts::Kind;
use crate::world::World;

use super::combat::{damage, DamageOutcome};
use super::{require_blob, require_blob_mut, ActionError, ActionSystem};

/// Whether the entity gets in the way of walkers. Anything with a Blob does.
#[must_use]
pub fn blocks_movement(world: &World, entity: Entity) -> bool {
    world.store.has(entity, Kind::Blob).unwrap_or(false)
}

/// Whether `entity` may walk over `crushee`, destroying it: a big entity
/// crushes any entity that is not big.
#[must_use]
pub fn can_crush(world: &World, entity: Entity, crushee: Entity) -> bool {
    match (world.blob(entity), world.blob(crushee)) {
        (Ok(Some(big)), Ok(Some(small))) => big.big && !small.big,
        _ => false,
    }
}

/// Damage dealt back to a crusher: half the victim's armor, rounded down,
/// never negative.
#[must_use]
pub const fn crush_damage(victim_armor: i32) -> i32 {
    let half = victim_armor.div_euclid(CRUSH_ARMOR_DIVISOR);
    if half > 0 {
        half
    } else {
        0
    }
}

impl ActionSystem {
    /// Steps the entity one cell in `dir`.
    ///
    /// Returns `Ok(false)` with nothing changed if the destination is not
    /// walkable or holds a blocker the entity cannot crush. Otherwise every
    /// blocker under the destination footprint is crushed in entity order:
    /// the walker takes [`crush_damage`] of the victim's armor, `"Crush!"` is
    /// emitted and the victim is destroyed. If the walker survives it lands
    /// and pays the move cost. A walker killed mid-crush spares the
    /// remaining victims and never lands.
    ///
    /// # Errors
    /// [`ActionError::MissingPart`] if the entity has no Blob, or a world
    /// error if it does not exist or is not placed. Nothing is changed in
    /// either case.
    pub fn walk(
        &self,
        world: &mut World,
        hooks: &mut dyn Hooks,
        entity: Entity,
        dir: HexDir,
    ) -> Result<bool, ActionError> {
        require_blob(world, entity)?;
        let dest = world.spatial.location(entity)? + dir;
        if !world.spatial.can_pop(&world.terrain, entity, dest) {
            debug!("{} cannot enter {dest}", world.describe(entity));
            return Ok(false);
        }

        let footprint = world.spatial.footprint(entity, dest)?;
        let mut victims = Vec::new();
        for other in world.spatial.entities_on(&footprint) {
            if other == entity || !blocks_movement(world, other) {
                continue;
            }
            if !can_crush(world, entity, other) {
                debug!(
                    "{} is blocked by {}",
                    world.describe(entity),
                    world.describe(other)
                );
                return Ok(false);
            }
            victims.push(other);
        }

        world.spatial.push(entity)?;
        for victim in victims {
            let armor = require_blob(world, victim)?.armor;
            let outcome = damage(world, hooks, entity, crush_damage(armor))?;
            hooks.emit("Crush!");
            info!(
                "{} crushes {}",
                world.describe(entity),
                world.describe(victim)
            );
            world.destroy(victim)?;
            if outcome == DamageOutcome::Destroyed {
                debug!("{entity} died crushing {victim}");
                return Ok(true);
            }
        }

        world.spatial.pop(entity, dest)?;
        if world.player() == Some(entity) {
            hooks.move_view(dir.to_ivec2());
        }
        require_blob_mut(world, entity)?.energy -= self.rules().move_cost;
        debug!("{} walks to {dest}", world.describe(entity));
        Ok(true)
    }
}
