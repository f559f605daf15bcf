//! Shooting and damage.

use std::collections::BTreeSet;

use log::{debug, info};
use serde::Serialize;

use crate::entity::Entity;
use crate::hooks::{Color, Hooks};
use crate::location::{HexDir, Location};
use crate::parts::Blob;
use crate::terrain::Terrain;
use crate::world::World;

use super::{require_blob, require_blob_mut, ActionError, ActionSystem};

/// Where a shot stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ShotOutcome {
    /// The shot struck a cell holding other entities.
    Hit {
        /// Cells travelled.
        distance: u32,
        /// Entities in the struck cell.
        targets: BTreeSet<Entity>,
    },
    /// Terrain stopped the shot.
    Blocked {
        /// Cells travelled.
        distance: u32,
    },
    /// The shot reached its range without striking anything.
    OutOfRange {
        /// Cells travelled.
        distance: u32,
    },
}

impl ShotOutcome {
    /// Cells the shot travelled, which is also the beam length.
    #[must_use]
    pub const fn distance(&self) -> u32 {
        match self {
            Self::Hit { distance, .. }
            | Self::Blocked { distance }
            | Self::OutOfRange { distance } => *distance,
        }
    }

    /// Whether anything was struck.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// What a single application of damage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DamageOutcome {
    /// The entity has no Blob and cannot be hurt.
    Unaffected,
    /// Armor was reduced but remains positive.
    Wounded {
        /// Armor left.
        armor: i32,
    },
    /// Armor dropped to zero or below and the entity was destroyed.
    Destroyed,
}

/// Subtracts `amount` from the entity's armor, destroying it with an
/// explosion once armor is no longer positive.
///
/// # Errors
/// Returns a world error if the entity does not exist.
pub fn damage(
    world: &mut World,
    hooks: &mut dyn Hooks,
    entity: Entity,
    amount: i32,
) -> Result<DamageOutcome, ActionError> {
    let Some(blob) = world.store.get_as_mut::<Blob>(entity)? else {
        return Ok(DamageOutcome::Unaffected);
    };
    blob.armor -= amount;
    let armor = blob.armor;
    if armor > 0 {
        debug!("{entity} takes {amount} damage, {armor} armor left");
        return Ok(DamageOutcome::Wounded { armor });
    }

    match world.spatial.location(entity) {
        Ok(at) => hooks.explosion(at),
        Err(err) => debug!("no explosion for {entity}: {err}"),
    }
    info!("{} is destroyed", world.describe(entity));
    world.destroy(entity)?;
    Ok(DamageOutcome::Destroyed)
}

/// Damages every entity at `loc`, in entity order.
///
/// Occupants are captured before any damage is dealt, so an entity
/// destroyed along the way does not disturb the others.
///
/// # Errors
/// Propagates failures from [`damage`].
pub fn damage_at(
    world: &mut World,
    hooks: &mut dyn Hooks,
    loc: Location,
    amount: i32,
) -> Result<Vec<(Entity, DamageOutcome)>, ActionError> {
    let occupants = world.spatial.entities_at(loc);
    let mut outcomes = Vec::with_capacity(occupants.len());
    for entity in occupants {
        if world.store.exists(entity) {
            outcomes.push((entity, damage(world, hooks, entity, amount)?));
        }
    }
    Ok(outcomes)
}

impl ActionSystem {
    /// Fires along `dir` for up to the configured range.
    ///
    /// The shot stops at the first cell holding anything other than the
    /// shooter, emits `"Zap!"` and deals the shooter's damage to every
    /// entity there. Terrain that blocks shots stops it harmlessly. Either
    /// way a pink beam is drawn and the shot cost is paid.
    ///
    /// # Errors
    /// [`ActionError::MissingPart`] if the shooter has no Blob, or a world
    /// error if it does not exist or is not placed. Nothing is changed in
    /// either case.
    pub fn shoot(
        &self,
        world: &mut World,
        hooks: &mut dyn Hooks,
        entity: Entity,
        dir: HexDir,
    ) -> Result<ShotOutcome, ActionError> {
        let shooter = require_blob(world, entity)?;
        let origin = world.spatial.location(entity)?;
        let range = self.rules().shot_range;

        let mut loc = origin;
        let mut outcome = ShotOutcome::OutOfRange { distance: range };
        for distance in 1..=range {
            loc = loc + dir;
            let targets: BTreeSet<_> = world
                .spatial
                .entities_at(loc)
                .into_iter()
                .filter(|&other| other != entity)
                .collect();
            if !targets.is_empty() {
                hooks.emit("Zap!");
                for &target in &targets {
                    if world.store.exists(target) {
                        damage(world, hooks, target, shooter.damage)?;
                    }
                }
                outcome = ShotOutcome::Hit { distance, targets };
                break;
            }
            if world.terrain.blocks_shot(loc) {
                outcome = ShotOutcome::Blocked { distance };
                break;
            }
        }

        hooks.beam(origin, dir, outcome.distance(), Color::PINK);
        require_blob_mut(world, entity)?.energy -= self.rules().shot_cost;
        debug!("{} shoots {dir:?}: {outcome:?}", world.describe(entity));
        Ok(outcome)
    }
}
