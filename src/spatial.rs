//! Spatial index mapping entities to grid cells.
//!
//! Every placed entity has a recorded location and shape; the occupancy map
//! lists, per cell, the entities whose footprint covers it. The two stay in
//! step except while an entity is in flight: [`SpatialIndex::push`] lifts it
//! out of occupancy and [`SpatialIndex::pop`] sets it down at its
//! destination. There is no rollback; movement that may fail has to be
//! validated before `push`.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use log::trace;
use thiserror::Error;

use crate::entity::Entity;
use crate::location::{Footprint, Location, Shape};
use crate::store::DestroyHook;
use crate::terrain::Terrain;

/// Failures raised by spatial queries and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpatialError {
    /// The entity has never been placed, or has been removed.
    #[error("entity {0} is not placed")]
    NotPlaced(Entity),
    /// The entity is already on the map.
    #[error("entity {0} is already placed")]
    AlreadyPlaced(Entity),
    /// The entity is mid-transaction and cannot be pushed again.
    #[error("entity {0} is already in flight")]
    InFlight(Entity),
    /// `pop` was called without a matching `push`.
    #[error("entity {0} is not in flight")]
    NotInFlight(Entity),
}

#[derive(Debug, Clone)]
struct Placement {
    loc: Location,
    shape: Shape,
}

impl Placement {
    fn footprint(&self) -> Footprint {
        self.shape.footprint(self.loc)
    }
}

/// Location and occupancy tracking for entities.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    placements: HashMap<Entity, Placement>,
    occupancy: HashMap<Location, BTreeSet<Entity>>,
    in_flight: BTreeSet<Entity>,
}

impl SpatialIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a single-cell entity at `loc`.
    ///
    /// # Errors
    /// Returns [`SpatialError::AlreadyPlaced`] if the entity is on the map.
    pub fn place(&mut self, entity: Entity, loc: Location) -> Result<(), SpatialError> {
        self.place_shaped(entity, loc, Shape::single())
    }

    /// Places an entity covering `shape` around `loc`.
    ///
    /// # Errors
    /// Returns [`SpatialError::AlreadyPlaced`] if the entity is on the map.
    pub fn place_shaped(
        &mut self,
        entity: Entity,
        loc: Location,
        shape: Shape,
    ) -> Result<(), SpatialError> {
        if self.placements.contains_key(&entity) {
            return Err(SpatialError::AlreadyPlaced(entity));
        }
        let placement = Placement { loc, shape };
        self.occupy(entity, &placement.footprint());
        self.placements.insert(entity, placement);
        trace!("placed {entity} at {loc}");
        Ok(())
    }

    /// Takes the entity off the map entirely, returning where it was.
    ///
    /// Works for in-flight entities too, which closes their transaction.
    pub fn remove(&mut self, entity: Entity) -> Option<Location> {
        let placement = self.placements.remove(&entity)?;
        if !self.in_flight.remove(&entity) {
            self.vacate(entity, &placement.footprint());
        }
        trace!("removed {entity} from {}", placement.loc);
        Some(placement.loc)
    }

    /// Current location of the entity. An in-flight entity reports the cell
    /// it departed from.
    ///
    /// # Errors
    /// Returns [`SpatialError::NotPlaced`] if the entity is not on the map.
    pub fn location(&self, entity: Entity) -> Result<Location, SpatialError> {
        self.placement(entity).map(|p| p.loc)
    }

    /// Shape the entity was placed with.
    ///
    /// # Errors
    /// Returns [`SpatialError::NotPlaced`] if the entity is not on the map.
    pub fn shape(&self, entity: Entity) -> Result<&Shape, SpatialError> {
        self.placement(entity).map(|p| &p.shape)
    }

    /// Cells the entity would cover standing at `loc`.
    ///
    /// # Errors
    /// Returns [`SpatialError::NotPlaced`] if the entity is not on the map.
    pub fn footprint(&self, entity: Entity, loc: Location) -> Result<Footprint, SpatialError> {
        Ok(self.shape(entity)?.footprint(loc))
    }

    /// Entities covering `loc`. In-flight entities are not listed.
    #[must_use]
    pub fn entities_at(&self, loc: Location) -> BTreeSet<Entity> {
        self.occupancy.get(&loc).cloned().unwrap_or_default()
    }

    /// Entities covering any cell of `footprint`.
    #[must_use]
    pub fn entities_on(&self, footprint: &Footprint) -> BTreeSet<Entity> {
        footprint
            .iter()
            .filter_map(|loc| self.occupancy.get(loc))
            .flatten()
            .copied()
            .collect()
    }

    /// Whether the entity is between `push` and `pop`.
    #[must_use]
    pub fn is_in_flight(&self, entity: Entity) -> bool {
        self.in_flight.contains(&entity)
    }

    /// Whether the entity may leave its cell and land at `dest`.
    ///
    /// Every destination cell must be walkable and none may lie under the
    /// departure footprint of another in-flight entity. Other occupants are
    /// not considered: blocking is for the caller to resolve.
    #[must_use]
    pub fn can_pop(&self, terrain: &dyn Terrain, entity: Entity, dest: Location) -> bool {
        let Ok(cells) = self.footprint(entity, dest) else {
            return false;
        };
        if cells.iter().any(|&loc| terrain.blocks_walk(loc)) {
            return false;
        }
        let reserved = self.reserved_cells(entity);
        cells.is_disjoint(&reserved)
    }

    /// Begins a movement transaction, lifting the entity out of occupancy.
    ///
    /// # Errors
    /// Returns [`SpatialError::NotPlaced`] for unknown entities and
    /// [`SpatialError::InFlight`] if a transaction is already open.
    pub fn push(&mut self, entity: Entity) -> Result<(), SpatialError> {
        let footprint = self.placement(entity)?.footprint();
        if !self.in_flight.insert(entity) {
            return Err(SpatialError::InFlight(entity));
        }
        self.vacate(entity, &footprint);
        trace!("pushed {entity}");
        Ok(())
    }

    /// Commits the transaction opened by [`Self::push`], placing the entity
    /// at `dest`.
    ///
    /// # Errors
    /// Returns [`SpatialError::NotPlaced`] for unknown entities and
    /// [`SpatialError::NotInFlight`] without a matching `push`.
    pub fn pop(&mut self, entity: Entity, dest: Location) -> Result<(), SpatialError> {
        if !self.placements.contains_key(&entity) {
            return Err(SpatialError::NotPlaced(entity));
        }
        if !self.in_flight.remove(&entity) {
            return Err(SpatialError::NotInFlight(entity));
        }
        let footprint = self
            .placements
            .get_mut(&entity)
            .map(|placement| {
                placement.loc = dest;
                placement.footprint()
            })
            .unwrap_or_default();
        self.occupy(entity, &footprint);
        trace!("popped {entity} at {dest}");
        Ok(())
    }

    fn placement(&self, entity: Entity) -> Result<&Placement, SpatialError> {
        self.placements
            .get(&entity)
            .ok_or(SpatialError::NotPlaced(entity))
    }

    fn reserved_cells(&self, except: Entity) -> Footprint {
        self.in_flight
            .iter()
            .filter(|&&other| other != except)
            .filter_map(|other| self.placements.get(other))
            .flat_map(Placement::footprint)
            .collect()
    }

    fn occupy(&mut self, entity: Entity, footprint: &Footprint) {
        for &loc in footprint {
            self.occupancy.entry(loc).or_default().insert(entity);
        }
    }

    fn vacate(&mut self, entity: Entity, footprint: &Footprint) {
        for loc in footprint {
            if let Some(occupants) = self.occupancy.get_mut(loc) {
                occupants.remove(&entity);
                if occupants.is_empty() {
                    self.occupancy.remove(loc);
                }
            }
        }
    }
}

impl DestroyHook for SpatialIndex {
    fn before_destroy(&mut self, entity: Entity) {
        self.remove(entity);
    }
}
