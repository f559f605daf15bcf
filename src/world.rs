//! Top-level simulation state handed to the action rules.
//!
//! [`World`] owns the entity store, the spatial index and the terrain map,
//! and knows which entity the player controls. It is built by whoever runs
//! the game loop and passed down by reference; nothing reaches it through a
//! global.

use std::fmt;

use log::info;
use thiserror::Error;

use crate::entity::Entity;
use crate::location::{Location, Shape};
use crate::parts::{Blob, Desc, Part};
use crate::spatial::{SpatialError, SpatialIndex};
use crate::store::{DestroyHook, EntityStore, StoreError};
use crate::terrain::TerrainMap;

/// Structural failure from either the store or the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    /// See [`StoreError`].
    #[error(transparent)]
    Store(#[from] StoreError),
    /// See [`SpatialError`].
    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

/// Observer released when an entity is destroyed.
pub type DestroyObserver = Box<dyn DestroyHook + Send>;

/// Entity store, spatial index and terrain bundled together.
#[derive(Default)]
pub struct World {
    /// All entities and their parts.
    pub store: EntityStore,
    /// Entity locations and cell occupancy.
    pub spatial: SpatialIndex,
    /// Terrain oracle.
    pub terrain: TerrainMap,
    player: Option<Entity>,
    observers: Vec<DestroyObserver>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("store", &self.store)
            .field("spatial", &self.spatial)
            .field("terrain", &self.terrain)
            .field("player", &self.player)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Fans a destroy notification out to the spatial index and every
/// registered observer.
struct DestroyFanout<'a> {
    spatial: &'a mut SpatialIndex,
    observers: &'a mut [DestroyObserver],
}

impl DestroyHook for DestroyFanout<'_> {
    fn before_destroy(&mut self, entity: Entity) {
        self.spatial.before_destroy(entity);
        for observer in self.observers.iter_mut() {
            observer.before_destroy(entity);
        }
    }
}

impl World {
    /// Creates an empty world on open floor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world whose entity ids start at `first_id`.
    #[must_use]
    pub fn with_first_id(first_id: u64) -> Self {
        Self {
            store: EntityStore::with_first_id(first_id),
            ..Self::default()
        }
    }

    /// Creates an entity with `parts` and places it at `loc`.
    ///
    /// # Errors
    /// Returns [`StoreError::IdsExhausted`] once identifiers run out.
    pub fn spawn(
        &mut self,
        loc: Location,
        parts: Vec<Part>,
    ) -> Result<Entity, WorldError> {
        let entity = self.store.create()?;
        self.attach(entity, loc, Shape::single(), parts)
    }

    /// Like [`Self::spawn`] with a multi-cell shape.
    ///
    /// # Errors
    /// Returns [`StoreError::IdsExhausted`] once identifiers run out.
    pub fn spawn_shaped(
        &mut self,
        loc: Location,
        shape: Shape,
        parts: Vec<Part>,
    ) -> Result<Entity, WorldError> {
        let entity = self.store.create()?;
        self.attach(entity, loc, shape, parts)
    }

    /// Like [`Self::spawn`] with a caller-chosen identifier.
    ///
    /// # Errors
    /// Returns [`StoreError::DuplicateEntity`] if the id is taken.
    pub fn spawn_with_id(
        &mut self,
        id: u64,
        loc: Location,
        parts: Vec<Part>,
    ) -> Result<Entity, WorldError> {
        let entity = self.store.create_with_id(id)?;
        self.attach(entity, loc, Shape::single(), parts)
    }

    fn attach(
        &mut self,
        entity: Entity,
        loc: Location,
        shape: Shape,
        parts: Vec<Part>,
    ) -> Result<Entity, WorldError> {
        for part in parts {
            self.store.add(entity, part)?;
        }
        self.spatial.place_shaped(entity, loc, shape)?;
        Ok(entity)
    }

    /// Registers an observer notified before every destruction.
    pub fn observe_destroy(&mut self, observer: DestroyObserver) {
        self.observers.push(observer);
    }

    /// Removes the entity from the spatial index, notifies observers, then
    /// drops it from the store.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), WorldError> {
        let mut fanout = DestroyFanout {
            spatial: &mut self.spatial,
            observers: &mut self.observers,
        };
        self.store.destroy(entity, &mut fanout)?;
        if self.player == Some(entity) {
            info!("player {entity} destroyed");
            self.player = None;
        }
        Ok(())
    }

    /// The player-controlled entity, if any.
    #[must_use]
    pub const fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Designates the player-controlled entity.
    pub fn set_player(&mut self, player: Option<Entity>) {
        self.player = player;
    }

    /// Combat attributes of the entity, if it has any.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent.
    pub fn blob(&self, entity: Entity) -> Result<Option<&Blob>, StoreError> {
        self.store.get_as::<Blob>(entity)
    }

    /// Name for log output: the [`Desc`] name, or the identifier.
    #[must_use]
    pub fn describe(&self, entity: Entity) -> String {
        match self.store.get_as::<Desc>(entity) {
            Ok(Some(desc)) => format!("{} {entity}", desc.name),
            _ => entity.to_string(),
        }
    }
}
