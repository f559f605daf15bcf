//! Entity store owning every entity and its parts.
//!
//! Entities live in a [`BTreeMap`] keyed by identifier, so the turn-order
//! primitive [`EntityStore::entity_after`] is a single range lookup and does
//! not depend on how many parts an entity carries.

use std::collections::BTreeMap;
use std::ops::Bound;

use hashbrown::HashMap;
use log::{debug, trace};
use thiserror::Error;

use crate::constants::FIRST_ENTITY_ID;
use crate::entity::Entity;
use crate::parts::{Kind, Part, PartType};

/// Structural failures raised by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An explicit identifier was already taken.
    #[error("entity {0} already exists")]
    DuplicateEntity(Entity),
    /// The entity is not in the store.
    #[error("entity {0} does not exist")]
    UnknownEntity(Entity),
    /// The store holds no entities at all.
    #[error("no entities")]
    NoEntities,
    /// Every identifier above the largest one issued is used up.
    #[error("entity identifiers exhausted")]
    IdsExhausted,
}

/// Receives notice that an entity is about to be removed.
///
/// Anything that keeps derived state about entities (occupancy, view
/// overlays) implements this to release its references. The store calls the
/// hook before it drops the entity's parts.
pub trait DestroyHook {
    /// Called once per destroyed entity, before removal.
    fn before_destroy(&mut self, entity: Entity);
}

impl DestroyHook for () {
    fn before_destroy(&mut self, _entity: Entity) {}
}

type Parts = HashMap<Kind, Part>;

/// Owner of all entities and their parts.
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: BTreeMap<Entity, Parts>,
    /// `None` once `u64::MAX` has been issued.
    next_id: Option<u64>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Creates an empty store issuing identifiers from
    /// [`FIRST_ENTITY_ID`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_first_id(FIRST_ENTITY_ID)
    }

    /// Creates an empty store issuing identifiers from `first_id`.
    #[must_use]
    pub const fn with_first_id(first_id: u64) -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: Some(first_id),
        }
    }

    /// Allocates a fresh entity with no parts.
    ///
    /// The identifier is strictly greater than every identifier issued so
    /// far, including ones passed to [`Self::create_with_id`].
    ///
    /// # Errors
    /// Returns [`StoreError::IdsExhausted`] once `u64::MAX` has been issued.
    pub fn create(&mut self) -> Result<Entity, StoreError> {
        let id = self.next_id.ok_or(StoreError::IdsExhausted)?;
        let entity = Entity(id);
        self.next_id = id.checked_add(1);
        self.entities.insert(entity, Parts::new());
        trace!("created entity {entity}");
        Ok(entity)
    }

    /// Creates an entity with a caller-supplied identifier.
    ///
    /// # Errors
    /// Returns [`StoreError::DuplicateEntity`] if the identifier is taken.
    pub fn create_with_id(&mut self, id: u64) -> Result<Entity, StoreError> {
        let entity = Entity(id);
        if self.entities.contains_key(&entity) {
            return Err(StoreError::DuplicateEntity(entity));
        }
        self.entities.insert(entity, Parts::new());
        self.next_id = match (self.next_id, id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        trace!("created entity {entity} with explicit id");
        Ok(entity)
    }

    /// Removes the entity and every attached part.
    ///
    /// `hook` is notified before anything is removed.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent; the
    /// hook is not called in that case.
    pub fn destroy(
        &mut self,
        entity: Entity,
        hook: &mut dyn DestroyHook,
    ) -> Result<(), StoreError> {
        if !self.exists(entity) {
            return Err(StoreError::UnknownEntity(entity));
        }
        hook.before_destroy(entity);
        self.entities.remove(&entity);
        debug!("destroyed entity {entity}");
        Ok(())
    }

    /// Whether the entity is in the store.
    #[must_use]
    pub fn exists(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates over live entities in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys().copied()
    }

    /// Smallest live entity.
    #[must_use]
    pub fn first(&self) -> Option<Entity> {
        self.entities.keys().next().copied()
    }

    /// Largest live entity.
    #[must_use]
    pub fn last(&self) -> Option<Entity> {
        self.entities.keys().next_back().copied()
    }

    /// Attaches a part, replacing any existing part of the same kind.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent.
    pub fn add(&mut self, entity: Entity, part: impl Into<Part>) -> Result<(), StoreError> {
        let part = part.into();
        let parts = self.parts_mut(entity)?;
        parts.insert(part.kind(), part);
        Ok(())
    }

    /// Detaches and returns the part of the given kind, if any.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent.
    pub fn remove(&mut self, entity: Entity, kind: Kind) -> Result<Option<Part>, StoreError> {
        Ok(self.parts_mut(entity)?.remove(&kind))
    }

    /// Whether the entity carries a part of the given kind.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent.
    pub fn has(&self, entity: Entity, kind: Kind) -> Result<bool, StoreError> {
        Ok(self.parts(entity)?.contains_key(&kind))
    }

    /// Borrows the part of the given kind, or `None` if the entity lacks it.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent.
    pub fn get(&self, entity: Entity, kind: Kind) -> Result<Option<&Part>, StoreError> {
        Ok(self.parts(entity)?.get(&kind))
    }

    /// Borrows the part stored under `T`'s kind as `T`.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent.
    ///
    /// # Examples
    /// ```
    /// use skirmish::parts::Blob;
    /// use skirmish::store::EntityStore;
    ///
    /// let mut store = EntityStore::new();
    /// let e = store.create().expect("ids available");
    /// store.add(e, Blob::with_armor(5)).expect("entity exists");
    /// let armor = store.get_as::<Blob>(e).expect("entity exists").map(|b| b.armor);
    /// assert_eq!(armor, Some(5));
    /// ```
    pub fn get_as<T: PartType>(&self, entity: Entity) -> Result<Option<&T>, StoreError> {
        Ok(self.get(entity, T::KIND)?.and_then(T::from_part))
    }

    /// Mutably borrows the part stored under `T`'s kind as `T`.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownEntity`] if the entity is absent.
    pub fn get_as_mut<T: PartType>(&mut self, entity: Entity) -> Result<Option<&mut T>, StoreError> {
        Ok(self
            .parts_mut(entity)?
            .get_mut(&T::KIND)
            .and_then(T::from_part_mut))
    }

    /// Least entity strictly greater than `previous`, wrapping around to the
    /// smallest entity when none is greater.
    ///
    /// `previous` need not be alive, so a destroyed turn cursor still
    /// resolves to its successor.
    ///
    /// # Errors
    /// Returns [`StoreError::NoEntities`] if the store is empty.
    pub fn entity_after(&self, previous: Entity) -> Result<Entity, StoreError> {
        self.entities
            .range((Bound::Excluded(previous), Bound::Unbounded))
            .next()
            .map(|(&entity, _)| entity)
            .or_else(|| self.first())
            .ok_or(StoreError::NoEntities)
    }

    fn parts(&self, entity: Entity) -> Result<&Parts, StoreError> {
        self.entities
            .get(&entity)
            .ok_or(StoreError::UnknownEntity(entity))
    }

    fn parts_mut(&mut self, entity: Entity) -> Result<&mut Parts, StoreError> {
        self.entities
            .get_mut(&entity)
            .ok_or(StoreError::UnknownEntity(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::{Blob, Desc};
    use rstest::{fixture, rstest};

    #[derive(Default)]
    struct Recorder(Vec<Entity>);

    impl DestroyHook for Recorder {
        fn before_destroy(&mut self, entity: Entity) {
            self.0.push(entity);
        }
    }

    #[fixture]
    fn store() -> EntityStore {
        EntityStore::new()
    }

    #[rstest]
    fn create_issues_increasing_ids(mut store: EntityStore) {
        let first = store.create().expect("ids available");
        let second = store.create().expect("ids available");
        assert_eq!(first, Entity(FIRST_ENTITY_ID));
        assert!(second > first);
    }

    #[rstest]
    fn create_stays_above_explicit_ids(mut store: EntityStore) {
        store.create_with_id(5000).expect("id is free");
        assert_eq!(store.create(), Ok(Entity(5001)));
    }

    #[rstest]
    fn explicit_max_id_exhausts_allocation(mut store: EntityStore) {
        let top = store.create_with_id(u64::MAX).expect("id is free");
        store.add(top, Desc::new("last")).expect("entity exists");

        assert_eq!(store.create(), Err(StoreError::IdsExhausted));
        assert_eq!(store.create(), Err(StoreError::IdsExhausted));
        assert_eq!(store.len(), 1);
        assert!(store.has(top, Kind::Desc).expect("entity exists"));
    }

    #[rstest]
    fn last_natural_id_is_issued_once() {
        let mut store = EntityStore::with_first_id(u64::MAX - 1);
        assert_eq!(store.create(), Ok(Entity(u64::MAX - 1)));
        assert_eq!(store.create(), Ok(Entity(u64::MAX)));
        assert_eq!(store.create(), Err(StoreError::IdsExhausted));
        assert_eq!(store.create_with_id(3), Ok(Entity(3)));
        assert_eq!(store.create(), Err(StoreError::IdsExhausted));
    }

    #[rstest]
    fn duplicate_explicit_id_is_rejected(mut store: EntityStore) {
        store.create_with_id(7).expect("id is free");
        assert_eq!(
            store.create_with_id(7),
            Err(StoreError::DuplicateEntity(Entity(7)))
        );
    }

    #[rstest]
    fn add_overwrites_same_kind(mut store: EntityStore) {
        let e = store.create().expect("ids available");
        store.add(e, Blob::with_armor(1)).expect("entity exists");
        store.add(e, Blob::with_armor(2)).expect("entity exists");
        let blob = store.get_as::<Blob>(e).expect("entity exists");
        assert_eq!(blob.map(|b| b.armor), Some(2));
    }

    #[rstest]
    fn get_is_empty_for_missing_kind_but_errors_for_missing_entity(mut store: EntityStore) {
        let e = store.create().expect("ids available");
        store.add(e, Desc::new("crate")).expect("entity exists");
        assert_eq!(store.get(e, Kind::Blob), Ok(None));
        assert_eq!(store.has(e, Kind::Desc), Ok(true));
        assert_eq!(
            store.has(Entity(1), Kind::Blob),
            Err(StoreError::UnknownEntity(Entity(1)))
        );
        assert_eq!(
            store.add(Entity(1), Blob::default()),
            Err(StoreError::UnknownEntity(Entity(1)))
        );
    }

    #[rstest]
    fn remove_detaches_part(mut store: EntityStore) {
        let e = store.create().expect("ids available");
        store.add(e, Desc::new("crate")).expect("entity exists");
        let removed = store.remove(e, Kind::Desc).expect("entity exists");
        assert_eq!(removed, Some(Part::Desc(Desc::new("crate"))));
        assert_eq!(store.has(e, Kind::Desc), Ok(false));
    }

    #[rstest]
    fn destroy_notifies_hook_then_removes(mut store: EntityStore) {
        let e = store.create().expect("ids available");
        store.add(e, Blob::default()).expect("entity exists");
        let mut hook = Recorder::default();
        store.destroy(e, &mut hook).expect("entity exists");
        assert_eq!(hook.0, vec![e]);
        assert!(!store.exists(e));
        assert_eq!(store.get(e, Kind::Blob), Err(StoreError::UnknownEntity(e)));
    }

    #[rstest]
    fn destroying_unknown_entity_skips_hook(mut store: EntityStore) {
        let mut hook = Recorder::default();
        assert_eq!(
            store.destroy(Entity(3), &mut hook),
            Err(StoreError::UnknownEntity(Entity(3)))
        );
        assert!(hook.0.is_empty());
    }

    #[rstest]
    fn entity_after_fails_when_empty(store: EntityStore) {
        assert_eq!(store.entity_after(Entity(0)), Err(StoreError::NoEntities));
    }

    #[rstest]
    fn entity_after_wraps_on_singleton(mut store: EntityStore) {
        let only = store.create().expect("ids available");
        assert_eq!(store.entity_after(only), Ok(only));
        assert_eq!(store.entity_after(only), Ok(only));
    }

    #[rstest]
    #[case(0, 5)]
    #[case(5, 6)]
    #[case(6, 9)]
    #[case(7, 9)]
    #[case(9, 5)]
    #[case(100, 5)]
    fn entity_after_picks_next_or_wraps(#[case] previous: u64, #[case] expected: u64) {
        let mut store = EntityStore::new();
        for id in [9, 5, 6] {
            store.create_with_id(id).expect("id is free");
        }
        assert_eq!(store.entity_after(Entity(previous)), Ok(Entity(expected)));
    }

    #[rstest]
    fn repeated_entity_after_visits_everyone_before_repeating(mut store: EntityStore) {
        let created: Vec<_> = (0..5)
            .map(|_| store.create().expect("ids available"))
            .collect();
        let mut cursor = store.last().expect("store is not empty");
        let mut visited = Vec::new();
        for _ in 0..created.len() {
            cursor = store.entity_after(cursor).expect("store is not empty");
            visited.push(cursor);
        }
        assert_eq!(visited, created);
        assert_eq!(store.entity_after(cursor), Ok(created[0]));
    }
}
