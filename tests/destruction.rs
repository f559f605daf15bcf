//! Destruction cascades and spatial queries.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use glam::IVec2;
use rstest::rstest;
use skirmish::{
    damage_at, DamageOutcome, DestroyHook, Entity, EventLog, Location, Shape, SpatialError,
    World,
};
use test_utils::{big_blob, blob, spawn_at};

#[derive(Clone, Default)]
struct Graveyard(Arc<Mutex<Vec<Entity>>>);

impl DestroyHook for Graveyard {
    fn before_destroy(&mut self, entity: Entity) {
        self.0.lock().expect("graveyard lock").push(entity);
    }
}

#[rstest]
fn destroyed_entity_leaves_store_and_map() {
    let mut world = World::new();
    let graveyard = Graveyard::default();
    world.observe_destroy(Box::new(graveyard.clone()));
    let hex = world
        .spawn_shaped(
            Location::new(0, 0),
            Shape::hex7(),
            vec![big_blob(30).into()],
        )
        .expect("spawn succeeds");
    let cells = Shape::hex7().footprint(Location::new(0, 0));
    assert_eq!(world.spatial.entities_on(&cells), BTreeSet::from([hex]));

    world.destroy(hex).expect("hex exists");

    assert!(!world.store.exists(hex));
    assert!(world.spatial.entities_on(&cells).is_empty());
    assert_eq!(world.spatial.location(hex), Err(SpatialError::NotPlaced(hex)));
    assert_eq!(*graveyard.0.lock().expect("graveyard lock"), vec![hex]);
}

#[rstest]
fn queries_are_stable_without_mutation() {
    let mut world = World::new();
    spawn_at(&mut world, "a", (1, 1), blob(0, 0, 1));
    spawn_at(&mut world, "b", (1, 1), blob(0, 0, 1));
    spawn_at(&mut world, "c", (2, 1), blob(0, 0, 1));
    let cells = BTreeSet::from([Location::new(1, 1), Location::new(2, 1)]);

    assert_eq!(
        world.spatial.entities_at(Location::new(1, 1)),
        world.spatial.entities_at(Location::new(1, 1))
    );
    assert_eq!(world.spatial.entities_on(&cells), world.spatial.entities_on(&cells));
    assert_eq!(world.spatial.entities_on(&cells).len(), 3);
}

#[rstest]
fn area_damage_spares_nobody_on_the_cell() {
    let mut world = World::new();
    let weak = spawn_at(&mut world, "weak", (4, 4), blob(0, 0, 2));
    let tough = spawn_at(&mut world, "tough", (4, 4), blob(0, 0, 8));
    let mut log = EventLog::new();

    let outcomes = damage_at(&mut world, &mut log, Location::new(4, 4), 3).expect("cell exists");

    assert_eq!(
        outcomes,
        vec![
            (weak, DamageOutcome::Destroyed),
            (tough, DamageOutcome::Wounded { armor: 5 }),
        ]
    );
    assert_eq!(world.spatial.entities_at(Location::new(4, 4)), BTreeSet::from([tough]));
}

#[rstest]
fn shaped_entity_reports_every_cell() {
    let mut world = World::new();
    let wide = world
        .spawn_shaped(
            Location::new(0, 0),
            Shape::from_offsets([IVec2::ZERO, IVec2::new(1, 0), IVec2::new(0, 1)]),
            vec![big_blob(5).into()],
        )
        .expect("spawn succeeds");
    for cell in [(0, 0), (1, 0), (0, 1)] {
        assert_eq!(world.spatial.entities_at(cell.into()), BTreeSet::from([wide]));
    }
    assert!(world.spatial.entities_at(Location::new(1, 1)).is_empty());
}
