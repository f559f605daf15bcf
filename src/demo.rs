//! A small scripted skirmish and the control loop that drives it.
//!
//! [`Skirmish::step`] performs one poll of the loop: if the active entity
//! is ready it picks and performs an action, otherwise the turn passes on.
//! The player's mech hunts the nearest infantry while every infantry unit
//! hunts the mech.

use log::{debug, info};

use crate::actions::{is_ready, ActionError, ActionSystem, ShotOutcome};
use crate::config::Rules;
use crate::entity::Entity;
use crate::hooks::{Event, EventLog};
use crate::location::{HexDir, Location};
use crate::parts::{Blob, Desc, Kind, Part};
use crate::terrain::TerrainKind;
use crate::world::{World, WorldError};

/// What one poll of the control loop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The active entity fired.
    Shot {
        /// Shooter.
        entity: Entity,
        /// Direction of fire.
        dir: HexDir,
        /// Where the shot ended.
        outcome: ShotOutcome,
    },
    /// The active entity stepped one cell.
    Walked {
        /// Walker.
        entity: Entity,
        /// Direction taken.
        dir: HexDir,
    },
    /// The active entity had nothing useful to do and spent its energy.
    Waited {
        /// Idle entity.
        entity: Entity,
    },
    /// The active entity was not ready; the next entity's turn began.
    TurnPassed {
        /// Entity whose turn began.
        next: Entity,
    },
}

/// A populated world plus the scheduler and event log driving it.
#[derive(Debug)]
pub struct Skirmish {
    world: World,
    turns: ActionSystem,
    log: EventLog,
}

fn mech() -> Vec<Part> {
    vec![
        Desc::new("mech").into(),
        Blob {
            energy: 0,
            power: 40,
            armor: 24,
            damage: 6,
            big: true,
        }
        .into(),
    ]
}

fn infantry() -> Vec<Part> {
    vec![
        Desc::new("infantry").into(),
        Blob {
            energy: 0,
            power: 25,
            armor: 5,
            damage: 2,
            big: false,
        }
        .into(),
    ]
}

impl Skirmish {
    /// Sets up the stock scenario: a player mech, three infantry units, a
    /// short wall and a pond.
    ///
    /// # Errors
    /// Propagates world errors; none occur for the stock layout.
    pub fn new(rules: Rules) -> Result<Self, WorldError> {
        let mut world = World::with_first_id(rules.first_entity_id);
        world.terrain.fill(
            [(3, -1), (3, 0), (3, 1)].map(Location::from),
            TerrainKind::Wall,
        );
        world.terrain.fill(
            [(1, 3), (2, 3), (2, 4)].map(Location::from),
            TerrainKind::Water,
        );

        let player = world.spawn(Location::new(0, 0), mech())?;
        world.set_player(Some(player));
        for loc in [(6, 0), (5, 2), (3, 5)] {
            world.spawn(Location::from(loc), infantry())?;
        }
        world.spawn(Location::new(-2, 1), vec![Desc::new("crate").into()])?;
        info!("skirmish ready with {} entities", world.store.len());

        Ok(Self::from_world(world, rules))
    }

    /// Wraps an already populated world.
    #[must_use]
    pub fn from_world(world: World, rules: Rules) -> Self {
        Self {
            world,
            turns: ActionSystem::new(rules),
            log: EventLog::new(),
        }
    }

    /// The simulated world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Everything the actions reported so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        self.log.events()
    }

    /// Whether the fight is over: the player is gone or has nobody left to
    /// fight.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        let Some(player) = self.world.player() else {
            return true;
        };
        self.world
            .store
            .iter()
            .all(|e| e == player || !matches!(self.world.blob(e), Ok(Some(_))))
    }

    /// Runs up to `max_steps` polls, stopping early once finished. Returns
    /// the number of polls made.
    ///
    /// # Errors
    /// Stops at the first structural error.
    pub fn run(&mut self, max_steps: usize) -> Result<usize, ActionError> {
        let mut taken = 0;
        while taken < max_steps && !self.is_finished() {
            self.step()?;
            taken += 1;
        }
        info!("skirmish stopped after {taken} steps");
        Ok(taken)
    }

    /// Performs one poll of the control loop.
    ///
    /// # Errors
    /// Fails if the world is empty or an action hits a structural error.
    pub fn step(&mut self) -> Result<Step, ActionError> {
        let entity = self.turns.active_entity(&self.world)?;
        if !is_ready(&self.world, entity) {
            let next = self.turns.next_entity(&mut self.world)?;
            return Ok(Step::TurnPassed { next });
        }

        let step = match self.plan(entity)? {
            Some(Plan::Shoot(dir)) => {
                let outcome = self.turns.shoot(&mut self.world, &mut self.log, entity, dir)?;
                Step::Shot {
                    entity,
                    dir,
                    outcome,
                }
            }
            Some(Plan::Walk(dir))
                if self.turns.walk(&mut self.world, &mut self.log, entity, dir)? =>
            {
                Step::Walked { entity, dir }
            }
            _ => {
                self.wait(entity)?;
                Step::Waited { entity }
            }
        };
        debug!("{step:?}");
        Ok(step)
    }

    fn plan(&self, entity: Entity) -> Result<Option<Plan>, ActionError> {
        let here = self.world.spatial.location(entity)?;
        let Some(target) = self.target_for(entity, here) else {
            return Ok(None);
        };
        if let Some((dir, distance)) = HexDir::along_line(here, target) {
            if distance <= self.turns.rules().shot_range {
                return Ok(Some(Plan::Shoot(dir)));
            }
        }
        Ok(HexDir::towards(here, target).map(Plan::Walk))
    }

    /// Nearest hostile location. The player fights everyone; everyone else
    /// fights the player.
    fn target_for(&self, entity: Entity, here: Location) -> Option<Location> {
        let player = self.world.player()?;
        self.world
            .store
            .iter()
            .filter(|&other| other != entity && (entity == player || other == player))
            .filter(|&other| matches!(self.world.blob(other), Ok(Some(_))))
            .filter_map(|other| self.world.spatial.location(other).ok())
            .min_by_key(|&loc| here.hex_distance(loc))
    }

    fn wait(&mut self, entity: Entity) -> Result<(), ActionError> {
        let cost = self.turns.rules().move_cost;
        let blob = self
            .world
            .store
            .get_as_mut::<Blob>(entity)?
            .ok_or(ActionError::MissingPart {
                entity,
                kind: Kind::Blob,
            })?;
        blob.energy -= cost;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Plan {
    Shoot(HexDir),
    Walk(HexDir),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn stock_scenario_has_a_player_and_enemies() {
        let skirmish = Skirmish::new(Rules::default()).expect("stock layout is valid");
        let player = skirmish.world().player().expect("player is designated");
        assert_eq!(player, Entity(1024));
        assert_eq!(skirmish.world().store.len(), 5);
        assert!(!skirmish.is_finished());
    }

    #[rstest]
    fn mech_opens_by_advancing_on_nearest_enemy() {
        let mut skirmish = Skirmish::new(Rules::default()).expect("stock layout is valid");
        assert_eq!(
            skirmish.step().expect("poll succeeds"),
            Step::Walked {
                entity: Entity(1024),
                dir: HexDir::SouthEast,
            }
        );
        assert_eq!(
            skirmish.world().spatial.location(Entity(1024)),
            Ok(Location::new(1, 0))
        );
    }

    #[rstest]
    fn spent_entity_passes_the_turn() {
        let mut skirmish = Skirmish::new(Rules::default()).expect("stock layout is valid");
        skirmish.step().expect("poll succeeds");
        assert!(matches!(
            skirmish.step().expect("poll succeeds"),
            Step::TurnPassed { .. }
        ));
    }

    #[rstest]
    fn lone_player_finishes_immediately() {
        let mut world = World::new();
        let player = world
            .spawn(Location::new(0, 0), mech())
            .expect("spawn succeeds");
        world.set_player(Some(player));
        let mut skirmish = Skirmish::from_world(world, Rules::default());
        assert!(skirmish.is_finished());
        assert_eq!(skirmish.run(10), Ok(0));
    }

    #[rstest]
    fn enemy_in_line_is_shot() {
        let mut world = World::new();
        let player = world
            .spawn(Location::new(0, 0), mech())
            .expect("spawn succeeds");
        world.set_player(Some(player));
        let grunt = world
            .spawn(Location::new(0, 3), infantry())
            .expect("spawn succeeds");
        let mut skirmish = Skirmish::from_world(world, Rules::default());

        let step = skirmish.step().expect("poll succeeds");

        assert_eq!(
            step,
            Step::Shot {
                entity: player,
                dir: HexDir::SouthWest,
                outcome: ShotOutcome::Hit {
                    distance: 3,
                    targets: [grunt].into(),
                },
            }
        );
        assert!(!skirmish.world().store.exists(grunt));
        assert!(skirmish.is_finished());
    }

    #[rstest]
    fn long_run_stays_consistent() {
        let mut skirmish = Skirmish::new(Rules::default()).expect("stock layout is valid");
        let taken = skirmish.run(500).expect("no structural errors");
        assert!(taken > 0);
        assert!(!skirmish.events().is_empty());
        for entity in skirmish.world().store.iter() {
            assert!(skirmish.world().spatial.location(entity).is_ok());
            assert!(!skirmish.world().spatial.is_in_flight(entity));
        }
    }
}
