#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the skirmish turn and action rules.
//!
//! Entities live in an [`EntityStore`] keyed by ordered [`Entity`] ids and
//! carry typed [`Part`]s. A [`SpatialIndex`] places them on a hex grid and
//! the [`ActionSystem`] decides whose turn it is and resolves walking,
//! crushing, shooting and damage against a [`World`].
pub mod actions;
pub mod config;
pub mod constants;
pub mod demo;
pub mod entity;
pub mod hooks;
pub mod location;
pub mod logging;
mod macros;
pub mod parts;
pub mod spatial;
pub mod store;
pub mod terrain;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use actions::{
    blocks_movement, can_crush, crush_damage, damage, damage_at, is_ready, start_turn_update,
    ActionError, ActionSystem, DamageOutcome, ShotOutcome,
};
pub use config::{ConfigError, Rules};
pub use entity::Entity;
pub use hooks::{Color, Effects, Event, EventLog, Hooks, Messenger, NullHooks, ViewTracker};
pub use location::{HexDir, InvalidDirection, Location, Shape};
pub use logging::init as init_logging;
pub use parts::{Blob, Desc, Kind, Part, PartType};
pub use spatial::{SpatialError, SpatialIndex};
pub use store::{DestroyHook, EntityStore, StoreError};
pub use terrain::{Terrain, TerrainKind, TerrainMap};
pub use world::{World, WorldError};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust
    //! use skirmish::prelude::*;
    //!
    //! let mut world = World::new();
    //! let hero = world
    //!     .spawn(Location::new(0, 0), vec![Blob::with_armor(5).into()])
    //!     .expect("fresh entity");
    //! let moved = ActionSystem::default()
    //!     .walk(&mut world, &mut NullHooks, hero, HexDir::South)
    //!     .expect("hero has a blob");
    //! assert!(moved);
    //! ```

    pub use crate::actions::{is_ready, ActionSystem};
    pub use crate::config::Rules;
    pub use crate::entity::Entity;
    pub use crate::hooks::{EventLog, NullHooks};
    pub use crate::location::{HexDir, Location};
    pub use crate::parts::{Blob, Desc, Part};
    pub use crate::world::World;
}
