//! Rule constants used as defaults across systems.
//!
//! [`crate::config::Rules`] starts from these values and may override them.

/// Energy debited for every step taken.
pub const MOVE_COST: i32 = 100;
/// Energy debited for every shot fired, hit or miss.
pub const SHOT_COST: i32 = 100;
/// Number of cells a shot travels before giving up.
pub const SHOT_RANGE: u32 = 6;
/// First identifier issued by [`crate::store::EntityStore::create`].
pub const FIRST_ENTITY_ID: u64 = 1024;
/// Divisor applied to a crushed entity's armor to get the damage dealt back
/// to the crusher.
pub const CRUSH_ARMOR_DIVISOR: i32 = 2;
