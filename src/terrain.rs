//! Terrain rules oracle.
//!
//! The action rules never inspect terrain directly; they ask a [`Terrain`]
//! whether a cell stops walkers or projectiles.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Answers passability questions about individual cells.
pub trait Terrain {
    /// Whether entities may not enter the cell.
    fn blocks_walk(&self, loc: Location) -> bool;

    /// Whether a projectile entering the cell stops there.
    fn blocks_shot(&self, loc: Location) -> bool;
}

/// Terrain type of a single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open ground.
    #[default]
    Floor,
    /// Solid obstacle.
    Wall,
    /// Impassable on foot, but shots fly over it.
    Water,
}

impl TerrainKind {
    /// Whether walkers are stopped by this terrain.
    #[must_use]
    pub const fn blocks_walk(self) -> bool {
        matches!(self, Self::Wall | Self::Water)
    }

    /// Whether shots are stopped by this terrain.
    #[must_use]
    pub const fn blocks_shot(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Sparse terrain map; unset cells are [`TerrainKind::Floor`].
#[derive(Debug, Clone, Default)]
pub struct TerrainMap {
    cells: HashMap<Location, TerrainKind>,
}

impl TerrainMap {
    /// Creates an all-floor map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Terrain at `loc`.
    #[must_use]
    pub fn get(&self, loc: Location) -> TerrainKind {
        self.cells.get(&loc).copied().unwrap_or_default()
    }

    /// Sets the terrain at `loc`.
    pub fn set(&mut self, loc: Location, kind: TerrainKind) {
        if kind == TerrainKind::Floor {
            self.cells.remove(&loc);
        } else {
            self.cells.insert(loc, kind);
        }
    }

    /// Sets every location in `locs` to `kind`.
    pub fn fill(&mut self, locs: impl IntoIterator<Item = Location>, kind: TerrainKind) {
        for loc in locs {
            self.set(loc, kind);
        }
    }
}

impl Terrain for TerrainMap {
    fn blocks_walk(&self, loc: Location) -> bool {
        self.get(loc).blocks_walk()
    }

    fn blocks_shot(&self, loc: Location) -> bool {
        self.get(loc).blocks_shot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TerrainKind::Floor, false, false)]
    #[case(TerrainKind::Wall, true, true)]
    #[case(TerrainKind::Water, true, false)]
    fn kinds_block_as_expected(
        #[case] kind: TerrainKind,
        #[case] walk: bool,
        #[case] shot: bool,
    ) {
        let mut map = TerrainMap::new();
        let loc = Location::new(1, 2);
        map.set(loc, kind);
        assert_eq!(map.blocks_walk(loc), walk);
        assert_eq!(map.blocks_shot(loc), shot);
    }

    #[rstest]
    fn unset_cells_are_floor() {
        let mut map = TerrainMap::new();
        map.fill([Location::new(0, 0), Location::new(0, 1)], TerrainKind::Wall);
        map.set(Location::new(0, 1), TerrainKind::Floor);
        assert_eq!(map.get(Location::new(0, 0)), TerrainKind::Wall);
        assert_eq!(map.get(Location::new(0, 1)), TerrainKind::Floor);
        assert_eq!(map.get(Location::new(9, 9)), TerrainKind::Floor);
    }
}
