//! Grid locations, hex directions and entity footprints.
//!
//! The map is a hex grid stored in axial coordinates: the six neighbours of
//! a cell sit at `(-1,-1) (0,-1) (1,0) (1,1) (0,1) (-1,0)`.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Add;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discrete grid coordinate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Location {
    /// Axial x coordinate.
    pub x: i32,
    /// Axial y coordinate.
    pub y: i32,
}

impl Location {
    /// Creates a location from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinates as a vector.
    #[must_use]
    pub const fn to_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Vector pointing from this location to `other`.
    #[must_use]
    pub fn delta_to(self, other: Self) -> IVec2 {
        other.to_ivec2() - self.to_ivec2()
    }

    /// Number of hex steps between the two locations.
    #[must_use]
    pub fn hex_distance(self, other: Self) -> u32 {
        hex_length(self.delta_to(other))
    }
}

/// Length of a vector in hex steps.
///
/// With this axial layout, moving along `(1,1)` is one step, so same-sign
/// components share steps and opposite signs add up.
#[must_use]
pub fn hex_length(v: IVec2) -> u32 {
    if v.x.signum() == v.y.signum() {
        v.x.unsigned_abs().max(v.y.unsigned_abs())
    } else {
        v.x.unsigned_abs() + v.y.unsigned_abs()
    }
}

impl From<(i32, i32)> for Location {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<IVec2> for Location {
    fn from(v: IVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Add<IVec2> for Location {
    type Output = Self;

    fn add(self, offset: IVec2) -> Self {
        Self::from(self.to_ivec2() + offset)
    }
}

impl Add<HexDir> for Location {
    type Output = Self;

    fn add(self, dir: HexDir) -> Self {
        self + dir.to_ivec2()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A vector that is not one of the six hex adjacency vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is not a hex direction")]
pub struct InvalidDirection(pub IVec2);

/// One of the six hex adjacency directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDir {
    /// `(-1, -1)`
    North,
    /// `(0, -1)`
    NorthEast,
    /// `(1, 0)`
    SouthEast,
    /// `(1, 1)`
    South,
    /// `(0, 1)`
    SouthWest,
    /// `(-1, 0)`
    NorthWest,
}

impl HexDir {
    /// All directions, clockwise from north.
    pub const ALL: [Self; 6] = [
        Self::North,
        Self::NorthEast,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::NorthWest,
    ];

    /// Unit offset for this direction.
    #[must_use]
    pub const fn to_ivec2(self) -> IVec2 {
        match self {
            Self::North => IVec2::new(-1, -1),
            Self::NorthEast => IVec2::new(0, -1),
            Self::SouthEast => IVec2::new(1, 0),
            Self::South => IVec2::new(1, 1),
            Self::SouthWest => IVec2::new(0, 1),
            Self::NorthWest => IVec2::new(-1, 0),
        }
    }

    /// Direction pointing from `from` to `to` if both lie on one hex line.
    #[must_use]
    pub fn along_line(from: Location, to: Location) -> Option<(Self, u32)> {
        let delta = from.delta_to(to);
        let steps = hex_length(delta);
        if steps == 0 {
            return None;
        }
        Self::ALL.into_iter().find_map(|dir| {
            let reach = i32::try_from(steps).ok()?;
            (dir.to_ivec2() * reach == delta).then_some((dir, steps))
        })
    }

    /// Neighbouring direction that reduces the hex distance towards `to` the
    /// most, ties broken by [`Self::ALL`] order.
    #[must_use]
    pub fn towards(from: Location, to: Location) -> Option<Self> {
        if from == to {
            return None;
        }
        Self::ALL
            .into_iter()
            .min_by_key(|&dir| (from + dir).hex_distance(to))
    }
}

impl TryFrom<IVec2> for HexDir {
    type Error = InvalidDirection;

    fn try_from(v: IVec2) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|dir| dir.to_ivec2() == v)
            .ok_or(InvalidDirection(v))
    }
}

/// Set of cells an entity covers at some location.
pub type Footprint = BTreeSet<Location>;

/// Offsets, relative to an entity's location, of the cells it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape(Vec<IVec2>);

impl Default for Shape {
    fn default() -> Self {
        Self::single()
    }
}

impl Shape {
    /// Shape covering only the entity's own cell.
    #[must_use]
    pub fn single() -> Self {
        Self(vec![IVec2::ZERO])
    }

    /// Shape covering the entity's cell and its six neighbours.
    #[must_use]
    pub fn hex7() -> Self {
        let mut offsets = vec![IVec2::ZERO];
        offsets.extend(HexDir::ALL.map(HexDir::to_ivec2));
        Self(offsets)
    }

    /// Shape from explicit offsets. The origin is always included.
    #[must_use]
    pub fn from_offsets(offsets: impl IntoIterator<Item = IVec2>) -> Self {
        let mut cells: Vec<IVec2> = offsets.into_iter().collect();
        if !cells.contains(&IVec2::ZERO) {
            cells.insert(0, IVec2::ZERO);
        }
        cells.dedup();
        Self(cells)
    }

    /// Cells covered when the entity stands at `origin`.
    #[must_use]
    pub fn footprint(&self, origin: Location) -> Footprint {
        self.0.iter().map(|&offset| origin + offset).collect()
    }
}
