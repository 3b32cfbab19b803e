//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a connected player (and of the avatar they control)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Grid coordinate
///
/// Ordered by x, then y. Sorted iteration over locations is what keeps
/// seeded runs reproducible even though the grid itself is a hash map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance, used by fog of war
    pub fn chebyshev_distance(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::ops::Add<Direction> for Location {
    type Output = Self;
    fn add(self, rhs: Direction) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

/// Single orthogonal step
///
/// Only the four unit vectors are representable; deserialization of anything
/// else fails, which is how workers sending diagonal or long moves get
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDirection")]
pub struct Direction {
    x: i32,
    y: i32,
}

impl Direction {
    pub const NORTH: Direction = Direction { x: 0, y: 1 };
    pub const EAST: Direction = Direction { x: 1, y: 0 };
    pub const SOUTH: Direction = Direction { x: 0, y: -1 };
    pub const WEST: Direction = Direction { x: -1, y: 0 };

    pub fn new(x: i32, y: i32) -> Result<Self, String> {
        if x.abs() + y.abs() != 1 {
            return Err(format!("direction ({}, {}) is not a unit step", x, y));
        }
        Ok(Self { x, y })
    }
}

#[derive(Deserialize)]
struct RawDirection {
    x: i32,
    y: i32,
}

impl TryFrom<RawDirection> for Direction {
    type Error = String;

    fn try_from(raw: RawDirection) -> Result<Self, Self::Error> {
        Direction::new(raw.x, raw.y)
    }
}
