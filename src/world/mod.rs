//! The world grid: cells, bounds, spawning, expansion and fog of war

pub mod cell;
pub mod expansion;
pub mod fog;
pub mod grid;

pub use cell::Cell;
pub use fog::apply_fog_of_war;
pub use grid::{GridBounds, WorldGrid};
