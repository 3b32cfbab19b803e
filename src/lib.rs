//! Tickworld - a tick-based multiplayer grid game engine driven by remote workers

pub mod actions;
pub mod avatar;
pub mod core;
pub mod pickups;
pub mod simulation;
pub mod worker;
pub mod world;
