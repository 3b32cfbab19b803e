//! Avatars: per-player runtime state and the collection that owns it

pub mod manager;
pub mod runtime;

pub use manager::AvatarManager;
pub use runtime::{AvatarRuntime, DEATH_SCORE_PENALTY, STARTING_HEALTH};
