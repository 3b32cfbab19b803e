//! Communication with the out-of-process workers that decide for players

pub mod client;
pub mod protocol;

pub use client::{DecisionTransport, WorkerClient};
pub use protocol::{AvatarState, CellView, StateView, WorldMapView};
