//! Actions workers can request and the events their resolution produces

pub mod catalog;
pub mod events;

pub use catalog::{Action, ActionKind};
pub use events::AvatarEvent;
