//! Events recorded on avatars while actions resolve
//!
//! An avatar's events describe its last resolution phase and are sent back
//! to its worker with the next state view.

use crate::core::types::{Location, PlayerId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_name", rename_all = "snake_case")]
pub enum AvatarEvent {
    Moved {
        source_location: Location,
        target_location: Location,
    },
    FailedMove {
        source_location: Location,
        target_location: Location,
    },
    PerformedAttack {
        attacked_avatar: PlayerId,
        target_location: Location,
        damage_dealt: i32,
    },
    ReceivedAttack {
        attacking_avatar: PlayerId,
        damage_dealt: i32,
    },
    FailedAttack {
        target_location: Location,
    },
    Died {
        death_location: Location,
        respawn_location: Location,
    },
}
