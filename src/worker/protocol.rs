//! Wire format exchanged with workers
//!
//! Request: the per-avatar state view, filtered by fog of war.
//! Response: `{"action": {"action_type": "...", "options": {...}}}`.

use crate::actions::{Action, AvatarEvent};
use crate::core::error::DecisionError;
use crate::core::types::{Location, PlayerId};
use crate::pickups::Pickup;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What an avatar (own or neighbouring) looks like on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarState {
    pub health: i32,
    pub location: Location,
    pub score: u32,
    pub events: Vec<AvatarEvent>,
}

/// One cell as seen by a particular avatar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellView {
    Full {
        avatar: Option<AvatarState>,
        generates_score: bool,
        habitable: bool,
        location: Location,
        pickup: Option<Pickup>,
        partially_fogged: bool,
    },
    Fogged {
        generates_score: bool,
        location: Location,
        partially_fogged: bool,
    },
}

impl CellView {
    pub fn location(&self) -> Location {
        match self {
            CellView::Full { location, .. } | CellView::Fogged { location, .. } => *location,
        }
    }

    pub fn is_fogged(&self) -> bool {
        matches!(self, CellView::Fogged { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldMapView {
    pub cells: Vec<CellView>,
}

/// Everything a worker is told before deciding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateView {
    pub avatar_state: AvatarState,
    pub world_map: WorldMapView,
}

#[derive(Debug, Deserialize)]
pub struct DecisionResponse {
    pub action: ActionRequest,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action_type: String,
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// Turn a raw worker payload into an action bound to `avatar`
pub fn parse_decision(payload: Value, avatar: PlayerId) -> Result<Action, DecisionError> {
    let response: DecisionResponse = serde_json::from_value(payload)
        .map_err(|e| DecisionError::MalformedPayload(e.to_string()))?;
    Action::from_request(&response.action.action_type, &response.action.options, avatar)
}
