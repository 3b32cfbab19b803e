//! Action definitions and the registry workers are validated against

use crate::core::error::DecisionError;
use crate::core::types::{Direction, Location, PlayerId};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Every action kind a worker may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Wait,
    Move,
    Attack,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Wait, ActionKind::Move, ActionKind::Attack];

    /// Wire name used in `action_type`
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Wait => "wait",
            ActionKind::Move => "move",
            ActionKind::Attack => "attack",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// A resolved action, bound to the avatar that will perform it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Wait { avatar: PlayerId },
    Move { avatar: PlayerId, direction: Direction },
    Attack { avatar: PlayerId, direction: Direction },
}

impl Action {
    pub fn wait(avatar: PlayerId) -> Self {
        Action::Wait { avatar }
    }

    pub fn avatar(&self) -> PlayerId {
        match *self {
            Action::Wait { avatar } | Action::Move { avatar, .. } | Action::Attack { avatar, .. } => {
                avatar
            }
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Wait { .. } => ActionKind::Wait,
            Action::Move { .. } => ActionKind::Move,
            Action::Attack { .. } => ActionKind::Attack,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }

    /// Cell this action is aimed at when performed from `origin`
    pub fn target_location(&self, origin: Location) -> Location {
        match *self {
            Action::Wait { .. } => origin,
            Action::Move { direction, .. } | Action::Attack { direction, .. } => origin + direction,
        }
    }

    /// Build an action from a worker's `action_type` and `options`
    ///
    /// The avatar is supplied by the engine, never by the worker.
    pub fn from_request(
        action_type: &str,
        options: &Map<String, Value>,
        avatar: PlayerId,
    ) -> Result<Self, DecisionError> {
        let kind = ActionKind::from_name(action_type)
            .ok_or_else(|| DecisionError::UnknownAction(action_type.to_string()))?;

        let invalid = |reason: String| DecisionError::InvalidOptions {
            action: action_type.to_string(),
            reason,
        };

        match kind {
            ActionKind::Wait => {
                if let Some(key) = options.keys().next() {
                    return Err(invalid(format!("unexpected option `{}`", key)));
                }
                Ok(Action::Wait { avatar })
            }
            ActionKind::Move => {
                let DirectionOptions { direction } = DirectionOptions::parse(options).map_err(invalid)?;
                Ok(Action::Move { avatar, direction })
            }
            ActionKind::Attack => {
                let DirectionOptions { direction } = DirectionOptions::parse(options).map_err(invalid)?;
                Ok(Action::Attack { avatar, direction })
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectionOptions {
    direction: Direction,
}

impl DirectionOptions {
    fn parse(options: &Map<String, Value>) -> Result<Self, String> {
        serde_json::from_value(Value::Object(options.clone())).map_err(|e| e.to_string())
    }
}
