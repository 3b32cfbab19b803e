//! A single position on the world grid

use crate::actions::Action;
use crate::avatar::AvatarManager;
use crate::core::types::{Location, PlayerId};
use crate::pickups::Pickup;
use crate::worker::protocol::CellView;

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    location: Location,
    pub habitable: bool,
    pub generates_score: bool,
    /// Only ever true on fog of war copies, never on the authoritative grid
    pub partially_fogged: bool,
    avatar: Option<PlayerId>,
    pickup: Option<Pickup>,
    actions: Vec<Action>,
}

impl Cell {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            habitable: true,
            generates_score: false,
            partially_fogged: false,
            avatar: None,
            pickup: None,
            actions: Vec::new(),
        }
    }

    pub fn uninhabitable(location: Location) -> Self {
        Self { habitable: false, ..Self::new(location) }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn avatar(&self) -> Option<PlayerId> {
        self.avatar
    }

    pub fn is_occupied(&self) -> bool {
        self.avatar.is_some()
    }

    /// Only called together with the matching avatar location update
    pub(crate) fn set_avatar(&mut self, avatar: Option<PlayerId>) {
        self.avatar = avatar;
    }

    pub fn pickup(&self) -> Option<&Pickup> {
        self.pickup.as_ref()
    }

    pub fn set_pickup(&mut self, pickup: Pickup) {
        self.pickup = Some(pickup);
    }

    /// Remove the pickup from the cell, handing ownership to the caller
    pub fn take_pickup(&mut self) -> Option<Pickup> {
        self.pickup.take()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Move actions registered against this cell this tick
    pub fn moves(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|action| action.is_move())
    }

    pub(crate) fn register_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    /// Copy of this cell reduced to what a distant viewer may see
    pub fn fogged_copy(&self) -> Self {
        Self {
            generates_score: self.generates_score,
            partially_fogged: true,
            ..Self::new(self.location)
        }
    }

    /// Copy of this cell without per-tick bookkeeping
    pub fn visible_copy(&self) -> Self {
        Self { actions: Vec::new(), ..self.clone() }
    }

    pub fn to_view(&self, avatars: &AvatarManager) -> CellView {
        if self.partially_fogged {
            CellView::Fogged {
                generates_score: self.generates_score,
                location: self.location,
                partially_fogged: true,
            }
        } else {
            CellView::Full {
                avatar: self
                    .avatar
                    .and_then(|id| avatars.get(id))
                    .map(|avatar| avatar.to_state()),
                generates_score: self.generates_score,
                habitable: self.habitable,
                location: self.location,
                pickup: self.pickup.clone(),
                partially_fogged: false,
            }
        }
    }
}
