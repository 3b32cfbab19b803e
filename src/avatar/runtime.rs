//! The engine's view of one player's avatar
//!
//! Not to be confused with the player's own code, which lives in a worker
//! and is only reached through `decide`.

use crate::actions::{Action, AvatarEvent};
use crate::core::error::DecisionError;
use crate::core::types::{Location, PlayerId};
use crate::pickups::{HeldItem, TimedEffect};
use crate::worker::protocol::{self, AvatarState, StateView};
use crate::worker::DecisionTransport;
use reqwest::Url;
use std::collections::BTreeMap;
use std::time::Duration;

/// Health every avatar spawns and respawns with
pub const STARTING_HEALTH: i32 = 5;

/// Score lost on death
pub const DEATH_SCORE_PENALTY: u32 = 2;

#[derive(Debug, Clone)]
pub struct AvatarRuntime {
    pub player_id: PlayerId,
    location: Location,
    pub health: i32,
    pub score: u32,
    worker_endpoint: Url,
    pending_action: Option<Action>,
    active_effects: Vec<TimedEffect>,
    pub resistance: i32,
    pub attack_strength: i32,
    held_items: BTreeMap<HeldItem, u32>,
    /// Widens (or narrows) both fog of war thresholds for this avatar
    pub fog_of_war_modifier: i32,
    events: Vec<AvatarEvent>,
}

impl AvatarRuntime {
    pub fn new(player_id: PlayerId, location: Location, worker_endpoint: Url) -> Self {
        Self {
            player_id,
            location,
            health: STARTING_HEALTH,
            score: 0,
            worker_endpoint,
            pending_action: None,
            active_effects: Vec::new(),
            resistance: 0,
            attack_strength: 1,
            held_items: BTreeMap::new(),
            fog_of_war_modifier: 0,
            events: Vec::new(),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Only called together with the matching cell update
    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn pending_action(&self) -> Option<&Action> {
        self.pending_action.as_ref()
    }

    pub(crate) fn set_pending_action(&mut self, action: Action) {
        self.pending_action = Some(action);
    }

    pub fn clear_action(&mut self) {
        self.pending_action = None;
    }

    pub fn is_moving(&self) -> bool {
        self.pending_action.map_or(false, |action| action.is_move())
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Ask the worker for this tick's action
    ///
    /// Returns true when the worker produced a valid action. On any failure
    /// the avatar is given a Wait instead, so after this call there is always
    /// exactly one pending action.
    pub async fn decide<T: DecisionTransport>(
        &mut self,
        transport: &T,
        view: &StateView,
        timeout: Duration,
    ) -> bool {
        match self.fetch_action(transport, view, timeout).await {
            Ok(action) => {
                tracing::debug!(player = %self.player_id, ?action, "Worker decided");
                self.pending_action = Some(action);
                true
            }
            Err(err) => {
                match &err {
                    DecisionError::Unreachable(_) => tracing::info!(
                        player = %self.player_id,
                        "Could not connect to worker, probably not ready yet"
                    ),
                    DecisionError::MalformedPayload(_)
                    | DecisionError::UnknownAction(_)
                    | DecisionError::InvalidOptions { .. } => tracing::info!(
                        player = %self.player_id,
                        "Bad action data supplied: {}",
                        err
                    ),
                    DecisionError::Timeout(_) | DecisionError::Transport(_) => tracing::warn!(
                        player = %self.player_id,
                        "Error while fetching turn data: {}",
                        err
                    ),
                }
                self.pending_action = Some(Action::wait(self.player_id));
                false
            }
        }
    }

    async fn fetch_action<T: DecisionTransport>(
        &self,
        transport: &T,
        view: &StateView,
        timeout: Duration,
    ) -> Result<Action, DecisionError> {
        // Dropping the request future on timeout abandons the call; a late
        // answer is never read.
        let payload = tokio::time::timeout(
            timeout,
            transport.request_decision(&self.worker_endpoint, view),
        )
        .await
        .map_err(|_| DecisionError::Timeout(timeout))??;

        protocol::parse_decision(payload, self.player_id)
    }

    pub fn active_effects(&self) -> &[TimedEffect] {
        &self.active_effects
    }

    pub fn add_effect(&mut self, effect: TimedEffect) {
        let kind = effect.kind();
        self.resistance += kind.resistance_bonus();
        self.attack_strength += kind.attack_bonus();
        self.active_effects.push(effect);
    }

    /// Tick every effect, then drop the ones that expired
    pub fn update_effects(&mut self) {
        for effect in &mut self.active_effects {
            effect.on_tick();
        }

        let (expired, active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active_effects)
            .into_iter()
            .partition(TimedEffect::is_expired);
        self.active_effects = active;

        for effect in expired {
            let kind = effect.kind();
            self.resistance -= kind.resistance_bonus();
            self.attack_strength -= kind.attack_bonus();
            tracing::debug!(player = %self.player_id, ?kind, "Effect expired");
        }
    }

    /// Apply incoming damage reduced by resistance; returns what was applied
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let applied = (amount - self.resistance).max(0);
        self.health -= applied;
        applied
    }

    /// Soft respawn: health, score and location reset, nothing else
    pub fn on_death(&mut self, respawn_location: Location) {
        self.health = STARTING_HEALTH;
        self.score = self.score.saturating_sub(DEATH_SCORE_PENALTY);
        self.location = respawn_location;
    }

    pub fn add_held_item(&mut self, item: HeldItem) {
        *self.held_items.entry(item).or_insert(0) += 1;
    }

    pub fn held_count(&self, item: HeldItem) -> u32 {
        self.held_items.get(&item).copied().unwrap_or(0)
    }

    pub fn events(&self) -> &[AvatarEvent] {
        &self.events
    }

    pub(crate) fn add_event(&mut self, event: AvatarEvent) {
        self.events.push(event);
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn to_state(&self) -> AvatarState {
        AvatarState {
            health: self.health,
            location: self.location,
            score: self.score,
            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pickups::{EffectKind, TimedEffect};

    fn avatar() -> AvatarRuntime {
        AvatarRuntime::new(
            PlayerId(1),
            Location::new(0, 0),
            "http://localhost:5000/turn/".parse().unwrap(),
        )
    }

    #[test]
    fn test_new_avatar_defaults() {
        let avatar = avatar();
        assert_eq!(avatar.health, STARTING_HEALTH);
        assert_eq!(avatar.score, 0);
        assert_eq!(avatar.resistance, 0);
        assert_eq!(avatar.attack_strength, 1);
        assert!(avatar.pending_action().is_none());
    }

    #[test]
    fn test_damage_reduced_by_resistance() {
        let mut avatar = avatar();
        avatar.resistance = 2;
        assert_eq!(avatar.apply_damage(5), 3);
        assert_eq!(avatar.health, 2);
    }

    #[test]
    fn test_damage_never_negative() {
        let mut avatar = avatar();
        avatar.resistance = 10;
        assert_eq!(avatar.apply_damage(5), 0);
        assert_eq!(avatar.health, STARTING_HEALTH);
    }

    #[test]
    fn test_death_resets_health_score_and_location() {
        let mut avatar = avatar();
        avatar.score = 7;
        avatar.health = -2;
        avatar.add_effect(TimedEffect::new(EffectKind::Invulnerability, 3));
        avatar.on_death(Location::new(4, 4));
        assert_eq!(avatar.health, STARTING_HEALTH);
        assert_eq!(avatar.score, 5);
        assert_eq!(avatar.location(), Location::new(4, 4));
        assert_eq!(avatar.active_effects().len(), 1);
    }

    #[test]
    fn test_death_score_floored_at_zero() {
        let mut avatar = avatar();
        avatar.score = 1;
        avatar.on_death(Location::new(0, 1));
        assert_eq!(avatar.score, 0);
    }

    #[test]
    fn test_effects_expire_and_revert() {
        let mut avatar = avatar();
        avatar.add_effect(TimedEffect::new(EffectKind::DamageBoost { damage_boost: 4 }, 1));
        avatar.add_effect(TimedEffect::new(EffectKind::Invulnerability, 2));
        assert_eq!(avatar.attack_strength, 5);

        avatar.update_effects();
        assert_eq!(avatar.attack_strength, 1);
        assert_eq!(avatar.active_effects().len(), 1);
        assert!(avatar.resistance > 0);

        avatar.update_effects();
        assert_eq!(avatar.resistance, 0);
        assert!(avatar.active_effects().is_empty());
    }

    #[test]
    fn test_is_moving_follows_pending_action() {
        use crate::core::types::Direction;
        let mut avatar = avatar();
        assert!(!avatar.is_moving());
        avatar.set_pending_action(Action::Move {
            avatar: PlayerId(1),
            direction: Direction::EAST,
        });
        assert!(avatar.is_moving());
        avatar.clear_action();
        assert!(!avatar.is_moving());
    }
}
