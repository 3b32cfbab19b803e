//! Storage for every avatar in a game, keyed by player

use crate::avatar::AvatarRuntime;
use crate::core::error::{GameError, Result};
use crate::core::types::{Location, PlayerId};
use reqwest::Url;
use std::collections::BTreeMap;

/// Owns all avatars
///
/// Iteration is always in increasing player id, which is the order actions
/// are resolved in.
#[derive(Debug, Default)]
pub struct AvatarManager {
    avatars_by_id: BTreeMap<PlayerId, AvatarRuntime>,
}

impl AvatarManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_avatar(
        &mut self,
        player_id: PlayerId,
        worker_endpoint: Url,
        location: Location,
    ) -> Result<&mut AvatarRuntime> {
        if self.avatars_by_id.contains_key(&player_id) {
            return Err(GameError::DuplicatePlayer(player_id));
        }
        let avatar = AvatarRuntime::new(player_id, location, worker_endpoint);
        Ok(self.avatars_by_id.entry(player_id).or_insert(avatar))
    }

    pub fn remove_avatar(&mut self, player_id: PlayerId) -> Option<AvatarRuntime> {
        self.avatars_by_id.remove(&player_id)
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&AvatarRuntime> {
        self.avatars_by_id.get(&player_id)
    }

    pub fn get_mut(&mut self, player_id: PlayerId) -> Option<&mut AvatarRuntime> {
        self.avatars_by_id.get_mut(&player_id)
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.avatars_by_id.contains_key(&player_id)
    }

    pub fn avatars(&self) -> impl Iterator<Item = &AvatarRuntime> {
        self.avatars_by_id.values()
    }

    pub fn avatars_mut(&mut self) -> impl Iterator<Item = &mut AvatarRuntime> {
        self.avatars_by_id.values_mut()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.avatars_by_id.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.avatars_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avatars_by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        "http://localhost:5000/turn/".parse().unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut manager = AvatarManager::new();
        manager.add_avatar(PlayerId(3), url(), Location::new(1, 1)).unwrap();
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get(PlayerId(3)).unwrap().location(), Location::new(1, 1));
        assert!(manager.get(PlayerId(4)).is_none());
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let mut manager = AvatarManager::new();
        manager.add_avatar(PlayerId(3), url(), Location::new(1, 1)).unwrap();
        let result = manager.add_avatar(PlayerId(3), url(), Location::new(0, 0));
        assert!(matches!(result, Err(GameError::DuplicatePlayer(PlayerId(3)))));
        assert_eq!(manager.get(PlayerId(3)).unwrap().location(), Location::new(1, 1));
    }

    #[test]
    fn test_iteration_is_ordered_by_player_id() {
        let mut manager = AvatarManager::new();
        for id in [9, 2, 5] {
            manager.add_avatar(PlayerId(id), url(), Location::new(id as i32, 0)).unwrap();
        }
        assert_eq!(manager.player_ids(), vec![PlayerId(2), PlayerId(5), PlayerId(9)]);
        let ids: Vec<_> = manager.avatars().map(|a| a.player_id).collect();
        assert_eq!(ids, vec![PlayerId(2), PlayerId(5), PlayerId(9)]);
    }

    #[test]
    fn test_remove_missing_player_is_noop() {
        let mut manager = AvatarManager::new();
        assert!(manager.remove_avatar(PlayerId(1)).is_none());
    }
}
