//! Everything that makes up one running game

use crate::avatar::AvatarManager;
use crate::core::error::{GameError, Result};
use crate::core::types::{Location, PlayerId, Tick};
use crate::worker::protocol::{StateView, WorldMapView};
use crate::worker::WorkerClient;
use crate::world::{apply_fog_of_war, WorldGrid};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// End-of-game policy, supplied by whoever hosts the game
pub type CompletionCheck = Box<dyn Fn(&GameState) -> bool + Send + Sync>;

/// The world, its avatars and the game's random stream
pub struct GameState {
    pub world: WorldGrid,
    pub avatars: AvatarManager,
    pub(crate) rng: ChaCha8Rng,
    tick: Tick,
    completion_check: CompletionCheck,
}

impl GameState {
    /// A game that never completes on its own
    pub fn new(world: WorldGrid, seed: u64) -> Self {
        Self {
            world,
            avatars: AvatarManager::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            completion_check: Box::new(|_| false),
        }
    }

    pub fn with_completion_check(
        mut self,
        check: impl Fn(&GameState) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.completion_check = Box::new(check);
        self
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn is_complete(&self) -> bool {
        (self.completion_check)(self)
    }

    /// Place a new avatar, at a random spawn candidate unless told where
    pub fn add_avatar(
        &mut self,
        player_id: PlayerId,
        worker_endpoint: &str,
        location: Option<Location>,
    ) -> Result<Location> {
        let endpoint = WorkerClient::parse_endpoint(worker_endpoint)?;
        if self.avatars.contains(player_id) {
            return Err(GameError::DuplicatePlayer(player_id));
        }

        let location = match location {
            Some(location) => location,
            None => self.world.random_spawn_location(&mut self.rng)?,
        };
        if self.world.cell_at(location)?.is_occupied() {
            return Err(GameError::CellOccupied(location));
        }

        self.avatars.add_avatar(player_id, endpoint, location)?;
        self.world.cell_at_mut(location)?.set_avatar(Some(player_id));
        tracing::info!(player = %player_id, %location, "Avatar joined");
        Ok(location)
    }

    /// Remove an avatar and free its cell; false if the player was unknown
    pub fn remove_avatar(&mut self, player_id: PlayerId) -> bool {
        let Some(avatar) = self.avatars.remove_avatar(player_id) else {
            return false;
        };
        if let Ok(cell) = self.world.cell_at_mut(avatar.location()) {
            if cell.avatar() == Some(player_id) {
                cell.set_avatar(None);
            }
        }
        tracing::info!(player = %player_id, "Avatar left");
        true
    }

    /// What `player_id`'s worker is sent this tick
    pub fn state_view(&self, player_id: PlayerId) -> Result<StateView> {
        let avatar = self
            .avatars
            .get(player_id)
            .ok_or(GameError::PlayerNotFound(player_id))?;
        let cells = apply_fog_of_war(&self.world, avatar)
            .iter()
            .map(|cell| cell.to_view(&self.avatars))
            .collect();
        Ok(StateView {
            avatar_state: avatar.to_state(),
            world_map: WorldMapView { cells },
        })
    }
}
