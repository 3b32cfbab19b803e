//! Game and engine configuration with documented defaults
//!
//! `WorldSettings` is the per-level knob table read by the population
//! updater and by fog of war. `EngineConfig` wraps it together with the
//! runtime parameters of a game server and is what the binary loads from
//! TOML.

use crate::core::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Procedural and visibility knobs for one level
///
/// Every key is optional in TOML; anything left out takes the default,
/// which describes a static, fully visible world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct WorldSettings {
    // === EXPANSION ===
    /// Cells the map should hold per connected avatar
    ///
    /// When `ceil(avatars * this)` exceeds the current cell count the map
    /// grows by one outer ring per tick until the target is met.
    pub target_num_cells_per_avatar: f64,

    // === SCORE LOCATIONS ===
    /// Score-generating cells to maintain per avatar
    pub target_num_score_locations_per_avatar: f64,

    /// Per-tick chance that an individual score cell stops generating score
    ///
    /// Despawned score cells are replaced at random spawn candidates, so a
    /// non-zero value makes score locations wander over time.
    pub score_despawn_chance: f64,

    // === PICKUPS ===
    /// Pickups to maintain per avatar
    pub target_num_pickups_per_avatar: f64,

    /// Chance that a sampled candidate actually receives a pickup
    ///
    /// The deficit against the target is only a ceiling: a low chance
    /// throttles how quickly pickups refill.
    pub pickup_spawn_chance: f64,

    // === FOG OF WAR ===
    /// Chebyshev distance up to which cells are sent in full
    pub no_fog_of_war_distance: i32,

    /// Chebyshev distance up to which cells are sent at all
    ///
    /// Cells between the two thresholds are sent partially fogged.
    pub partial_fog_of_war_distance: i32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            target_num_cells_per_avatar: 0.0,
            target_num_score_locations_per_avatar: 0.0,
            score_despawn_chance: 0.0,
            target_num_pickups_per_avatar: 0.0,
            pickup_spawn_chance: 0.0,
            // Large enough that every realistic map is fully visible
            no_fog_of_war_distance: 1000,
            partial_fog_of_war_distance: 1000,
        }
    }
}

impl WorldSettings {
    /// Validate settings for internal consistency
    pub fn validate(&self) -> Result<()> {
        let densities = [
            ("TARGET_NUM_CELLS_PER_AVATAR", self.target_num_cells_per_avatar),
            (
                "TARGET_NUM_SCORE_LOCATIONS_PER_AVATAR",
                self.target_num_score_locations_per_avatar,
            ),
            ("TARGET_NUM_PICKUPS_PER_AVATAR", self.target_num_pickups_per_avatar),
        ];
        for (name, value) in densities {
            if !value.is_finite() || value < 0.0 {
                return Err(GameError::InvalidSettings(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let chances = [
            ("SCORE_DESPAWN_CHANCE", self.score_despawn_chance),
            ("PICKUP_SPAWN_CHANCE", self.pickup_spawn_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidSettings(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.no_fog_of_war_distance < 0 || self.partial_fog_of_war_distance < 0 {
            return Err(GameError::InvalidSettings(
                "fog of war distances must not be negative".into(),
            ));
        }

        Ok(())
    }
}

/// Runtime configuration for one game server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// How long a worker may take to answer before its avatar waits
    pub decision_timeout_ms: u64,

    /// Pause between ticks
    pub tick_interval_ms: u64,

    /// Width of the starting map
    pub initial_width: u32,

    /// Height of the starting map
    pub initial_height: u32,

    /// Seed for every random roll in the game; random when absent
    pub seed: Option<u64>,

    /// Stop after this many ticks; run until complete when absent
    pub max_ticks: Option<u64>,

    pub settings: WorldSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decision_timeout_ms: 2000,
            tick_interval_ms: 500,
            initial_width: 15,
            initial_height: 15,
            seed: None,
            max_ticks: None,
            settings: WorldSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.decision_timeout_ms == 0 {
            return Err(GameError::InvalidSettings(
                "decision_timeout_ms must be positive".into(),
            ));
        }
        if self.initial_width == 0 || self.initial_height == 0 {
            return Err(GameError::InvalidSettings(format!(
                "initial map must not be empty, got {}x{}",
                self.initial_width, self.initial_height
            )));
        }
        self.settings.validate()
    }

    pub fn decision_timeout(&self) -> Duration {
        Duration::from_millis(self.decision_timeout_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
