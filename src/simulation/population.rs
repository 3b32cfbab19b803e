//! Keeping the world in step with the number of players
//!
//! Run once per tick after rewards. The map grows by one ring whenever it is
//! smaller than the target size, score locations churn, and pickups are
//! topped up. Every target is `ceil(avatars × per-avatar setting)`.

use crate::core::config::WorldSettings;
use crate::core::error::{GameError, Result};
use crate::pickups::Pickup;
use crate::world::WorldGrid;
use rand::Rng;

/// What one population update changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationReport {
    pub cells_added: usize,
    pub score_locations_removed: usize,
    pub score_locations_added: usize,
    pub pickups_added: usize,
}

impl PopulationReport {
    pub fn expanded(&self) -> bool {
        self.cells_added > 0
    }
}

fn target_for(num_avatars: usize, per_avatar: f64) -> usize {
    (num_avatars as f64 * per_avatar).ceil() as usize
}

/// Per-tick world maintenance driven by `WorldSettings`
#[derive(Debug, Default, Clone, Copy)]
pub struct WorldPopulationUpdater;

impl WorldPopulationUpdater {
    pub fn new() -> Self {
        Self
    }

    pub fn update<R: Rng + ?Sized>(
        &self,
        world: &mut WorldGrid,
        num_avatars: usize,
        rng: &mut R,
    ) -> Result<PopulationReport> {
        let settings = world.settings().clone();
        let mut report = PopulationReport::default();

        report.cells_added = self.expand(world, num_avatars, &settings)?;
        report.score_locations_removed = self.despawn_score_locations(world, &settings, rng);
        report.score_locations_added = self.spawn_score_locations(world, num_avatars, &settings, rng);
        report.pickups_added = self.spawn_pickups(world, num_avatars, &settings, rng);

        if report != PopulationReport::default() {
            tracing::debug!(?report, num_avatars, "World population updated");
        }
        Ok(report)
    }

    fn expand(
        &self,
        world: &mut WorldGrid,
        num_avatars: usize,
        settings: &WorldSettings,
    ) -> Result<usize> {
        let target = target_for(num_avatars, settings.target_num_cells_per_avatar);
        let before = world.cell_count();
        if target <= before {
            return Ok(0);
        }

        let added = world.add_outer_layer();
        if world.cell_count() <= before {
            return Err(GameError::StructuralInvariantViolation(format!(
                "map of {} cells did not grow towards target {}",
                before, target
            )));
        }
        tracing::info!(cells = world.cell_count(), target, "Expanded map");
        Ok(added)
    }

    fn despawn_score_locations<R: Rng + ?Sized>(
        &self,
        world: &mut WorldGrid,
        settings: &WorldSettings,
        rng: &mut R,
    ) -> usize {
        if settings.score_despawn_chance <= 0.0 {
            return 0;
        }
        let mut removed = 0;
        for location in world.locations_where(|cell| cell.generates_score) {
            if rng.gen::<f64>() < settings.score_despawn_chance {
                if let Ok(cell) = world.cell_at_mut(location) {
                    cell.generates_score = false;
                    removed += 1;
                }
            }
        }
        removed
    }

    fn spawn_score_locations<R: Rng + ?Sized>(
        &self,
        world: &mut WorldGrid,
        num_avatars: usize,
        settings: &WorldSettings,
        rng: &mut R,
    ) -> usize {
        let target = target_for(num_avatars, settings.target_num_score_locations_per_avatar);
        let deficit = target.saturating_sub(world.score_cells().count());

        let mut added = 0;
        for location in world.sample_spawn_locations(deficit, rng) {
            if let Ok(cell) = world.cell_at_mut(location) {
                cell.generates_score = true;
                added += 1;
            }
        }
        added
    }

    fn spawn_pickups<R: Rng + ?Sized>(
        &self,
        world: &mut WorldGrid,
        num_avatars: usize,
        settings: &WorldSettings,
        rng: &mut R,
    ) -> usize {
        let target = target_for(num_avatars, settings.target_num_pickups_per_avatar);
        let deficit = target.saturating_sub(world.pickup_cells().count());

        let mut added = 0;
        for location in world.sample_spawn_locations(deficit, rng) {
            if rng.gen::<f64>() >= settings.pickup_spawn_chance {
                continue;
            }
            let pickup = Pickup::random(rng);
            if let Ok(cell) = world.cell_at_mut(location) {
                cell.set_pickup(pickup);
                added += 1;
            }
        }
        added
    }
}
