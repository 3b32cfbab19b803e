//! Applying one tick's actions to the world
//!
//! Actions are processed in increasing player id. Legality is checked when
//! an action is processed, against the grid as earlier actions left it.
//!
//! A move into a cell whose occupant is itself moving first resolves the
//! occupant's move, so queues of avatars walking in the same direction all
//! advance. Cycles (including two avatars swapping places) are rejected.

use crate::actions::{Action, AvatarEvent};
use crate::avatar::AvatarManager;
use crate::core::error::Result;
use crate::core::types::{Direction, Location, PlayerId};
use crate::world::WorldGrid;
use rand::Rng;
use std::collections::BTreeMap;

/// What happened during one resolution phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    pub moves: usize,
    pub failed_moves: usize,
    pub attacks: usize,
    pub failed_attacks: usize,
    pub deaths: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Pending,
    InProgress,
    Done,
}

/// Register and process every avatar's pending action
pub fn resolve_actions<R: Rng + ?Sized>(
    world: &mut WorldGrid,
    avatars: &mut AvatarManager,
    rng: &mut R,
) -> Result<ResolutionSummary> {
    for avatar in avatars.avatars_mut() {
        avatar.clear_events();
        if let Some(action) = avatar.pending_action().copied() {
            world.register_action(action, avatar.location());
        }
    }

    let ids = avatars.player_ids();
    let mut resolver = Resolver {
        world,
        avatars,
        rng,
        progress: ids.iter().map(|&id| (id, Progress::Pending)).collect(),
        summary: ResolutionSummary::default(),
    };
    for id in ids {
        resolver.process(id)?;
    }
    Ok(resolver.summary)
}

struct Resolver<'a, R: ?Sized> {
    world: &'a mut WorldGrid,
    avatars: &'a mut AvatarManager,
    rng: &'a mut R,
    progress: BTreeMap<PlayerId, Progress>,
    summary: ResolutionSummary,
}

impl<R: Rng + ?Sized> Resolver<'_, R> {
    fn progress(&self, id: PlayerId) -> Progress {
        self.progress.get(&id).copied().unwrap_or(Progress::Done)
    }

    fn process(&mut self, id: PlayerId) -> Result<()> {
        if self.progress(id) != Progress::Pending {
            return Ok(());
        }
        self.progress.insert(id, Progress::InProgress);

        let action = self.avatars.get(id).and_then(|avatar| avatar.pending_action().copied());
        match action {
            Some(Action::Move { direction, .. }) => self.process_move(id, direction)?,
            Some(Action::Attack { direction, .. }) => self.process_attack(id, direction)?,
            Some(Action::Wait { .. }) | None => {}
        }

        if let Some(avatar) = self.avatars.get_mut(id) {
            avatar.clear_action();
        }
        self.progress.insert(id, Progress::Done);
        Ok(())
    }

    fn location_of(&self, id: PlayerId) -> Option<Location> {
        self.avatars.get(id).map(|avatar| avatar.location())
    }

    fn process_move(&mut self, id: PlayerId, direction: Direction) -> Result<()> {
        let Some(source) = self.location_of(id) else {
            return Ok(());
        };
        let target = source + direction;

        // Let whoever is standing in the way try to leave first
        if let Some(occupant) = self.world.cell_at(target).ok().and_then(|cell| cell.avatar()) {
            let occupant_moving = self.avatars.get(occupant).map_or(false, |a| a.is_moving());
            if occupant != id && occupant_moving && self.progress(occupant) == Progress::Pending {
                self.process(occupant)?;
            }
        }

        let vacated = self
            .world
            .cell_at(target)
            .map_or(false, |cell| !cell.is_occupied());
        let legal = vacated && self.world.can_move_into(target, self.avatars);

        let Some(avatar) = self.avatars.get_mut(id) else {
            return Ok(());
        };
        if legal {
            self.world.cell_at_mut(source)?.set_avatar(None);
            self.world.cell_at_mut(target)?.set_avatar(Some(id));
            avatar.set_location(target);
            avatar.add_event(AvatarEvent::Moved {
                source_location: source,
                target_location: target,
            });
            self.summary.moves += 1;
        } else {
            avatar.add_event(AvatarEvent::FailedMove {
                source_location: source,
                target_location: target,
            });
            self.summary.failed_moves += 1;
        }
        Ok(())
    }

    fn process_attack(&mut self, id: PlayerId, direction: Direction) -> Result<()> {
        let Some(source) = self.location_of(id) else {
            return Ok(());
        };
        let target = source + direction;

        let victim_id = self
            .world
            .attackable_avatar_at(target)
            .filter(|&victim| victim != id && self.avatars.contains(victim));
        let Some(victim_id) = victim_id else {
            if let Some(attacker) = self.avatars.get_mut(id) {
                attacker.add_event(AvatarEvent::FailedAttack { target_location: target });
            }
            self.summary.failed_attacks += 1;
            return Ok(());
        };

        let strength = self.avatars.get(id).map_or(0, |attacker| attacker.attack_strength);
        let (applied, died, death_location) = match self.avatars.get_mut(victim_id) {
            Some(victim) => {
                let applied = victim.apply_damage(strength);
                victim.add_event(AvatarEvent::ReceivedAttack {
                    attacking_avatar: id,
                    damage_dealt: applied,
                });
                (applied, !victim.is_alive(), victim.location())
            }
            None => return Ok(()),
        };
        if let Some(attacker) = self.avatars.get_mut(id) {
            attacker.add_event(AvatarEvent::PerformedAttack {
                attacked_avatar: victim_id,
                target_location: target,
                damage_dealt: applied,
            });
        }
        self.summary.attacks += 1;
        tracing::debug!(attacker = %id, victim = %victim_id, applied, "Attack resolved");

        if died {
            self.respawn(victim_id, death_location)?;
        }
        Ok(())
    }

    /// Soft respawn of a killed avatar at a fresh spawn candidate
    fn respawn(&mut self, victim_id: PlayerId, death_location: Location) -> Result<()> {
        let respawn_location = match self.world.random_spawn_location(&mut *self.rng) {
            Ok(location) => location,
            Err(err) => {
                tracing::warn!(player = %victim_id, "Respawning in place: {}", err);
                death_location
            }
        };

        self.world.cell_at_mut(death_location)?.set_avatar(None);
        self.world.cell_at_mut(respawn_location)?.set_avatar(Some(victim_id));

        if let Some(victim) = self.avatars.get_mut(victim_id) {
            victim.on_death(respawn_location);
            victim.clear_action();
            victim.add_event(AvatarEvent::Died {
                death_location,
                respawn_location,
            });
        }
        // A dead avatar does not get to act later in the same tick
        self.progress.insert(victim_id, Progress::Done);
        self.summary.deaths += 1;
        tracing::info!(player = %victim_id, %death_location, %respawn_location, "Avatar died");
        Ok(())
    }
}

/// Score cells pay their occupant; pickups are consumed by their occupant
///
/// Returns (score awarded, pickups applied).
pub fn apply_cell_rewards(world: &mut WorldGrid, avatars: &mut AvatarManager) -> (u32, usize) {
    let mut score_awarded = 0;
    for location in world.locations_where(|cell| cell.generates_score && cell.is_occupied()) {
        let occupant = world.cell_at(location).ok().and_then(|cell| cell.avatar());
        if let Some(avatar) = occupant.and_then(|id| avatars.get_mut(id)) {
            avatar.score += 1;
            score_awarded += 1;
        }
    }

    let mut pickups_applied = 0;
    for location in world.locations_where(|cell| cell.pickup().is_some() && cell.is_occupied()) {
        let Ok(cell) = world.cell_at_mut(location) else {
            continue;
        };
        let Some(avatar) = cell.avatar().and_then(|id| avatars.get_mut(id)) else {
            continue;
        };
        if let Some(pickup) = cell.take_pickup() {
            tracing::debug!(player = %avatar.player_id, ?pickup, "Pickup applied");
            pickup.apply(avatar);
            pickups_applied += 1;
        }
    }

    (score_awarded, pickups_applied)
}
