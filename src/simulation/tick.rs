//! Tick loop - one barrier-synchronised turn for every avatar
//!
//! Each tick runs these phases in order:
//! decisions -> resolution -> rewards -> effects -> population -> cleanup
//!
//! Only the decision phase is concurrent. Every state view is snapshotted
//! before any worker is asked, and all answers are in before anything moves.

use crate::core::error::Result;
use crate::core::types::Tick;
use crate::simulation::game_state::GameState;
use crate::simulation::population::WorldPopulationUpdater;
use crate::simulation::resolution::{apply_cell_rewards, resolve_actions};
use crate::worker::protocol::StateView;
use crate::worker::DecisionTransport;
use futures::future::join_all;
use std::time::Duration;

/// Summary of one completed tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The tick that was just run
    pub tick: Tick,
    /// Avatars whose worker produced a valid action
    pub decided: usize,
    /// Avatars that were made to wait instead
    pub fallbacks: usize,
    pub moves: usize,
    pub failed_moves: usize,
    pub attacks: usize,
    pub failed_attacks: usize,
    pub deaths: usize,
    pub pickups_applied: usize,
    pub score_awarded: u32,
    /// Whether the map gained an outer ring
    pub expanded: bool,
}

/// Drives ticks against a set of workers
pub struct TurnCoordinator<T: DecisionTransport> {
    transport: T,
    decision_timeout: Duration,
    population: WorldPopulationUpdater,
}

impl<T: DecisionTransport> TurnCoordinator<T> {
    pub fn new(transport: T, decision_timeout: Duration) -> Self {
        Self {
            transport,
            decision_timeout,
            population: WorldPopulationUpdater::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run a single tick
    ///
    /// A structural failure in the population phase aborts the tick; the
    /// tick counter is not advanced in that case.
    pub async fn run_tick(&self, state: &mut GameState) -> Result<TickReport> {
        let tick = state.tick();
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        // Decisions
        let views = state
            .avatars
            .player_ids()
            .into_iter()
            .map(|player_id| state.state_view(player_id))
            .collect::<Result<Vec<StateView>>>()?;
        let timeout = self.decision_timeout;
        let outcomes = join_all(
            state
                .avatars
                .avatars_mut()
                .zip(views.iter())
                .map(|(avatar, view)| avatar.decide(&self.transport, view, timeout)),
        )
        .await;
        report.decided = outcomes.iter().filter(|&&decided| decided).count();
        report.fallbacks = outcomes.len() - report.decided;

        // Resolution
        let summary = resolve_actions(&mut state.world, &mut state.avatars, &mut state.rng)?;
        report.moves = summary.moves;
        report.failed_moves = summary.failed_moves;
        report.attacks = summary.attacks;
        report.failed_attacks = summary.failed_attacks;
        report.deaths = summary.deaths;

        // Rewards
        let (score_awarded, pickups_applied) =
            apply_cell_rewards(&mut state.world, &mut state.avatars);
        report.score_awarded = score_awarded;
        report.pickups_applied = pickups_applied;

        // Effects
        for avatar in state.avatars.avatars_mut() {
            avatar.update_effects();
        }

        // Population
        let num_avatars = state.avatars.len();
        let population = self
            .population
            .update(&mut state.world, num_avatars, &mut state.rng)?;
        report.expanded = population.expanded();

        // Cleanup
        state.world.clear_cell_actions();
        for avatar in state.avatars.avatars_mut() {
            avatar.clear_action();
        }
        state.advance_tick();

        tracing::debug!(?report, "Tick complete");
        Ok(report)
    }

    /// Run ticks until the game completes or `max_ticks` have run
    ///
    /// Returns the number of ticks run by this call.
    pub async fn run(
        &self,
        state: &mut GameState,
        max_ticks: Option<u64>,
        interval: Duration,
    ) -> Result<u64> {
        let mut ticks_run = 0;
        while !state.is_complete() && max_ticks.map_or(true, |max| ticks_run < max) {
            if ticks_run > 0 && !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
            let report = self.run_tick(state).await?;
            ticks_run += 1;
            tracing::info!(
                tick = report.tick,
                decided = report.decided,
                fallbacks = report.fallbacks,
                moves = report.moves,
                deaths = report.deaths,
                "Tick"
            );
        }
        tracing::info!(ticks_run, complete = state.is_complete(), "Game loop stopped");
        Ok(ticks_run)
    }
}
