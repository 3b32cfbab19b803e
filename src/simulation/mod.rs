//! Game state and the per-tick pipeline that advances it

pub mod game_state;
pub mod population;
pub mod resolution;
pub mod tick;

pub use game_state::{CompletionCheck, GameState};
pub use population::{PopulationReport, WorldPopulationUpdater};
pub use resolution::ResolutionSummary;
pub use tick::{TickReport, TurnCoordinator};
