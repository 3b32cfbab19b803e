//! Fog of war
//!
//! Workers only see the part of the map near their avatar. Distances are
//! Chebyshev, measured from the viewer, and both thresholds are shifted by
//! the viewer's `fog_of_war_modifier`:
//!
//! - up to the no-fog distance: the full cell
//! - beyond that, up to the partial-fog distance: location and score flag only
//! - further away: omitted

use crate::avatar::AvatarRuntime;
use crate::world::cell::Cell;
use crate::world::grid::WorldGrid;

/// The cells `viewer` may see, sorted by location
pub fn apply_fog_of_war(grid: &WorldGrid, viewer: &AvatarRuntime) -> Vec<Cell> {
    let settings = grid.settings();
    let no_fog_distance = viewer.fog_of_war_modifier + settings.no_fog_of_war_distance;
    let partial_fog_distance = viewer.fog_of_war_modifier + settings.partial_fog_of_war_distance;
    let origin = viewer.location();

    let mut visible: Vec<Cell> = grid
        .all_cells()
        .filter_map(|cell| {
            let distance = origin.chebyshev_distance(&cell.location());
            if distance > partial_fog_distance {
                None
            } else if distance <= no_fog_distance {
                Some(cell.visible_copy())
            } else {
                Some(cell.fogged_copy())
            }
        })
        .collect();
    visible.sort_by_key(Cell::location);
    visible
}
