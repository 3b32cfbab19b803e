//! Growing the map by whole outer rings

use crate::core::types::Location;
use crate::world::cell::Cell;
use crate::world::grid::WorldGrid;

impl WorldGrid {
    /// Add one ring of new cells around the current bounds
    ///
    /// Left and right columns first, then the top and bottom rows spanning
    /// the widened x range, so each corner is created exactly once. Cells
    /// that already exist are left as they are. Returns the number of cells
    /// added; an empty grid has no bounds to grow from and gains nothing.
    pub fn add_outer_layer(&mut self) -> usize {
        let Some(bounds) = self.bounds() else {
            return 0;
        };
        let before = self.cells.len();

        for y in bounds.min_y..=bounds.max_y {
            self.insert_if_missing(Location::new(bounds.min_x - 1, y));
            self.insert_if_missing(Location::new(bounds.max_x + 1, y));
        }
        for x in (bounds.min_x - 1)..=(bounds.max_x + 1) {
            self.insert_if_missing(Location::new(x, bounds.min_y - 1));
            self.insert_if_missing(Location::new(x, bounds.max_y + 1));
        }

        let added = self.cells.len() - before;
        tracing::debug!("Added outer layer of {} cells", added);
        added
    }

    fn insert_if_missing(&mut self, location: Location) {
        self.cells.entry(location).or_insert_with(|| Cell::new(location));
    }
}
