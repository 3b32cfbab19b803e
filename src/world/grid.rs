//! Sparse world grid
//!
//! The grid is a hash map from location to cell. It does not have to be a
//! rectangle, but everything the engine builds is one: maps start as
//! rectangles and only ever grow by whole outer rings.

use crate::actions::Action;
use crate::avatar::AvatarManager;
use crate::core::config::WorldSettings;
use crate::core::error::{GameError, Result};
use crate::core::types::{Location, PlayerId};
use crate::world::cell::Cell;
use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;

/// Inclusive bounding box of every cell on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl GridBounds {
    /// Bounds of a `width` x `height` rectangle centred on the origin
    pub fn centred(width: u32, height: u32) -> Self {
        let (width, height) = (width as i32, height as i32);
        let max_x = width / 2;
        let max_y = height / 2;
        Self {
            min_x: -(width - max_x - 1),
            max_x,
            min_y: -(height - max_y - 1),
            max_y,
        }
    }
}

#[derive(Debug)]
pub struct WorldGrid {
    pub(crate) cells: AHashMap<Location, Cell>,
    settings: WorldSettings,
}

impl WorldGrid {
    /// Build a grid from arbitrary cells; fails on invalid `settings`
    pub fn new(cells: impl IntoIterator<Item = Cell>, settings: WorldSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            cells: cells.into_iter().map(|cell| (cell.location(), cell)).collect(),
            settings,
        })
    }

    /// Rectangle of empty habitable cells centred on the origin
    pub fn generate_empty(width: u32, height: u32, settings: WorldSettings) -> Result<Self> {
        let bounds = GridBounds::centred(width, height);
        let cells = (bounds.min_x..=bounds.max_x).flat_map(|x| {
            (bounds.min_y..=bounds.max_y).map(move |y| Cell::new(Location::new(x, y)))
        });
        Self::new(cells, settings)
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn is_on_map(&self, location: Location) -> bool {
        self.cells.contains_key(&location)
    }

    pub fn cell_at(&self, location: Location) -> Result<&Cell> {
        self.cells.get(&location).ok_or(GameError::NotOnMap(location))
    }

    pub fn cell_at_mut(&mut self, location: Location) -> Result<&mut Cell> {
        self.cells.get_mut(&location).ok_or(GameError::NotOnMap(location))
    }

    pub fn all_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Locations of cells matching `filter`, sorted
    pub fn locations_where(&self, filter: impl Fn(&Cell) -> bool) -> Vec<Location> {
        let mut locations: Vec<Location> = self
            .cells
            .values()
            .filter(|cell| filter(*cell))
            .map(Cell::location)
            .collect();
        locations.sort();
        locations
    }

    pub fn score_cells(&self) -> impl Iterator<Item = &Cell> {
        self.all_cells().filter(|cell| cell.generates_score)
    }

    pub fn pickup_cells(&self) -> impl Iterator<Item = &Cell> {
        self.all_cells().filter(|cell| cell.pickup().is_some())
    }

    /// Cells a new avatar, score location or pickup may be placed on
    pub fn habitable_spawn_candidates(&self) -> impl Iterator<Item = &Cell> {
        self.all_cells().filter(|cell| is_spawn_candidate(cell))
    }

    /// One random spawn candidate
    ///
    /// Unlike `sample_spawn_locations`, running out of candidates is an
    /// error: the caller needs exactly one location.
    pub fn random_spawn_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Location> {
        self.locations_where(is_spawn_candidate)
            .choose(rng)
            .copied()
            .ok_or(GameError::NoSpawnAvailable)
    }

    /// Up to `n` distinct spawn candidates; fewer when the map is crowded
    pub fn sample_spawn_locations<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Location> {
        if n == 0 {
            return Vec::new();
        }
        let candidates = self.locations_where(is_spawn_candidate);
        if candidates.len() < n {
            tracing::debug!(
                "Not enough potential locations: wanted {}, have {}",
                n,
                candidates.len()
            );
        }
        candidates.choose_multiple(rng, n).copied().collect()
    }

    /// Whether an avatar may step into `location` this tick
    ///
    /// The cell must be on the map and habitable, either empty or held by an
    /// avatar that is itself moving away, and targeted by at most one move.
    pub fn can_move_into(&self, location: Location, avatars: &AvatarManager) -> bool {
        let Ok(cell) = self.cell_at(location) else {
            return false;
        };
        let occupant_allows = match cell.avatar() {
            None => true,
            Some(id) => avatars.get(id).map_or(false, |occupant| occupant.is_moving()),
        };
        cell.habitable && occupant_allows && cell.moves().count() <= 1
    }

    /// Avatar an attack aimed at `location` would hit
    ///
    /// The occupant if there is one, otherwise the single avatar moving in.
    /// With several avatars moving in nobody can be hit.
    pub fn attackable_avatar_at(&self, location: Location) -> Option<PlayerId> {
        let cell = self.cell_at(location).ok()?;
        if let Some(avatar) = cell.avatar() {
            return Some(avatar);
        }
        let mut moves = cell.moves();
        match (moves.next(), moves.next()) {
            (Some(action), None) => Some(action.avatar()),
            _ => None,
        }
    }

    /// Record `action`, performed from `origin`, on the cell it targets
    ///
    /// Actions aimed off the map are not recorded anywhere.
    pub fn register_action(&mut self, action: Action, origin: Location) {
        let target = action.target_location(origin);
        if let Ok(cell) = self.cell_at_mut(target) {
            cell.register_action(action);
        }
    }

    pub fn clear_cell_actions(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear_actions();
        }
    }

    /// Derived by scanning every key; `None` for an empty grid
    pub fn bounds(&self) -> Option<GridBounds> {
        let mut keys = self.cells.keys();
        let first = keys.next()?;
        let initial = GridBounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(keys.fold(initial, |b, loc| GridBounds {
            min_x: b.min_x.min(loc.x),
            max_x: b.max_x.max(loc.x),
            min_y: b.min_y.min(loc.y),
            max_y: b.max_y.max(loc.y),
        }))
    }

    pub fn num_rows(&self) -> usize {
        self.bounds().map_or(0, |b| (b.max_y - b.min_y + 1) as usize)
    }

    pub fn num_cols(&self) -> usize {
        self.bounds().map_or(0, |b| (b.max_x - b.min_x + 1) as usize)
    }

    pub fn num_cells(&self) -> usize {
        self.num_rows() * self.num_cols()
    }

    /// Cells actually stored; equals `num_cells` for rectangular maps
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

fn is_spawn_candidate(cell: &Cell) -> bool {
    cell.habitable && !cell.generates_score && !cell.is_occupied() && cell.pickup().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Direction;
    use crate::pickups::Pickup;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// `columns` x `rows` grid with its lower-left corner at the origin
    fn grid(columns: i32, rows: i32) -> WorldGrid {
        let cells = (0..columns)
            .flat_map(|x| (0..rows).map(move |y| Cell::new(Location::new(x, y))));
        WorldGrid::new(cells, WorldSettings::default()).unwrap()
    }

    fn url() -> reqwest::Url {
        "http://localhost:5000/turn/".parse().unwrap()
    }

    fn assert_grid_size(grid: &WorldGrid, columns: usize, rows: usize) {
        assert_eq!(grid.num_rows(), rows);
        assert_eq!(grid.num_cols(), columns);
        assert_eq!(grid.num_cells(), rows * columns);
        assert_eq!(grid.all_cells().count(), rows * columns);
    }

    #[test]
    fn test_grid_size() {
        assert_grid_size(&grid(1, 3), 1, 3);
    }

    #[test]
    fn test_generated_map_is_centred() {
        let grid = WorldGrid::generate_empty(5, 2, WorldSettings::default()).unwrap();
        assert_grid_size(&grid, 5, 2);
        assert_eq!(
            grid.bounds(),
            Some(GridBounds { min_x: -2, max_x: 2, min_y: 0, max_y: 1 })
        );
    }

    #[test]
    fn test_empty_grid() {
        let grid = WorldGrid::new(Vec::new(), WorldSettings::default()).unwrap();
        assert!(!grid.is_on_map(Location::new(0, 0)));
        assert_eq!(grid.bounds(), None);
        assert_eq!(grid.num_cells(), 0);
    }

    #[test]
    fn test_invalid_settings_are_rejected_at_construction() {
        let out_of_range = WorldSettings {
            pickup_spawn_chance: 2.0,
            ..WorldSettings::default()
        };
        assert!(matches!(
            WorldGrid::generate_empty(3, 3, out_of_range),
            Err(GameError::InvalidSettings(_))
        ));

        let not_a_number = WorldSettings {
            target_num_cells_per_avatar: f64::NAN,
            ..WorldSettings::default()
        };
        assert!(matches!(
            WorldGrid::new(vec![Cell::new(Location::new(0, 0))], not_a_number),
            Err(GameError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_location_on_and_off_map() {
        let grid = grid(2, 2);
        for x in 0..2 {
            for y in 0..2 {
                assert!(grid.is_on_map(Location::new(x, y)));
                assert_eq!(grid.cell_at(Location::new(x, y)).unwrap().location(), Location::new(x, y));
            }
        }
        for y in 0..2 {
            assert!(!grid.is_on_map(Location::new(-1, y)));
            assert!(matches!(
                grid.cell_at(Location::new(2, y)),
                Err(GameError::NotOnMap(_))
            ));
        }
    }

    #[test]
    fn test_spawn_candidates_exclude_blocked_cells() {
        let mut grid = grid(3, 2);
        grid.cell_at_mut(Location::new(0, 0)).unwrap().habitable = false;
        grid.cell_at_mut(Location::new(1, 0)).unwrap().generates_score = true;
        grid.cell_at_mut(Location::new(2, 0)).unwrap().set_avatar(Some(PlayerId(1)));
        grid.cell_at_mut(Location::new(0, 1)).unwrap().set_pickup(Pickup::DeliveryTote);

        let mut candidates: Vec<_> = grid
            .habitable_spawn_candidates()
            .map(Cell::location)
            .collect();
        candidates.sort();
        assert_eq!(candidates, vec![Location::new(1, 1), Location::new(2, 1)]);
    }

    #[test]
    fn test_random_spawn_location_single_candidate() {
        let grid = grid(1, 1);
        assert_eq!(grid.random_spawn_location(&mut rng()).unwrap(), Location::new(0, 0));
    }

    #[test]
    fn test_random_spawn_location_with_no_candidates() {
        let mut grid = grid(1, 1);
        grid.cell_at_mut(Location::new(0, 0)).unwrap().set_avatar(Some(PlayerId(1)));
        assert!(matches!(
            grid.random_spawn_location(&mut rng()),
            Err(GameError::NoSpawnAvailable)
        ));
    }

    #[test]
    fn test_sample_is_best_effort() {
        let grid = grid(2, 2);
        let mut rng = rng();
        let sample = grid.sample_spawn_locations(3, &mut rng);
        assert_eq!(sample.len(), 3);
        let mut unique = sample.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);

        assert_eq!(grid.sample_spawn_locations(10, &mut rng).len(), 4);
        assert!(grid.sample_spawn_locations(0, &mut rng).is_empty());
    }

    #[test]
    fn test_sample_is_reproducible_for_a_seed() {
        let grid = grid(5, 5);
        let a = grid.sample_spawn_locations(4, &mut ChaCha8Rng::seed_from_u64(9));
        let b = grid.sample_spawn_locations(4, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_can_move_to_empty_cell() {
        let grid = grid(2, 2);
        assert!(grid.can_move_into(Location::new(1, 1), &AvatarManager::new()));
    }

    #[test]
    fn test_cannot_move_off_grid() {
        let grid = grid(2, 2);
        assert!(!grid.can_move_into(Location::new(4, 1), &AvatarManager::new()));
    }

    #[test]
    fn test_cannot_move_to_uninhabitable_cell() {
        let grid = WorldGrid::new(
            vec![Cell::uninhabitable(Location::new(0, 0))],
            WorldSettings::default(),
        )
        .unwrap();
        assert!(!grid.can_move_into(Location::new(0, 0), &AvatarManager::new()));
    }

    #[test]
    fn test_cannot_move_to_stationary_occupant() {
        let mut grid = grid(2, 1);
        let mut avatars = AvatarManager::new();
        avatars.add_avatar(PlayerId(1), url(), Location::new(1, 0)).unwrap();
        grid.cell_at_mut(Location::new(1, 0)).unwrap().set_avatar(Some(PlayerId(1)));
        assert!(!grid.can_move_into(Location::new(1, 0), &avatars));
    }

    #[test]
    fn test_can_move_into_cell_being_vacated() {
        let mut grid = grid(3, 1);
        let mut avatars = AvatarManager::new();
        avatars
            .add_avatar(PlayerId(1), url(), Location::new(1, 0))
            .unwrap()
            .set_pending_action(Action::Move { avatar: PlayerId(1), direction: Direction::EAST });
        grid.cell_at_mut(Location::new(1, 0)).unwrap().set_avatar(Some(PlayerId(1)));
        assert!(grid.can_move_into(Location::new(1, 0), &avatars));
    }

    #[test]
    fn test_cannot_move_into_contested_cell() {
        let mut grid = grid(3, 1);
        let avatars = AvatarManager::new();
        grid.register_action(
            Action::Move { avatar: PlayerId(1), direction: Direction::EAST },
            Location::new(0, 0),
        );
        assert!(grid.can_move_into(Location::new(1, 0), &avatars));
        grid.register_action(
            Action::Move { avatar: PlayerId(2), direction: Direction::WEST },
            Location::new(2, 0),
        );
        assert!(!grid.can_move_into(Location::new(1, 0), &avatars));
    }

    #[test]
    fn test_attackable_avatar_prefers_occupant() {
        let mut grid = grid(3, 1);
        grid.cell_at_mut(Location::new(1, 0)).unwrap().set_avatar(Some(PlayerId(5)));
        grid.register_action(
            Action::Move { avatar: PlayerId(1), direction: Direction::EAST },
            Location::new(0, 0),
        );
        assert_eq!(grid.attackable_avatar_at(Location::new(1, 0)), Some(PlayerId(5)));
    }

    #[test]
    fn test_attackable_avatar_sole_mover() {
        let mut grid = grid(3, 1);
        grid.register_action(
            Action::Move { avatar: PlayerId(1), direction: Direction::EAST },
            Location::new(0, 0),
        );
        assert_eq!(grid.attackable_avatar_at(Location::new(1, 0)), Some(PlayerId(1)));

        grid.register_action(
            Action::Move { avatar: PlayerId(2), direction: Direction::WEST },
            Location::new(2, 0),
        );
        assert_eq!(grid.attackable_avatar_at(Location::new(1, 0)), None);
    }

    #[test]
    fn test_attack_registrations_do_not_count_as_movers() {
        let mut grid = grid(3, 1);
        grid.register_action(
            Action::Attack { avatar: PlayerId(1), direction: Direction::EAST },
            Location::new(0, 0),
        );
        assert_eq!(grid.attackable_avatar_at(Location::new(1, 0)), None);
        assert_eq!(grid.attackable_avatar_at(Location::new(7, 7)), None);
    }

    #[test]
    fn test_clear_cell_actions() {
        let mut grid = grid(2, 1);
        grid.register_action(
            Action::Move { avatar: PlayerId(1), direction: Direction::EAST },
            Location::new(0, 0),
        );
        grid.register_action(
            Action::Move { avatar: PlayerId(1), direction: Direction::EAST },
            Location::new(5, 5),
        );
        grid.clear_cell_actions();
        assert!(grid.all_cells().all(|cell| cell.actions().is_empty()));
    }
}
