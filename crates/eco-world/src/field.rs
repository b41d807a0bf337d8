//! Bounded 2D field holding at most one entity per cell.

use eco_core::{EntityId, Error, Location, Result};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// A rectangular grid of cells, stored row-major
#[derive(Debug, Clone)]
pub struct Field {
    depth: i32,
    width: i32,
    cells: Vec<Option<EntityId>>,
}

impl Field {
    /// Create an empty field. Both dimensions must be positive.
    pub fn new(depth: i32, width: i32) -> Result<Self> {
        if depth <= 0 || width <= 0 {
            return Err(Error::Config(format!(
                "field dimensions must be positive, got {}x{}",
                depth, width
            )));
        }
        let area = depth.checked_mul(width).ok_or_else(|| {
            Error::Config(format!("field of {}x{} cells is too large", depth, width))
        })?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(area as usize).map_err(|e| {
            Error::Config(format!("cannot allocate a {}x{} field: {}", depth, width, e))
        })?;
        cells.resize(area as usize, None);

        Ok(Self { depth, width, cells })
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn contains(&self, location: Location) -> bool {
        location.row >= 0 && location.row < self.depth && location.col >= 0 && location.col < self.width
    }

    /// Record `id` as the occupant of `location`.
    ///
    /// Any previous occupant is overwritten and returned; its own location is not
    /// touched, so callers clear the cell first.
    pub fn place(&mut self, id: EntityId, location: Location) -> Result<Option<EntityId>> {
        let index = self.index(location)?;
        Ok(self.cells[index].replace(id))
    }

    /// Empty `location`. No-op if it is already empty.
    pub fn clear(&mut self, location: Location) -> Result<()> {
        let index = self.index(location)?;
        self.cells[index] = None;
        Ok(())
    }

    /// Empty `location` only while `id` still holds it.
    ///
    /// Returns whether the cell was released.
    pub fn release(&mut self, id: EntityId, location: Location) -> Result<bool> {
        let index = self.index(location)?;
        if self.cells[index] == Some(id) {
            self.cells[index] = None;
            return Ok(true);
        }
        Ok(false)
    }

    /// Remove every occupant.
    pub fn clear_all(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    /// Occupant of `location`, if any. Out of bounds cells are always empty.
    pub fn get(&self, location: Location) -> Option<EntityId> {
        self.index(location).ok().and_then(|index| self.cells[index])
    }

    /// All in-bounds cells around `location` (up to 8), in shuffled order.
    pub fn adjacent_locations(&self, location: Location, rng: &mut ChaCha8Rng) -> Vec<Location> {
        let mut neighbours = Vec::with_capacity(8);
        for d_row in -1..=1 {
            for d_col in -1..=1 {
                if d_row == 0 && d_col == 0 {
                    continue;
                }
                let next = location.offset(d_row, d_col);
                if self.contains(next) {
                    neighbours.push(next);
                }
            }
        }
        neighbours.shuffle(rng);
        neighbours
    }

    /// Unoccupied cells around `location`, as a worklist consumed from the front.
    pub fn free_adjacent_locations(
        &self,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> VecDeque<Location> {
        self.adjacent_locations(location, rng)
            .into_iter()
            .filter(|loc| self.get(*loc).is_none())
            .collect()
    }

    /// One unoccupied cell around `location`, or none when boxed in.
    pub fn free_adjacent_location(&self, location: Location, rng: &mut ChaCha8Rng) -> Option<Location> {
        self.free_adjacent_locations(location, rng).pop_front()
    }

    /// Iterator over every occupied cell and its occupant
    pub fn occupants(&self) -> impl Iterator<Item = (Location, EntityId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|id| (self.index_to_location(i), id)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn index(&self, location: Location) -> Result<usize> {
        if !self.contains(location) {
            return Err(Error::OutOfBounds {
                location,
                depth: self.depth,
                width: self.width,
            });
        }
        // Row and column are in bounds, so this stays below the checked area
        Ok(location.row as usize * self.width as usize + location.col as usize)
    }

    fn index_to_location(&self, index: usize) -> Location {
        let width = self.width as usize;
        Location::new((index / width) as i32, (index % width) as i32)
    }
}
