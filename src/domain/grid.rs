/// Occupancy grid: spatial bookkeeping only.
///
/// ## Architecture
///
/// A `size` x `size` board of cells; each cell holds an unordered list of
/// `Occupant` ids. The grid knows nothing about what an id means: entity
/// semantics (is it food? a plugged hole?) live on `WorldState`.
///
/// ## Contract
///
///   - `objects_at` on an invalid position returns an empty slice, never panics
///   - `add` / `remove` on an invalid position are no-ops
///   - `remove` of an id that is not in the cell is a no-op
///   - `add` of an id already in the cell is a no-op (no duplicates)
///
/// Keeping an entity's stored position equal to the cell it is registered in
/// is the caller's job. `sim::world` wraps every move in `place_*` helpers
/// that do both halves together.

use crate::error::MAX_GRID_SIZE;
use super::entity::Occupant;
use super::position::Position;

#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    size: i32,
    cells: Vec<Vec<Occupant>>,
}

impl OccupancyGrid {
    /// Sizes above `MAX_GRID_SIZE` are clamped; config validation rejects them first.
    pub fn new(size: usize) -> Self {
        let size = size.min(MAX_GRID_SIZE);
        OccupancyGrid {
            size: size as i32,
            cells: vec![Vec::new(); size * size],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.within(self.size)
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_valid(pos) {
            Some((pos.y * self.size + pos.x) as usize)
        } else {
            None
        }
    }

    /// Everything registered at `pos`. Empty for off-board positions.
    pub fn objects_at(&self, pos: Position) -> &[Occupant] {
        match self.index(pos) {
            Some(i) => &self.cells[i],
            None => &[],
        }
    }

    pub fn add(&mut self, pos: Position, occupant: Occupant) {
        let Some(i) = self.index(pos) else { return };
        let cell = &mut self.cells[i];
        if !cell.contains(&occupant) {
            cell.push(occupant);
        }
    }

    pub fn remove(&mut self, pos: Position, occupant: Occupant) {
        let Some(i) = self.index(pos) else { return };
        self.cells[i].retain(|o| *o != occupant);
    }

    /// Valid and unoccupied.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|i| self.cells[i].is_empty())
    }

    /// Every cell with its position, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &[Occupant])> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let i = i as i32;
            (Position::new(i % size, i / size), cell.as_slice())
        })
    }

    /// Edge cells (first/last row and column), row by row, no duplicates.
    pub fn edge_positions(&self) -> Vec<Position> {
        let s = self.size;
        (0..s)
            .flat_map(|y| (0..s).map(move |x| Position::new(x, y)))
            .filter(|p| p.x == 0 || p.y == 0 || p.x == s - 1 || p.y == s - 1)
            .collect()
    }
}
