/// WorldState: the complete state of a running game.
///
/// ## Entity arenas
///
/// Entities live in vectors indexed by their id:
///   - `penguins`: the roster. Never shrinks; a fallen penguin keeps its slot
///     (and its collected food) for the scoreboard.
///   - `hazards` / `foods`: `None` once removed. Slots are never reused, so a
///     stale id can only ever resolve to "gone".
///
/// ## Registration
///
/// The occupancy grid stores ids. Every move goes through `place_*` /
/// `lift_*` / `remove_*` below, which update the entity's position and its
/// grid registration together. `is_consistent()` checks the invariant:
/// every active entity is registered exactly once, in the cell matching its
/// position, and a fallen penguin is registered nowhere.

use crate::domain::ai::{BoardView, Seen};
use crate::domain::entity::{
    Food, FoodId, FoodItem, FoodKind, Hazard, HazardId, HazardKind, Occupant, Penguin,
    PenguinId, PenguinKind,
};
use crate::domain::grid::OccupancyGrid;
use crate::domain::position::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct WorldState {
    pub grid: OccupancyGrid,
    pub penguins: Vec<Penguin>,
    pub hazards: Vec<Option<Hazard>>,
    pub foods: Vec<Option<Food>>,

    // ── Meta ──
    pub phase: Phase,
    /// 1-based; 0 before the first turn.
    pub turn: u32,
    pub total_turns: u32,
    pub seed: u64,
}

// ── Construction ──

impl WorldState {
    pub fn new(size: usize, total_turns: u32) -> Self {
        WorldState {
            grid: OccupancyGrid::new(size),
            penguins: vec![],
            hazards: vec![],
            foods: vec![],
            phase: Phase::Playing,
            turn: 0,
            total_turns,
            seed: 0,
        }
    }

    pub fn size(&self) -> i32 {
        self.grid.size()
    }

    pub fn spawn_penguin(&mut self, name: impl Into<String>, kind: PenguinKind, pos: Position) -> PenguinId {
        let id = PenguinId(self.penguins.len());
        self.penguins.push(Penguin::new(name, kind, pos));
        self.grid.add(pos, Occupant::Penguin(id));
        id
    }

    pub fn spawn_hazard(&mut self, kind: HazardKind, pos: Position) -> HazardId {
        let id = HazardId(self.hazards.len());
        self.hazards.push(Some(Hazard::new(kind, pos)));
        self.grid.add(pos, Occupant::Hazard(id));
        id
    }

    pub fn spawn_food(&mut self, kind: FoodKind, weight: u32, pos: Position) -> FoodId {
        let id = FoodId(self.foods.len());
        self.foods.push(Some(Food::new(kind, weight, pos)));
        self.grid.add(pos, Occupant::Food(id));
        id
    }
}

// ── Arena access ──

impl WorldState {
    pub fn penguin(&self, id: PenguinId) -> Option<&Penguin> {
        self.penguins.get(id.0)
    }

    pub fn penguin_mut(&mut self, id: PenguinId) -> Option<&mut Penguin> {
        self.penguins.get_mut(id.0)
    }

    pub fn hazard(&self, id: HazardId) -> Option<&Hazard> {
        self.hazards.get(id.0).and_then(Option::as_ref)
    }

    pub fn hazard_mut(&mut self, id: HazardId) -> Option<&mut Hazard> {
        self.hazards.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn food(&self, id: FoodId) -> Option<&Food> {
        self.foods.get(id.0).and_then(Option::as_ref)
    }

    pub fn penguin_ids(&self) -> impl Iterator<Item = PenguinId> {
        (0..self.penguins.len()).map(PenguinId)
    }

    pub fn penguin_name(&self, id: PenguinId) -> &str {
        self.penguin(id).map_or("?", |p| p.name.as_str())
    }

    /// The player-controlled penguin, if any.
    pub fn player(&self) -> Option<PenguinId> {
        self.penguins.iter().position(|p| p.player_controlled).map(PenguinId)
    }

    pub fn active_hazard_count(&self) -> usize {
        self.hazards.iter().flatten().count()
    }

    pub fn remaining_food_count(&self) -> usize {
        self.foods.iter().flatten().count()
    }
}

// ── Occupancy queries (entity-aware) ──

impl WorldState {
    pub fn food_at(&self, pos: Position) -> Vec<FoodId> {
        self.grid.objects_at(pos).iter().filter_map(|o| match o {
            Occupant::Food(id) => Some(*id),
            _ => None,
        }).collect()
    }

    pub fn penguin_at(&self, pos: Position) -> Option<PenguinId> {
        self.grid.objects_at(pos).iter().find_map(|o| match o {
            Occupant::Penguin(id) => Some(*id),
            _ => None,
        })
    }

    /// First hazard registered at `pos`, plugged holes included.
    pub fn hazard_at(&self, pos: Position) -> Option<HazardId> {
        self.grid.objects_at(pos).iter().find_map(|o| match o {
            Occupant::Hazard(id) => Some(*id),
            _ => None,
        })
    }

    /// First hazard at `pos` that is not a plugged hole.
    pub fn obstructing_hazard_at(&self, pos: Position) -> Option<HazardId> {
        self.grid.objects_at(pos).iter().find_map(|o| match o {
            Occupant::Hazard(id) if !self.hazard_kind(*id).is_some_and(HazardKind::is_plugged_hole) => Some(*id),
            _ => None,
        })
    }

    pub fn hazard_kind(&self, id: HazardId) -> Option<HazardKind> {
        self.hazard(id).map(|h| h.kind)
    }

    /// Valid, and holds nothing but food (or nothing at all).
    pub fn is_free_or_food(&self, pos: Position) -> bool {
        self.grid.is_valid(pos)
            && self.grid.objects_at(pos).iter().all(|o| matches!(o, Occupant::Food(_)))
    }
}

impl BoardView for WorldState {
    fn is_valid(&self, pos: Position) -> bool {
        self.grid.is_valid(pos)
    }

    fn seen_at(&self, pos: Position) -> Vec<Seen> {
        self.grid.objects_at(pos).iter().filter_map(|o| match *o {
            Occupant::Food(_) => Some(Seen::Food),
            Occupant::Penguin(_) => Some(Seen::Penguin),
            Occupant::Hazard(id) => self.hazard_kind(id).map(Seen::Hazard),
        }).collect()
    }
}

// ── Registration-preserving mutation ──

impl WorldState {
    /// Move a penguin to `pos` and register it there.
    pub fn place_penguin(&mut self, id: PenguinId, pos: Position) {
        if let Some(p) = self.penguins.get_mut(id.0) {
            p.pos = pos;
            self.grid.add(pos, Occupant::Penguin(id));
        }
    }

    /// Take a penguin off the grid without touching its recorded position.
    pub fn lift_penguin(&mut self, id: PenguinId) {
        if let Some(p) = self.penguins.get(id.0) {
            self.grid.remove(p.pos, Occupant::Penguin(id));
        }
    }

    /// Mark fallen. The caller has already lifted it off the grid; lifting
    /// again is harmless.
    pub fn drop_penguin_out(&mut self, id: PenguinId) {
        self.lift_penguin(id);
        if let Some(p) = self.penguins.get_mut(id.0) {
            p.fallen = true;
        }
    }

    pub fn place_hazard(&mut self, id: HazardId, pos: Position) {
        if let Some(h) = self.hazards.get_mut(id.0).and_then(Option::as_mut) {
            h.pos = pos;
            self.grid.add(pos, Occupant::Hazard(id));
        }
    }

    pub fn lift_hazard(&mut self, id: HazardId) {
        if let Some(h) = self.hazard(id) {
            let pos = h.pos;
            self.grid.remove(pos, Occupant::Hazard(id));
        }
    }

    /// Permanently remove a hazard from play.
    pub fn remove_hazard(&mut self, id: HazardId) -> Option<Hazard> {
        self.lift_hazard(id);
        self.hazards.get_mut(id.0).and_then(Option::take)
    }

    /// Permanently remove a food item from play.
    pub fn remove_food(&mut self, id: FoodId) -> Option<FoodItem> {
        let food = self.foods.get_mut(id.0).and_then(Option::take)?;
        self.grid.remove(food.pos, Occupant::Food(id));
        Some(food.item)
    }
}

// ── Scoring ──

impl WorldState {
    /// Roster ordered by total collected weight, heaviest first.
    /// Ties keep roster order.
    pub fn scoreboard(&self) -> Vec<PenguinId> {
        let mut ids: Vec<PenguinId> = self.penguin_ids().collect();
        ids.sort_by_key(|id| std::cmp::Reverse(self.penguins[id.0].total_weight()));
        ids
    }

    /// Penguins that still take turns.
    pub fn active_penguins(&self) -> usize {
        self.penguins.iter().filter(|p| !p.fallen).count()
    }
}

// ── Invariant check ──

impl WorldState {
    /// Every active entity registered exactly once at its recorded position,
    /// no stale or fallen ids on the grid.
    pub fn is_consistent(&self) -> bool {
        let mut seen: Vec<(Occupant, Position)> = Vec::new();
        for (pos, cell) in self.grid.cells() {
            for &occ in cell {
                let recorded = match occ {
                    Occupant::Penguin(id) => self.penguin(id).filter(|p| !p.fallen).map(|p| p.pos),
                    Occupant::Hazard(id) => self.hazard(id).map(|h| h.pos),
                    Occupant::Food(id) => self.food(id).map(|f| f.pos),
                };
                if recorded != Some(pos) {
                    log::warn!("{occ:?} registered at {pos} but recorded at {recorded:?}");
                    return false;
                }
                if seen.iter().any(|(o, _)| *o == occ) {
                    log::warn!("{occ:?} registered twice");
                    return false;
                }
                seen.push((occ, pos));
            }
        }

        let active = self.penguins.iter().filter(|p| !p.fallen).count()
            + self.active_hazard_count()
            + self.remaining_food_count();
        if seen.len() != active {
            log::warn!("{} registrations for {} active entities", seen.len(), active);
            return false;
        }
        true
    }
}
