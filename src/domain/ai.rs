/// Penguin AI: straight-line scans over a read-only board view.
///
/// Slide direction priority (directions scanned Up, Down, Left, Right):
///   1. **Food**: the first thing met along the line is food.
///   2. **Hazard**: a block or sea-lion is met before food, penguins or an
///      open hole. Plugged holes are transparent.
///   3. **Dry**: the adjacent cell is on the board.
///   4. Random.
///
/// Ability use: a Rockhopper jumps exactly when a hazard (open holes
/// included, plugged holes ignored) is ahead before any food or penguin.
/// Every other variant rolls `ability_chance`.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{HazardKind, PenguinKind};
use super::position::{Direction, Position};

/// What the AI can tell about one occupant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Seen {
    Food,
    Penguin,
    Hazard(HazardKind),
}

/// Board access the AI needs; implemented by `WorldState`.
pub trait BoardView {
    fn is_valid(&self, pos: Position) -> bool;
    /// Occupants of `pos` in registration order. Empty when off-board.
    fn seen_at(&self, pos: Position) -> Vec<Seen>;
}

// ── Scans ──

/// Cells from `from` (exclusive) to the board edge.
fn ray<'a, V: BoardView>(view: &'a V, from: Position, dir: Direction) -> impl Iterator<Item = Position> + 'a {
    std::iter::successors(Some(from.step(dir)), move |p| Some(p.step(dir)))
        .take_while(move |p| view.is_valid(*p))
}

/// Scan the line, feeding each occupant to `judge` until it returns a verdict.
fn scan<V: BoardView>(view: &V, from: Position, dir: Direction, judge: impl Fn(Seen) -> Option<bool>) -> bool {
    for pos in ray(view, from, dir) {
        for seen in view.seen_at(pos) {
            if let Some(verdict) = judge(seen) {
                return verdict;
            }
        }
    }
    false
}

pub fn food_in_path<V: BoardView>(view: &V, from: Position, dir: Direction) -> bool {
    scan(view, from, dir, |seen| Some(seen == Seen::Food))
}

/// A block or sea-lion ahead that the penguin would actually reach.
pub fn solid_hazard_in_path<V: BoardView>(view: &V, from: Position, dir: Direction) -> bool {
    scan(view, from, dir, |seen| match seen {
        Seen::Food | Seen::Penguin => Some(false),
        Seen::Hazard(HazardKind::Hole { plugged: true }) => None,
        Seen::Hazard(HazardKind::Hole { plugged: false }) => Some(false),
        Seen::Hazard(_) => Some(true),
    })
}

/// Any hazard the slide would run into, open holes included.
pub fn hazard_in_path<V: BoardView>(view: &V, from: Position, dir: Direction) -> bool {
    scan(view, from, dir, |seen| match seen {
        Seen::Food | Seen::Penguin => Some(false),
        Seen::Hazard(kind) if kind.is_plugged_hole() => None,
        Seen::Hazard(_) => Some(true),
    })
}

// ── Controller ──

pub struct AiController {
    rng: Pcg32,
    ability_chance: f64,
}

impl AiController {
    /// `ability_chance` must lie in [0, 1] (checked by config validation).
    pub fn new(seed: u64, ability_chance: f64) -> Self {
        AiController {
            rng: Pcg32::seed_from_u64(seed),
            ability_chance: ability_chance.clamp(0.0, 1.0),
        }
    }

    pub fn slide_direction<V: BoardView>(&mut self, view: &V, from: Position) -> Direction {
        Direction::ALL.into_iter()
            .find(|&d| food_in_path(view, from, d))
            .or_else(|| Direction::ALL.into_iter().find(|&d| solid_hazard_in_path(view, from, d)))
            .or_else(|| Direction::ALL.into_iter().find(|&d| view.is_valid(from.step(d))))
            .unwrap_or_else(|| self.random_direction())
    }

    /// Spend the ability this turn? `dir` is the planned slide.
    pub fn wants_ability<V: BoardView>(&mut self, view: &V, kind: PenguinKind, from: Position, dir: Direction) -> bool {
        match kind {
            PenguinKind::Rockhopper => hazard_in_path(view, from, dir),
            _ => self.rng.random_bool(self.ability_chance),
        }
    }

    /// Royal step: a random safe neighbour, else anything but an open hole,
    /// else anything.
    pub fn step_direction<V: BoardView>(&mut self, view: &V, from: Position) -> Direction {
        let on_board: Vec<Direction> = Direction::ALL.into_iter()
            .filter(|&d| view.is_valid(from.step(d)))
            .collect();
        let safe: Vec<Direction> = on_board.iter().copied()
            .filter(|&d| view.seen_at(from.step(d)).iter().all(|s| {
                matches!(s, Seen::Food | Seen::Hazard(HazardKind::Hole { plugged: true }))
            }))
            .collect();
        let no_hole: Vec<Direction> = on_board.iter().copied()
            .filter(|&d| !view.seen_at(from.step(d)).iter().any(|s| {
                matches!(s, Seen::Hazard(HazardKind::Hole { plugged: false }))
            }))
            .collect();

        [safe, no_hole].iter()
            .find_map(|choices| choices.choose(&mut self.rng).copied())
            .unwrap_or_else(|| self.random_direction())
    }

    fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]
    }
}
