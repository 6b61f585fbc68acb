/// Board setup: random placement of penguins, hazards and food.
///
/// ## Placement order
///   1. Penguins `P1..Pn` on empty **edge** cells, random variant each
///   2. Hazards on empty cells, random kind, holes unplugged
///   3. Food on empty cells, random kind, weight 1..=5
///   4. Interactive games hand one random penguin to the keyboard
///
/// Every placement draws uniformly from the cells still empty at that point,
/// so setup never loops. Running out of cells is a `ConfigError`.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::domain::entity::{FoodKind, HazardKind, PenguinKind};
use crate::domain::position::Position;
use crate::error::ConfigError;
use super::world::WorldState;

pub const MIN_FOOD_WEIGHT: u32 = 1;
pub const MAX_FOOD_WEIGHT: u32 = 5;

const HAZARD_KINDS: [HazardKind; 4] = [
    HazardKind::LightBlock,
    HazardKind::HeavyBlock,
    HazardKind::SeaLion,
    HazardKind::Hole { plugged: false },
];

/// Build a fresh world for `config`. The seed is recorded on the world;
/// `rng` must already be seeded from it.
pub fn populate(config: &GameConfig, seed: u64, rng: &mut impl Rng) -> Result<WorldState, ConfigError> {
    config.validate()?;
    let board = &config.board;
    let mut world = WorldState::new(board.grid_size, config.rules.total_turns);
    world.seed = seed;

    for i in 0..board.penguins {
        let pos = pick_empty(&world, &world.grid.edge_positions(), rng).ok_or(ConfigError::NoFreeCell("a penguin"))?;
        let kind = pick(&PenguinKind::ALL, rng);
        world.spawn_penguin(format!("P{}", i + 1), kind, pos);
    }

    let all_cells: Vec<Position> = world.grid.cells().map(|(p, _)| p).collect();

    for _ in 0..board.hazards {
        let pos = pick_empty(&world, &all_cells, rng).ok_or(ConfigError::NoFreeCell("a hazard"))?;
        world.spawn_hazard(pick(&HAZARD_KINDS, rng), pos);
    }

    for _ in 0..board.food {
        let pos = pick_empty(&world, &all_cells, rng).ok_or(ConfigError::NoFreeCell("food"))?;
        let weight = rng.random_range(MIN_FOOD_WEIGHT..=MAX_FOOD_WEIGHT);
        world.spawn_food(pick(&FoodKind::ALL, rng), weight, pos);
    }

    if config.rules.interactive {
        let idx = rng.random_range(0..world.penguins.len());
        world.penguins[idx].player_controlled = true;
    }

    log::info!(
        "seed {seed}: {}x{} board, {} penguins, {} hazards, {} food",
        board.grid_size, board.grid_size, board.penguins, board.hazards, board.food
    );
    debug_assert!(world.is_consistent());
    Ok(world)
}

fn pick_empty(world: &WorldState, candidates: &[Position], rng: &mut impl Rng) -> Option<Position> {
    let free: Vec<Position> = candidates.iter().copied()
        .filter(|&p| world.grid.is_empty(p))
        .collect();
    free.choose(rng).copied()
}

fn pick<T: Copy>(choices: &[T], rng: &mut impl Rng) -> T {
    choices[rng.random_range(0..choices.len())]
}
