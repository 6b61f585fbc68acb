/// Error types for the outer layers (config, setup, terminal, turn driver).
///
/// The slide engine itself never fails: off-board positions and missing
/// entities are absorbed as no-ops there.

use thiserror::Error;

/// Invalid configuration or an impossible board layout.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid size {0} is too small (minimum {min})", min = MIN_GRID_SIZE)]
    GridTooSmall(usize),

    #[error("grid size {0} is too large (maximum {max})", max = MAX_GRID_SIZE)]
    GridTooLarge(usize),

    #[error("{penguins} penguins do not fit on the {edges} edge cells")]
    TooManyPenguins { penguins: usize, edges: usize },

    #[error("{entities} entities do not fit on {cells} cells")]
    TooManyEntities { entities: usize, cells: usize },

    #[error("at least one penguin is required")]
    NoPenguins,

    #[error("at least one turn is required")]
    NoTurns,

    #[error("AI ability chance {0} is outside [0, 1]")]
    BadProbability(f64),

    #[error("no empty cell left to place {0}")]
    NoFreeCell(&'static str),
}

/// Smallest board that still has an interior.
pub const MIN_GRID_SIZE: usize = 3;
/// Largest board the terminal grid is drawn for.
pub const MAX_GRID_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),

    #[error("game aborted by the player")]
    Aborted,
}
