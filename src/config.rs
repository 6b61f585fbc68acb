/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, MAX_GRID_SIZE, MIN_GRID_SIZE};

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub rules: RulesConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    pub grid_size: usize,
    pub penguins: usize,
    pub hazards: usize,
    pub food: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RulesConfig {
    pub total_turns: u32,
    pub ai_ability_chance: f64,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    /// One penguin is driven from the keyboard.
    pub interactive: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    rules: TomlRules,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_grid_size")]
    grid_size: usize,
    #[serde(default = "default_penguins")]
    penguins: usize,
    #[serde(default = "default_hazards")]
    hazards: usize,
    #[serde(default = "default_food")]
    food: usize,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_total_turns")]
    total_turns: u32,
    #[serde(default = "default_ai_ability_chance")]
    ai_ability_chance: f64,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_interactive")]
    interactive: bool,
}

// ── Defaults ──

fn default_grid_size() -> usize { 10 }
fn default_penguins() -> usize { 3 }
fn default_hazards() -> usize { 15 }
fn default_food() -> usize { 20 }
fn default_total_turns() -> u32 { 4 }
fn default_ai_ability_chance() -> f64 { 0.3 }
fn default_interactive() -> bool { true }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            grid_size: default_grid_size(),
            penguins: default_penguins(),
            hazards: default_hazards(),
            food: default_food(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            total_turns: default_total_turns(),
            ai_ability_chance: default_ai_ability_chance(),
            seed: None,
            interactive: default_interactive(),
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            board: BoardConfig {
                grid_size: t.board.grid_size,
                penguins: t.board.penguins,
                hazards: t.board.hazards,
                food: t.board.food,
            },
            rules: RulesConfig {
                total_turns: t.rules.total_turns,
                ai_ability_chance: t.rules.ai_ability_chance,
                seed: t.rules.seed,
                interactive: t.rules.interactive,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/icy-slide`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        load_toml(&candidate_dirs())
    }

    /// Parse a TOML document; absent keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Into::into)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.board;
        if b.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall(b.grid_size));
        }
        if b.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(b.grid_size));
        }
        if b.penguins == 0 {
            return Err(ConfigError::NoPenguins);
        }
        let edges = 4 * (b.grid_size - 1);
        if b.penguins > edges {
            return Err(ConfigError::TooManyPenguins { penguins: b.penguins, edges });
        }
        let cells = b.grid_size * b.grid_size;
        let entities = b.penguins.saturating_add(b.hazards).saturating_add(b.food);
        if entities > cells {
            return Err(ConfigError::TooManyEntities { entities, cells });
        }
        if self.rules.total_turns == 0 {
            return Err(ConfigError::NoTurns);
        }
        let p = self.rules.ai_ability_chance;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::BadProbability(p));
        }
        Ok(())
    }
}

/// Candidate directories to search: exe dir + CWD + data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/icy-slide)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/icy-slide");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> GameConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            return read_toml(&path);
        }
    }
    log::debug!("no config.toml found, using defaults");
    GameConfig::default()
}

fn read_toml(path: &Path) -> GameConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => match GameConfig::from_toml_str(&text) {
            Ok(cfg) => {
                log::info!("loaded {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("{} parse error: {e}; using default settings", path.display());
                GameConfig::default()
            }
        },
        Err(e) => {
            log::warn!("could not read {}: {e}", path.display());
            GameConfig::default()
        }
    }
}
