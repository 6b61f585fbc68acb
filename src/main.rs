/// Entry point: config, board setup, the game, the scoreboard.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::io;

use env_logger::Env;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use config::GameConfig;
use domain::ai::AiController;
use error::GameError;
use sim::setup::populate;
use sim::step::play_game;
use sim::world::WorldState;
use ui::input::{KeyboardController, TerminalKeys};
use ui::renderer::Renderer;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();
    let mut renderer = Renderer::stdout();

    match run(&config, &mut renderer) {
        Ok(()) => {}
        Err(GameError::Aborted) => {
            let _ = renderer.notice("Game aborted.");
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("Game error: {e}");
        }
    }
}

fn run(config: &GameConfig, renderer: &mut Renderer<impl io::Write>) -> Result<(), GameError> {
    let seed = config.rules.seed.unwrap_or_else(rand::random::<u64>);
    let mut world = populate(config, seed, &mut Pcg32::seed_from_u64(seed))?;

    introduce(&world, renderer)?;
    if let Some(id) = world.player() {
        log::info!("player controls {}", world.penguin_name(id));
    }

    // AI decisions draw from their own stream, one past the board seed.
    let mut ai = AiController::new(seed.wrapping_add(1), config.rules.ai_ability_chance);
    let mut keyboard = KeyboardController::new(TerminalKeys, io::stdout());

    play_game(&mut world, &mut keyboard, &mut ai, renderer)?;
    renderer.scoreboard(&world)?;
    log::info!(
        "game over after {} rounds, {} penguins still on the ice, seed {}",
        world.turn, world.active_penguins(), world.seed
    );
    Ok(())
}

fn introduce(world: &WorldState, renderer: &mut Renderer<impl io::Write>) -> io::Result<()> {
    renderer.welcome(world)?;
    renderer.roster(world)?;
    renderer.notice("The initial icy terrain grid:")?;
    renderer.grid(world)
}
