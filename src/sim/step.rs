/// Turn driver: one penguin's turn, a round, the whole game.
///
/// Turn order:
///   1. Per-turn ability state reset
///   2. Stunned → turn skipped, stun cleared
///   3. Controller decides (ability use, slide direction)
///   4. Ability activated; a Royal takes its step here and then picks
///      its slide direction
///   5. Slide resolution (`sim::slide`)
///
/// Rounds visit penguins in roster order, skipping fallen ones. After
/// `total_turns` rounds the phase flips to `GameOver`.

use crate::domain::ai::AiController;
use crate::domain::entity::{Penguin, PenguinId, PenguinKind};
use crate::domain::position::Direction;
use crate::error::GameError;
use super::event::{EventSink, GameEvent};
use super::slide::{royal_step, slide_penguin};
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Decision sources
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SlideDecision {
    pub direction: Direction,
    pub use_ability: bool,
}

/// Where a penguin's choices come from: the AI or the keyboard.
pub trait Controller {
    /// Slide direction, plus whether to spend the ability when
    /// `ability_available`. Royal penguins are only asked for the direction.
    fn choose_slide(&mut self, world: &WorldState, penguin: &Penguin, ability_available: bool) -> Result<SlideDecision, GameError>;

    /// Royal only: take the step this turn?
    fn wants_step(&mut self, world: &WorldState, penguin: &Penguin) -> Result<bool, GameError>;

    fn choose_step(&mut self, world: &WorldState, penguin: &Penguin) -> Result<Direction, GameError>;
}

impl Controller for AiController {
    fn choose_slide(&mut self, world: &WorldState, penguin: &Penguin, ability_available: bool) -> Result<SlideDecision, GameError> {
        let direction = self.slide_direction(world, penguin.pos);
        let use_ability = ability_available
            && self.wants_ability(world, penguin.kind, penguin.pos, direction);
        Ok(SlideDecision { direction, use_ability })
    }

    fn wants_step(&mut self, world: &WorldState, penguin: &Penguin) -> Result<bool, GameError> {
        Ok(self.wants_ability(world, penguin.kind, penguin.pos, Direction::Up))
    }

    fn choose_step(&mut self, world: &WorldState, penguin: &Penguin) -> Result<Direction, GameError> {
        Ok(self.step_direction(world, penguin.pos))
    }
}

/// Hooks around each turn, for presentation.
pub trait TurnObserver {
    fn before_turn(&mut self, _world: &WorldState, _id: PenguinId) -> Result<(), GameError> {
        Ok(())
    }

    fn after_turn(&mut self, _world: &WorldState, _id: PenguinId, _events: &[GameEvent]) -> Result<(), GameError> {
        Ok(())
    }
}

impl TurnObserver for () {}

// ══════════════════════════════════════════════════════════════
// Game and round
// ══════════════════════════════════════════════════════════════

/// Play every remaining round. The player-controlled penguin asks `player`,
/// everyone else asks `ai`.
pub fn play_game(
    world: &mut WorldState,
    player: &mut dyn Controller,
    ai: &mut dyn Controller,
    observer: &mut dyn TurnObserver,
) -> Result<(), GameError> {
    while begin_round(world) {
        log::info!("round {}/{}", world.turn, world.total_turns);
        let ids: Vec<PenguinId> = world.penguin_ids().collect();
        for id in ids {
            let Some(penguin) = world.penguin(id) else { continue };
            if penguin.fallen { continue; }
            let controller: &mut dyn Controller = if penguin.player_controlled { &mut *player } else { &mut *ai };

            observer.before_turn(world, id)?;
            let events = play_turn(world, id, controller)?;
            observer.after_turn(world, id, &events)?;
        }
    }
    Ok(())
}

/// Advance to the next round. False once every round has been played,
/// at which point the game is over.
pub fn begin_round(world: &mut WorldState) -> bool {
    if world.phase != Phase::Playing { return false; }
    if world.turn >= world.total_turns {
        world.phase = Phase::GameOver;
        return false;
    }
    world.turn += 1;
    true
}

// ══════════════════════════════════════════════════════════════
// Single turn
// ══════════════════════════════════════════════════════════════

pub fn play_turn(world: &mut WorldState, id: PenguinId, controller: &mut dyn Controller) -> Result<Vec<GameEvent>, GameError> {
    let mut events: Vec<GameEvent> = Vec::new();

    let Some(penguin) = world.penguin_mut(id) else { return Ok(events) };
    if penguin.fallen { return Ok(events); }
    penguin.ability.reset_for_new_turn();
    if penguin.stunned {
        penguin.stunned = false;
        events.emit(GameEvent::TurnSkipped { penguin: id });
        return Ok(events);
    }
    let available = !penguin.ability_used();

    let direction = if penguin.kind == PenguinKind::Royal {
        royal_turn(world, id, controller, available, &mut events)?
    } else {
        slide_turn(world, id, controller, available, &mut events)?
    };

    if let Some(direction) = direction {
        events.emit(GameEvent::MoveChosen { penguin: id, direction });
        slide_penguin(world, id, direction, &mut events);
    }

    debug_assert!(world.is_consistent());
    Ok(events)
}

fn slide_turn(
    world: &mut WorldState,
    id: PenguinId,
    controller: &mut dyn Controller,
    available: bool,
    events: &mut Vec<GameEvent>,
) -> Result<Option<Direction>, GameError> {
    let Some(penguin) = world.penguin(id) else { return Ok(None) };
    let decision = controller.choose_slide(world, penguin, available)?;

    if available {
        if decision.use_ability {
            activate(world, id, decision.direction, events);
        } else {
            events.emit(GameEvent::AbilityDeclined { penguin: id });
        }
    }
    Ok(Some(decision.direction))
}

fn royal_turn(
    world: &mut WorldState,
    id: PenguinId,
    controller: &mut dyn Controller,
    available: bool,
    events: &mut Vec<GameEvent>,
) -> Result<Option<Direction>, GameError> {
    if available {
        let Some(penguin) = world.penguin(id) else { return Ok(None) };
        if controller.wants_step(world, penguin)? {
            let step = controller.choose_step(world, penguin)?;
            activate(world, id, step, events);
            royal_step(world, id, step, events);
        } else {
            events.emit(GameEvent::AbilityDeclined { penguin: id });
        }
    }

    let Some(penguin) = world.penguin(id) else { return Ok(None) };
    if penguin.fallen { return Ok(None); }
    Ok(Some(controller.choose_slide(world, penguin, false)?.direction))
}

fn activate(world: &mut WorldState, id: PenguinId, dir: Direction, events: &mut Vec<GameEvent>) {
    let Some(penguin) = world.penguin_mut(id) else { return };
    penguin.activate_ability(dir);
    events.emit(GameEvent::AbilityUsed { penguin: id });
    if penguin.ability.jump_pending() {
        events.emit(GameEvent::JumpArmed { penguin: id });
    }
}
