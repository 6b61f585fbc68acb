/// Penguin abilities: the strategy the slide engine consults mid-slide.
///
/// Hook points used by `sim::slide`:
///   - `activate()`            : arm the ability for this turn (never fails)
///   - `should_stop_here()`    : counted-stop interrupt, stateful
///   - `jump_pending()` / `consume_jump()`: jump-over interrupt
///   - `reset_for_new_slide()` : start of every slide segment
///   - `reset_for_new_turn()`  : once per penguin per turn, before anything moves
///
/// `armed` lives for the whole turn, so a bounced or chained slide can still
/// stop early. `traversed` restarts with each slide segment.

use super::entity::PenguinKind;
use super::position::{Direction, Position};

/// King penguins stop on the 5th traversed square.
pub const KING_STOP_AT: u32 = 5;
/// Emperor penguins stop on the 3rd traversed square.
pub const EMPEROR_STOP_AT: u32 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Ability {
    /// Voluntary stop after `threshold` traversed squares.
    CountedStop { threshold: u32, armed: bool, traversed: u32 },
    /// Jump over the first hazard met while `pending`.
    Jump { pending: bool },
    /// Single step before sliding. Resolved by the engine, no slide-time state.
    Step,
}

impl Ability {
    pub fn for_kind(kind: PenguinKind) -> Self {
        match kind {
            PenguinKind::King => Ability::CountedStop { threshold: KING_STOP_AT, armed: false, traversed: 0 },
            PenguinKind::Emperor => Ability::CountedStop { threshold: EMPEROR_STOP_AT, armed: false, traversed: 0 },
            PenguinKind::Rockhopper => Ability::Jump { pending: false },
            PenguinKind::Royal => Ability::Step,
        }
    }

    /// Arm the interrupt for the current turn. The step ability has nothing
    /// to arm; its effect is applied by the engine with the direction.
    pub fn activate(&mut self, _dir: Direction) {
        match self {
            Ability::CountedStop { armed, traversed, .. } => {
                *armed = true;
                *traversed = 0;
            }
            Ability::Jump { pending } => *pending = true,
            Ability::Step => {}
        }
    }

    /// Called once per candidate square, before occupants are inspected.
    /// Counts the square when armed; true once the threshold is reached.
    pub fn should_stop_here(&mut self, _candidate: Position) -> bool {
        match self {
            Ability::CountedStop { threshold, armed: true, traversed } => {
                *traversed += 1;
                *traversed >= *threshold
            }
            _ => false,
        }
    }

    pub fn reset_for_new_slide(&mut self) {
        if let Ability::CountedStop { traversed, .. } = self {
            *traversed = 0;
        }
    }

    pub fn reset_for_new_turn(&mut self) {
        match self {
            Ability::CountedStop { armed, traversed, .. } => {
                *armed = false;
                *traversed = 0;
            }
            Ability::Jump { pending } => *pending = false,
            Ability::Step => {}
        }
    }

    pub fn jump_pending(&self) -> bool {
        matches!(self, Ability::Jump { pending: true })
    }

    pub fn consume_jump(&mut self) {
        if let Ability::Jump { pending } = self {
            *pending = false;
        }
    }

    /// Squares counted so far in this segment (0 for non-counting abilities).
    #[cfg(test)]
    pub fn traversed(&self) -> u32 {
        match self {
            Ability::CountedStop { traversed, .. } => *traversed,
            _ => 0,
        }
    }
}
