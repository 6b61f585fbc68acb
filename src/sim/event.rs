/// Events emitted while a turn resolves.
/// The presentation layer consumes these for messages; the engine never
/// reads them back.

use crate::domain::entity::{FoodItem, HazardKind, PenguinId};
use crate::domain::position::Direction;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    // ── Turn flow ──
    TurnSkipped { penguin: PenguinId },
    AbilityUsed { penguin: PenguinId },
    AbilityDeclined { penguin: PenguinId },
    MoveChosen { penguin: PenguinId, direction: Direction },

    // ── Penguin outcomes ──
    FellIntoWater { penguin: PenguinId },
    FellIntoHole { penguin: PenguinId },
    FoodCollected { penguin: PenguinId, food: FoodItem },
    Stunned { penguin: PenguinId },
    HitHeavyBlock { penguin: PenguinId },
    FoodDropped { penguin: PenguinId, food: FoodItem },
    PenguinCollision { mover: PenguinId, struck: PenguinId, direction: Direction },
    SeaLionBounce { penguin: PenguinId, direction: Direction },
    /// Second sea-lion in one command: the penguin stops instead of rebounding.
    SeaLionStop { penguin: PenguinId },
    CrossedPluggedHole { penguin: PenguinId },
    VoluntaryStop { penguin: PenguinId },

    // ── Rockhopper ──
    JumpArmed { penguin: PenguinId },
    Jumped { penguin: PenguinId, over: HazardKind },
    JumpBlocked { penguin: PenguinId },
    JumpFellIntoWater { penguin: PenguinId },

    // ── Royal ──
    RoyalStepped { penguin: PenguinId, direction: Direction },
    RoyalStepBlocked { penguin: PenguinId },

    // ── Hazards ──
    HazardSlid { hazard: HazardKind, direction: Direction },
    HazardFellIntoWater { hazard: HazardKind },
    HazardDestroyedFood { hazard: HazardKind, food: FoodItem },
    HazardStoppedNearPenguin { hazard: HazardKind, penguin: PenguinId },
    HazardPluggedHole { hazard: HazardKind },
    HazardHitHazard { moving: HazardKind, stationary: HazardKind },
}

/// Where the engine sends its events.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}
