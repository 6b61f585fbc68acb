/// Slide resolution engine.
///
/// One command (a penguin or hazard set sliding in a direction) is resolved
/// to completion here, including every chain reaction it causes.
///
/// ## Work stack
///
/// Chain reactions are not native recursion. Each pending slide segment is a
/// `Motion` on a LIFO stack; a handler that needs a sub-resolution followed by
/// a continuation pushes the continuation first and the sub-resolution last,
/// so the sub-resolution runs to completion before the continuation starts.
/// Every continuation the rules produce is the last thing its handler does,
/// so this ordering is the same as the recursive formulation.
///
/// ## Penguin step order (per candidate cell `next`)
///
///   1. off-board            → falls into the water
///   2. jump interrupt       → Rockhopper with a pending jump, hazard at `next`
///   3. voluntary stop       → counted-stop ability reaches its threshold
///   4. occupants, priority  → food, then penguin, then hazard
///   5. nothing              → advance
///
/// ## Hazard step order
///
///   1. off-board            → hazard removed from play
///   2. penguin              → halt one cell short
///   3. obstructing hazard   → plug an open hole / cross-trigger / halt
///   4. food                 → destroyed, keep going
///
/// ## Termination
///
/// A segment either advances along the board, removes an entity, or hands
/// off to another entity, and the moving entity is off the grid while it
/// moves. The only reversal is the sea-lion bounce, allowed once per penguin
/// per command: two pinned sea-lions facing each other would otherwise
/// bounce a penguin between them forever.

use log::{debug, trace};

use crate::domain::entity::{HazardId, HazardKind, PenguinId};
use crate::domain::position::{Direction, Position};
use super::event::{EventSink, GameEvent};
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Public entry points
// ══════════════════════════════════════════════════════════════

/// Slide a penguin until it stops, falls, or hands off. Returns the number
/// of slide segments resolved (1 when nothing chained).
pub fn slide_penguin(
    world: &mut WorldState,
    id: PenguinId,
    dir: Direction,
    events: &mut impl EventSink,
) -> usize {
    Resolution::new(world, events).run(Motion::Penguin { id, dir })
}

/// Slide a hazard as if struck. Returns the number of segments resolved.
pub fn slide_hazard(
    world: &mut WorldState,
    id: HazardId,
    dir: Direction,
    events: &mut impl EventSink,
) -> usize {
    Resolution::new(world, events).run(Motion::Hazard { id, dir })
}

/// Royal penguin ability: a single step before the slide.
///
/// Off-board or into an open hole removes the penguin. Another penguin or a
/// hazard other than a plugged hole blocks the step (ability wasted).
/// Otherwise the penguin moves one cell and picks up any food there.
/// Returns true if the penguin moved.
pub fn royal_step(
    world: &mut WorldState,
    id: PenguinId,
    dir: Direction,
    events: &mut impl EventSink,
) -> bool {
    let Some(penguin) = world.penguin(id) else { return false };
    if penguin.fallen { return false; }
    let target = penguin.pos.step(dir);

    if !world.grid.is_valid(target) {
        world.drop_penguin_out(id);
        events.emit(GameEvent::FellIntoWater { penguin: id });
        return false;
    }

    let obstruction = world.obstructing_hazard_at(target);
    if obstruction.and_then(|h| world.hazard_kind(h)).is_some_and(HazardKind::is_open_hole) {
        world.drop_penguin_out(id);
        events.emit(GameEvent::FellIntoHole { penguin: id });
        return false;
    }
    if obstruction.is_some() || world.penguin_at(target).is_some() {
        events.emit(GameEvent::RoyalStepBlocked { penguin: id });
        return false;
    }

    world.lift_penguin(id);
    world.place_penguin(id, target);
    events.emit(GameEvent::RoyalStepped { penguin: id, direction: dir });
    collect_food_at(world, id, target, events);
    true
}

// ══════════════════════════════════════════════════════════════
// Work stack
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
enum Motion {
    Penguin { id: PenguinId, dir: Direction },
    /// Sea-lion rebound: park the penguin at `at`, then slide it `dir`.
    Bounce { id: PenguinId, at: Position, dir: Direction },
    Hazard { id: HazardId, dir: Direction },
}

struct Resolution<'a> {
    world: &'a mut WorldState,
    events: &'a mut dyn EventSink,
    pending: Vec<Motion>,
    bounced: Vec<PenguinId>,
}

impl<'a> Resolution<'a> {
    fn new(world: &'a mut WorldState, events: &'a mut dyn EventSink) -> Self {
        Resolution { world, events, pending: Vec::with_capacity(4), bounced: Vec::new() }
    }

    fn run(mut self, first: Motion) -> usize {
        self.pending.push(first);
        let mut segments = 0;
        while let Some(motion) = self.pending.pop() {
            segments += 1;
            debug!("segment {segments}: {motion:?}");
            match motion {
                Motion::Penguin { id, dir } => self.penguin_segment(id, dir),
                Motion::Bounce { id, at, dir } => {
                    self.world.place_penguin(id, at);
                    self.penguin_segment(id, dir);
                }
                Motion::Hazard { id, dir } => self.hazard_segment(id, dir),
            }
        }
        segments
    }

    fn emit(&mut self, event: GameEvent) {
        trace!("{event:?}");
        self.events.emit(event);
    }
}

// ══════════════════════════════════════════════════════════════
// Penguin slide
// ══════════════════════════════════════════════════════════════

impl Resolution<'_> {
    fn penguin_segment(&mut self, id: PenguinId, dir: Direction) {
        let Some(penguin) = self.world.penguin_mut(id) else { return };
        if penguin.fallen { return; }
        penguin.ability.reset_for_new_slide();
        let mut current = penguin.pos;
        self.world.lift_penguin(id);

        loop {
            let next = current.step(dir);
            trace!("{} at {current} -> {next}", self.world.penguin_name(id));

            // 1. Off the board
            if !self.world.grid.is_valid(next) {
                self.world.drop_penguin_out(id);
                self.emit(GameEvent::FellIntoWater { penguin: id });
                return;
            }

            // 2. Jump interrupt
            if let Some(landing) = self.try_jump(id, next, dir) {
                match landing {
                    JumpOutcome::Fell | JumpOutcome::StoppedOnFood => return,
                    JumpOutcome::Landed(at) => {
                        current = at;
                        continue;
                    }
                    JumpOutcome::Blocked => {}
                }
            }

            // 3. Voluntary stop
            let stop_here = self.world.penguin_mut(id)
                .is_some_and(|p| p.ability.should_stop_here(next));
            if stop_here && self.world.is_free_or_food(next) {
                self.world.place_penguin(id, next);
                collect_food_at(self.world, id, next, &mut *self.events);
                self.emit(GameEvent::VoluntaryStop { penguin: id });
                return;
            }

            // 4. Occupants: food, penguin, hazard
            if !self.world.food_at(next).is_empty() {
                self.world.place_penguin(id, next);
                collect_food_at(self.world, id, next, &mut *self.events);
                return;
            }
            if let Some(struck) = self.world.penguin_at(next) {
                self.world.place_penguin(id, current);
                self.emit(GameEvent::PenguinCollision { mover: id, struck, direction: dir });
                self.pending.push(Motion::Penguin { id: struck, dir });
                return;
            }
            let hazard = self.world.obstructing_hazard_at(next)
                .or_else(|| self.world.hazard_at(next));
            if let Some(hazard) = hazard {
                self.hit_hazard(id, hazard, current, next, dir);
                return;
            }

            // 5. Clear ice
            current = next;
        }
    }

    /// Rockhopper jump over the hazard at `next`. None when no jump applies.
    fn try_jump(&mut self, id: PenguinId, next: Position, dir: Direction) -> Option<JumpOutcome> {
        if !self.world.penguin(id)?.ability.jump_pending() {
            return None;
        }
        let over = self.world.obstructing_hazard_at(next)
            .and_then(|h| self.world.hazard_kind(h))?;

        if let Some(p) = self.world.penguin_mut(id) {
            p.ability.consume_jump();
        }
        let landing = next.step(dir);

        if !self.world.grid.is_valid(landing) {
            self.world.drop_penguin_out(id);
            self.emit(GameEvent::JumpFellIntoWater { penguin: id });
            return Some(JumpOutcome::Fell);
        }
        if !self.world.is_free_or_food(landing) {
            self.emit(GameEvent::JumpBlocked { penguin: id });
            return Some(JumpOutcome::Blocked);
        }

        self.emit(GameEvent::Jumped { penguin: id, over });
        if !self.world.food_at(landing).is_empty() {
            self.world.place_penguin(id, landing);
            collect_food_at(self.world, id, landing, &mut *self.events);
            return Some(JumpOutcome::StoppedOnFood);
        }
        Some(JumpOutcome::Landed(landing))
    }

    /// Penguin stopped at `stop`, hazard at `next` (one further along `dir`).
    fn hit_hazard(&mut self, id: PenguinId, hazard: HazardId, stop: Position, next: Position, dir: Direction) {
        let Some(kind) = self.world.hazard_kind(hazard) else { return };
        match kind {
            HazardKind::Hole { plugged: true } => {
                self.world.place_penguin(id, next);
                self.emit(GameEvent::CrossedPluggedHole { penguin: id });
                self.pending.push(Motion::Penguin { id, dir });
            }
            HazardKind::Hole { plugged: false } => {
                self.world.drop_penguin_out(id);
                self.emit(GameEvent::FellIntoHole { penguin: id });
            }
            HazardKind::LightBlock => {
                self.world.place_penguin(id, stop);
                if let Some(p) = self.world.penguin_mut(id) {
                    p.stunned = true;
                }
                self.emit(GameEvent::Stunned { penguin: id });
                self.emit(GameEvent::HazardSlid { hazard: kind, direction: dir });
                self.pending.push(Motion::Hazard { id: hazard, dir });
            }
            HazardKind::HeavyBlock => {
                self.world.place_penguin(id, stop);
                self.emit(GameEvent::HitHeavyBlock { penguin: id });
                let dropped = self.world.penguin_mut(id).and_then(|p| p.drop_lightest());
                if let Some(food) = dropped {
                    self.emit(GameEvent::FoodDropped { penguin: id, food });
                }
            }
            HazardKind::SeaLion => {
                if self.bounced.contains(&id) {
                    // Second sea-lion this command: pushed, no rebound.
                    self.world.place_penguin(id, stop);
                    self.emit(GameEvent::SeaLionStop { penguin: id });
                } else {
                    self.bounced.push(id);
                    let back = dir.opposite();
                    self.emit(GameEvent::SeaLionBounce { penguin: id, direction: back });
                    self.pending.push(Motion::Bounce { id, at: stop, dir: back });
                }
                self.emit(GameEvent::HazardSlid { hazard: kind, direction: dir });
                self.pending.push(Motion::Hazard { id: hazard, dir });
            }
        }
    }
}

enum JumpOutcome {
    /// Landing square off the board; the penguin is gone.
    Fell,
    /// Landing square occupied; resolve the hazard normally.
    Blocked,
    /// Landed on food and stopped there.
    StoppedOnFood,
    /// Landed on clear ice; keep sliding from here.
    Landed(Position),
}

// ══════════════════════════════════════════════════════════════
// Hazard slide
// ══════════════════════════════════════════════════════════════

impl Resolution<'_> {
    fn hazard_segment(&mut self, id: HazardId, dir: Direction) {
        let Some(hazard) = self.world.hazard(id) else { return };
        let kind = hazard.kind;
        let mut current = hazard.pos;
        self.world.lift_hazard(id);

        loop {
            let next = current.step(dir);
            trace!("{} at {current} -> {next}", kind.name());

            if !self.world.grid.is_valid(next) {
                self.world.remove_hazard(id);
                self.emit(GameEvent::HazardFellIntoWater { hazard: kind });
                return;
            }

            if let Some(penguin) = self.world.penguin_at(next) {
                self.world.place_hazard(id, current);
                self.emit(GameEvent::HazardStoppedNearPenguin { hazard: kind, penguin });
                return;
            }

            if let Some(other) = self.world.obstructing_hazard_at(next) {
                self.hazard_hits_hazard(id, kind, other, current, dir);
                return;
            }

            for food in self.world.food_at(next) {
                if let Some(item) = self.world.remove_food(food) {
                    self.emit(GameEvent::HazardDestroyedFood { hazard: kind, food: item });
                }
            }
            current = next;
        }
    }

    fn hazard_hits_hazard(&mut self, id: HazardId, kind: HazardKind, other: HazardId, stop: Position, dir: Direction) {
        let Some(other_kind) = self.world.hazard_kind(other) else { return };
        match (kind, other_kind) {
            (_, HazardKind::Hole { plugged: false }) => {
                if let Some(hole) = self.world.hazard_mut(other) {
                    hole.plug();
                }
                self.world.remove_hazard(id);
                self.emit(GameEvent::HazardPluggedHole { hazard: kind });
            }
            (HazardKind::LightBlock, HazardKind::SeaLion) | (HazardKind::SeaLion, HazardKind::LightBlock) => {
                self.world.place_hazard(id, stop);
                self.emit(GameEvent::HazardHitHazard { moving: kind, stationary: other_kind });
                self.emit(GameEvent::HazardSlid { hazard: other_kind, direction: dir });
                self.pending.push(Motion::Hazard { id: other, dir });
            }
            _ => {
                self.world.place_hazard(id, stop);
                self.emit(GameEvent::HazardHitHazard { moving: kind, stationary: other_kind });
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

/// Move every food item at `pos` into the penguin's collection.
fn collect_food_at(world: &mut WorldState, id: PenguinId, pos: Position, events: &mut dyn EventSink) {
    for food in world.food_at(pos) {
        let Some(item) = world.remove_food(food) else { continue };
        if let Some(p) = world.penguin_mut(id) {
            p.collect(item);
        }
        events.emit(GameEvent::FoodCollected { penguin: id, food: item });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{FoodKind, PenguinKind};

    /// Build a world from a square ASCII diagram.
    /// Legend:  '.'=ice  'K'=King  'E'=Emperor  'R'=Rockhopper  'Y'=Royal
    ///          'L'=LightBlock  'H'=HeavyBlock  'S'=SeaLion
    ///          'O'=open hole  'o'=plugged hole  '1'..'5'=Krill of that weight
    /// Penguins are named P1, P2, ... in reading order.
    fn board(rows: &[&str]) -> WorldState {
        let size = rows.len();
        let mut w = WorldState::new(size, 4);
        let mut n = 0;
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "board must be square");
            for (x, ch) in row.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let penguin = match ch {
                    'K' => Some(PenguinKind::King),
                    'E' => Some(PenguinKind::Emperor),
                    'R' => Some(PenguinKind::Rockhopper),
                    'Y' => Some(PenguinKind::Royal),
                    _ => None,
                };
                if let Some(kind) = penguin {
                    n += 1;
                    w.spawn_penguin(format!("P{n}"), kind, pos);
                    continue;
                }
                match ch {
                    'L' => { w.spawn_hazard(HazardKind::LightBlock, pos); }
                    'H' => { w.spawn_hazard(HazardKind::HeavyBlock, pos); }
                    'S' => { w.spawn_hazard(HazardKind::SeaLion, pos); }
                    'O' => { w.spawn_hazard(HazardKind::Hole { plugged: false }, pos); }
                    'o' => { w.spawn_hazard(HazardKind::Hole { plugged: true }, pos); }
                    '1'..='5' => { w.spawn_food(FoodKind::Krill, ch as u32 - '0' as u32, pos); }
                    _ => {}
                }
            }
        }
        assert!(w.is_consistent());
        w
    }

    fn at(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    const P1: PenguinId = PenguinId(0);
    const P2: PenguinId = PenguinId(1);

    fn slide(w: &mut WorldState, id: PenguinId, dir: Direction) -> Vec<GameEvent> {
        let mut events = Vec::new();
        slide_penguin(w, id, dir, &mut events);
        assert!(w.is_consistent());
        events
    }

    fn kinds_at(w: &WorldState, pos: Position) -> Vec<HazardKind> {
        w.grid.objects_at(pos).iter().filter_map(|o| match o {
            crate::domain::entity::Occupant::Hazard(h) => w.hazard_kind(*h),
            _ => None,
        }).collect()
    }

    // ── Plain slides ──

    #[test]
    fn stops_on_food_and_collects_it() {
        let mut w = board(&[
            "..........",
            "..........",
            "..........",
            "..........",
            "K..3......",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(3, 4));
        assert_eq!(w.penguin_at(at(3, 4)), Some(P1));
        assert!(w.food_at(at(3, 4)).is_empty());
        assert_eq!(w.penguins[0].total_weight(), 3);
        assert!(matches!(events[..], [GameEvent::FoodCollected { penguin: P1, .. }]));
    }

    #[test]
    fn clear_row_falls_into_water() {
        let mut w = board(&[
            "....",
            "K...",
            "....",
            "....",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert!(w.penguins[0].fallen);
        assert_eq!(w.penguins.len(), 1);
        assert_eq!(events, vec![GameEvent::FellIntoWater { penguin: P1 }]);
    }

    #[test]
    fn fallen_penguin_does_not_move() {
        let mut w = board(&[
            "K...",
            "....",
            "....",
            "....",
        ]);
        slide(&mut w, P1, Direction::Up);
        assert!(w.penguins[0].fallen);
        let events = slide(&mut w, P1, Direction::Down);
        assert!(events.is_empty());
        assert!(w.grid.is_empty(at(0, 3)));
    }

    // ── Holes ──

    #[test]
    fn open_hole_swallows_penguin() {
        let mut w = board(&[
            ".....",
            "K..O.",
            ".....",
            ".....",
            ".....",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert!(w.penguins[0].fallen);
        assert!(w.penguin_at(at(2, 1)).is_none());
        assert_eq!(events, vec![GameEvent::FellIntoHole { penguin: P1 }]);
        assert_eq!(kinds_at(&w, at(3, 1)), vec![HazardKind::Hole { plugged: false }]);
    }

    #[test]
    fn plugged_hole_is_crossed() {
        let mut w = board(&[
            ".....",
            "K.o.2",
            ".....",
            ".....",
            ".....",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(4, 1));
        assert_eq!(w.penguins[0].total_weight(), 2);
        assert_eq!(events[0], GameEvent::CrossedPluggedHole { penguin: P1 });
        assert_eq!(kinds_at(&w, at(2, 1)), vec![HazardKind::Hole { plugged: true }]);
    }

    // ── Blocks ──

    #[test]
    fn light_block_stuns_and_slides_off() {
        let mut w = board(&[
            ".....",
            "K.L..",
            ".....",
            ".....",
            ".....",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(1, 1));
        assert!(w.penguins[0].stunned);
        assert_eq!(w.active_hazard_count(), 0);
        assert_eq!(events, vec![
            GameEvent::Stunned { penguin: P1 },
            GameEvent::HazardSlid { hazard: HazardKind::LightBlock, direction: Direction::Right },
            GameEvent::HazardFellIntoWater { hazard: HazardKind::LightBlock },
        ]);
    }

    #[test]
    fn light_block_destroys_food_and_plugs_hole() {
        let mut w = board(&[
            "......",
            "KL.4O.",
            "......",
            "......",
            "......",
            "......",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(0, 1));
        assert!(w.penguins[0].stunned);
        assert_eq!(w.remaining_food_count(), 0);
        assert_eq!(kinds_at(&w, at(4, 1)), vec![HazardKind::Hole { plugged: true }]);
        assert!(events.contains(&GameEvent::HazardPluggedHole { hazard: HazardKind::LightBlock }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::HazardDestroyedFood { .. })));
    }

    #[test]
    fn sliding_block_stops_next_to_penguin() {
        let mut w = board(&[
            "......",
            "KL...E",
            "......",
            "......",
            "......",
            "......",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(kinds_at(&w, at(4, 1)), vec![HazardKind::LightBlock]);
        assert_eq!(w.penguins[1].pos, at(5, 1));
        assert!(events.contains(&GameEvent::HazardStoppedNearPenguin { hazard: HazardKind::LightBlock, penguin: P2 }));
    }

    #[test]
    fn heavy_block_costs_lightest_item() {
        let mut w = board(&[
            ".....",
            "K..H.",
            ".....",
            ".....",
            ".....",
        ]);
        w.penguins[0].collect(crate::domain::entity::FoodItem { kind: FoodKind::Squid, weight: 4 });
        w.penguins[0].collect(crate::domain::entity::FoodItem { kind: FoodKind::Krill, weight: 1 });
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(2, 1));
        assert_eq!(w.penguins[0].total_weight(), 4);
        assert_eq!(kinds_at(&w, at(3, 1)), vec![HazardKind::HeavyBlock]);
        assert!(matches!(events[..], [GameEvent::HitHeavyBlock { .. }, GameEvent::FoodDropped { .. }]));
    }

    #[test]
    fn heavy_block_with_empty_pockets() {
        let mut w = board(&[
            "...",
            "K.H",
            "...",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(1, 1));
        assert_eq!(events, vec![GameEvent::HitHeavyBlock { penguin: P1 }]);
    }

    // ── Sea-lion ──

    #[test]
    fn sea_lion_is_pushed_and_penguin_bounces() {
        let mut w = board(&[
            "..........",
            "..........",
            "..........",
            "..........",
            "H.K..S..H.",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        // Sea-lion slid from (5,4) until the heavy block at (8,4).
        assert_eq!(kinds_at(&w, at(7, 4)), vec![HazardKind::SeaLion]);
        // Penguin parked at (4,4), then slid left to the heavy block at (0,4).
        assert_eq!(w.penguins[0].pos, at(1, 4));
        assert_eq!(events[0], GameEvent::SeaLionBounce { penguin: P1, direction: Direction::Left });
        let pushed = events.iter().position(|e| matches!(e, GameEvent::HazardHitHazard { .. }));
        let stopped = events.iter().position(|e| matches!(e, GameEvent::HitHeavyBlock { .. }));
        assert!(pushed < stopped, "sea-lion resolves before the rebound");
    }

    #[test]
    fn pinned_sea_lions_bounce_only_once() {
        let mut w = board(&[
            ".......",
            "HS.K.SH",
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        let bounces = events.iter().filter(|e| matches!(e, GameEvent::SeaLionBounce { .. })).count();
        assert_eq!(bounces, 1);
        assert!(events.contains(&GameEvent::SeaLionStop { penguin: P1 }));
        assert_eq!(w.penguins[0].pos, at(2, 1));
        assert_eq!(kinds_at(&w, at(1, 1)), vec![HazardKind::SeaLion]);
        assert_eq!(kinds_at(&w, at(5, 1)), vec![HazardKind::SeaLion]);
    }

    #[test]
    fn sea_lion_knocks_light_block_on() {
        let mut w = board(&[
            "......",
            "K.S.L.",
            "......",
            "......",
            "......",
            "......",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(kinds_at(&w, at(3, 1)), vec![HazardKind::SeaLion]);
        // Light block went over the edge.
        assert_eq!(w.active_hazard_count(), 1);
        assert!(events.contains(&GameEvent::HazardHitHazard {
            moving: HazardKind::SeaLion,
            stationary: HazardKind::LightBlock,
        }));
        // Penguin bounced from (1,1) back off the left edge.
        assert!(w.penguins[0].fallen);
    }

    #[test]
    fn light_block_knocks_sea_lion_on() {
        let mut w = board(&[
            "......",
            "KL..SH",
            "......",
            "......",
            "......",
            "......",
        ]);
        slide(&mut w, P1, Direction::Right);
        assert_eq!(kinds_at(&w, at(3, 1)), vec![HazardKind::LightBlock]);
        assert_eq!(kinds_at(&w, at(4, 1)), vec![HazardKind::SeaLion]);
        assert!(w.penguins[0].stunned);
    }

    #[test]
    fn light_block_stops_at_heavy_block() {
        let mut w = board(&[
            ".....",
            "KL.H.",
            ".....",
            ".....",
            ".....",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(kinds_at(&w, at(2, 1)), vec![HazardKind::LightBlock]);
        assert!(events.contains(&GameEvent::HazardHitHazard {
            moving: HazardKind::LightBlock,
            stationary: HazardKind::HeavyBlock,
        }));
    }

    #[test]
    fn hazard_passes_over_plugged_hole() {
        let mut w = board(&[
            ".....",
            "KLo.H",
            ".....",
            ".....",
            ".....",
        ]);
        slide(&mut w, P1, Direction::Right);
        assert_eq!(kinds_at(&w, at(3, 1)), vec![HazardKind::LightBlock]);
        assert_eq!(kinds_at(&w, at(2, 1)), vec![HazardKind::Hole { plugged: true }]);
    }

    // ── Chains ──

    #[test]
    fn collision_passes_motion_on() {
        let mut w = board(&[
            ".....",
            "K..E.",
            ".....",
            ".....",
            ".....",
        ]);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(2, 1));
        assert!(w.penguins[1].fallen);
        assert_eq!(events, vec![
            GameEvent::PenguinCollision { mover: P1, struck: P2, direction: Direction::Right },
            GameEvent::FellIntoWater { penguin: P2 },
        ]);
    }

    #[test]
    fn chain_of_three() {
        let mut w = board(&[
            "......",
            "K.E.R2",
            "......",
            "......",
            "......",
            "......",
        ]);
        let mut events = Vec::new();
        let segments = slide_penguin(&mut w, P1, Direction::Right, &mut events);
        assert_eq!(segments, 3);
        assert_eq!(w.penguins[0].pos, at(1, 1));
        assert_eq!(w.penguins[1].pos, at(3, 1));
        // The Rockhopper ends on the food.
        assert_eq!(w.penguins[2].pos, at(5, 1));
        assert_eq!(w.penguins[2].total_weight(), 2);
        assert!(w.is_consistent());
    }

    #[test]
    fn penguin_on_plugged_hole_is_struck() {
        let mut w = board(&[
            "......",
            "K.o...",
            "......",
            "......",
            "......",
            "......",
        ]);
        let p2 = w.spawn_penguin("P2", PenguinKind::Royal, at(2, 1));
        slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(1, 1));
        assert!(w.penguins[p2.0].fallen);
    }

    // ── Counted-stop abilities ──

    #[test]
    fn king_stops_on_fifth_square() {
        let mut w = board(&[
            "..........",
            "K.........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(5, 1));
        assert!(w.penguins[0].ability_used());
        assert_eq!(events, vec![GameEvent::VoluntaryStop { penguin: P1 }]);
    }

    #[test]
    fn king_with_short_runway_just_slides() {
        let mut w = board(&[
            "..........",
            "......K..H",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(8, 1));
        assert!(w.penguins[0].ability_used());
        assert!(!events.contains(&GameEvent::VoluntaryStop { penguin: P1 }));
    }

    #[test]
    fn emperor_collects_food_on_stop_square() {
        let mut w = board(&[
            "......",
            "E..3.1",
            "......",
            "......",
            "......",
            "......",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(3, 1));
        assert_eq!(w.penguins[0].total_weight(), 3);
        assert_eq!(events.last(), Some(&GameEvent::VoluntaryStop { penguin: P1 }));
    }

    #[test]
    fn emperor_blocked_on_threshold_falls_through() {
        let mut w = board(&[
            "......",
            "E..H..",
            "......",
            "......",
            "......",
            "......",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(2, 1));
        assert_eq!(events, vec![GameEvent::HitHeavyBlock { penguin: P1 }]);
    }

    #[test]
    fn unarmed_emperor_slides_through() {
        let mut w = board(&[
            "......",
            "E....H",
            "......",
            "......",
            "......",
            "......",
        ]);
        slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(4, 1));
    }

    #[test]
    fn counter_restarts_after_bounce() {
        let mut w = board(&[
            "..........",
            "..S.E.....",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ]);
        w.penguins[0].activate_ability(Direction::Left);
        slide(&mut w, P1, Direction::Left);
        // Two squares counted before the sea-lion, then three fresh ones on
        // the rebound from (3,1).
        assert_eq!(w.penguins[0].pos, at(6, 1));
    }

    // ── Rockhopper ──

    #[test]
    fn rockhopper_jumps_and_keeps_sliding() {
        let mut w = board(&[
            "R.L..2",
            "......",
            "......",
            "......",
            "......",
            "......",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(5, 0));
        assert_eq!(w.penguins[0].total_weight(), 2);
        assert_eq!(kinds_at(&w, at(2, 0)), vec![HazardKind::LightBlock]);
        assert!(!w.penguins[0].stunned);
        assert_eq!(events[0], GameEvent::Jumped { penguin: P1, over: HazardKind::LightBlock });
        assert!(!w.penguins[0].ability.jump_pending());
    }

    #[test]
    fn rockhopper_lands_on_food() {
        let mut w = board(&[
            "RS4...",
            "......",
            "......",
            "......",
            "......",
            "......",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(2, 0));
        assert_eq!(w.penguins[0].total_weight(), 4);
        assert_eq!(kinds_at(&w, at(1, 0)), vec![HazardKind::SeaLion]);
    }

    #[test]
    fn rockhopper_jump_off_edge() {
        let mut w = board(&[
            "...",
            "R.O",
            "...",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        let events = slide(&mut w, P1, Direction::Right);
        assert!(w.penguins[0].fallen);
        assert_eq!(events, vec![GameEvent::JumpFellIntoWater { penguin: P1 }]);
    }

    #[test]
    fn rockhopper_blocked_landing_hits_hazard() {
        let mut w = board(&[
            "RLH..",
            ".....",
            ".....",
            ".....",
            ".....",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        let events = slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(0, 0));
        assert!(w.penguins[0].stunned);
        assert!(!w.penguins[0].ability.jump_pending());
        assert_eq!(events[0], GameEvent::JumpBlocked { penguin: P1 });
        assert_eq!(events[1], GameEvent::Stunned { penguin: P1 });
    }

    #[test]
    fn rockhopper_jumps_only_once() {
        let mut w = board(&[
            "R.L.H..",
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        slide(&mut w, P1, Direction::Right);
        assert_eq!(w.penguins[0].pos, at(3, 0));
    }

    #[test]
    fn rockhopper_ignores_plugged_holes() {
        let mut w = board(&[
            "Ro.L..",
            "......",
            "......",
            "......",
            "......",
            "......",
        ]);
        w.penguins[0].activate_ability(Direction::Right);
        slide(&mut w, P1, Direction::Right);
        // Crossed the plugged hole, then jumped the light block and fell off.
        assert!(w.penguins[0].fallen);
        assert_eq!(kinds_at(&w, at(3, 0)), vec![HazardKind::LightBlock]);
    }

    // ── Royal step ──

    #[test]
    fn royal_step_collects_food() {
        let mut w = board(&[
            "....",
            ".Y5.",
            "....",
            "....",
        ]);
        let mut events = Vec::new();
        assert!(royal_step(&mut w, P1, Direction::Right, &mut events));
        assert_eq!(w.penguins[0].pos, at(2, 1));
        assert_eq!(w.penguins[0].total_weight(), 5);
        assert!(w.is_consistent());
    }

    #[test]
    fn royal_step_into_water_and_hole() {
        let mut w = board(&[
            "Y...",
            "....",
            ".YO.",
            "....",
        ]);
        let mut events = Vec::new();
        assert!(!royal_step(&mut w, P1, Direction::Up, &mut events));
        assert!(!royal_step(&mut w, P2, Direction::Right, &mut events));
        assert!(w.penguins[0].fallen);
        assert!(w.penguins[1].fallen);
        assert_eq!(events, vec![
            GameEvent::FellIntoWater { penguin: P1 },
            GameEvent::FellIntoHole { penguin: P2 },
        ]);
        assert!(w.is_consistent());
    }

    #[test]
    fn royal_step_blocked() {
        let mut w = board(&[
            "YL..",
            "K...",
            "....",
            "....",
        ]);
        let mut events = Vec::new();
        assert!(!royal_step(&mut w, P1, Direction::Right, &mut events));
        assert!(!royal_step(&mut w, P1, Direction::Down, &mut events));
        assert_eq!(w.penguins[0].pos, at(0, 0));
        assert_eq!(events, vec![
            GameEvent::RoyalStepBlocked { penguin: P1 },
            GameEvent::RoyalStepBlocked { penguin: P1 },
        ]);
    }

    #[test]
    fn royal_step_onto_plugged_hole() {
        let mut w = board(&[
            "Yo..",
            "....",
            "....",
            "....",
        ]);
        let mut events = Vec::new();
        assert!(royal_step(&mut w, P1, Direction::Right, &mut events));
        assert_eq!(w.penguins[0].pos, at(1, 0));
        assert!(w.is_consistent());
        // Slides on from the hole cell.
        slide(&mut w, P1, Direction::Right);
        assert!(w.penguins[0].fallen);
        assert_eq!(kinds_at(&w, at(1, 0)), vec![HazardKind::Hole { plugged: true }]);
    }

    // ── Hazard entry point ──

    #[test]
    fn slide_hazard_directly() {
        let mut w = board(&[
            "....",
            "S.1O",
            "....",
            "....",
        ]);
        let mut events = Vec::new();
        let segments = slide_hazard(&mut w, HazardId(0), Direction::Right, &mut events);
        assert_eq!(segments, 1);
        assert_eq!(w.remaining_food_count(), 0);
        assert_eq!(kinds_at(&w, at(3, 1)), vec![HazardKind::Hole { plugged: true }]);
        assert!(w.hazard(HazardId(0)).is_none());
        assert!(w.is_consistent());
    }

    // ── Properties ──

    mod props {
        use super::*;
        use proptest::prelude::*;

        const SIZE: usize = 6;

        /// 0..=4 ice, 5..=8 penguin kinds, 9 LB, 10 HB, 11 SL, 12 hole,
        /// 13 plugged hole, 14 food.
        fn build(cells: &[u8]) -> WorldState {
            let mut w = WorldState::new(SIZE, 4);
            for (i, &code) in cells.iter().enumerate() {
                let pos = Position::new((i % SIZE) as i32, (i / SIZE) as i32);
                match code {
                    5..=8 => {
                        let name = format!("P{}", w.penguins.len() + 1);
                        w.spawn_penguin(name, PenguinKind::ALL[(code - 5) as usize], pos);
                    }
                    9 => { w.spawn_hazard(HazardKind::LightBlock, pos); }
                    10 => { w.spawn_hazard(HazardKind::HeavyBlock, pos); }
                    11 => { w.spawn_hazard(HazardKind::SeaLion, pos); }
                    12 => { w.spawn_hazard(HazardKind::Hole { plugged: false }, pos); }
                    13 => { w.spawn_hazard(HazardKind::Hole { plugged: true }, pos); }
                    14 => { w.spawn_food(FoodKind::ALL[i % 5], (i % 5) as u32 + 1, pos); }
                    _ => {}
                }
            }
            w
        }

        fn plugged_holes(w: &WorldState) -> Vec<HazardId> {
            (0..w.hazards.len())
                .map(HazardId)
                .filter(|&h| w.hazard_kind(h).is_some_and(HazardKind::is_plugged_hole))
                .collect()
        }

        proptest! {
            #[test]
            fn slides_keep_the_board_consistent(
                mut cells in proptest::collection::vec(0u8..15, SIZE * SIZE),
                mover in 0usize..SIZE * SIZE,
                kind in 0u8..4,
                dir in 0usize..4,
                armed in any::<bool>(),
            ) {
                cells[mover] = 5 + kind;
                let mut w = build(&cells);
                prop_assert!(w.is_consistent());

                let start = Position::new((mover % SIZE) as i32, (mover / SIZE) as i32);
                let id = w.penguin_at(start).unwrap();
                let dir = Direction::ALL[dir];
                if armed {
                    w.penguins[id.0].activate_ability(dir);
                }

                let plugged = plugged_holes(&w);
                let food = w.remaining_food_count();
                let hazards = w.active_hazard_count();
                let roster = w.penguins.len();
                let used: Vec<bool> = w.penguins.iter().map(|p| p.ability_used()).collect();

                let mut events = Vec::new();
                let segments = slide_penguin(&mut w, id, dir, &mut events);

                prop_assert!(w.is_consistent());
                prop_assert_eq!(w.penguins.len(), roster);
                prop_assert!(w.remaining_food_count() <= food);
                prop_assert!(w.active_hazard_count() <= hazards);
                for h in plugged {
                    prop_assert!(w.hazard_kind(h).is_some_and(HazardKind::is_plugged_hole));
                }
                for (p, was_used) in w.penguins.iter().zip(used) {
                    prop_assert!(p.ability_used() || !was_used);
                }
                // Penguin segments run in one direction between rebounds and
                // start strictly further along each time; each may trail a
                // hazard chain no longer than a row.
                let bound = (roster + 1) * SIZE * (SIZE + 1);
                prop_assert!(segments >= 1 && segments <= bound, "{} segments", segments);
            }
        }
    }
}
