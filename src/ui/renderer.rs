/// Presentation layer: styled transcript renderer.
///
/// How it works:
///   1. Each screen element (grid, roster, turn header, event lines,
///      scoreboard) is queued as crossterm commands with `queue!`
///   2. The whole element is flushed once at the end
///   3. Lines end in "\r\n" so output stays aligned while a prompt holds
///      the terminal in raw mode
///
/// What the text says lives in plain functions (`describe`, `cell_glyph`,
/// `food_list`) so it can be checked without a terminal.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};

use crate::domain::entity::{FoodItem, HazardKind, Occupant, PenguinId};
use crate::domain::position::Position;
use crate::error::GameError;
use crate::sim::event::GameEvent;
use crate::sim::step::TurnObserver;
use crate::sim::world::WorldState;

const NL: &str = "\r\n";

// ── Glyphs ──

/// What a grid cell shows: two characters and a colour.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Glyph {
    pub text: String,
    pub color: Color,
    pub bold: bool,
}

/// Priority penguin > hazard > food; `None` for bare ice.
pub fn cell_glyph(world: &WorldState, pos: Position) -> Option<Glyph> {
    let cell = world.grid.objects_at(pos);

    let penguin = cell.iter().find_map(|o| match o {
        Occupant::Penguin(id) => world.penguin(*id),
        _ => None,
    });
    if let Some(p) = penguin {
        let color = if p.player_controlled { Color::Yellow } else { Color::Cyan };
        return Some(Glyph { text: p.name.clone(), color, bold: p.player_controlled });
    }

    let hazard = cell.iter().find_map(|o| match o {
        Occupant::Hazard(id) => world.hazard_kind(*id),
        _ => None,
    });
    if let Some(kind) = hazard {
        return Some(Glyph { text: kind.glyph().to_string(), color: hazard_color(kind), bold: false });
    }

    cell.iter().find_map(|o| match o {
        Occupant::Food(id) => world.food(*id),
        _ => None,
    }).map(|f| Glyph { text: f.item.kind.glyph().to_string(), color: Color::Green, bold: false })
}

fn hazard_color(kind: HazardKind) -> Color {
    match kind {
        HazardKind::LightBlock => Color::White,
        HazardKind::HeavyBlock => Color::Blue,
        HazardKind::SeaLion => Color::Magenta,
        HazardKind::Hole { plugged: false } => Color::Red,
        HazardKind::Hole { plugged: true } => Color::DarkGrey,
    }
}

// ── Messages ──

/// Human-readable lines for one event.
pub fn describe(event: &GameEvent, world: &WorldState) -> Vec<String> {
    let name = |id: PenguinId| world.penguin_name(id).to_string();
    let removed = |id: PenguinId| format!("*** {} IS REMOVED FROM THE GAME!", name(id));

    match *event {
        GameEvent::TurnSkipped { penguin } => vec![format!("{}'s turn is SKIPPED due to being stunned.", name(penguin))],
        GameEvent::AbilityUsed { penguin } => vec![format!("{} chooses to USE its special action.", name(penguin))],
        GameEvent::AbilityDeclined { penguin } => vec![format!("{} does NOT use its special action.", name(penguin))],
        GameEvent::MoveChosen { penguin, direction } => vec![format!("{} chooses to move {}.", name(penguin), direction.name())],

        GameEvent::FellIntoWater { penguin } => vec![format!("{} falls into the water!", name(penguin)), removed(penguin)],
        GameEvent::FellIntoHole { penguin } => vec![format!("{} falls into the HoleInIce!", name(penguin)), removed(penguin)],
        GameEvent::FoodCollected { penguin, food } => vec![format!(
            "{} takes the {} on the ground. (Weight={} units)", name(penguin), food.kind.name(), food.weight
        )],
        GameEvent::Stunned { penguin } => vec![format!("{} hits a LightIceBlock and is STUNNED!", name(penguin))],
        GameEvent::HitHeavyBlock { penguin } => vec![format!("{} hits a HeavyIceBlock!", name(penguin))],
        GameEvent::FoodDropped { penguin, food } => vec![format!(
            "{} drops {} ({} units) as a penalty.", name(penguin), food.kind.name(), food.weight
        )],
        GameEvent::PenguinCollision { mover, struck, direction } => vec![
            format!("{} collides with {}!", name(mover), name(struck)),
            format!("{} starts sliding {}.", name(struck), direction.name()),
        ],
        GameEvent::SeaLionBounce { penguin, direction } => vec![
            format!("{} hits a SeaLion and bounces back!", name(penguin)),
            format!("{} slides {}.", name(penguin), direction.name()),
        ],
        GameEvent::SeaLionStop { penguin } => vec![format!("{} hits a SeaLion and stops.", name(penguin))],
        GameEvent::CrossedPluggedHole { penguin } => vec![format!("{} slides over a plugged hole.", name(penguin))],
        GameEvent::VoluntaryStop { penguin } => vec![format!("{} stops at an empty square using its special action.", name(penguin))],

        GameEvent::JumpArmed { penguin } => vec![format!("{} prepares to jump over a hazard in its path.", name(penguin))],
        GameEvent::Jumped { penguin, over } => vec![format!("{} jumps over {} in its path.", name(penguin), over.name())],
        GameEvent::JumpBlocked { penguin } => vec![format!("{} tries to jump but the landing spot is occupied!", name(penguin))],
        GameEvent::JumpFellIntoWater { penguin } => vec![format!("{} jumps but falls into the water!", name(penguin)), removed(penguin)],

        GameEvent::RoyalStepped { penguin, direction } => vec![format!("{} moves one square to the {}.", name(penguin), direction.name())],
        GameEvent::RoyalStepBlocked { penguin } => vec![
            format!("{} cannot step there!", name(penguin)),
            format!("{}'s special action is wasted.", name(penguin)),
        ],

        GameEvent::HazardSlid { hazard, direction } => vec![format!("{} starts sliding {}.", hazard.name(), direction.name())],
        GameEvent::HazardFellIntoWater { hazard } => vec![format!("{} falls into the water!", hazard.name())],
        GameEvent::HazardDestroyedFood { hazard, food } => vec![format!("{} destroys {}!", hazard.name(), food.kind.name())],
        GameEvent::HazardStoppedNearPenguin { hazard, penguin } => vec![format!("{} stops near {}.", hazard.name(), name(penguin))],
        GameEvent::HazardPluggedHole { hazard } => vec![format!("{} falls into HoleInIce and PLUGS it!", hazard.name())],
        GameEvent::HazardHitHazard { moving, stationary } => vec![format!("{} stops at {}.", moving.name(), stationary.name())],
    }
}

/// "Squid (5 units), Krill (1 units)" or "None".
pub fn food_list(items: &[FoodItem]) -> String {
    if items.is_empty() {
        return "None".to_string();
    }
    items.iter()
        .map(|f| format!("{} ({} units)", f.kind.name(), f.weight))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 1st, 2nd, 3rd, 4th, ... 11th, 12th, 13th, 21st ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

// ── Renderer ──

pub struct Renderer<W: Write> {
    writer: W,
}

impl Renderer<BufWriter<Stdout>> {
    pub fn stdout() -> Self {
        Renderer::new(BufWriter::with_capacity(16384, io::stdout()))
    }
}

impl<W: Write> Renderer<W> {
    pub fn new(writer: W) -> Self {
        Renderer { writer }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        queue!(self.writer, Print(text), Print(NL))
    }

    fn styled(&mut self, text: &str, color: Color, bold: bool) -> io::Result<()> {
        if bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        queue!(self.writer, SetForegroundColor(color), Print(text), ResetColor)?;
        if bold {
            queue!(self.writer, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    pub fn welcome(&mut self, world: &WorldState) -> io::Result<()> {
        let n = world.size();
        self.styled("Welcome to Sliding Penguins Puzzle Game App.", Color::Cyan, true)?;
        queue!(self.writer, Print(NL))?;
        self.line(&format!("A {n}x{n} icy terrain grid is being generated."))?;
        self.line("Penguins, Hazards, and Food items are also being generated.")?;
        self.line("")?;
        self.writer.flush()
    }

    pub fn roster(&mut self, world: &WorldState) -> io::Result<()> {
        self.line("These are the penguins on the icy terrain:")?;
        for p in &world.penguins {
            let mark = if p.player_controlled { " ---> YOUR PENGUIN" } else { "" };
            self.line(&format!("- {}: {}{mark}", p.name, p.kind.name()))?;
        }
        self.line("")?;
        self.writer.flush()
    }

    pub fn grid(&mut self, world: &WorldState) -> io::Result<()> {
        let n = world.size();
        let separator = "-".repeat(5 * n as usize + 1);
        self.line(&separator)?;
        for y in 0..n {
            queue!(self.writer, Print("|"))?;
            for x in 0..n {
                queue!(self.writer, Print(" "))?;
                match cell_glyph(world, Position::new(x, y)) {
                    Some(g) => self.styled(&format!("{:<2}", g.text), g.color, g.bold)?,
                    None => queue!(self.writer, Print("  "))?,
                }
                queue!(self.writer, Print(" |"))?;
            }
            queue!(self.writer, Print(NL))?;
            self.line(&separator)?;
        }
        self.line("")?;
        self.writer.flush()
    }

    pub fn turn_header(&mut self, world: &WorldState, id: PenguinId) -> io::Result<()> {
        let you = world.penguin(id).is_some_and(|p| p.player_controlled);
        let suffix = if you { " (Your Penguin):" } else { ":" };
        let text = format!("*** Turn {} - {}{suffix}", world.turn, world.penguin_name(id));
        self.styled(&text, Color::Yellow, true)?;
        queue!(self.writer, Print(NL))?;
        self.writer.flush()
    }

    pub fn events(&mut self, world: &WorldState, events: &[GameEvent]) -> io::Result<()> {
        for event in events {
            for text in describe(event, world) {
                self.line(&text)?;
            }
        }
        self.writer.flush()
    }

    pub fn scoreboard(&mut self, world: &WorldState) -> io::Result<()> {
        self.line("")?;
        self.styled("***** GAME OVER *****", Color::Red, true)?;
        queue!(self.writer, Print(NL), Print(NL))?;
        self.line("***** SCOREBOARD FOR THE PENGUINS *****")?;
        for (place, id) in world.scoreboard().into_iter().enumerate() {
            let Some(p) = world.penguin(id) else { continue };
            let mark = if p.player_controlled { " (Your Penguin)" } else { "" };
            self.line(&format!("* {} place: {}{mark}", ordinal(place + 1), p.name))?;
            self.line(&format!("  |---> Food items: {}", food_list(&p.collected)))?;
            self.line(&format!("  |---> Total weight: {} units", p.total_weight()))?;
        }
        self.writer.flush()
    }

    /// Plain line outside the event stream (prompts, notices).
    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        self.line(text)?;
        self.writer.flush()
    }
}

impl<W: Write> TurnObserver for Renderer<W> {
    fn before_turn(&mut self, world: &WorldState, id: PenguinId) -> Result<(), GameError> {
        Ok(self.turn_header(world, id)?)
    }

    fn after_turn(&mut self, world: &WorldState, _id: PenguinId, events: &[GameEvent]) -> Result<(), GameError> {
        self.events(world, events)?;
        self.notice("New state of the grid:")?;
        Ok(self.grid(world)?)
    }
}
