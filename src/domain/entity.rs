/// Entities: Penguin, Hazard, Food, plus the ids the grid stores.
///
/// Entities live in arenas on `WorldState` (index = id). The occupancy grid
/// only ever holds `Occupant` ids, never the entities themselves.

use super::ability::Ability;
use super::position::{Direction, Position};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PenguinId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct HazardId(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FoodId(pub usize);

/// What a grid cell can hold.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Occupant {
    Penguin(PenguinId),
    Hazard(HazardId),
    Food(FoodId),
}

// ── Penguins ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PenguinKind {
    King,
    Emperor,
    Rockhopper,
    Royal,
}

impl PenguinKind {
    pub const ALL: [PenguinKind; 4] = [
        PenguinKind::King,
        PenguinKind::Emperor,
        PenguinKind::Rockhopper,
        PenguinKind::Royal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PenguinKind::King       => "King Penguin",
            PenguinKind::Emperor    => "Emperor Penguin",
            PenguinKind::Rockhopper => "Rockhopper Penguin",
            PenguinKind::Royal      => "Royal Penguin",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Penguin {
    pub name: String,
    pub kind: PenguinKind,
    pub pos: Position,
    /// Terminal. A fallen penguin stays in the roster but never on the grid.
    pub fallen: bool,
    /// Skip the next turn, then clear.
    pub stunned: bool,
    pub player_controlled: bool,
    pub collected: Vec<FoodItem>,
    pub ability: Ability,
    ability_used: bool,
}

impl Penguin {
    pub fn new(name: impl Into<String>, kind: PenguinKind, pos: Position) -> Self {
        Penguin {
            name: name.into(),
            kind,
            pos,
            fallen: false,
            stunned: false,
            player_controlled: false,
            collected: Vec::new(),
            ability: Ability::for_kind(kind),
            ability_used: false,
        }
    }

    /// Has the once-per-game ability been spent? Never reverts.
    pub fn ability_used(&self) -> bool {
        self.ability_used
    }

    /// Spend the ability and arm it for this turn.
    pub fn activate_ability(&mut self, dir: Direction) {
        self.ability_used = true;
        self.ability.activate(dir);
    }

    pub fn collect(&mut self, item: FoodItem) {
        self.collected.push(item);
    }

    /// Remove the lightest collected item. Ties go to the earliest collected.
    pub fn drop_lightest(&mut self) -> Option<FoodItem> {
        let idx = self.collected
            .iter()
            .enumerate()
            .min_by_key(|(_, f)| f.weight)
            .map(|(i, _)| i)?;
        Some(self.collected.remove(idx))
    }

    pub fn total_weight(&self) -> u32 {
        self.collected.iter().map(|f| f.weight).sum()
    }
}

// ── Hazards ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HazardKind {
    LightBlock,
    HeavyBlock,
    SeaLion,
    Hole { plugged: bool },
}

impl HazardKind {
    pub fn glyph(self) -> &'static str {
        match self {
            HazardKind::LightBlock => "LB",
            HazardKind::HeavyBlock => "HB",
            HazardKind::SeaLion => "SL",
            HazardKind::Hole { plugged: false } => "HI",
            HazardKind::Hole { plugged: true } => "PH",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HazardKind::LightBlock => "LightIceBlock",
            HazardKind::HeavyBlock => "HeavyIceBlock",
            HazardKind::SeaLion => "SeaLion",
            HazardKind::Hole { plugged: false } => "HoleInIce",
            HazardKind::Hole { plugged: true } => "PluggedHoleInIce",
        }
    }

    pub fn is_plugged_hole(self) -> bool {
        matches!(self, HazardKind::Hole { plugged: true })
    }

    pub fn is_open_hole(self) -> bool {
        matches!(self, HazardKind::Hole { plugged: false })
    }
}

#[derive(Clone, Debug)]
pub struct Hazard {
    pub pos: Position,
    pub kind: HazardKind,
}

impl Hazard {
    pub fn new(kind: HazardKind, pos: Position) -> Self {
        Hazard { pos, kind }
    }

    /// Plug a hole. One-way; no effect on other kinds.
    pub fn plug(&mut self) {
        if let HazardKind::Hole { plugged } = &mut self.kind {
            *plugged = true;
        }
    }
}

// ── Food ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FoodKind {
    Krill,
    Crustacean,
    Anchovy,
    Squid,
    Mackerel,
}

impl FoodKind {
    pub const ALL: [FoodKind; 5] = [
        FoodKind::Krill,
        FoodKind::Crustacean,
        FoodKind::Anchovy,
        FoodKind::Squid,
        FoodKind::Mackerel,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            FoodKind::Krill      => "Kr",
            FoodKind::Crustacean => "Cr",
            FoodKind::Anchovy    => "An",
            FoodKind::Squid      => "Sq",
            FoodKind::Mackerel   => "Ma",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FoodKind::Krill      => "Krill",
            FoodKind::Crustacean => "Crustacean",
            FoodKind::Anchovy    => "Anchovy",
            FoodKind::Squid      => "Squid",
            FoodKind::Mackerel   => "Mackerel",
        }
    }
}

/// What a penguin carries once food is picked up.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FoodItem {
    pub kind: FoodKind,
    pub weight: u32,
}

#[derive(Clone, Debug)]
pub struct Food {
    pub pos: Position,
    pub item: FoodItem,
}

impl Food {
    pub fn new(kind: FoodKind, weight: u32, pos: Position) -> Self {
        Food { pos, item: FoodItem { kind, weight } }
    }
}
