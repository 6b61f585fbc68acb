/// Keyboard prompts for the player's penguin.
///
/// Each prompt prints its question, then reads key presses in raw mode until
/// one answers it:
///   - Y / N                       → ability use
///   - U / D / L / R, arrow keys   → direction
///   - Esc, Ctrl+C                 → abort the game
///
/// Any other key prints a hint and the prompt keeps waiting, so malformed
/// input never reaches the engine.

use std::io::{self, Write};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal,
};

use crate::domain::entity::Penguin;
use crate::domain::position::Direction;
use crate::error::GameError;
use crate::sim::step::{Controller, SlideDecision};
use crate::sim::world::WorldState;

/// How a single key press relates to the question being asked.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyAnswer<T> {
    Value(T),
    Ignored,
    Abort,
}

fn is_abort(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')))
}

pub fn yes_no(key: &KeyEvent) -> KeyAnswer<bool> {
    if is_abort(key) { return KeyAnswer::Abort; }
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAnswer::Value(true),
        KeyCode::Char('n') | KeyCode::Char('N') => KeyAnswer::Value(false),
        _ => KeyAnswer::Ignored,
    }
}

pub fn direction(key: &KeyEvent) -> KeyAnswer<Direction> {
    if is_abort(key) { return KeyAnswer::Abort; }
    let dir = match key.code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Char(c) => Direction::from_letter(c),
        _ => None,
    };
    dir.map_or(KeyAnswer::Ignored, KeyAnswer::Value)
}

// ── Key sources ──

pub trait KeySource {
    /// Block until the next key press.
    fn next_key(&mut self) -> io::Result<KeyEvent>;
}

/// Real terminal: raw mode only while waiting for a key.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        terminal::enable_raw_mode()?;
        let key = read_press();
        terminal::disable_raw_mode()?;
        key
    }
}

fn read_press() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Release {
                return Ok(key);
            }
        }
    }
}

// ── Controller ──

pub struct KeyboardController<K: KeySource, W: Write> {
    keys: K,
    out: W,
}

impl<K: KeySource, W: Write> KeyboardController<K, W> {
    pub fn new(keys: K, out: W) -> Self {
        KeyboardController { keys, out }
    }

    fn ask<T: std::fmt::Debug>(&mut self, question: &str, hint: &str, parse: fn(&KeyEvent) -> KeyAnswer<T>) -> Result<T, GameError> {
        queue!(self.out, Print(question), Print(" --> "))?;
        self.out.flush()?;
        loop {
            let key = self.keys.next_key()?;
            match parse(&key) {
                KeyAnswer::Value(v) => {
                    log::debug!("{key:?} -> {v:?}");
                    queue!(self.out, Print(key_label(&key)), Print("\r\n"))?;
                    self.out.flush()?;
                    return Ok(v);
                }
                KeyAnswer::Ignored => {
                    queue!(self.out, Print("\r\n"), Print(hint), Print("\r\n"), Print(question), Print(" --> "))?;
                    self.out.flush()?;
                }
                KeyAnswer::Abort => {
                    queue!(self.out, Print("\r\n"))?;
                    self.out.flush()?;
                    return Err(GameError::Aborted);
                }
            }
        }
    }

    fn ask_ability(&mut self, penguin: &Penguin) -> Result<bool, GameError> {
        let q = format!("Will {} use its special action? Answer with Y or N", penguin.name);
        self.ask(&q, "Invalid input. Please enter Y or N.", yes_no)
    }

    fn ask_direction(&mut self, question: &str) -> Result<Direction, GameError> {
        let q = format!("{question}? Answer with U (Up), D (Down), L (Left), R (Right)");
        self.ask(&q, "Invalid input. Please enter U, D, L, or R.", direction)
    }
}

fn key_label(key: &KeyEvent) -> String {
    match key.code {
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::Up => "UP".into(),
        KeyCode::Down => "DOWN".into(),
        KeyCode::Left => "LEFT".into(),
        KeyCode::Right => "RIGHT".into(),
        _ => String::new(),
    }
}

impl<K: KeySource, W: Write> Controller for KeyboardController<K, W> {
    fn choose_slide(&mut self, _world: &WorldState, penguin: &Penguin, ability_available: bool) -> Result<SlideDecision, GameError> {
        let use_ability = ability_available && self.ask_ability(penguin)?;
        let direction = self.ask_direction(&format!("Which direction will {} move", penguin.name))?;
        Ok(SlideDecision { direction, use_ability })
    }

    fn wants_step(&mut self, _world: &WorldState, penguin: &Penguin) -> Result<bool, GameError> {
        self.ask_ability(penguin)
    }

    fn choose_step(&mut self, _world: &WorldState, penguin: &Penguin) -> Result<Direction, GameError> {
        self.ask_direction(&format!("Which direction will {} use its special action", penguin.name))
    }
}
