//! Input state tracking and game-action bindings.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. Movement actions read this.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened and cleared by `end_frame()`. Actions bound
//!   with `PressMode::InitialPressOnly` (jump, exit) read this, so holding the
//!   key does not repeat the action.
//!
//! The simulation never looks at keys directly: it asks an `ActionSource`
//! whether an `Action` is pressed.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Escape,
    A,
    D,
}

/// Logical game actions the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressMode {
    /// Pressed for as long as the key is held.
    Normal,
    /// Pressed only on the frame the key went down.
    InitialPressOnly,
}

/// Anything that can answer "is this action currently pressed".
pub trait ActionSource {
    fn is_pressed(&self, action: Action) -> bool;
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub action: Action,
    pub key: Key,
    pub mode: PressMode,
}

/// Key bindings for every action. An action may be bound to several keys.
#[derive(Debug, Clone)]
pub struct ActionMap {
    bindings: Vec<Binding>,
}

impl ActionMap {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn bind(&mut self, action: Action, key: Key, mode: PressMode) {
        self.bindings.push(Binding { action, key, mode });
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn is_pressed(&self, input: &InputState, action: Action) -> bool {
        self.bindings
            .iter()
            .filter(|b| b.action == action)
            .any(|b| match b.mode {
                PressMode::Normal => input.is_held(b.key),
                PressMode::InitialPressOnly => input.is_just_pressed(b.key),
            })
    }
}

impl Default for ActionMap {
    /// Arrows move, space jumps, escape exits; A/D mirror the arrows.
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(Action::MoveLeft, Key::Left, PressMode::Normal);
        map.bind(Action::MoveLeft, Key::A, PressMode::Normal);
        map.bind(Action::MoveRight, Key::Right, PressMode::Normal);
        map.bind(Action::MoveRight, Key::D, PressMode::Normal);
        map.bind(Action::Jump, Key::Space, PressMode::InitialPressOnly);
        map.bind(Action::Exit, Key::Escape, PressMode::InitialPressOnly);
        map
    }
}

/// Live keyboard state paired with its bindings.
#[derive(Debug, Default)]
pub struct Controls {
    pub input: InputState,
    pub bindings: ActionMap,
}

impl ActionSource for Controls {
    fn is_pressed(&self, action: Action) -> bool {
        self.bindings.is_pressed(&self.input, action)
    }
}
