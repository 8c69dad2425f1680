// Keystate Logical State
// Per-rule tri-state (pressed / down / up) with read-once edge flags

use std::fmt;

use indexmap::IndexMap;

/// A boolean that reports its value once, then false until written again.
///
/// Equality compares the written value only, so two states produced by the
/// same transition are equal no matter which of them has been read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnce {
    value: bool,
    consumed: bool,
}

impl ReadOnce {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            consumed: false,
        }
    }

    /// Look at the value without consuming it
    pub fn peek(&self) -> bool {
        !self.consumed && self.value
    }

    /// Return the value and mark it consumed
    pub fn read(&mut self) -> bool {
        if self.consumed {
            return false;
        }
        self.consumed = true;
        self.value
    }

    /// Write a value; the next read sees it again
    pub fn set(&mut self, value: bool) {
        self.value = value;
        self.consumed = false;
    }
}

impl PartialEq for ReadOnce {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ReadOnce {}

/// Logical state of one rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalKeyState {
    pressed: bool,
    down: ReadOnce,
    up: ReadOnce,
}

impl LogicalKeyState {
    /// The state after an edge: `down` on a rising edge, `up` on a falling one
    pub fn transition(matched: bool, was_pressed: bool) -> Self {
        Self {
            pressed: matched,
            down: ReadOnce::new(matched),
            up: ReadOnce::new(was_pressed && !matched),
        }
    }

    /// Whether the rule currently matches. Never consumed.
    pub fn pressed(&self) -> bool {
        self.pressed
    }

    /// True on the first read after the rule started matching
    pub fn down(&mut self) -> bool {
        self.down.read()
    }

    /// True on the first read after the rule stopped matching
    pub fn up(&mut self) -> bool {
        self.up.read()
    }

    pub fn peek_down(&self) -> bool {
        self.down.peek()
    }

    pub fn peek_up(&self) -> bool {
        self.up.peek()
    }

    pub fn set_down(&mut self, value: bool) {
        self.down.set(value);
    }

    pub fn set_up(&mut self, value: bool) {
        self.up.set(value);
    }

    /// Read all three fields, consuming the edge flags
    pub fn read(&mut self) -> KeyStatus {
        KeyStatus {
            pressed: self.pressed,
            down: self.down.read(),
            up: self.up.read(),
        }
    }

    /// All three fields without consuming anything
    pub fn peek(&self) -> KeyStatus {
        KeyStatus {
            pressed: self.pressed,
            down: self.down.peek(),
            up: self.up.peek(),
        }
    }
}

/// A plain snapshot of a [`LogicalKeyState`] read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyStatus {
    pub pressed: bool,
    pub down: bool,
    pub up: bool,
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pressed={} down={} up={}",
            self.pressed, self.down, self.up
        )
    }
}

/// Logical state for every rule name, in rule map order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalStateMap {
    states: IndexMap<String, LogicalKeyState>,
}

impl LogicalStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of logical keys
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&LogicalKeyState> {
        self.states.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LogicalKeyState> {
        self.states.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, state: LogicalKeyState) {
        self.states.insert(name.into(), state);
    }

    /// Read one logical key, consuming its edge flags
    pub fn read(&mut self, name: &str) -> Option<KeyStatus> {
        self.states.get_mut(name).map(LogicalKeyState::read)
    }

    /// Read every logical key, consuming edge flags
    pub fn read_all(&mut self) -> IndexMap<String, KeyStatus> {
        self.states
            .iter_mut()
            .map(|(name, state)| (name.clone(), state.read()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogicalKeyState)> {
        self.states.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }
}
