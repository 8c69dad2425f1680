// Keystate Input Layer - Raw Key Events
// What the host hands the engine for each platform key event

use std::fmt;

use crate::Action;

/// What kind of element had focus when the event fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventTarget {
    #[default]
    Other,
    TextInput,
    Select,
    TextArea,
    ContentEditable,
}

impl EventTarget {
    /// Text-editable controls and form fields
    pub fn accepts_input(self) -> bool {
        !matches!(self, EventTarget::Other)
    }
}

/// A raw key event.
///
/// `default_prevented` is shared with the host: the engine sets it when it
/// captures the event, and reads it to skip events another handler consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Location-based raw key code, e.g. "KeyA" or "ShiftLeft"
    pub code: String,
    pub action: Action,
    pub target: EventTarget,
    pub default_prevented: bool,
}

impl KeyEvent {
    pub fn new(code: impl Into<String>, action: Action) -> Self {
        Self {
            code: code.into(),
            action,
            target: EventTarget::Other,
            default_prevented: false,
        }
    }

    /// A fresh key-down
    pub fn down(code: impl Into<String>) -> Self {
        Self::new(code, Action::Press)
    }

    /// A key-up
    pub fn up(code: impl Into<String>) -> Self {
        Self::new(code, Action::Release)
    }

    /// A platform auto-repeat key-down
    pub fn repeat(code: impl Into<String>) -> Self {
        Self::new(code, Action::Repeat)
    }

    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }

    /// Mark as already handled by someone else
    pub fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }

    /// Ask the host to suppress the platform's default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.code)?;
        if self.target.accepts_input() {
            write!(f, " input")?;
        }
        if self.default_prevented {
            write!(f, " prevented")?;
        }
        Ok(())
    }
}
