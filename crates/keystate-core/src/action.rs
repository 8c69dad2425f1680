use std::fmt;
use std::str::FromStr;

/// The kind of a raw key event delivered by the host.
///
/// A `Repeat` is a key-down the platform synthesized while the key was held,
/// as opposed to a fresh `Press`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Release,
    Press,
    Repeat,
}

impl Action {
    /// Returns true only if this is a PRESS event (not REPEAT)
    pub fn just_pressed(self) -> bool {
        matches!(self, Action::Press)
    }

    /// Returns true if this is a RELEASE event
    pub fn is_released(self) -> bool {
        matches!(self, Action::Release)
    }

    /// Returns true if this is a REPEAT event
    pub fn is_repeat(self) -> bool {
        matches!(self, Action::Repeat)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Release => write!(f, "up"),
            Action::Press => write!(f, "down"),
            Action::Repeat => write!(f, "repeat"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "down" | "press" | "keydown" => Ok(Action::Press),
            "up" | "release" | "keyup" => Ok(Action::Release),
            "repeat" => Ok(Action::Repeat),
            other => Err(format!("unknown key action: '{}'", other)),
        }
    }
}
