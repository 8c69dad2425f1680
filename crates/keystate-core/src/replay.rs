// Keystate Replay Scripts
// Line-oriented text form of a raw key event sequence
//
//   # comment
//   down ControlLeft
//   repeat KeyS
//   up KeyS input prevented

use std::path::Path;

use thiserror::Error;

use crate::input::{EventTarget, KeyEvent};
use crate::Action;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown action '{action}'")]
    UnknownAction { line: usize, action: String },

    #[error("line {line}: missing key code")]
    MissingCode { line: usize },

    #[error("line {line}: unknown flag '{flag}'")]
    UnknownFlag { line: usize, flag: String },
}

/// Parse a whole script
pub fn parse_script(text: &str) -> Result<Vec<KeyEvent>, ScriptError> {
    let mut events = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        if let Some(event) = parse_line(index + 1, raw)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> Result<Vec<KeyEvent>, ScriptError> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

/// Parse one line; blank and comment lines yield `None`
pub fn parse_line(line: usize, raw: &str) -> Result<Option<KeyEvent>, ScriptError> {
    let content = match raw.find('#') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let mut words = content.split_whitespace();

    let Some(action) = words.next() else {
        return Ok(None);
    };
    let action: Action = action.parse().map_err(|_| ScriptError::UnknownAction {
        line,
        action: action.to_string(),
    })?;

    let code = words.next().ok_or(ScriptError::MissingCode { line })?;
    let mut event = KeyEvent::new(code, action);

    for flag in words {
        match flag.to_ascii_lowercase().as_str() {
            "input" => event.target = EventTarget::TextInput,
            "select" => event.target = EventTarget::Select,
            "textarea" => event.target = EventTarget::TextArea,
            "editable" | "contenteditable" => event.target = EventTarget::ContentEditable,
            "prevented" => event.default_prevented = true,
            _ => {
                return Err(ScriptError::UnknownFlag {
                    line,
                    flag: flag.to_string(),
                })
            }
        }
    }

    Ok(Some(event))
}
