// Keystate Key Tokens
// Maps human-readable rule tokens to the raw key codes they stand for

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use smallvec::SmallVec;

use crate::Modifier;

/// The raw key codes a single token resolves to.
///
/// Most tokens resolve to one code; modifiers resolve to up to four.
pub type Identifiers = SmallVec<[Cow<'static, str>; 4]>;

/// Named tokens other than letters, digits, modifiers and function keys
fn alias_table() -> &'static HashMap<&'static str, &'static [&'static str]> {
    static ALIASES: OnceLock<HashMap<&'static str, &'static [&'static str]>> = OnceLock::new();
    ALIASES.get_or_init(|| {
        let entries: &[(&[&str], &'static [&'static str])] = &[
            (&["[", "bracketleft"], &["BracketLeft"]),
            (&["]", "bracketright"], &["BracketRight"]),
            (&["\\", "backslash"], &["Backslash"]),
            (&[".", "period"], &["Period"]),
            (&[",", "comma"], &["Comma", "NumpadComma"]),
            (&["/", "slash"], &["Slash"]),
            (&["`", "backquote"], &["Backquote"]),
            (&[";", "semicolon"], &["Semicolon"]),
            (&["'", "quote"], &["Quote"]),
            (&["delete", "backspace"], &["Backspace", "Delete"]),
            (&["tab"], &["Tab"]),
            (&["enter", "return"], &["Enter", "NumpadEnter"]),
            (&["esc", "escape"], &["Escape"]),
            (&["space"], &["Space"]),
            (&["left"], &["ArrowLeft"]),
            (&["up"], &["ArrowUp"]),
            (&["right"], &["ArrowRight"]),
            (&["down"], &["ArrowDown"]),
            (&["home"], &["Home"]),
            (&["end"], &["End"]),
            (&["pageup"], &["PageUp"]),
            (&["pagedown"], &["PageDown"]),
            (&["insert"], &["Insert"]),
            (&["capslock"], &["CapsLock"]),
            (&["=", "plus", "equal", "equals"], &["Equal"]),
            (&["minus"], &["Minus"]),
            (&["lshift"], &["ShiftLeft"]),
            (&["rshift"], &["ShiftRight"]),
            (&["lctrl"], &["ControlLeft"]),
            (&["rctrl"], &["ControlRight"]),
            (&["lalt", "lopt"], &["AltLeft"]),
            (&["ralt", "ropt"], &["AltRight"]),
            (&["lmeta", "lcmd"], &["MetaLeft", "OSLeft"]),
            (&["rmeta", "rcmd"], &["MetaRight", "OSRight"]),
        ];
        let mut map = HashMap::new();
        for (names, codes) in entries {
            for name in names.iter() {
                map.insert(*name, *codes);
            }
        }
        map
    })
}

/// Resolve a rule token to the raw key codes treated as equivalent to it.
///
/// Lookup is case-insensitive. Unknown tokens pass through unchanged so raw
/// codes such as `"NumpadAdd"` can be used directly in rules. The empty token
/// resolves to nothing and therefore never matches.
pub fn resolve_token(token: &str) -> Identifiers {
    let mut out = Identifiers::new();
    if token.is_empty() {
        return out;
    }

    let lower = token.to_lowercase();
    let mut chars = lower.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            out.push(Cow::Owned(format!("Key{}", c.to_ascii_uppercase())));
            return out;
        }
        if c.is_ascii_digit() {
            out.push(Cow::Owned(format!("Digit{}", c)));
            return out;
        }
    }

    if let Some(modifier) = Modifier::from_alias(&lower) {
        out.extend(modifier.codes().iter().map(|code| Cow::Borrowed(*code)));
        return out;
    }

    if let Some(codes) = alias_table().get(lower.as_str()) {
        out.extend(codes.iter().map(|code| Cow::Borrowed(*code)));
        return out;
    }

    if let Some(n) = function_key(&lower) {
        out.push(Cow::Owned(format!("F{}", n)));
        return out;
    }

    out.push(Cow::Owned(token.to_string()));
    out
}

/// `f1` through `f24`
fn function_key(lower: &str) -> Option<u8> {
    let digits = lower.strip_prefix('f')?;
    if digits.starts_with('0') {
        return None;
    }
    digits.parse::<u8>().ok().filter(|n| (1..=24).contains(n))
}
