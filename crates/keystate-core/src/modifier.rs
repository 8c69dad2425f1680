// Keystate Modifier Families
// Shift, Ctrl, Alt and Meta with their aliases and left/right key codes

use strum_macros::{Display, EnumString};

/// A modifier family. Each family owns several raw key codes so that either
/// side of the keyboard (and legacy browser codes for Meta) satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Modifier {
    #[strum(to_string = "shift")]
    Shift,
    #[strum(to_string = "ctrl", serialize = "control", serialize = "cntrl")]
    Ctrl,
    #[strum(to_string = "alt", serialize = "option", serialize = "opt")]
    Alt,
    #[strum(
        to_string = "meta",
        serialize = "cmd",
        serialize = "command",
        serialize = "win",
        serialize = "super"
    )]
    Meta,
}

const SHIFT_CODES: &[&str] = &["ShiftLeft", "ShiftRight"];
const CTRL_CODES: &[&str] = &["ControlRight", "ControlLeft"];
const ALT_CODES: &[&str] = &["AltLeft", "AltRight"];
const META_CODES: &[&str] = &["OSLeft", "OSRight", "MetaLeft", "MetaRight"];

impl Modifier {
    /// Get modifier by alias (case-insensitive)
    pub fn from_alias(alias: &str) -> Option<Modifier> {
        alias.trim().parse().ok()
    }

    /// All raw key codes that count as this modifier being down
    pub fn codes(self) -> &'static [&'static str] {
        match self {
            Modifier::Shift => SHIFT_CODES,
            Modifier::Ctrl => CTRL_CODES,
            Modifier::Alt => ALT_CODES,
            Modifier::Meta => META_CODES,
        }
    }

    /// Check whether a raw key code belongs to this family
    pub fn owns(self, code: &str) -> bool {
        self.codes().contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_from_alias() {
        assert_eq!(Modifier::from_alias("Ctrl"), Some(Modifier::Ctrl));
        assert_eq!(Modifier::from_alias("control"), Some(Modifier::Ctrl));
        assert_eq!(Modifier::from_alias("cntrl"), Some(Modifier::Ctrl));
        assert_eq!(Modifier::from_alias("OPTION"), Some(Modifier::Alt));
        assert_eq!(Modifier::from_alias("cmd"), Some(Modifier::Meta));
        assert_eq!(Modifier::from_alias("win"), Some(Modifier::Meta));
        assert_eq!(Modifier::from_alias("hyper"), None);
    }

    #[test]
    fn test_modifier_display_is_primary_alias() {
        assert_eq!(Modifier::Ctrl.to_string(), "ctrl");
        assert_eq!(Modifier::Meta.to_string(), "meta");
    }

    #[test]
    fn test_meta_absorbs_legacy_codes() {
        assert!(Modifier::Meta.owns("MetaLeft"));
        assert!(Modifier::Meta.owns("OSRight"));
        assert!(!Modifier::Meta.owns("AltLeft"));
    }
}
