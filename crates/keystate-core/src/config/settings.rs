// Keystate Settings
// Event admission options, partial updates, and session files loaded from TOML

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::rules::{InvalidRuleMapError, RuleMap};
use crate::Modifier;

/// Errors that can occur when loading settings or session files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid rules: {0}")]
    Rules(#[from] InvalidRuleMapError),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// Which transition of the panic modifier clears the raw key set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicEdge {
    Press,
    #[default]
    Release,
}

/// Options consulted by the admission filter for every raw event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Mark key-downs whose code appears in any rule as default-prevented
    pub capture_events: bool,
    /// Drop repeat key-downs; when false they are replayed as releases
    pub ignore_repeat_events: bool,
    /// Drop key-downs another handler already marked default-prevented
    pub ignore_captured_events: bool,
    /// Drop events targeting text inputs, selects, textareas, content-editables
    pub ignore_input_accepting_elements: bool,
    /// Log every event and the raw key set at debug level
    pub debug: bool,
    /// Modifier whose transition throws away every recorded key (stuck-key recovery)
    pub panic_modifier: Option<Modifier>,
    pub panic_edge: PanicEdge,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capture_events: false,
            ignore_repeat_events: true,
            ignore_captured_events: true,
            ignore_input_accepting_elements: true,
            debug: false,
            panic_modifier: Some(Modifier::Meta),
            panic_edge: PanicEdge::Release,
        }
    }
}

impl EngineConfig {
    /// Apply only the fields present in `patch`
    pub fn merge(&mut self, patch: &ConfigPatch) {
        if let Some(v) = patch.capture_events {
            self.capture_events = v;
        }
        if let Some(v) = patch.ignore_repeat_events {
            self.ignore_repeat_events = v;
        }
        if let Some(v) = patch.ignore_captured_events {
            self.ignore_captured_events = v;
        }
        if let Some(v) = patch.ignore_input_accepting_elements {
            self.ignore_input_accepting_elements = v;
        }
        if let Some(v) = patch.debug {
            self.debug = v;
        }
        if let Some(v) = patch.panic_modifier {
            self.panic_modifier = v;
        }
        if let Some(v) = patch.panic_edge {
            self.panic_edge = v;
        }
    }

    /// Builder-style merge
    pub fn merged(mut self, patch: &ConfigPatch) -> Self {
        self.merge(patch);
        self
    }
}

/// A partial [`EngineConfig`]; `None` fields leave the current value alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub capture_events: Option<bool>,
    pub ignore_repeat_events: Option<bool>,
    pub ignore_captured_events: Option<bool>,
    pub ignore_input_accepting_elements: Option<bool>,
    pub debug: Option<bool>,
    /// `Some(None)` disables the panic reset
    pub panic_modifier: Option<Option<Modifier>>,
    pub panic_edge: Option<PanicEdge>,
}

impl ConfigPatch {
    /// Parse a patch from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        raw.to_patch()
    }
}

/// TOML representation of a config patch
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    #[serde(default)]
    capture_events: Option<bool>,
    #[serde(default)]
    ignore_repeat_events: Option<bool>,
    #[serde(default)]
    ignore_captured_events: Option<bool>,
    #[serde(default)]
    ignore_input_accepting_elements: Option<bool>,
    #[serde(default)]
    debug: Option<bool>,
    /// A modifier alias, or "none"
    #[serde(default)]
    panic_modifier: Option<String>,
    /// "press" or "release"
    #[serde(default)]
    panic_edge: Option<String>,
}

impl ConfigToml {
    fn to_patch(&self) -> Result<ConfigPatch, ConfigError> {
        let panic_modifier = match self.panic_modifier.as_deref() {
            None => None,
            Some(name) if name.eq_ignore_ascii_case("none") => Some(None),
            Some(name) => Some(Some(Modifier::from_alias(name).ok_or_else(|| {
                ConfigError::InvalidValue(format!("unknown panic modifier '{}'", name))
            })?)),
        };

        let panic_edge = match self.panic_edge.as_deref().map(str::to_ascii_lowercase) {
            None => None,
            Some(edge) => match edge.as_str() {
                "press" | "down" => Some(PanicEdge::Press),
                "release" | "up" => Some(PanicEdge::Release),
                other => {
                    return Err(ConfigError::InvalidValue(format!(
                        "panic_edge must be 'press' or 'release', got '{}'",
                        other
                    )))
                }
            },
        };

        Ok(ConfigPatch {
            capture_events: self.capture_events,
            ignore_repeat_events: self.ignore_repeat_events,
            ignore_captured_events: self.ignore_captured_events,
            ignore_input_accepting_elements: self.ignore_input_accepting_elements,
            debug: self.debug,
            panic_modifier,
            panic_edge,
        })
    }
}

/// A rule map plus optional config overrides, as stored on disk:
///
/// ```toml
/// [rules]
/// save = "ctrl+s"
/// copy = ["ctrl+c", "meta+c"]
///
/// [config]
/// capture_events = true
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionFile {
    pub rules: RuleMap,
    pub config: ConfigPatch,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionToml {
    #[serde(default)]
    rules: Option<toml::Value>,
    #[serde(default)]
    config: Option<ConfigToml>,
}

impl SessionFile {
    /// Load a session from a TOML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a session from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: SessionToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        let rules = match raw.rules {
            Some(value) => RuleMap::from_value(&value)?,
            None => RuleMap::new(),
        };
        let config = match raw.config {
            Some(config) => config.to_patch()?,
            None => ConfigPatch::default(),
        };

        Ok(Self { rules, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(!config.capture_events);
        assert!(config.ignore_repeat_events);
        assert!(config.ignore_captured_events);
        assert!(config.ignore_input_accepting_elements);
        assert!(!config.debug);
        assert_eq!(config.panic_modifier, Some(Modifier::Meta));
        assert_eq!(config.panic_edge, PanicEdge::Release);
    }

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut config = EngineConfig::default();
        config.merge(&ConfigPatch {
            capture_events: Some(true),
            panic_modifier: Some(Some(Modifier::Shift)),
            ..Default::default()
        });
        assert!(config.capture_events);
        assert!(config.ignore_repeat_events);
        assert_eq!(config.panic_modifier, Some(Modifier::Shift));

        config.merge(&ConfigPatch {
            panic_modifier: Some(None),
            ..Default::default()
        });
        assert_eq!(config.panic_modifier, None);
        assert!(config.capture_events);
    }

    #[test]
    fn test_patch_from_toml() {
        let patch = ConfigPatch::from_toml(
            r#"
            ignore_repeat_events = false
            panic_modifier = "Shift"
            panic_edge = "press"
            "#,
        )
        .unwrap();
        assert_eq!(patch.ignore_repeat_events, Some(false));
        assert_eq!(patch.panic_modifier, Some(Some(Modifier::Shift)));
        assert_eq!(patch.panic_edge, Some(PanicEdge::Press));
        assert_eq!(patch.capture_events, None);
    }

    #[test]
    fn test_patch_rejects_unknown_fields_and_values() {
        assert!(matches!(
            ConfigPatch::from_toml("capture = true"),
            Err(ConfigError::TomlParse(_))
        ));
        assert!(matches!(
            ConfigPatch::from_toml(r#"panic_modifier = "hyper""#),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            ConfigPatch::from_toml(r#"panic_edge = "sideways""#),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_panic_modifier_none_disables() {
        let patch = ConfigPatch::from_toml(r#"panic_modifier = "none""#).unwrap();
        assert_eq!(patch.panic_modifier, Some(None));
    }

    #[test]
    fn test_session_from_toml() {
        let session = SessionFile::from_toml(
            r#"
            [rules]
            save = "ctrl+s"
            copy = ["ctrl+c", "meta+c"]

            [config]
            capture_events = true
            "#,
        )
        .unwrap();
        assert_eq!(session.rules.len(), 2);
        assert_eq!(session.config.capture_events, Some(true));
    }

    #[test]
    fn test_session_with_invalid_rule_reports_key() {
        let err = SessionFile::from_toml(
            r#"
            [rules]
            save = 42
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Rules(InvalidRuleMapError::InvalidValue { key, .. }) => {
                assert_eq!(key, "save")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_session_rules_must_be_a_table() {
        let err = SessionFile::from_toml(r#"rules = "ctrl+s""#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Rules(InvalidRuleMapError::NotATable { .. })
        ));
    }
}
