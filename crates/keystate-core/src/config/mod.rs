// Keystate Config API
// Rule map validation and parsing, admission settings, session files

pub mod rules;
pub mod settings;

pub use rules::{InvalidRuleMapError, ParsedRules, RuleMap, RuleSpec};
pub use settings::{ConfigError, ConfigPatch, EngineConfig, PanicEdge, SessionFile};
