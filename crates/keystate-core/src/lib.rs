// Keystate Core Library
// Named key combinations tracked as pressed/down/up logical state

pub mod action;
pub mod combo;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod input;
pub mod key;
pub mod modifier;
pub mod replay;
pub mod state;
pub mod transform;

pub use action::Action;
pub use combo::{Combo, Rule, Token};
pub use config::{
    ConfigError, ConfigPatch, EngineConfig, InvalidRuleMapError, PanicEdge, ParsedRules, RuleMap,
    RuleSpec, SessionFile,
};
pub use dispatch::{KeyEventDispatcher, SubscriptionId};
pub use engine::{EventOutcome, KeyQuery, KeyStateEngine, SharedEngine};
pub use input::{Disposition, DropReason, EventTarget, KeyEvent};
pub use key::{resolve_token, Identifiers};
pub use modifier::Modifier;
pub use replay::{load_script, parse_script, ScriptError};
pub use state::{KeyStatus, LogicalKeyState, LogicalStateMap, RawKeySet, ReadOnce};
