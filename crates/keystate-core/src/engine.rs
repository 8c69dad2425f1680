// Keystate Engine
// Raw key events in, per-rule pressed/down/up state out
//
// Every call runs to completion synchronously; the engine owns its raw key
// set and logical state exclusively. Share it across threads through
// `SharedEngine`.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{ConfigPatch, EngineConfig, InvalidRuleMapError, ParsedRules, RuleMap, RuleSpec};
use crate::input::{admit, Disposition, KeyEvent};
use crate::key::resolve_token;
use crate::state::{KeyStatus, LogicalStateMap, RawKeySet};
use crate::transform::{reconcile, rule_is_down};
use crate::Action;

/// An engine behind a lock, as handed to a dispatcher
pub type SharedEngine = Arc<Mutex<KeyStateEngine>>;

/// What handling one raw event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    pub disposition: Disposition,
    /// At least one reconciliation produced a new logical state map
    pub changed: bool,
    /// Reconciliations during this event that produced a new map
    pub updates: u32,
}

/// The keyboard state engine
#[derive(Debug)]
pub struct KeyStateEngine {
    rules: RuleMap,
    parsed: ParsedRules,
    config: EngineConfig,
    keys: RawKeySet,
    state: LogicalStateMap,
    generation: u64,
}

impl KeyStateEngine {
    /// Create an engine with default config.
    ///
    /// Accepts a [`RuleMap`] or anything that validates into one (a TOML
    /// value or TOML text).
    pub fn new<R>(rules: R) -> Result<Self, InvalidRuleMapError>
    where
        R: TryInto<RuleMap>,
        InvalidRuleMapError: From<R::Error>,
    {
        Self::with_config(rules, EngineConfig::default())
    }

    /// Create an engine with explicit config
    pub fn with_config<R>(rules: R, config: EngineConfig) -> Result<Self, InvalidRuleMapError>
    where
        R: TryInto<RuleMap>,
        InvalidRuleMapError: From<R::Error>,
    {
        let rules: RuleMap = rules.try_into()?;
        let parsed = ParsedRules::parse(&rules);
        let keys = RawKeySet::new();
        let state = reconcile(&parsed, &LogicalStateMap::new(), &keys);
        Ok(Self {
            rules,
            parsed,
            config,
            keys,
            state,
            generation: 0,
        })
    }

    /// Wrap into a [`SharedEngine`]
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    /// Replace the rule map.
    ///
    /// Validation happens first; on error nothing changes. Re-parses only if
    /// the new map differs from the current one, and returns whether it did.
    pub fn update_rules<R>(&mut self, rules: R) -> Result<bool, InvalidRuleMapError>
    where
        R: TryInto<RuleMap>,
        InvalidRuleMapError: From<R::Error>,
    {
        let rules: RuleMap = rules.try_into()?;
        if rules == self.rules {
            return Ok(false);
        }

        log::debug!("re-parsing {} rules", rules.len());
        self.parsed = ParsedRules::parse(&rules);
        self.rules = rules;
        self.update_state();
        Ok(true)
    }

    /// Merge a partial config into the current one
    pub fn update_config(&mut self, patch: &ConfigPatch) {
        self.config.merge(patch);
    }

    /// Feed a raw key-down (fresh or repeat)
    pub fn on_key_down(&mut self, event: &mut KeyEvent) -> EventOutcome {
        if event.action.is_released() {
            event.action = Action::Press;
        }
        self.handle_event(event)
    }

    /// Feed a raw key-up
    pub fn on_key_up(&mut self, event: &mut KeyEvent) -> EventOutcome {
        event.action = Action::Release;
        self.handle_event(event)
    }

    /// Feed any raw key event
    pub fn handle_event(&mut self, event: &mut KeyEvent) -> EventOutcome {
        if self.config.debug {
            log::debug!("event: {}", event);
        } else {
            log::trace!("event: {}", event);
        }

        let admission = admit(&self.config, event, &self.keys, &self.parsed);

        let mut updates = 0;
        if admission.reset {
            log::debug!(
                "panic modifier {} on {}, dropping {} recorded keys",
                event.action,
                event.code,
                self.keys.len()
            );
            self.keys.clear();
        }

        match admission.disposition {
            Disposition::Dropped(reason) => {
                if self.config.debug {
                    log::debug!("ignoring {} ({})", event, reason);
                } else {
                    log::trace!("ignoring {} ({})", event, reason);
                }
                if admission.reset {
                    updates += self.update_state() as u32;
                }
            }
            Disposition::Press => {
                self.keys.press(&event.code);
                updates += self.update_state() as u32;
            }
            Disposition::Repress => {
                self.keys.release(&event.code);
                updates += self.update_state() as u32;
                self.keys.press(&event.code);
                updates += self.update_state() as u32;
            }
            Disposition::Release | Disposition::RepeatAsRelease => {
                self.keys.release(&event.code);
                updates += self.update_state() as u32;
            }
        }

        let level = if self.config.debug {
            log::Level::Debug
        } else {
            log::Level::Trace
        };
        if log::log_enabled!(level) {
            let down: Vec<&str> = self.keys.iter().collect();
            log::log!(level, "rules: {:?} keys: {:?}", self.rules, down);
        }

        EventOutcome {
            disposition: admission.disposition,
            changed: updates > 0,
            updates,
        }
    }

    /// Reconcile and swap in the new map if anything changed
    fn update_state(&mut self) -> bool {
        let next = reconcile(&self.parsed, &self.state, &self.keys);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.generation += 1;
        log::debug!("logical state update #{}", self.generation);
        true
    }

    /// Read every logical key, consuming `down`/`up` edges
    pub fn read_all(&mut self) -> indexmap::IndexMap<String, KeyStatus> {
        self.state.read_all()
    }

    /// Read one logical key, consuming its edges
    pub fn read(&mut self, name: &str) -> Option<KeyStatus> {
        self.state.read(name)
    }

    /// The logical state without consuming anything
    pub fn state(&self) -> &LogicalStateMap {
        &self.state
    }

    /// The logical state, for read-once access to individual fields
    pub fn state_mut(&mut self) -> &mut LogicalStateMap {
        &mut self.state
    }

    /// Number of logical state updates emitted so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rules(&self) -> &RuleMap {
        &self.rules
    }

    pub fn parsed_rules(&self) -> &ParsedRules {
        &self.parsed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn keys(&self) -> &RawKeySet {
        &self.keys
    }

    /// Live queries against the raw key set
    pub fn query(&self) -> KeyQuery<'_> {
        KeyQuery::new(&self.keys)
    }
}

/// Pure reads of the raw key set that bypass logical state entirely.
/// Nothing here is read-once.
#[derive(Debug, Clone, Copy)]
pub struct KeyQuery<'a> {
    keys: &'a RawKeySet,
}

impl<'a> KeyQuery<'a> {
    pub fn new(keys: &'a RawKeySet) -> Self {
        Self { keys }
    }

    /// Whether a rule (combo string or list of alternatives) holds right now
    pub fn pressed(&self, rule: impl Into<RuleSpec>) -> bool {
        rule_is_down(&rule.into().parse(), self.keys)
    }

    fn token(&self, token: &str) -> bool {
        self.keys
            .any_down(resolve_token(token).iter().map(|code| &**code))
    }

    pub fn space(&self) -> bool {
        self.token("space")
    }

    pub fn shift(&self) -> bool {
        self.token("shift")
    }

    pub fn ctrl(&self) -> bool {
        self.token("ctrl")
    }

    pub fn alt(&self) -> bool {
        self.token("alt")
    }

    pub fn option(&self) -> bool {
        self.token("option")
    }

    pub fn meta(&self) -> bool {
        self.token("meta")
    }

    pub fn esc(&self) -> bool {
        self.token("esc")
    }
}
