// Keystate Input Layer - Event Admission
// Decides whether and how a raw event may touch the raw key set

use std::fmt;

use crate::config::{EngineConfig, PanicEdge, ParsedRules};
use crate::input::KeyEvent;
use crate::state::RawKeySet;

/// Why an event was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// Focus was on a text-editable control
    InputTarget,
    /// Another handler already marked the event default-prevented
    AlreadyHandled,
    /// Auto-repeat while repeats are ignored
    Repeat,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::InputTarget => write!(f, "input-accepting target"),
            DropReason::AlreadyHandled => write!(f, "already handled"),
            DropReason::Repeat => write!(f, "repeat"),
        }
    }
}

/// What an admitted event does to the raw key set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    Dropped(DropReason),
    /// Record the key down
    Press,
    /// The key was already down: release it, reconcile, then press it again
    Repress,
    /// Forget the key
    Release,
    /// A repeat of a key already down, replayed as a release
    RepeatAsRelease,
}

/// The filter's verdict for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// The panic modifier transitioned: throw away every recorded key first
    pub reset: bool,
    pub disposition: Disposition,
}

impl Admission {
    fn dropped(reason: DropReason) -> Self {
        Self {
            reset: false,
            disposition: Disposition::Dropped(reason),
        }
    }
}

fn is_panic_code(config: &EngineConfig, code: &str) -> bool {
    config.panic_modifier.is_some_and(|modifier| modifier.owns(code))
}

/// Whether this event is the configured panic transition
pub fn is_panic_transition(config: &EngineConfig, event: &KeyEvent) -> bool {
    if !is_panic_code(config, &event.code) {
        return false;
    }
    match config.panic_edge {
        PanicEdge::Press => event.action.just_pressed(),
        PanicEdge::Release => event.action.is_released(),
    }
}

/// Run one event through the admission steps.
///
/// In order: input-target drop, panic reset, then for key-downs only the
/// already-handled drop, capture, and repeat policy. A repeat replayed as a
/// release counts as a release of the panic modifier. Releases are never
/// dropped for any other reason, so keys cannot get stuck. The only side
/// effect is marking the event default-prevented when it is captured.
pub fn admit(
    config: &EngineConfig,
    event: &mut KeyEvent,
    keys: &RawKeySet,
    rules: &ParsedRules,
) -> Admission {
    if config.ignore_input_accepting_elements && event.target.accepts_input() {
        return Admission::dropped(DropReason::InputTarget);
    }

    let reset = is_panic_transition(config, event);

    if event.action.is_released() {
        return Admission {
            reset,
            disposition: Disposition::Release,
        };
    }

    let disposition = admit_key_down(config, event, keys, rules, reset);
    let reset = reset
        || (disposition == Disposition::RepeatAsRelease
            && config.panic_edge == PanicEdge::Release
            && is_panic_code(config, &event.code));
    Admission { reset, disposition }
}

fn admit_key_down(
    config: &EngineConfig,
    event: &mut KeyEvent,
    keys: &RawKeySet,
    rules: &ParsedRules,
    reset: bool,
) -> Disposition {
    if config.ignore_captured_events && event.default_prevented {
        return Disposition::Dropped(DropReason::AlreadyHandled);
    }

    if config.capture_events && rules.captures(&event.code) {
        event.prevent_default();
    }

    // After a reset nothing is down any more
    let already_down = !reset && keys.is_down(&event.code);

    if event.action.is_repeat() {
        if config.ignore_repeat_events {
            return Disposition::Dropped(DropReason::Repeat);
        }
        if already_down {
            return Disposition::RepeatAsRelease;
        }
    }

    if already_down {
        Disposition::Repress
    } else {
        Disposition::Press
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigPatch, RuleMap};
    use crate::input::EventTarget;
    use crate::Modifier;

    fn rules() -> ParsedRules {
        ParsedRules::parse(&RuleMap::new().with("save", "ctrl+s"))
    }

    fn admit_default(event: &mut KeyEvent, keys: &RawKeySet) -> Admission {
        admit(&EngineConfig::default(), event, keys, &rules())
    }

    #[test]
    fn test_press_and_release() {
        let keys = RawKeySet::new();
        let admission = admit_default(&mut KeyEvent::down("KeyS"), &keys);
        assert_eq!(admission.disposition, Disposition::Press);
        assert!(!admission.reset);

        let admission = admit_default(&mut KeyEvent::up("KeyS"), &keys);
        assert_eq!(admission.disposition, Disposition::Release);
    }

    #[test]
    fn test_input_target_dropped_both_ways() {
        let keys = RawKeySet::new();
        for mut event in [
            KeyEvent::down("KeyS").with_target(EventTarget::TextInput),
            KeyEvent::up("KeyS").with_target(EventTarget::ContentEditable),
        ] {
            assert_eq!(
                admit_default(&mut event, &keys).disposition,
                Disposition::Dropped(DropReason::InputTarget)
            );
        }
    }

    #[test]
    fn test_input_target_admitted_when_not_ignored() {
        let config = EngineConfig::default().merged(&ConfigPatch {
            ignore_input_accepting_elements: Some(false),
            ..Default::default()
        });
        let mut event = KeyEvent::down("KeyS").with_target(EventTarget::Select);
        let admission = admit(&config, &mut event, &RawKeySet::new(), &rules());
        assert_eq!(admission.disposition, Disposition::Press);
    }

    #[test]
    fn test_already_handled_key_down_dropped() {
        let keys = RawKeySet::new();
        let admission = admit_default(&mut KeyEvent::down("KeyS").prevented(), &keys);
        assert_eq!(
            admission.disposition,
            Disposition::Dropped(DropReason::AlreadyHandled)
        );
    }

    #[test]
    fn test_already_handled_key_up_still_releases() {
        let keys = RawKeySet::new();
        let admission = admit_default(&mut KeyEvent::up("KeyS").prevented(), &keys);
        assert_eq!(admission.disposition, Disposition::Release);
    }

    #[test]
    fn test_capture_marks_rule_keys_only() {
        let config = EngineConfig {
            capture_events: true,
            ..Default::default()
        };
        let keys = RawKeySet::new();

        let mut captured = KeyEvent::down("KeyS");
        admit(&config, &mut captured, &keys, &rules());
        assert!(captured.default_prevented);

        let mut ignored = KeyEvent::down("KeyQ");
        admit(&config, &mut ignored, &keys, &rules());
        assert!(!ignored.default_prevented);

        let mut off = KeyEvent::down("KeyS");
        admit_default(&mut off, &keys);
        assert!(!off.default_prevented);
    }

    #[test]
    fn test_repeat_dropped_by_default() {
        let mut keys = RawKeySet::new();
        keys.press("KeyS");
        let admission = admit_default(&mut KeyEvent::repeat("KeyS"), &keys);
        assert_eq!(
            admission.disposition,
            Disposition::Dropped(DropReason::Repeat)
        );
    }

    #[test]
    fn test_repeat_reinterpreted_as_release() {
        let config = EngineConfig {
            ignore_repeat_events: false,
            ..Default::default()
        };
        let mut keys = RawKeySet::new();
        let fresh = admit(&config, &mut KeyEvent::repeat("KeyS"), &keys, &rules());
        assert_eq!(fresh.disposition, Disposition::Press);

        keys.press("KeyS");
        let held = admit(&config, &mut KeyEvent::repeat("KeyS"), &keys, &rules());
        assert_eq!(held.disposition, Disposition::RepeatAsRelease);
    }

    #[test]
    fn test_duplicate_down_is_repress() {
        let mut keys = RawKeySet::new();
        keys.press("KeyS");
        let admission = admit_default(&mut KeyEvent::down("KeyS"), &keys);
        assert_eq!(admission.disposition, Disposition::Repress);
    }

    #[test]
    fn test_panic_on_release_by_default() {
        let keys = RawKeySet::new();
        assert!(admit_default(&mut KeyEvent::up("MetaLeft"), &keys).reset);
        assert!(admit_default(&mut KeyEvent::up("OSRight"), &keys).reset);
        assert!(!admit_default(&mut KeyEvent::down("MetaLeft"), &keys).reset);
        assert!(!admit_default(&mut KeyEvent::up("ShiftLeft"), &keys).reset);
    }

    #[test]
    fn test_panic_on_press_resets_before_duplicate_check() {
        let config = EngineConfig {
            panic_modifier: Some(Modifier::Shift),
            panic_edge: PanicEdge::Press,
            ..Default::default()
        };
        let mut keys = RawKeySet::new();
        keys.press("ShiftLeft");
        let admission = admit(&config, &mut KeyEvent::down("ShiftLeft"), &keys, &rules());
        assert!(admission.reset);
        assert_eq!(admission.disposition, Disposition::Press);
    }

    #[test]
    fn test_repeat_of_held_panic_modifier_resets() {
        let config = EngineConfig {
            ignore_repeat_events: false,
            ..Default::default()
        };
        let mut keys = RawKeySet::new();
        keys.press("MetaLeft");
        let mut event = KeyEvent::repeat("MetaLeft");
        let admission = admit(&config, &mut event, &keys, &rules());
        assert!(admission.reset);
        assert_eq!(admission.disposition, Disposition::RepeatAsRelease);

        // Not held: the repeat is a press, which is not the panic edge
        let mut event = KeyEvent::repeat("MetaLeft");
        let admission = admit(&config, &mut event, &RawKeySet::new(), &rules());
        assert!(!admission.reset);
        assert_eq!(admission.disposition, Disposition::Press);
    }

    #[test]
    fn test_panic_disabled() {
        let config = EngineConfig {
            panic_modifier: None,
            ..Default::default()
        };
        let mut event = KeyEvent::up("MetaLeft");
        let admission = admit(&config, &mut event, &RawKeySet::new(), &rules());
        assert!(!admission.reset);
    }
}
