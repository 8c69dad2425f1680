// Keystate Transform Reconciler
// Diffs previous logical states against freshly matched rules

use crate::config::ParsedRules;
use crate::state::{LogicalKeyState, LogicalStateMap, RawKeySet};
use crate::transform::combo::rule_is_down;

/// Compute the next logical state map.
///
/// For every rule:
/// - no previous entry: a fresh all-false state (first observation is not an edge)
/// - `pressed` unchanged: the previous entry is carried forward as is,
///   including whether its edge flags were already read
/// - `pressed` changed: a new state with `down` set on a rising edge and `up`
///   set on a falling edge
///
/// Names no longer present in `rules` are dropped.
pub fn reconcile(
    rules: &ParsedRules,
    previous: &LogicalStateMap,
    keys: &RawKeySet,
) -> LogicalStateMap {
    let mut next = LogicalStateMap::new();

    for (name, rule) in rules.iter() {
        let matched = rule_is_down(rule, keys);
        let state = match previous.get(name) {
            None => LogicalKeyState::default(),
            Some(prev) if prev.pressed() == matched => prev.clone(),
            Some(prev) => {
                log::trace!(
                    "{}: {} ({})",
                    name,
                    if matched { "down" } else { "up" },
                    rule
                );
                LogicalKeyState::transition(matched, prev.pressed())
            }
        };
        next.insert(name, state);
    }

    next
}
