// Keystate Transform Combo Matching
// Pure predicates deciding whether a rule holds for a set of down keys

use crate::combo::{Combo, Rule};
use crate::state::RawKeySet;

/// Whether a combination holds: every token has at least one of its codes down.
///
/// Combos with no tokens or with a token that resolves to nothing never match.
pub fn matches_combo(combo: &Combo, is_down: impl Fn(&str) -> bool) -> bool {
    combo.is_matchable()
        && combo
            .tokens()
            .iter()
            .all(|token| token.identifiers().iter().any(|code| is_down(&**code)))
}

/// Whether a rule holds: any of its alternatives matches
pub fn matches_rule(rule: &Rule, is_down: impl Fn(&str) -> bool) -> bool {
    rule.combos()
        .iter()
        .any(|combo| matches_combo(combo, &is_down))
}

/// [`matches_rule`] against a raw key set
pub fn rule_is_down(rule: &Rule, keys: &RawKeySet) -> bool {
    matches_rule(rule, |code| keys.is_down(code))
}
