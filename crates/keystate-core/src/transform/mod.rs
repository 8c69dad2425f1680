// Keystate Transform Module
// Combo matching and logical state reconciliation

pub mod combo;
pub mod reconcile;

pub use combo::{matches_combo, matches_rule, rule_is_down};
pub use reconcile::reconcile;
