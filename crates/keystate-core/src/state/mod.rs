// Keystate State
// Raw key set and logical per-rule state

pub mod keyset;
pub mod logical;

pub use keyset::RawKeySet;
pub use logical::{KeyStatus, LogicalKeyState, LogicalStateMap, ReadOnce};
