// Keystate Input Layer
// Raw key events and the admission filter

mod event;
mod filter;

pub use event::{EventTarget, KeyEvent};
pub use filter::{admit, is_panic_transition, Admission, Disposition, DropReason};
