// Keystate Raw Key Set
// The live record of which raw key codes are physically down

use indexmap::IndexSet;

/// Raw key codes currently down.
///
/// A code is either present (down) or absent (up); nothing records "up"
/// explicitly. Codes are kept in press order for stable debug output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKeySet {
    down: IndexSet<String>,
}

impl RawKeySet {
    /// Create a new empty key set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of keys down
    pub fn len(&self) -> usize {
        self.down.len()
    }

    /// Check if no key is down
    pub fn is_empty(&self) -> bool {
        self.down.is_empty()
    }

    /// Check whether a raw key code is down
    pub fn is_down(&self, code: &str) -> bool {
        self.down.contains(code)
    }

    /// Check whether any of the codes is down
    pub fn any_down<'a>(&self, codes: impl IntoIterator<Item = &'a str>) -> bool {
        codes.into_iter().any(|code| self.is_down(code))
    }

    /// Record a key as down. Returns false if it already was.
    pub fn press(&mut self, code: &str) -> bool {
        if self.down.contains(code) {
            return false;
        }
        self.down.insert(code.to_string())
    }

    /// Forget a key. Returns false if it was not down.
    pub fn release(&mut self, code: &str) -> bool {
        self.down.shift_remove(code)
    }

    /// Forget every key
    pub fn clear(&mut self) {
        self.down.clear();
    }

    /// Iterate over the codes currently down, in press order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.down.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyset_new() {
        let keys = RawKeySet::new();
        assert_eq!(keys.len(), 0);
        assert!(keys.is_empty());
    }

    #[test]
    fn test_press_and_release() {
        let mut keys = RawKeySet::new();
        assert!(keys.press("KeyA"));
        assert!(!keys.press("KeyA"));
        assert!(keys.is_down("KeyA"));
        assert_eq!(keys.len(), 1);

        assert!(keys.release("KeyA"));
        assert!(!keys.release("KeyA"));
        assert!(!keys.is_down("KeyA"));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_any_down() {
        let mut keys = RawKeySet::new();
        keys.press("ShiftRight");
        assert!(keys.any_down(["ShiftLeft", "ShiftRight"]));
        assert!(!keys.any_down(["ControlLeft", "ControlRight"]));
        assert!(!keys.any_down(Vec::<&str>::new()));
    }

    #[test]
    fn test_clear() {
        let mut keys = RawKeySet::new();
        keys.press("MetaLeft");
        keys.press("KeyC");
        keys.clear();
        assert!(keys.is_empty());
    }

    #[test]
    fn test_iter_keeps_press_order() {
        let mut keys = RawKeySet::new();
        keys.press("ControlLeft");
        keys.press("ShiftLeft");
        keys.press("KeyA");
        keys.release("ShiftLeft");
        let codes: Vec<&str> = keys.iter().collect();
        assert_eq!(codes, vec!["ControlLeft", "KeyA"]);
    }
}
