// Keystate Combo Types
// Parsed key combinations ("ctrl+shift+a") and rules of alternative combinations

use std::fmt;

use crate::key::{resolve_token, Identifiers};

/// One `+`-separated part of a combination, with its resolved key codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    identifiers: Identifiers,
}

impl Token {
    /// Resolve a trimmed token
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            identifiers: resolve_token(text),
        }
    }

    /// The token as written in the rule (trimmed)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw key codes any of which satisfies this token
    pub fn identifiers(&self) -> &Identifiers {
        &self.identifiers
    }
}

/// A key combination: every token must be down at the same time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    tokens: Vec<Token>,
}

impl Combo {
    /// Parse a combination string like "ctrl+shift+a".
    ///
    /// Parsing never fails: empty parts become tokens that resolve to nothing,
    /// which makes the whole combination unmatchable.
    pub fn parse(combo: &str) -> Self {
        Self {
            tokens: combo.split('+').map(|part| Token::new(part.trim())).collect(),
        }
    }

    /// Get the tokens for this combo
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// A combo with no tokens, or with a token that resolves to nothing, can never match
    pub fn is_matchable(&self) -> bool {
        !self.tokens.is_empty() && self.tokens.iter().all(|t| !t.identifiers.is_empty())
    }

    /// Every raw key code reachable from this combo
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .flat_map(|t| t.identifiers.iter().map(|c| &**c))
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.tokens.iter().map(|t| t.text()).collect();
        write!(f, "{}", parts.join("+"))
    }
}

/// A parsed rule: one combination, or a list of alternatives where any may match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Single(Combo),
    AnyOf(Vec<Combo>),
}

impl Rule {
    /// Get the combos of this rule in order
    pub fn combos(&self) -> &[Combo] {
        match self {
            Rule::Single(combo) => std::slice::from_ref(combo),
            Rule::AnyOf(combos) => combos,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Single(combo) => write!(f, "{}", combo),
            Rule::AnyOf(combos) => {
                let parts: Vec<String> = combos.iter().map(|c| c.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}
