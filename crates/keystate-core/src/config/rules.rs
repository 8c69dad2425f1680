// Keystate Config API - Rule Maps
// Validation of logical-name -> rule mappings and parsing into combos

use std::convert::Infallible;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};

use crate::combo::{Combo, Rule};

/// Errors raised when a rule mapping is malformed.
///
/// Validation runs before anything is stored, so a failed update leaves the
/// previously accepted mapping in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRuleMapError {
    #[error("expecting a table {{name = string | [string]}} of rules, found {found}")]
    NotATable { found: String },

    #[error("expecting string or array value for key {key}, found {found}")]
    InvalidValue { key: String, found: String },

    #[error("expecting array of strings for key {key}, element {index} is {found}")]
    InvalidAlternative {
        key: String,
        index: usize,
        found: String,
    },

    #[error("rule map is not valid TOML: {0}")]
    Syntax(String),
}

impl From<Infallible> for InvalidRuleMapError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// The unparsed right-hand side of a rule: one combination string or a list
/// of alternative combination strings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleSpec {
    Single(String),
    AnyOf(Vec<String>),
}

impl RuleSpec {
    /// Parse every combination string of this rule
    pub fn parse(&self) -> Rule {
        match self {
            RuleSpec::Single(combo) => Rule::Single(Combo::parse(combo)),
            RuleSpec::AnyOf(combos) => {
                Rule::AnyOf(combos.iter().map(|c| Combo::parse(c)).collect())
            }
        }
    }

    /// The combination strings in order
    pub fn combos(&self) -> impl Iterator<Item = &str> {
        let combos: &[String] = match self {
            RuleSpec::Single(combo) => std::slice::from_ref(combo),
            RuleSpec::AnyOf(combos) => combos,
        };
        combos.iter().map(String::as_str)
    }

    fn from_value(key: &str, value: &toml::Value) -> Result<Self, InvalidRuleMapError> {
        match value {
            toml::Value::String(s) => Ok(RuleSpec::Single(s.clone())),
            toml::Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    toml::Value::String(s) => Ok(s.clone()),
                    other => Err(InvalidRuleMapError::InvalidAlternative {
                        key: key.to_string(),
                        index,
                        found: other.type_str().to_string(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(RuleSpec::AnyOf),
            other => Err(InvalidRuleMapError::InvalidValue {
                key: key.to_string(),
                found: other.type_str().to_string(),
            }),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(combo: &str) -> Self {
        RuleSpec::Single(combo.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(combo: String) -> Self {
        RuleSpec::Single(combo)
    }
}

impl From<Vec<String>> for RuleSpec {
    fn from(combos: Vec<String>) -> Self {
        RuleSpec::AnyOf(combos)
    }
}

impl From<Vec<&str>> for RuleSpec {
    fn from(combos: Vec<&str>) -> Self {
        RuleSpec::AnyOf(combos.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for RuleSpec {
    fn from(combos: &[&str]) -> Self {
        RuleSpec::AnyOf(combos.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RuleSpec {
    fn from(combos: [&str; N]) -> Self {
        RuleSpec::AnyOf(combos.iter().map(|c| c.to_string()).collect())
    }
}

/// Mapping from logical name to rule.
///
/// Equality is structural and ignores insertion order, which is what decides
/// whether an update needs a re-parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMap {
    rules: IndexMap<String, RuleSpec>,
}

impl RuleMap {
    /// Create an empty rule map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, rule: impl Into<RuleSpec>) -> Self {
        self.insert(name, rule);
        self
    }

    /// Insert or replace a rule, returning the previous one
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        rule: impl Into<RuleSpec>,
    ) -> Option<RuleSpec> {
        self.rules.insert(name.into(), rule.into())
    }

    /// Get a rule by logical name
    pub fn get(&self, name: &str) -> Option<&RuleSpec> {
        self.rules.get(name)
    }

    /// Get the number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over (name, rule) in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Validate a dynamic value: it must be a table whose values are strings
    /// or arrays of strings
    pub fn from_value(value: &toml::Value) -> Result<Self, InvalidRuleMapError> {
        let table = value.as_table().ok_or_else(|| InvalidRuleMapError::NotATable {
            found: value.type_str().to_string(),
        })?;

        let mut rules = IndexMap::with_capacity(table.len());
        for (key, value) in table {
            rules.insert(key.clone(), RuleSpec::from_value(key, value)?);
        }
        Ok(Self { rules })
    }

    /// Parse and validate a TOML document of `name = "combo"` lines
    pub fn from_toml(content: &str) -> Result<Self, InvalidRuleMapError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| InvalidRuleMapError::Syntax(e.to_string()))?;
        Self::from_value(&toml::Value::Table(table))
    }
}

impl<K: Into<String>, V: Into<RuleSpec>> FromIterator<(K, V)> for RuleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl TryFrom<&toml::Value> for RuleMap {
    type Error = InvalidRuleMapError;

    fn try_from(value: &toml::Value) -> Result<Self, Self::Error> {
        RuleMap::from_value(value)
    }
}

impl TryFrom<toml::Value> for RuleMap {
    type Error = InvalidRuleMapError;

    fn try_from(value: toml::Value) -> Result<Self, Self::Error> {
        RuleMap::from_value(&value)
    }
}

impl TryFrom<&str> for RuleMap {
    type Error = InvalidRuleMapError;

    fn try_from(content: &str) -> Result<Self, Self::Error> {
        RuleMap::from_toml(content)
    }
}

impl FromStr for RuleMap {
    type Err = InvalidRuleMapError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        RuleMap::from_toml(content)
    }
}

/// Rules parsed into combos, plus the capture set: every raw key code
/// reachable from any token of any rule
#[derive(Debug, Clone, Default)]
pub struct ParsedRules {
    rules: IndexMap<String, Rule>,
    capture: IndexSet<String>,
}

impl ParsedRules {
    /// Parse every rule of a validated map
    pub fn parse(map: &RuleMap) -> Self {
        let rules: IndexMap<String, Rule> = map
            .iter()
            .map(|(name, spec)| (name.to_string(), spec.parse()))
            .collect();

        let capture = rules
            .values()
            .flat_map(|rule| rule.combos())
            .flat_map(|combo| combo.identifiers())
            .map(str::to_string)
            .collect();

        Self { rules, capture }
    }

    /// Iterate over (name, rule) in rule map order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get the number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether a raw key code appears in any rule
    pub fn captures(&self, code: &str) -> bool {
        self.capture.contains(code)
    }

    /// The capture set
    pub fn capture_set(&self) -> &IndexSet<String> {
        &self.capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_map_from_toml() {
        let map = RuleMap::from_toml(
            r#"
            save = "ctrl+s"
            copy = ["ctrl+c", "meta+c"]
            "#,
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("save"), Some(&RuleSpec::from("ctrl+s")));
        assert_eq!(map.get("copy"), Some(&RuleSpec::from(["ctrl+c", "meta+c"])));
    }

    #[test]
    fn test_rejects_non_table() {
        let result = RuleMap::from_value(&toml::Value::String("ctrl+s".into()));
        assert_eq!(
            result,
            Err(InvalidRuleMapError::NotATable {
                found: "string".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_non_string_value_naming_the_key() {
        let err = RuleMap::from_toml("save = 1").unwrap_err();
        assert!(matches!(&err, InvalidRuleMapError::InvalidValue { key, .. } if key == "save"));
        assert!(err.to_string().contains("save"));
    }

    #[test]
    fn test_rejects_array_with_non_string_naming_the_key() {
        let err = RuleMap::from_toml(r#"copy = ["ctrl+c", true]"#).unwrap_err();
        assert_eq!(
            err,
            InvalidRuleMapError::InvalidAlternative {
                key: "copy".to_string(),
                index: 1,
                found: "boolean".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            RuleMap::from_toml("save = "),
            Err(InvalidRuleMapError::Syntax(_))
        ));
    }

    #[test]
    fn test_rule_map_equality_ignores_order() {
        let a = RuleMap::new().with("a", "a").with("b", "b");
        let b = RuleMap::new().with("b", "b").with("a", "a");
        assert_eq!(a, b);
        assert_ne!(a, RuleMap::new().with("a", "a").with("b", "shift+b"));
    }

    #[test]
    fn test_capture_set_is_union_of_all_identifiers() {
        let map = RuleMap::new()
            .with("save", "ctrl+s")
            .with("jump", ["space", "up"]);
        let parsed = ParsedRules::parse(&map);
        for code in ["ControlLeft", "ControlRight", "KeyS", "Space", "ArrowUp"] {
            assert!(parsed.captures(code), "{} should be captured", code);
        }
        assert!(!parsed.captures("KeyA"));
        assert_eq!(parsed.capture_set().len(), 5);
    }
}
