//! Module option bundle
//!
//! Options reach a module as `KEY=value` pairs. Keys are case-insensitive and
//! stored upper-cased.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ModuleOptions {
    values: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for ModuleOptions {
    fn from(values: BTreeMap<String, String>) -> Self {
        let mut options = Self::new();
        for (key, value) in values {
            options.insert(&key, value);
        }
        options
    }
}

impl From<ModuleOptions> for BTreeMap<String, String> {
    fn from(options: ModuleOptions) -> Self {
        options.values
    }
}

impl ModuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `KEY=value` pairs. The value may be empty or contain `=`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::MissingSeparator(pair.to_string()))?;
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyKey(pair.to_string()));
            }
            options.insert(key, value);
        }
        Ok(options)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.trim().to_uppercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_uppercase()).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let options = ModuleOptions::from_pairs(["filter=(cn=a=b)", "Empty="]).unwrap();
        assert_eq!(options.keys().count(), 2);
        assert_eq!(options.get("FILTER"), Some("(cn=a=b)"));
        assert_eq!(options.get("filter"), Some("(cn=a=b)"));
        assert_eq!(options.get("EMPTY"), Some(""));
    }

    #[test]
    fn test_from_pairs_rejects_malformed() {
        assert_eq!(
            ModuleOptions::from_pairs(["NOVALUE"]),
            Err(ConfigError::MissingSeparator("NOVALUE".to_string()))
        );
        assert_eq!(
            ModuleOptions::from_pairs(["=value"]),
            Err(ConfigError::EmptyKey("=value".to_string()))
        );
    }

    #[test]
    fn test_empty_bundle() {
        let options = ModuleOptions::from_pairs(Vec::<String>::new()).unwrap();
        assert_eq!(options.keys().next(), None);
        assert_eq!(options, ModuleOptions::default());
    }

    #[test]
    fn test_deserialize_bundle() {
        let options: ModuleOptions = serde_json::from_str(r#"{"b": "2", "A": "1"}"#).unwrap();
        assert_eq!(options.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(options.get("b"), Some("2"));
    }
}
