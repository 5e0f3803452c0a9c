use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::interpreter::LoadError;
use crate::types::RuleContents;

/// The static rule table of a grammar, keyed by rule name.
///
/// Serializes as a plain JSON object:
///
/// ```
/// use ruleweave::RuleSet;
///
/// let rules = RuleSet::from_json_str(r#"{"origin": "hello #name#", "name": ["ann", "bo"]}"#)?;
/// assert_eq!(rules.len(), 2);
/// assert!(rules.contains("name"));
/// # Ok::<(), ruleweave::LoadError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: BTreeMap<String, RuleContents>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule set from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Self::parse(json, PathBuf::from("<string>"))
    }

    /// Read and parse a JSON grammar file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json, path.to_path_buf())
    }

    fn parse(json: &str, path: PathBuf) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::Parse {
            path,
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&RuleContents> {
        self.rules.get(name)
    }

    /// Insert or replace a rule, returning the previous definition.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        contents: impl Into<RuleContents>,
    ) -> Option<RuleContents> {
        self.rules.insert(name.into(), contents.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Rules in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleContents)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }
}

impl<N: Into<String>, C: Into<RuleContents>> FromIterator<(N, C)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(name, contents)| (name.into(), contents.into()))
                .collect(),
        }
    }
}
