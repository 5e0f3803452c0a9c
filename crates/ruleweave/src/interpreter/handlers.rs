//! Object rule handlers.
//!
//! An object rule names a handler in its `handler` field:
//!
//! ```json
//! {"handler": "weighted", "options": ["common", "rare"], "weights": [9, 1]}
//! ```
//!
//! The handler receives the whole object and the grammar's random source,
//! and returns the rule's expansion.

use std::collections::{HashMap, hash_map};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde_json::{Map, Value};

/// Expands an object rule. Errors are reported as a message.
pub type ObjectHandlerFn<R> = fn(&Map<String, Value>, &mut R) -> Result<Value, String>;

/// Registry of object handlers by name.
pub struct HandlerRegistry<R> {
    handlers: HashMap<String, ObjectHandlerFn<R>>,
}

impl<R> HandlerRegistry<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, handler: ObjectHandlerFn<R>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<ObjectHandlerFn<R>> {
        self.handlers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<R: Rng> HandlerRegistry<R> {
    /// The `weighted` and `binomial` handlers.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert("weighted", weighted::<R>);
        registry.insert("binomial", binomial::<R>);
        registry
    }
}

impl<R> Default for HandlerRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for HandlerRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<R, N: Into<String>> Extend<(N, ObjectHandlerFn<R>)> for HandlerRegistry<R> {
    fn extend<I: IntoIterator<Item = (N, ObjectHandlerFn<R>)>>(&mut self, iter: I) {
        for (name, handler) in iter {
            self.insert(name, handler);
        }
    }
}

impl<R> IntoIterator for HandlerRegistry<R> {
    type Item = (String, ObjectHandlerFn<R>);
    type IntoIter = hash_map::IntoIter<String, ObjectHandlerFn<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.handlers.into_iter()
    }
}

impl<R> Debug for HandlerRegistry<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set().entries(self.names()).finish()
    }
}

fn options(object: &Map<String, Value>) -> Result<&[Value], String> {
    match object.get("options") {
        Some(Value::Array(options)) if !options.is_empty() => Ok(options),
        Some(Value::Array(_)) => Err("'options' is empty".to_string()),
        Some(_) => Err("'options' must be an array".to_string()),
        None => Err("missing 'options'".to_string()),
    }
}

/// `weighted`: pick an option with probability proportional to its weight.
///
/// Fields: `options` (array), `weights` (array of non-negative numbers, one
/// per option).
pub fn weighted<R: Rng>(object: &Map<String, Value>, rng: &mut R) -> Result<Value, String> {
    let options = options(object)?;
    let Some(Value::Array(weights)) = object.get("weights") else {
        return Err("missing 'weights' array".to_string());
    };
    if weights.len() != options.len() {
        return Err(format!(
            "{} weights for {} options",
            weights.len(),
            options.len()
        ));
    }
    let weights = weights
        .iter()
        .map(|w| w.as_f64().ok_or_else(|| format!("weight {w} is not a number")))
        .collect::<Result<Vec<f64>, String>>()?;
    let index = WeightedIndex::new(&weights).map_err(|e| e.to_string())?;
    Ok(options[index.sample(rng)].clone())
}

/// `binomial`: pick the option whose index is the number of successes in
/// `len - 1` trials with success probability `p` (default 0.5).
pub fn binomial<R: Rng>(object: &Map<String, Value>, rng: &mut R) -> Result<Value, String> {
    let options = options(object)?;
    let p = match object.get("p") {
        None => 0.5,
        Some(value) => value
            .as_f64()
            .ok_or_else(|| format!("'p' must be a number, got {value}"))?,
    };
    if !(0.0..=1.0).contains(&p) {
        return Err(format!("'p' must be within [0, 1], got {p}"));
    }
    let successes = (1..options.len()).filter(|_| rng.gen_bool(p)).count();
    Ok(options[successes].clone())
}
