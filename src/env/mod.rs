//! Environment access and merge rules.
//!
//! The engine never touches `std::env` directly. Everything goes through the
//! [`Environment`] trait so substitution precedence and apply-mode overwrite
//! rules can be exercised against an in-memory [`MapEnv`].

pub mod process;

pub use process::ProcessEnv;

use std::collections::BTreeMap;

use crate::error::Result;

/// Key/value mapping produced by parsing one or more sources.
pub type EnvMap = BTreeMap<String, String>;

/// Read/write view of an environment table.
pub trait Environment {
    /// Snapshot of every variable at the moment of the call.
    fn vars(&self) -> EnvMap;

    /// Look up a single variable.
    fn get(&self, key: &str) -> Option<String>;

    /// Set a variable, replacing any existing value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: EnvMap,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> EnvMap {
        self.vars
    }
}

impl From<EnvMap> for MapEnv {
    fn from(vars: EnvMap) -> Self {
        Self { vars }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn vars(&self) -> EnvMap {
        self.vars.clone()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.vars.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Merge mappings left to right; later mappings override earlier ones.
pub fn merge(layers: &[&EnvMap]) -> EnvMap {
    let mut merged = EnvMap::new();
    for layer in layers {
        merged.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

/// Variable lookup used while resolving one content buffer.
///
/// `parsed` is the mapping assembled so far for the buffer, `env` the
/// environment snapshot taken before the buffer was parsed. Without overload
/// the environment wins; with overload the buffer's own assignments win.
pub struct SubstitutionContext<'a> {
    parsed: &'a EnvMap,
    env: &'a EnvMap,
    overload: bool,
}

impl<'a> SubstitutionContext<'a> {
    pub fn new(parsed: &'a EnvMap, env: &'a EnvMap, overload: bool) -> Self {
        Self {
            parsed,
            env,
            overload,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a str> {
        let (first, second) = if self.overload {
            (self.parsed, self.env)
        } else {
            (self.env, self.parsed)
        };
        first.get(name).or_else(|| second.get(name)).map(String::as_str)
    }
}
