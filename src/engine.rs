//! Per-buffer resolution and multi-source composition.
//!
//! [`parse_content`] turns one buffer into an [`EnvMap`]. The apply and merge
//! functions compose several buffers, either writing into an
//! [`Environment`] or accumulating a result without touching it.

use crate::env::{EnvMap, Environment, MapEnv, SubstitutionContext};
use crate::error::{Error, Result};
use crate::parse;

/// One content buffer and the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub content: String,
}

impl Source {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// A source that contributes nothing, used for missing files.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }
}

/// Resolve every assignment in `content`, then validate bare exports.
///
/// Values are resolved top to bottom, each one seeing only the assignments
/// above it plus a snapshot of `env` taken once for the whole buffer.
pub fn parse_content<E: Environment + ?Sized>(
    content: &str,
    overload: bool,
    env: &E,
) -> Result<EnvMap> {
    let snapshot = env.vars();
    let assignments = parse::assignments(content);

    let mut parsed = EnvMap::new();
    for assignment in &assignments {
        let value = parse::resolve(
            assignment.value,
            &SubstitutionContext::new(&parsed, &snapshot, overload),
        );
        parsed.insert(assignment.key.to_string(), value);
    }

    let leftover = parse::leftover(content, &assignments);
    let unset = parse::bare_exports(&leftover)
        .into_iter()
        .find(|export| !parsed.contains_key(export.name));
    if let Some(export) = unset {
        return Err(Error::UnsetExport {
            line: export.line.to_string(),
            parsed,
        });
    }
    Ok(parsed)
}

/// Parse one source and write its keys into `env`.
///
/// A key already present in `env` is left alone unless `overload` is set.
pub fn apply_source<E: Environment + ?Sized>(
    source: &Source,
    overload: bool,
    env: &mut E,
) -> Result<()> {
    let parsed = parse_content(&source.content, overload, &*env)?;
    log::debug!("{}: {} assignment(s)", source.name, parsed.len());

    let current = env.vars();
    for (key, value) in &parsed {
        if overload || !current.contains_key(key) {
            env.set(key, value)?;
            log::trace!("{}: set {key}", source.name);
        } else {
            log::trace!("{}: kept existing {key}", source.name);
        }
    }
    Ok(())
}

/// Apply sources in order, stopping at the first failure.
///
/// Sources may arrive as they are read; an `Err` item stops the run with
/// every earlier source already applied.
pub fn apply_sources<E, I>(sources: I, overload: bool, env: &mut E) -> Result<()>
where
    E: Environment + ?Sized,
    I: IntoIterator<Item = Result<Source>>,
{
    for source in sources {
        apply_source(&source?, overload, env)?;
    }
    Ok(())
}

/// Fail with every key from `required` that `env` lacks.
pub fn check_required_keys<E: Environment + ?Sized>(required: &[String], env: &E) -> Result<()> {
    let current = env.vars();
    let missing: Vec<String> = required
        .iter()
        .filter(|key| !current.contains_key(key.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingKeys(missing))
    }
}

/// Parse one source into `merged` without touching `env`.
///
/// The source is resolved against `env` layered over what is already merged
/// (environment values win). Composition is first-wins: a key that already
/// exists in that view keeps its existing value, whatever `overload` says.
pub fn merge_source<E: Environment + ?Sized>(
    merged: &mut EnvMap,
    source: &Source,
    overload: bool,
    env: &E,
) -> Result<()> {
    let base = MapEnv::from(crate::env::merge(&[&*merged, &env.vars()]));
    let parsed = parse_content(&source.content, overload, &base)?;
    log::debug!("{}: {} assignment(s)", source.name, parsed.len());

    for (key, value) in parsed {
        match base.get(&key) {
            Some(existing) => {
                log::trace!("{}: kept existing {key}", source.name);
                merged.insert(key, existing);
            }
            None => {
                merged.insert(key, value);
            }
        }
    }
    Ok(())
}

/// Merge sources in order, stopping at the first failure.
pub fn merge_sources<E, I>(sources: I, overload: bool, env: &E) -> Result<EnvMap>
where
    E: Environment + ?Sized,
    I: IntoIterator<Item = Result<Source>>,
{
    let mut merged = EnvMap::new();
    for source in sources {
        merge_source(&mut merged, &source?, overload, env)?;
    }
    Ok(merged)
}
