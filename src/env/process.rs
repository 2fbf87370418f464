use super::{EnvMap, Environment};
use crate::error::{Error, Result};

/// The host process environment.
///
/// Variables whose name or value is not valid UTF-8 are invisible to the
/// snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn vars(&self) -> EnvMap {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() || key.contains(['=', '\0']) || value.contains('\0') {
            return Err(Error::InvalidValue {
                key: key.to_string(),
            });
        }
        // SAFETY: loading is single-threaded; callers serialize access to the
        // process environment.
        unsafe { std::env::set_var(key, value) };
        Ok(())
    }
}
