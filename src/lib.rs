//! dotload: read dotenv files into the process environment or into a map.
//!
//! Content is split into `KEY=value` assignments, each value is unquoted,
//! unescaped and `$VAR`-expanded, and bare `export NAME` lines are checked
//! against the keys the same file assigned. [`load`] writes the result into
//! the process environment; [`parse`] returns it without side effects.
//!
//! # Architecture
//!
//! - **[`parse`]**: Assignment scanner, quote/escape/substitution rules, bare export detection.
//! - **[`env`]**: `Environment` trait, process and in-memory environments, substitution precedence.
//! - **[`engine`]**: Per-buffer resolution, apply mode and first-wins merge mode.
//! - **[`files`]**: Search path resolution and file reading.
//! - **[`options`]**: `LoadOptions` / `ParseOptions` and environment file suites.
//! - **[`config`]**: Command configuration: embedded defaults + user overlay merge.
//! - **[`logging`]**: Terminal logger setup for the command.
//! - **[`autoload`]**: Load-or-exit hook for program start.

/// Load-or-exit hook for program start.
pub mod autoload;
/// Command configuration types, loading, and overlay merge logic.
pub mod config;
/// Per-buffer resolution and multi-source composition.
pub mod engine;
/// Environment access behind a trait.
pub mod env;
/// Crate error type.
pub mod error;
/// Search paths and file reading.
pub mod files;
/// Terminal logger setup.
pub mod logging;
/// Entry point options.
pub mod options;
/// Dotenv grammar: scanner, value resolution, bare exports.
pub mod parse;

pub use engine::Source;
pub use env::{EnvMap, Environment, MapEnv, ProcessEnv};
pub use error::{Error, Result};
pub use options::{LoadOptions, ParseOptions, environment_files};

/// Load the configured files into the process environment.
///
/// Variables that already exist are kept unless `overload` is set. Required
/// keys are checked after every file has been applied.
pub fn load(options: &LoadOptions) -> Result<()> {
    load_with(options, &mut ProcessEnv)
}

/// [`load`] against any environment.
pub fn load_with<E: Environment + ?Sized>(options: &LoadOptions, env: &mut E) -> Result<()> {
    engine::apply_sources(files::read_sources(&options.sources)?, options.overload, env)?;
    engine::check_required_keys(&options.required_keys, env)
}

/// Parse the configured files into a map without touching the environment.
///
/// The first file to define a key wins, and keys already set in the process
/// environment report the environment's value.
pub fn parse(options: &ParseOptions) -> Result<EnvMap> {
    parse_with(options, &ProcessEnv)
}

/// [`parse`] against any environment.
pub fn parse_with<E: Environment + ?Sized>(options: &ParseOptions, env: &E) -> Result<EnvMap> {
    engine::merge_sources(files::read_sources(&options.sources)?, false, env)
}
