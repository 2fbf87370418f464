//! Options for the two entry points.
//!
//! [`LoadOptions`] carries everything [`crate::load`] understands.
//! [`ParseOptions`] has no overload flag and no required keys, so neither can
//! be requested from [`crate::parse`].

use std::path::{Path, PathBuf};

pub const DEFAULT_FILE: &str = ".env";
pub const DEFAULT_PATH: &str = ".";

/// Files for an environment, most specific first:
/// `.env.<env>.local`, `.env.local`, `.env.<env>`, `.env`.
///
/// `.env.local` is left out for the `test` environment so local overrides do
/// not leak into test runs.
pub fn environment_files(environment: &str) -> Vec<String> {
    let mut files = vec![format!(".env.{environment}.local")];
    if environment != "test" {
        files.push(".env.local".to_string());
    }
    files.push(format!(".env.{environment}"));
    files.push(DEFAULT_FILE.to_string());
    files
}

/// Where to look and what to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// File names, read in order within each path.
    pub files: Vec<String>,
    /// Directories searched in order.
    pub paths: Vec<PathBuf>,
    /// Turn a missing file into an error instead of skipping it.
    pub all_files_required: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            files: vec![DEFAULT_FILE.to_string()],
            paths: vec![PathBuf::from(DEFAULT_PATH)],
            all_files_required: false,
        }
    }
}

impl SourceOptions {
    fn set_files<I, S>(&mut self, files: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.files = files.into_iter().map(|f| f.as_ref().to_string()).collect();
    }

    fn set_paths<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.paths = paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
    }
}

/// Options for [`crate::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub sources: SourceOptions,
    /// Let file values replace variables already in the environment.
    pub overload: bool,
    /// Keys that must be present once every file has been applied.
    pub required_keys: Vec<String>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sources.set_files(files);
        self
    }

    /// Replace the file list with [`environment_files`].
    pub fn environment(mut self, environment: &str) -> Self {
        self.sources.files = environment_files(environment);
        self
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.sources.set_paths(paths);
        self
    }

    pub fn all_files_required(mut self) -> Self {
        self.sources.all_files_required = true;
        self
    }

    pub fn overload(mut self) -> Self {
        self.overload = true;
        self
    }

    pub fn required_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.required_keys = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        self
    }
}

/// Options for [`crate::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub sources: SourceOptions,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sources.set_files(files);
        self
    }

    /// Replace the file list with [`environment_files`].
    pub fn environment(mut self, environment: &str) -> Self {
        self.sources.files = environment_files(environment);
        self
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.sources.set_paths(paths);
        self
    }

    pub fn all_files_required(mut self) -> Self {
        self.sources.all_files_required = true;
        self
    }
}
