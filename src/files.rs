//! Resolve search paths and file names into sources.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::engine::Source;
use crate::error::{Error, Result};
use crate::options::SourceOptions;

/// Build the ordered file list: for each search path, each file name.
///
/// Every path has `~` expanded and is made absolute. A path that does not
/// exist or is not a directory fails the whole call.
pub fn source_paths(paths: &[PathBuf], files: &[String]) -> Result<Vec<PathBuf>> {
    let mut list = Vec::with_capacity(paths.len() * files.len());
    for path in paths {
        let dir = search_dir(path)?;
        list.extend(files.iter().map(|file| dir.join(file)));
    }
    Ok(list)
}

fn search_dir(path: &Path) -> Result<PathBuf> {
    let invalid = || Error::InvalidSearchPath(path.to_path_buf());
    let expanded = match path.to_str() {
        Some(text) => PathBuf::from(shellexpand::tilde(text).as_ref()),
        None => path.to_path_buf(),
    };
    let dir = std::path::absolute(&expanded).map_err(|_| invalid())?;
    if !dir.is_dir() {
        return Err(invalid());
    }
    Ok(dir)
}

/// Every file named by `options`, read lazily in search order.
///
/// Search paths are checked up front. Each file is only read when the
/// iterator reaches it, so a failure surfaces after earlier files were
/// handed out.
pub fn read_sources(options: &SourceOptions) -> Result<impl Iterator<Item = Result<Source>>> {
    let must_exist = options.all_files_required;
    let paths = source_paths(&options.paths, &options.files)?;
    Ok(paths
        .into_iter()
        .map(move |path| read_source(&path, must_exist)))
}

/// Read one file.
///
/// A missing file is an empty source unless `must_exist` is set. A directory
/// in place of the file is always an empty source.
pub fn read_source(path: &Path, must_exist: bool) -> Result<Source> {
    let name = path.display().to_string();
    match std::fs::metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if must_exist {
                return Err(Error::SourceNotFound(path.to_path_buf()));
            }
            log::debug!("skipping missing file {name}");
            return Ok(Source::empty(name));
        }
        Ok(meta) if meta.is_dir() => {
            log::debug!("skipping directory {name}");
            return Ok(Source::empty(name));
        }
        _ => {}
    }

    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Source::new(name, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn path_major_order() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let files = vec![".env.local".to_string(), ".env".to_string()];
        let list = source_paths(&paths, &files).unwrap();
        assert_eq!(
            list,
            vec![
                a.path().join(".env.local"),
                a.path().join(".env"),
                b.path().join(".env.local"),
                b.path().join(".env"),
            ]
        );
    }

    #[test]
    fn missing_search_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = source_paths(&[missing.clone()], &[".env".into()]).unwrap_err();
        assert!(matches!(err, Error::InvalidSearchPath(p) if p == missing));
    }

    #[test]
    fn file_as_search_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(".env");
        std::fs::write(&file, "A=1").unwrap();
        assert!(source_paths(&[file], &[".env".into()]).is_err());
    }

    #[test]
    fn empty_file_list_is_fine() {
        let dir = TempDir::new().unwrap();
        let list = source_paths(&[dir.path().to_path_buf()], &[]).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn missing_file_is_empty_unless_required() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.does_not_exist");
        assert_eq!(read_source(&path, false).unwrap().content, "");
        assert!(matches!(
            read_source(&path, true),
            Err(Error::SourceNotFound(_))
        ));
    }

    #[test]
    fn directory_is_empty_even_when_required() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".env")).unwrap();
        let source = read_source(&dir.path().join(".env"), true).unwrap();
        assert!(source.content.is_empty());
    }

    #[test]
    fn reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "DOTENV=true\n").unwrap();
        let source = read_source(&path, true).unwrap();
        assert_eq!(source.content, "DOTENV=true\n");
        assert_eq!(source.name, path.display().to_string());
    }
}
