//! Thin filesystem predicates used to validate arguments and to filter
//! query results by their live on-disk kind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::errors::{DfymError, Result};

pub fn is_regular(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Entry names of `dir`, excluding `.` and `..`. Names that are not valid
/// UTF-8 cannot be stored and are skipped.
pub fn list_directory(dir: &Path) -> Result<Vec<String>> {
    let io_err = |source: std::io::Error| DfymError::Filesystem {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "skipping non UTF-8 directory entry"),
        }
    }
    Ok(names)
}

/// Absolute path with symlinks and `..` resolved. Fails if `path` does not exist.
pub fn canonicalize(path: &Path) -> Result<String> {
    match fs::canonicalize(path) {
        Ok(p) => path_to_string(p),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DfymError::InvalidInput(format!(
            "path does not exist: {}",
            path.display()
        ))),
        Err(source) => Err(DfymError::Filesystem {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Canonical path when `path` exists, otherwise the path made absolute against
/// the current directory. Lets callers refer to tagged paths that have since
/// disappeared from disk.
pub fn resolve(path: &Path) -> Result<String> {
    if path.exists() {
        return canonicalize(path);
    }
    let absolute = std::path::absolute(path).map_err(|source| DfymError::Filesystem {
        path: path.to_path_buf(),
        source,
    })?;
    path_to_string(absolute)
}

fn path_to_string(path: PathBuf) -> Result<String> {
    path.into_os_string().into_string().map_err(|raw| {
        DfymError::InvalidInput(format!("path is not valid UTF-8: {:?}", raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_kind_predicates() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        assert!(is_regular(&file));
        assert!(!is_directory(&file));
        assert!(is_directory(dir.path()));
        assert!(!is_regular(dir.path()));

        let missing = dir.path().join("missing");
        assert!(!is_regular(&missing));
        assert!(!is_directory(&missing));
    }

    #[test]
    fn test_list_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut names = list_directory(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["a.txt", "sub"]);
    }

    #[test]
    fn test_list_directory_on_file_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        assert!(matches!(
            list_directory(&file),
            Err(DfymError::Filesystem { .. })
        ));
    }

    #[test]
    fn test_canonicalize_resolves_dot_dot() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let roundabout = dir.path().join("sub").join("..");
        let expected = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(
            canonicalize(&roundabout).unwrap(),
            expected.to_str().unwrap()
        );
    }

    #[test]
    fn test_canonicalize_missing_is_invalid_input() {
        let dir = TempDir::new().unwrap();
        let result = canonicalize(&dir.path().join("nope"));
        assert!(matches!(result, Err(DfymError::InvalidInput(_))));
    }

    #[test]
    fn test_resolve_missing_path_is_absolute() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.txt");
        let resolved = resolve(&missing).unwrap();
        assert!(Path::new(&resolved).is_absolute());
        assert!(resolved.ends_with("gone.txt"));
    }
}
