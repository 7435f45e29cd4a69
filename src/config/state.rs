// Application state module
// Read-only values shared by every connection task

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::ServeError;

/// Index files tried, in order, when a directory is requested
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Absolute, canonical directory that request paths are resolved against
    pub root: PathBuf,
    pub index_files: Vec<String>,
    pub access_log: bool,
}

impl AppState {
    /// Resolve the configured root (or the current directory) into state.
    pub fn new(config: &Config) -> Result<Self, ServeError> {
        let root = match config.root.as_deref() {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()?,
        };
        Self::with_root(&root, config.logging.access_log)
    }

    /// Build state for an explicit root directory
    pub fn with_root(root: &Path, access_log: bool) -> Result<Self, ServeError> {
        let root = root.canonicalize().map_err(|source| ServeError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ServeError::Root {
                path: root,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a directory",
                ),
            });
        }

        Ok(Self {
            root,
            index_files: INDEX_FILES.iter().map(ToString::to_string).collect(),
            access_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_root_canonicalizes() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a");
        std::fs::create_dir(&nested).unwrap();

        let state = AppState::with_root(&nested.join(".."), false).unwrap();
        assert_eq!(state.root, dir.path().canonicalize().unwrap());
        assert_eq!(state.index_files, vec!["index.html", "index.htm"]);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppState::with_root(&dir.path().join("missing"), true).unwrap_err();
        assert!(matches!(err, ServeError::Root { .. }));
    }

    #[test]
    fn test_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            AppState::with_root(&file, true),
            Err(ServeError::Root { .. })
        ));
    }
}
