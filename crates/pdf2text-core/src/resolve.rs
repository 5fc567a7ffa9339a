//! Resolution of user-supplied paths against a root folder.

use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};

pub trait PathResolver {
    fn resolve_absolute_path(&self, user_path: &str) -> Result<PathBuf>;
}

/// Resolves relative paths against a fixed root directory.
/// Absolute paths are returned unchanged.
#[derive(Debug, Clone)]
pub struct RootResolver {
    root: PathBuf,
}

impl RootResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for RootResolver {
    fn resolve_absolute_path(&self, user_path: &str) -> Result<PathBuf> {
        if user_path.trim().is_empty() {
            return Err(ExtractError::InvalidPath("empty path".to_string()));
        }

        let path = Path::new(user_path);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.root.join(path))
        }
    }
}
