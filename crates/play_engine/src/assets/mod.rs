//! Asset path resolution
//!
//! Maps logical asset names (`"scenes/intro"`, `"fonts/Roboto-Regular.ttf"`)
//! to on-disk paths under a data directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset does not exist under the data directory
    #[error("Asset not found: {name} (looked in {path})")]
    NotFound {
        /// Logical asset name
        name: String,
        /// Resolved path that was checked
        path: PathBuf,
    },
}

/// Resolves logical asset names against a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    /// Create a resolver rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory all names are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for a logical asset name, whether or not it exists
    pub fn data_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Path for a logical asset name, failing if nothing is there
    pub fn resolve(&self, name: &str) -> Result<PathBuf, AssetError> {
        let path = self.data_path(name);
        if path.exists() {
            Ok(path)
        } else {
            Err(AssetError::NotFound {
                name: name.to_string(),
                path,
            })
        }
    }
}
