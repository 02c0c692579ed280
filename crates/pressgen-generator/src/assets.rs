//! Static asset copying.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

/// Asset processing errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset name escaping the source directory.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Copies the site's static files into the output directory.
#[derive(Debug, Default)]
pub struct AssetProcessor;

impl AssetProcessor {
    /// Create a new asset processor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Copy each named file from `source_root` to `dest`.
    ///
    /// Files that do not exist are skipped. Returns the names actually copied.
    pub fn copy_assets(
        &self,
        source_root: &Path,
        dest: &Path,
        names: &[String],
    ) -> Result<Vec<String>> {
        let mut copied = Vec::with_capacity(names.len());

        for name in names {
            let relative = Path::new(name);
            if relative.is_absolute()
                || relative
                    .components()
                    .any(|c| matches!(c, std::path::Component::ParentDir))
            {
                return Err(AssetError::InvalidPath(relative.to_path_buf()));
            }

            let source = source_root.join(relative);
            if !source.is_file() {
                debug!(asset = %name, "asset not found, skipping");
                continue;
            }

            let target = dest.join(relative);
            Self::copy_file(&source, &target)?;
            debug!(src = %source.display(), dest = %target.display(), "copied asset");
            copied.push(name.clone());
        }

        info!(count = copied.len(), "assets copied");
        Ok(copied)
    }

    /// Copy a single file, creating parent directories.
    pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, dest)?;
        Ok(())
    }

    /// Create a directory if it doesn't exist.
    pub fn ensure_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }
}
