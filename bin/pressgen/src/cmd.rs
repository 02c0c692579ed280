//! CLI commands.

pub mod build;
pub mod check;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use pressgen_core::Config;

/// Resolve the configuration file: as given, else under the site root.
fn resolve_config_path(config_path: &Path, root: &Path) -> PathBuf {
    if config_path.exists() || config_path.is_absolute() {
        return config_path.to_path_buf();
    }
    root.join(config_path)
}

/// Load the site configuration, using defaults when no file exists.
pub fn load_config(config_path: &Path, root: &Path) -> Result<Config> {
    let path = resolve_config_path(config_path, root);
    if !path.exists() {
        tracing::info!(path = %path.display(), "no configuration file, using defaults");
    }

    Config::load_with_env(&path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_path_falls_back_to_root() {
        let root = TempDir::new().unwrap();
        std::fs::write(
            root.path().join("pressgen.toml"),
            "[site]\nname = \"Root Site\"\n",
        )
        .unwrap();

        let config = load_config(Path::new("pressgen.toml"), root.path()).unwrap();
        assert_eq!(config.site.name, "Root Site");
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let root = TempDir::new().unwrap();

        let config = load_config(Path::new("absent-pressgen.toml"), root.path()).unwrap();
        assert_eq!(config.site.name, "FORUMID");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("bad.toml");
        std::fs::write(&path, "[site]\nname = \"\"\n").unwrap();

        let err = load_config(&path, root.path()).unwrap_err();
        assert!(format!("{err:?}").contains("name cannot be empty"));
    }
}
