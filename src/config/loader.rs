// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.
//!
//! Handles loading and saving the per-user config file in JSON or YAML.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

use super::types::ConfigFile;

/// Config directory name inside the platform config directory.
pub const CONFIG_DIR_NAME: &str = "straico-cli";

/// Config file names to search for (in order).
pub const CONFIG_FILES: &[&str] = &["config.json", "config.yaml", "config.yml"];

/// Get the config directory path.
///
/// `~/.config/straico-cli` on Linux, `~/Library/Application Support/straico-cli`
/// on macOS, `%APPDATA%\straico-cli` on Windows.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME))
}

/// Find the first existing config file in `dir`.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Path config is written to: the existing file, or `config.json`.
pub fn config_write_path(dir: &Path) -> PathBuf {
    find_config_file(dir).unwrap_or_else(|| dir.join(CONFIG_FILES[0]))
}

/// Load the config file from `dir`, if one exists.
pub fn load_config_from(dir: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    match find_config_file(dir) {
        Some(path) => {
            debug!(path = %path.display(), "Loading config file");
            load_config_file(&path).map(Some)
        }
        None => Ok(None),
    }
}

/// Load the user config file from the platform config directory.
pub fn load_user_config() -> Result<Option<ConfigFile>, ConfigError> {
    match get_config_dir() {
        Some(dir) => load_config_from(&dir),
        None => Ok(None),
    }
}

/// Load a configuration file (JSON or YAML).
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        _ => serde_json::from_str(&content).map_err(ConfigError::from),
    }
}

/// Save configuration to `path`, creating the parent directory.
///
/// The file holds a credential, so on Unix it is made readable by the owner only.
pub fn save_config_file(path: &Path, config: &ConfigFile) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let content = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::to_string(config)?,
        _ => serde_json::to_string_pretty(config)?,
    };
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    debug!(path = %path.display(), "Saved config file");
    Ok(())
}

/// Load the config in `dir`, apply `update`, and write it back.
///
/// Fields `update` does not touch are preserved.
pub fn update_config_in(
    dir: &Path,
    update: impl FnOnce(&mut ConfigFile),
) -> Result<PathBuf, ConfigError> {
    let path = config_write_path(dir);
    let mut config = if path.exists() {
        load_config_file(&path)?
    } else {
        ConfigFile::default()
    };
    update(&mut config);
    save_config_file(&path, &config)?;
    Ok(path)
}

/// [`update_config_in`] on the platform config directory.
pub fn update_user_config(update: impl FnOnce(&mut ConfigFile)) -> Result<PathBuf, ConfigError> {
    let dir = get_config_dir().ok_or(ConfigError::NoConfigDir)?;
    update_config_in(&dir, update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_files_order() {
        assert_eq!(CONFIG_FILES.len(), 3);
        assert_eq!(CONFIG_FILES[0], "config.json");
    }

    #[test]
    fn test_config_dir_name() {
        if let Some(dir) = get_config_dir() {
            assert!(dir.ends_with(CONFIG_DIR_NAME));
        }
    }

    #[test]
    fn test_load_config_not_found() {
        let temp = TempDir::new().unwrap();
        let result = load_config_from(temp.path());
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_load_config_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.json"),
            r#"{"key": "abc", "model": "openai/gpt-4o"}"#,
        )
        .unwrap();

        let config = load_config_from(temp.path()).unwrap().unwrap();
        assert_eq!(config.key, Some("abc".to_string()));
        assert_eq!(config.model, Some("openai/gpt-4o".to_string()));
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.yaml"), "model: openai/gpt-4o\n").unwrap();

        let config = load_config_from(temp.path()).unwrap().unwrap();
        assert_eq!(config.model, Some("openai/gpt-4o".to_string()));
    }

    #[test]
    fn test_json_takes_precedence_over_yaml() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.json"), r#"{"model": "from-json"}"#).unwrap();
        std::fs::write(temp.path().join("config.yaml"), "model: from-yaml\n").unwrap();

        let config = load_config_from(temp.path()).unwrap().unwrap();
        assert_eq!(config.model, Some("from-json".to_string()));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.json"), "{ not valid").unwrap();

        let result = load_config_from(temp.path());
        assert!(matches!(result, Err(ConfigError::JsonError(_))));
    }

    #[test]
    fn test_update_preserves_other_fields() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.json"),
            r#"{"key": "old-key", "model": "keep-me"}"#,
        )
        .unwrap();

        let path = update_config_in(temp.path(), |c| c.key = Some("new-key".to_string())).unwrap();
        assert_eq!(path, temp.path().join("config.json"));

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.key, Some("new-key".to_string()));
        assert_eq!(config.model, Some("keep-me".to_string()));
    }

    #[test]
    fn test_update_creates_missing_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("straico-cli");

        let path = update_config_in(&dir, |c| c.model = Some("m".to_string())).unwrap();
        assert!(path.exists());
        assert_eq!(load_config_file(&path).unwrap().model, Some("m".to_string()));
    }

    #[test]
    fn test_update_keeps_yaml_format() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.yml"), "key: k\n").unwrap();

        let path = update_config_in(temp.path(), |c| c.model = Some("m".to_string())).unwrap();
        assert_eq!(path, temp.path().join("config.yml"));
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("model: m"));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_config_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        save_config_file(&path, &ConfigFile::default()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
