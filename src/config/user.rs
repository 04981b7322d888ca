use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::error::{GsiError, Result};

/// User-level defaults loaded from `~/.config/gsi/config.toml`.
///
/// Command-line flags always win over these values.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Default `--author` value.
    #[serde(default)]
    pub author: Option<String>,

    /// Prefix for derived module paths, e.g. `"github.com/acme"`.
    #[serde(default)]
    pub module_prefix: Option<String>,

    /// Capability defaults, keyed by capability name.
    #[serde(default)]
    pub capabilities: BTreeMap<String, bool>,
}

impl UserConfig {
    /// Capability defaults from the file. Unknown names are rejected.
    pub fn capability_overrides(&self) -> Result<Vec<(Capability, bool)>> {
        self.capabilities
            .iter()
            .map(|(name, enabled)| Ok((name.parse::<Capability>()?, *enabled)))
            .collect()
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gsi").join("config.toml"))
}

/// Load user configuration from the XDG config directory.
///
/// Returns `Ok(None)` if the config file does not exist.
pub fn load_user_config() -> Result<Option<UserConfig>> {
    match config_path() {
        Some(path) => load_user_config_from(&path),
        None => Ok(None),
    }
}

pub fn load_user_config_from(path: &Path) -> Result<Option<UserConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| GsiError::Io {
        context: format!("reading user config {}", path.display()),
        source: e,
    })?;

    let config: UserConfig = toml::from_str(&content).map_err(|e| GsiError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(Some(config))
}

/// `"<user.name> <user.email>"` from the global git config, if git knows them.
pub fn default_author() -> Option<String> {
    let name = git_config_value("user.name");
    let email = git_config_value("user.email");
    match (name, email) {
        (Some(n), Some(e)) => Some(format!("{n} {e}")),
        (Some(n), None) => Some(n),
        (None, Some(e)) => Some(e),
        (None, None) => None,
    }
}

fn git_config_value(key: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--global", key])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
author = "Jane Doe jane@example.com"
module_prefix = "github.com/acme"

[capabilities]
ui = true
bmad = false
"#;
        let config: UserConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.author.as_deref(), Some("Jane Doe jane@example.com"));
        assert_eq!(config.module_prefix.as_deref(), Some("github.com/acme"));

        let overrides = config.capability_overrides().unwrap();
        assert!(overrides.contains(&(Capability::Ui, true)));
        assert!(overrides.contains(&(Capability::Bmad, false)));
    }

    #[test]
    fn parse_empty_config() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert!(config.author.is_none());
        assert!(config.capability_overrides().unwrap().is_empty());
    }

    #[test]
    fn unknown_capability_in_file_errors() {
        let config: UserConfig = toml::from_str("[capabilities]\nkubernetes = true").unwrap();
        let err = config.capability_overrides().unwrap_err();
        assert!(matches!(err, GsiError::UnknownCapability { .. }));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_user_config_from(&dir.path().join("config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid [[ toml").unwrap();
        let err = load_user_config_from(&path).unwrap_err();
        assert!(matches!(err, GsiError::ConfigParse { .. }));
    }
}
