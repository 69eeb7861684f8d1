//! Local app settings: center name and the dashboard access password.
//!
//! Settings never touch the backend. They persist as a small JSON file in the
//! platform config directory, and the password is stored as a SHA-256 digest
//! rather than plain text. This is an access gate for a single-operator
//! dashboard, not an account system.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CENTER_NAME: &str = "My Coaching Center";
const DEFAULT_PASSWORD: &str = "admin123";
const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] serde_json::Error),
}

fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub center_name: String,
    password_hash: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            center_name: DEFAULT_CENTER_NAME.to_string(),
            password_hash: hash_password(DEFAULT_PASSWORD),
        }
    }
}

impl Settings {
    pub fn verify_password(&self, candidate: &str) -> bool {
        hash_password(candidate) == self.password_hash
    }

    /// Change the access password; requires the current one.
    pub fn change_password(&mut self, current: &str, new: &str) -> Result<(), SettingsError> {
        if !self.verify_password(current) {
            return Err(SettingsError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
        if new.len() < MIN_PASSWORD_LEN {
            return Err(SettingsError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        self.password_hash = hash_password(new);
        Ok(())
    }

    pub fn set_center_name(&mut self, name: &str) -> Result<(), SettingsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SettingsError::Validation(
                "Center name is required".to_string(),
            ));
        }
        self.center_name = name.to_string();
        Ok(())
    }
}

/// Settings persistence at a fixed file path.
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Platform config location, e.g. `~/.config/finflow/settings.json`.
    pub fn default_location() -> Option<Self> {
        let dirs = ProjectDirs::from("", "", "finflow")?;
        Some(Self {
            path: dirs.config_dir().join("settings.json"),
        })
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load settings, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        info!("settings saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_password_verifies() {
        let settings = Settings::default();
        assert!(settings.verify_password("admin123"));
        assert!(!settings.verify_password("admin124"));
        assert!(!settings.verify_password(""));
    }

    #[test]
    fn test_change_password_requires_current() {
        let mut settings = Settings::default();
        let result = settings.change_password("wrong", "newpass");
        assert!(matches!(result, Err(SettingsError::Validation(_))));
        assert!(settings.verify_password("admin123"));
    }

    #[test]
    fn test_change_password_enforces_minimum_length() {
        let mut settings = Settings::default();
        let result = settings.change_password("admin123", "abc");
        assert!(matches!(result, Err(SettingsError::Validation(_))));

        settings.change_password("admin123", "abcd").unwrap();
        assert!(settings.verify_password("abcd"));
        assert!(!settings.verify_password("admin123"));
    }

    #[test]
    fn test_center_name_must_not_be_blank() {
        let mut settings = Settings::default();
        assert_eq!(settings.center_name, "My Coaching Center");

        assert!(settings.set_center_name("   ").is_err());
        settings.set_center_name("  Excel Academy  ").unwrap();
        assert_eq!(settings.center_name, "Excel Academy");
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = SettingsFile::at(dir.path().join("settings.json"));

        let settings = file.load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = SettingsFile::at(dir.path().join("nested").join("settings.json"));

        let mut settings = Settings::default();
        settings.set_center_name("Excel Academy").unwrap();
        settings.change_password("admin123", "s3cret").unwrap();
        file.save(&settings).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded.center_name, "Excel Academy");
        assert!(loaded.verify_password("s3cret"));
    }

    #[test]
    fn test_stored_file_never_contains_plain_password() {
        let dir = tempfile::tempdir().unwrap();
        let file = SettingsFile::at(dir.path().join("settings.json"));

        let mut settings = Settings::default();
        settings.change_password("admin123", "hunter22").unwrap();
        file.save(&settings).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(!raw.contains("hunter22"));
    }
}
