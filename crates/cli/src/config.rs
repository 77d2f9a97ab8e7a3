use directories::ProjectDirs;
use eyre::Result;
use harbor_registry::RegistrySettings;
use harbor_registry::parser::is_valid_host_url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub registry: RegistrySettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: get_default_data_dir()
                .join("storage.json")
                .to_string_lossy()
                .to_string(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> PathBuf {
        get_default_config_dir().join("config.json")
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()).await
    }

    /// Load from `config_path`, writing defaults there if it does not exist.
    pub async fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(config_path).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(config_path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub async fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()).await
    }

    pub async fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    /// Registry settings with unset seed-file directories filled in.
    pub fn registry_settings(&self) -> RegistrySettings {
        let mut settings = self.registry.clone();
        if settings.user_data_dir.is_none() {
            settings.user_data_dir = Some(get_default_data_dir());
        }
        if settings.install_dir.is_none() {
            settings.install_dir = get_install_dir();
        }
        settings
    }

    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.path)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["storage", "path"] => {
                self.storage.path = value.to_string();
            }
            ["registry", "default_title"] => {
                self.registry.default_title = value.to_string();
            }
            ["registry", "canonical_host"] => {
                if !is_valid_host_url(value) {
                    return Err(eyre::eyre!("Canonical host must be an http(s) url: {}", value));
                }
                self.registry.canonical_host = value.trim_end_matches('/').to_string();
            }
            ["registry", "protocol_scheme"] => {
                let scheme = value.trim_end_matches("://");
                if scheme.is_empty()
                    || !scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                {
                    return Err(eyre::eyre!("Invalid protocol scheme: {}", value));
                }
                self.registry.protocol_scheme = scheme.to_string();
            }
            ["registry", "validation_timeout_ms"] => {
                self.registry.validation_timeout_ms = value
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| *ms > 0)
                    .ok_or_else(|| eyre::eyre!("Invalid timeout value: {}", value))?;
            }
            ["registry", "seed_file_name"] => {
                if value.is_empty() || value.contains(['/', '\\']) {
                    return Err(eyre::eyre!("Seed file name must be a bare file name: {}", value));
                }
                self.registry.seed_file_name = value.to_string();
            }
            ["registry", "user_data_dir"] => {
                self.registry.user_data_dir = optional_path(value);
            }
            ["registry", "install_dir"] => {
                self.registry.install_dir = optional_path(value);
            }
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        let value = match parts.as_slice() {
            ["storage", "path"] => self.storage.path.clone(),
            ["registry", "default_title"] => self.registry.default_title.clone(),
            ["registry", "canonical_host"] => self.registry.canonical_host.clone(),
            ["registry", "protocol_scheme"] => self.registry.protocol_scheme.clone(),
            ["registry", "validation_timeout_ms"] => {
                self.registry.validation_timeout_ms.to_string()
            }
            ["registry", "seed_file_name"] => self.registry.seed_file_name.clone(),
            ["registry", "user_data_dir"] => display_path(&self.registry.user_data_dir),
            ["registry", "install_dir"] => display_path(&self.registry.install_dir),
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        };

        Ok(value)
    }

    pub fn show_all(&self) -> String {
        format!(
            "Configuration:\n\
             Storage:\n\
             └─ path: {}\n\
             Registry:\n\
             ├─ default_title: {}\n\
             ├─ canonical_host: {}\n\
             ├─ protocol_scheme: {}\n\
             ├─ validation_timeout_ms: {}\n\
             ├─ seed_file_name: {}\n\
             ├─ user_data_dir: {}\n\
             └─ install_dir: {}",
            self.storage.path,
            self.registry.default_title,
            self.registry.canonical_host,
            self.registry.protocol_scheme,
            self.registry.validation_timeout_ms,
            self.registry.seed_file_name,
            or_not_set(display_path(&self.registry.user_data_dir)),
            or_not_set(display_path(&self.registry.install_dir)),
        )
    }

    pub async fn reset() -> Result<Self> {
        let config = Self::default();
        config.save().await?;
        Ok(config)
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn or_not_set(value: String) -> String {
    if value.is_empty() {
        "(not set)".to_string()
    } else {
        value
    }
}

/// Get the default configuration directory
fn get_default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "harbor", "harbor") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to current directory if we can't determine project dirs
        PathBuf::from(".harbor").join("config")
    }
}

/// Get the default data directory
pub fn get_default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "harbor", "harbor") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".harbor").join("data")
    }
}

/// Directory holding the running executable
fn get_install_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_creates_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = Config::load_from(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(config.registry, RegistrySettings::default());
    }

    #[tokio::test]
    async fn test_values_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = Config::default();
        config.set_value("registry.validation_timeout_ms", "250").unwrap();
        config.set_value("registry.install_dir", "/opt/harbor").unwrap();
        config.save_to(&path).await.unwrap();

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded.get_value("registry.validation_timeout_ms").unwrap(), "250");
        assert_eq!(loaded.get_value("registry.install_dir").unwrap(), "/opt/harbor");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(config.set_value("registry.validation_timeout_ms", "soon").is_err());
        assert!(config.set_value("registry.validation_timeout_ms", "0").is_err());
        assert!(config.set_value("registry.canonical_host", "open.rocket.chat").is_err());
        assert!(config.set_value("registry.protocol_scheme", "rocket chat").is_err());
        assert!(config.set_value("registry.seed_file_name", "../servers.json").is_err());
        assert_eq!(config.registry, RegistrySettings::default());
        assert!(config.set_value("nope", "x").is_err());
        assert!(config.get_value("registry").is_err());
    }

    #[test]
    fn test_registry_values_are_normalised() {
        let mut config = Config::default();
        config.set_value("registry.canonical_host", "https://chat.acme.com/").unwrap();
        config.set_value("registry.protocol_scheme", "acmechat://").unwrap();

        assert_eq!(config.registry.canonical_host, "https://chat.acme.com");
        assert_eq!(config.registry.protocol_scheme, "acmechat");
    }

    #[test]
    fn test_registry_settings_fill_seed_dirs() {
        let config = Config::default();
        let settings = config.registry_settings();
        assert_eq!(settings.user_data_dir, Some(get_default_data_dir()));

        let mut config = Config::default();
        config.set_value("registry.user_data_dir", "/srv/seed").unwrap();
        assert_eq!(
            config.registry_settings().user_data_dir,
            Some(PathBuf::from("/srv/seed"))
        );
    }
}
