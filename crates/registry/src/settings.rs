use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunables shared by the registry, the migrator and the validator.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    /// The product's default display name
    #[serde(default = "default_title")]
    pub default_title: String,

    /// The hosted instance whose title is never disambiguated
    #[serde(default = "default_canonical_host")]
    pub canonical_host: String,

    /// Custom-protocol scheme accepted by deep links, without `://`
    #[serde(default = "default_protocol_scheme")]
    pub protocol_scheme: String,

    #[serde(default = "default_validation_timeout_ms")]
    pub validation_timeout_ms: u64,

    /// Name of the seed file consulted when storage is empty
    #[serde(default = "default_seed_file_name")]
    pub seed_file_name: String,

    /// Searched first for the seed file
    #[serde(default)]
    pub user_data_dir: Option<PathBuf>,

    /// Searched second for the seed file
    #[serde(default)]
    pub install_dir: Option<PathBuf>,
}

fn default_title() -> String {
    "Rocket.Chat".to_string()
}

fn default_canonical_host() -> String {
    "https://open.rocket.chat".to_string()
}

fn default_protocol_scheme() -> String {
    "rocketchat".to_string()
}

fn default_validation_timeout_ms() -> u64 {
    5000
}

fn default_seed_file_name() -> String {
    "servers.json".to_string()
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            canonical_host: default_canonical_host(),
            protocol_scheme: default_protocol_scheme(),
            validation_timeout_ms: default_validation_timeout_ms(),
            seed_file_name: default_seed_file_name(),
            user_data_dir: None,
            install_dir: None,
        }
    }
}

impl RegistrySettings {
    /// Seed-file candidates in search order.
    pub fn seed_file_candidates(&self) -> Vec<PathBuf> {
        [&self.user_data_dir, &self.install_dir]
            .into_iter()
            .flatten()
            .map(|dir| dir.join(&self.seed_file_name))
            .collect()
    }

    /// The title actually stored when `title` is requested for `url`.
    ///
    /// The product's default name is suffixed with the url so several
    /// self-hosted servers stay distinguishable.
    pub fn display_title(&self, url: &str, title: &str) -> String {
        if title == self.default_title && url != self.canonical_host {
            format!("{} - {}", title, url)
        } else {
            title.to_string()
        }
    }
}
