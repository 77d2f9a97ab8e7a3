//! Terminal-side implementations of the registry's collaborators.

use std::io::{self, Write};
use std::path::PathBuf;

use harbor_registry::{AppLifecycle, Dialogs, HostMap, HostSync, RegistryError};
use tracing::{debug, warn};

pub struct TerminalDialogs {
    assume_yes: bool,
}

impl TerminalDialogs {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Dialogs for TerminalDialogs {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} (y/N): ", message);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(_) => input.trim().to_lowercase().starts_with('y'),
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn show_error(&self, title: &str, message: &str) {
        eprintln!("❌ {}: {}", title, message);
    }
}

/// The CLI runs alone, so host changes are only logged.
pub struct LoggingSync;

impl HostSync for LoggingSync {
    fn notify(&self, hosts: &HostMap) {
        debug!("Host map now holds {} hosts", hosts.len());
    }
}

/// Deletes the storage file; the next invocation starts fresh.
pub struct StorageReset {
    storage_path: PathBuf,
}

impl StorageReset {
    pub fn new(storage_path: PathBuf) -> Self {
        Self { storage_path }
    }
}

impl AppLifecycle for StorageReset {
    fn reset_app_data(&self) -> harbor_registry::Result<()> {
        if !self.storage_path.exists() {
            return Ok(());
        }

        std::fs::remove_file(&self.storage_path).map_err(|source| RegistryError::Storage {
            operation: "remove".to_string(),
            path: self.storage_path.clone(),
            source,
        })
    }
}
