#[derive(clap::Parser, Debug)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List registered hosts
    List,
    /// Validate and register a host, then make it active
    Add {
        /// Host url, optionally with `user:pass@` or `#token` credentials
        url: String,
        /// Skip confirmation prompt
        #[clap(long)]
        yes: bool,
    },
    /// Register the host named by a custom-protocol link
    Open {
        /// Arguments as received from the launcher; pass flag-like ones after `--`
        #[clap(required = true)]
        args: Vec<String>,
        /// Skip confirmation prompt
        #[clap(long)]
        yes: bool,
    },
    /// Remove a registered host
    Remove { url: String },
    /// Make a registered host active
    Activate { url: String },
    /// Clear the active host
    Deactivate,
    /// Rename a registered host
    Title { url: String, title: String },
    /// Wipe all stored hosts and settings
    Reset {
        /// Skip confirmation prompt
        #[clap(long)]
        force: bool,
    },
    /// Manage configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set { key: String, value: String },
    /// Get a configuration value
    Get { key: String },
    /// Show all configuration
    Show,
    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[clap(long)]
        force: bool,
    },
}
