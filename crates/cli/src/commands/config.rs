//! `harbor config` handlers.

use eyre::Result;
use harbor_registry::Dialogs;

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::terminal::TerminalDialogs;

/// Keys whose effective value is filled in at runtime when left unset.
const RESOLVED_KEYS: &[&str] = &["registry.user_data_dir", "registry.install_dir"];

pub async fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load().await?;
            config.set_value(&key, &value).inspect_err(|e| {
                eprintln!("❌ Failed to set {}: {}", key, e);
            })?;
            config.save().await?;
            println!("✅ {} = {}", key, config.get_value(&key)?);
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = Config::load().await?;
            println!("{}: {}", key, describe_value(&config, &key)?);
            Ok(())
        }
        ConfigCommands::Show => {
            let config = Config::load().await?;
            println!("{}", config.show_all());
            println!("\nConfig file: {}", Config::get_config_path().display());
            println!("Seed files searched:");
            for path in config.registry_settings().seed_file_candidates() {
                let marker = if path.exists() { "✓" } else { "·" };
                println!("  {} {}", marker, path.display());
            }
            Ok(())
        }
        ConfigCommands::Reset { force } => {
            let dialogs = TerminalDialogs::new(force);
            if !dialogs.confirm("Reset all configuration to defaults?") {
                println!("❌ Cancelled");
                return Ok(());
            }
            Config::reset().await?;
            println!("✅ Configuration reset to defaults");
            Ok(())
        }
    }
}

/// The stored value, or the runtime default for unset directory keys.
fn describe_value(config: &Config, key: &str) -> Result<String> {
    let value = config.get_value(key)?;
    if !value.is_empty() || !RESOLVED_KEYS.contains(&key) {
        return Ok(value);
    }

    let settings = config.registry_settings();
    let resolved = match key {
        "registry.user_data_dir" => settings.user_data_dir,
        _ => settings.install_dir,
    };
    Ok(match resolved {
        Some(path) => format!("(not set, using {})", path.display()),
        None => "(not set)".to_string(),
    })
}
