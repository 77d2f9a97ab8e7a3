//! Host registry command handlers.

use eyre::Result;
use harbor_registry::{
    ActiveSelection, Admission, HostRegistry, Validator, handle_deep_link, reset_app_data,
    show_host_confirmation,
};
use tracing::warn;

use crate::cli::Commands;
use crate::config::Config;
use crate::terminal::{StorageReset, TerminalDialogs};

pub async fn handle_host_command(
    cmd: Commands,
    registry: &mut HostRegistry,
    validator: &Validator,
    config: &Config,
) -> Result<()> {
    match cmd {
        Commands::List => handle_list_hosts(registry),
        Commands::Add { url, yes } => handle_add_host(url, yes, registry, validator).await,
        Commands::Open { args, yes } => handle_open_link(args, yes, registry, validator).await,
        Commands::Remove { url } => handle_remove_host(url, registry),
        Commands::Activate { url } => handle_activate_host(url, registry),
        Commands::Deactivate => {
            registry.clear_active()?;
            println!("✅ No host is active");
            Ok(())
        }
        Commands::Title { url, title } => handle_set_title(url, title, registry),
        Commands::Reset { force } => handle_reset(force, config),
        Commands::Config { .. } => Err(eyre::eyre!("config commands do not use the registry")),
    }
}

fn handle_list_hosts(registry: &HostRegistry) -> Result<()> {
    if registry.hosts().is_empty() {
        println!("📦 No hosts registered");
        println!("💡 Use 'harbor add <url>' to add one");
        return Ok(());
    }

    println!("📦 Registered hosts ({}):", registry.hosts().len());
    for host in registry.iter() {
        let marker = if registry.active() == Some(host.url.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, host.title);
        if host.title != host.url {
            println!("     {}", host.url);
        }
        if host.has_credentials() {
            println!("     🔑 as {}", host.username.as_deref().unwrap_or_default());
        }
    }
    Ok(())
}

async fn handle_add_host(
    url: String,
    yes: bool,
    registry: &mut HostRegistry,
    validator: &Validator,
) -> Result<()> {
    let dialogs = TerminalDialogs::new(yes);
    let admission = show_host_confirmation(registry, validator, &dialogs, &url).await?;
    report_admission(&admission);
    Ok(())
}

async fn handle_open_link(
    args: Vec<String>,
    yes: bool,
    registry: &mut HostRegistry,
    validator: &Validator,
) -> Result<()> {
    let dialogs = TerminalDialogs::new(yes);
    match handle_deep_link(registry, validator, &dialogs, &args).await? {
        Some(admission) => report_admission(&admission),
        None => {
            println!(
                "❌ No '{}://' link found in arguments",
                registry.settings().protocol_scheme
            );
        }
    }
    Ok(())
}

fn report_admission(admission: &Admission) {
    match admission {
        Admission::Admitted(url) => println!("✅ Added and activated {}", url),
        Admission::AlreadyRegistered(url) => println!("✅ {} already registered, now active", url),
        Admission::Declined => println!("❌ Cancelled"),
    }
}

fn handle_remove_host(url: String, registry: &mut HostRegistry) -> Result<()> {
    let key = registry.require(&url)?.url.clone();
    registry.remove_host(&key)?;
    println!("✅ Removed {}", key);
    Ok(())
}

fn handle_activate_host(url: String, registry: &mut HostRegistry) -> Result<()> {
    match registry.set_active(&url)? {
        ActiveSelection::Selected(url) => println!("✅ Active host: {}", url),
        ActiveSelection::Fallback {
            requested,
            selected,
        } => {
            warn!("Host '{}' is not registered", requested);
            println!("⚠️  '{}' is not registered, active host: {}", requested, selected);
        }
        ActiveSelection::Empty => println!("📦 No hosts registered"),
    }
    Ok(())
}

fn handle_set_title(url: String, title: String, registry: &mut HostRegistry) -> Result<()> {
    registry.require(&url)?;
    registry.set_host_title(&url, &title)?;

    let host = registry.require(&url)?;
    println!("✅ {} is now titled '{}'", host.url, host.title);
    Ok(())
}

fn handle_reset(force: bool, config: &Config) -> Result<()> {
    let dialogs = TerminalDialogs::new(force);
    let lifecycle = StorageReset::new(config.storage_path());

    if reset_app_data(&dialogs, &lifecycle)? {
        println!("✅ App data reset; start harbor again to begin fresh");
    } else {
        println!("❌ Cancelled");
    }
    Ok(())
}
