//! User-driven flows layered over the registry.

use tracing::{info, warn};

use crate::error::Result;
use crate::ports::{AppLifecycle, Dialogs};
use crate::protocol;
use crate::registry::HostRegistry;
use crate::state::AddOutcome;
use crate::validator::Validator;

pub const INVALID_HOST_TITLE: &str = "Invalid Host";

/// How a confirmation flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The host was registered before; it is now active
    AlreadyRegistered(String),
    /// The user answered no
    Declined,
    /// Validated, registered and activated
    Admitted(String),
}

/// Ask the user to add `host_url`, then validate, register and activate it.
///
/// An already registered host is activated without asking. Validation or
/// registration failures are shown through `dialogs` and returned.
pub async fn show_host_confirmation(
    registry: &mut HostRegistry,
    validator: &Validator,
    dialogs: &dyn Dialogs,
    host_url: &str,
) -> Result<Admission> {
    if registry.host_exists(host_url) {
        let selection = registry.set_active(host_url)?;
        let url = selection.selected().unwrap_or(host_url).to_string();
        return Ok(Admission::AlreadyRegistered(url));
    }

    let message = format!("Add new server {}?", host_url);
    if !dialogs.confirm(&message) {
        info!("User declined to add {}", host_url);
        return Ok(Admission::Declined);
    }

    match admit(registry, validator, host_url).await {
        Ok(url) => Ok(Admission::Admitted(url)),
        Err(e) => {
            warn!("Could not add host {}: {}", host_url, e);
            dialogs.show_error(
                INVALID_HOST_TITLE,
                &format!("The host {} could not be validated", host_url),
            );
            Err(e)
        }
    }
}

async fn admit(registry: &mut HostRegistry, validator: &Validator, host_url: &str) -> Result<String> {
    validator.validate(host_url).await?;

    let url = match registry.add_host(host_url)? {
        AddOutcome::Added(url) | AddOutcome::AlreadyExists(url) => url,
    };
    registry.set_active(&url)?;
    Ok(url)
}

/// Run the confirmation flow for a custom-protocol invocation.
///
/// Returns `Ok(None)` when no argument carries the registry's scheme.
pub async fn handle_deep_link<I, S>(
    registry: &mut HostRegistry,
    validator: &Validator,
    dialogs: &dyn Dialogs,
    args: I,
) -> Result<Option<Admission>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let scheme = registry.settings().protocol_scheme.clone();
    let Some(host_url) = protocol::extract_deep_link(args, &scheme) else {
        return Ok(None);
    };

    show_host_confirmation(registry, validator, dialogs, &host_url)
        .await
        .map(Some)
}

/// Ask for confirmation, then hand the wipe-and-restart to `lifecycle`.
///
/// Returns whether the reset was requested.
pub fn reset_app_data(dialogs: &dyn Dialogs, lifecycle: &dyn AppLifecycle) -> Result<bool> {
    let message = "This will sign you out from all your teams and reset the app back to its \
                   original settings. This cannot be undone.\n\nAre you sure?";
    if !dialogs.confirm(message) {
        return Ok(false);
    }

    info!("Resetting application data");
    lifecycle.reset_app_data()?;
    Ok(true)
}
