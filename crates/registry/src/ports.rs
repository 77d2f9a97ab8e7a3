//! Collaborators the registry talks to but does not implement.

use crate::host::HostMap;

/// Propagates the host map to other parts of the application.
///
/// Fire-and-forget: no acknowledgement is expected.
pub trait HostSync: Send + Sync {
    fn notify(&self, hosts: &HostMap);
}

/// Does nothing; for embedders without other processes to inform.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHostSync;

impl HostSync for NoopHostSync {
    fn notify(&self, _hosts: &HostMap) {}
}

/// User-facing prompts.
pub trait Dialogs: Send + Sync {
    /// Ask a yes/no question, returning `true` on yes.
    fn confirm(&self, message: &str) -> bool;

    fn show_error(&self, title: &str, message: &str);
}

/// Owner of the application's persisted data and process lifetime.
pub trait AppLifecycle: Send + Sync {
    /// Wipe all persisted state and restart the application.
    fn reset_app_data(&self) -> crate::Result<()>;
}
