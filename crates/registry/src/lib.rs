//! Harbor Registry - the set of servers a client may connect to
//!
//! This crate keeps track of registered server hosts and which one is
//! active. It validates hosts before admitting them, persists every change
//! to a key-value store and upgrades older persisted formats on load.
//!
//! # Components
//!
//! - **Parser**: classifies raw host strings, including embedded credentials
//! - **Migrator**: loads persisted state and imports a seed file on first run
//! - **Validator**: time-bounded check of a host's `/api/info` endpoint
//! - **Registry**: add, remove and activate hosts with write-through storage
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use harbor_registry::{HostRegistry, MemoryStore, RegistrySettings, ReqwestProbe, Validator};
//!
//! # async fn example() -> harbor_registry::Result<()> {
//! let mut registry = HostRegistry::new(Box::new(MemoryStore::new()), RegistrySettings::default());
//! let mut events = registry.subscribe();
//! registry.load()?;
//!
//! let validator = Validator::new(Arc::new(ReqwestProbe::new()));
//! validator.validate("https://open.rocket.chat").await?;
//!
//! let outcome = registry.add_host("https://open.rocket.chat")?;
//! registry.set_active(outcome.url())?;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod flow;
pub mod host;
pub mod migrate;
pub mod parser;
pub mod ports;
pub mod protocol;
pub mod registry;
pub mod settings;
pub mod state;
pub mod storage;
pub mod validator;

pub use error::{MigrationIssue, RegistryError, Result, ValidationError};
pub use events::{EventBus, RegistryEvent};
pub use flow::{Admission, handle_deep_link, reset_app_data, show_host_confirmation};
pub use host::{Host, HostMap};
pub use migrate::LoadSource;
pub use ports::{AppLifecycle, Dialogs, HostSync, NoopHostSync};
pub use registry::HostRegistry;
pub use settings::RegistrySettings;
pub use state::{ActiveSelection, AddOutcome, RegistryState};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use validator::{InfoProbe, InfoRequest, ReqwestProbe, Validator};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
