//! The stateful host registry.
//!
//! [`HostRegistry`] applies [`RegistryState`] transitions and writes every
//! change through to storage before returning, then informs the
//! [`HostSync`] collaborator and publishes the transition's events.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::events::{EventBus, RegistryEvent};
use crate::host::{Host, HostMap};
use crate::migrate::{self, LoadSource};
use crate::ports::{HostSync, NoopHostSync};
use crate::settings::RegistrySettings;
use crate::state::{ActiveSelection, AddOutcome, Changes, RegistryState, Transition};
use crate::storage::{ACTIVE_KEY, HOSTS_KEY, KeyValueStore};

pub struct HostRegistry {
    state: RegistryState,
    store: Box<dyn KeyValueStore>,
    sync: Arc<dyn HostSync>,
    events: EventBus,
    settings: RegistrySettings,
    load_source: Option<LoadSource>,
}

impl HostRegistry {
    /// Create an empty registry over `store`. Call [`HostRegistry::load`]
    /// once before use.
    pub fn new(store: Box<dyn KeyValueStore>, settings: RegistrySettings) -> Self {
        Self {
            state: RegistryState::new(),
            store,
            sync: Arc::new(NoopHostSync),
            events: EventBus::new(),
            settings,
            load_source: None,
        }
    }

    pub fn with_sync(mut self, sync: Arc<dyn HostSync>) -> Self {
        self.sync = sync;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Establish the initial state from storage, migrating legacy formats.
    ///
    /// Only the first call does any work.
    pub fn load(&mut self) -> Result<LoadSource> {
        if let Some(source) = &self.load_source {
            warn!("Host registry already loaded, ignoring reload");
            return Ok(source.clone());
        }

        let migration = migrate::load(&mut *self.store, &self.settings)?;
        self.state = RegistryState::from_parts(migration.hosts, migration.active);
        self.load_source = Some(migration.source.clone());

        self.sync.notify(self.state.hosts());
        self.events.emit(RegistryEvent::Loaded);
        Ok(migration.source)
    }

    pub fn is_loaded(&self) -> bool {
        self.load_source.is_some()
    }

    // Reads

    pub fn get(&self, url: &str) -> Option<&Host> {
        self.state.get(url)
    }

    pub fn host_exists(&self, url: &str) -> bool {
        self.state.host_exists(url)
    }

    pub fn require(&self, url: &str) -> Result<&Host> {
        self.state.require(url)
    }

    pub fn hosts(&self) -> &HostMap {
        self.state.hosts()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Host> {
        self.state.iter()
    }

    pub fn active(&self) -> Option<&str> {
        self.state.active()
    }

    pub fn active_host(&self) -> Option<&Host> {
        self.state.active_host()
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    // Mutations

    /// Register `raw`, or activate it if its url is already registered.
    pub fn add_host(&mut self, raw: &str) -> Result<AddOutcome> {
        let outcome = self.apply(|state| state.add_host(raw))?;
        if let AddOutcome::Added(url) = &outcome {
            info!("Added host {}", url);
        }
        Ok(outcome)
    }

    /// Returns `false` when the host was not registered.
    pub fn remove_host(&mut self, url: &str) -> Result<bool> {
        let removed = self.apply(|state| Ok(state.remove_host(url)))?;
        if removed {
            info!("Removed host {}", url);
        }
        Ok(removed)
    }

    pub fn set_active(&mut self, url: &str) -> Result<ActiveSelection> {
        self.apply(|state| Ok(state.set_active(url)))
    }

    pub fn clear_active(&mut self) -> Result<()> {
        self.apply(|state| Ok(state.clear_active()))
    }

    /// Returns `false` when the host was not registered.
    pub fn set_host_title(&mut self, url: &str, title: &str) -> Result<bool> {
        let settings = self.settings.clone();
        self.apply(|state| Ok(state.set_host_title(url, title, &settings)))
    }

    /// Run a transition against a copy of the state and adopt it only once
    /// it has been persisted.
    fn apply<T>(
        &mut self,
        transition: impl FnOnce(&mut RegistryState) -> Result<Transition<T>>,
    ) -> Result<T> {
        let mut next = self.state.clone();
        let Transition {
            outcome,
            events,
            changes,
        } = transition(&mut next)?;

        self.persist(&next, changes)?;
        self.state = next;

        if changes.hosts {
            self.sync.notify(self.state.hosts());
        }
        self.events.emit_all(events);
        Ok(outcome)
    }

    fn persist(&mut self, state: &RegistryState, changes: Changes) -> Result<()> {
        if changes.hosts {
            debug!("Persisting {} hosts", state.len());
            self.store
                .set(HOSTS_KEY, &serde_json::to_string(state.hosts())?)?;
        }

        if changes.active {
            match state.active() {
                Some(url) => self.store.set(ACTIVE_KEY, url)?,
                None => self.store.remove(ACTIVE_KEY)?,
            }
        }

        Ok(())
    }
}
