//! Loading persisted registry state, upgrading legacy formats on the way.
//!
//! The stored host value has gone through several shapes:
//!
//! - a JSON object `{ url: { title, url, .. } }` (current)
//! - a JSON array of urls, possibly with trailing slashes
//! - a bare url string
//!
//! Legacy shapes are rewritten in the current shape as soon as they are
//! read. When nothing usable is stored, a seed file mapping
//! `{ title: url }` is imported once.
//!
//! Every admitted url is normalised so map keys match what lookups compute.
//! Entries of the current shape are decoded one by one; if any of them is
//! unreadable the stored value is left as it was.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{MigrationIssue, Result};
use crate::host::{Host, HostMap};
use crate::parser;
use crate::settings::RegistrySettings;
use crate::storage::{ACTIVE_KEY, HOSTS_KEY, KeyValueStore, NONE_SENTINEL, SIDEBAR_CLOSED_KEY};

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("valid bare url regex"));

/// Where the loaded host map came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    LegacyList,
    SingleUrl,
    SeedFile(PathBuf),
    Empty,
}

#[derive(Debug, Clone)]
pub struct Migration {
    pub hosts: HostMap,
    pub active: Option<String>,
    pub source: LoadSource,
    /// Stored entries that could not be read and were left out of `hosts`.
    pub skipped: usize,
}

/// Establish the initial registry contents from storage.
///
/// The resulting host map is written back in the current format before
/// returning, unless some stored entries were unreadable. Malformed stored
/// data and invalid seed files are logged and skipped; only storage write
/// failures are returned.
pub fn load(store: &mut dyn KeyValueStore, settings: &RegistrySettings) -> Result<Migration> {
    let Stored {
        mut hosts,
        mut source,
        skipped,
    } = match store.get(HOSTS_KEY) {
        Some(raw) => migrate_stored(store, &raw)?,
        None => Stored::empty(),
    };

    if skipped > 0 {
        warn!(
            "Skipped {} unreadable stored hosts, leaving stored data untouched",
            skipped
        );
    } else if hosts.is_empty() {
        if let Some((path, imported)) = import_seed_file(settings) {
            if imported.len() == 1 {
                store.set(SIDEBAR_CLOSED_KEY, "true")?;
            }
            hosts = imported;
            source = LoadSource::SeedFile(path);
        } else {
            source = LoadSource::Empty;
        }
    }

    if skipped == 0 {
        store.set(HOSTS_KEY, &serde_json::to_string(&hosts)?)?;
    }
    let active = load_active(store, &hosts)?;

    info!("Loaded {} hosts from {:?}", hosts.len(), source);
    Ok(Migration {
        hosts,
        active,
        source,
        skipped,
    })
}

struct Stored {
    hosts: HostMap,
    source: LoadSource,
    skipped: usize,
}

impl Stored {
    fn empty() -> Self {
        Self::complete(HostMap::new(), LoadSource::Empty)
    }

    fn complete(hosts: HostMap, source: LoadSource) -> Self {
        Self {
            hosts,
            source,
            skipped: 0,
        }
    }
}

fn migrate_stored(store: &mut dyn KeyValueStore, raw: &str) -> Result<Stored> {
    match decode_stored(raw) {
        Ok(Value::Object(entries)) => {
            let (hosts, skipped) = from_stored_map(entries);
            Ok(Stored {
                hosts,
                source: LoadSource::Stored,
                skipped,
            })
        }
        Ok(Value::Array(items)) => {
            let hosts = from_legacy_list(&items);
            info!("Upgrading legacy host list ({} entries)", hosts.len());
            store.set(HOSTS_KEY, &serde_json::to_string(&hosts)?)?;
            Ok(Stored::complete(hosts, LoadSource::LegacyList))
        }
        Ok(Value::String(url)) if BARE_URL.is_match(&url) => Ok(Stored::complete(
            upgrade_single_url(store, &url)?,
            LoadSource::SingleUrl,
        )),
        Err(_) if BARE_URL.is_match(raw) => Ok(Stored::complete(
            upgrade_single_url(store, raw)?,
            LoadSource::SingleUrl,
        )),
        Ok(other) => {
            warn!(
                "{}",
                MigrationIssue::MalformedPersistedData(format!("unexpected value {}", other))
            );
            Ok(Stored::empty())
        }
        Err(e) => {
            warn!("{}", MigrationIssue::MalformedPersistedData(e.to_string()));
            Ok(Stored::empty())
        }
    }
}

/// Decode a stored `{ url: host }` object entry by entry.
///
/// Returns the readable hosts and how many entries were skipped.
fn from_stored_map(entries: serde_json::Map<String, Value>) -> (HostMap, usize) {
    let mut hosts = HostMap::new();
    let mut skipped = 0;

    for (key, value) in entries {
        match stored_entry(&key, value) {
            Ok(host) => {
                hosts.entry(host.url.clone()).or_insert(host);
            }
            Err(reason) => {
                warn!(
                    "{}",
                    MigrationIssue::MalformedPersistedData(format!("host {}: {}", key, reason))
                );
                skipped += 1;
            }
        }
    }

    (hosts, skipped)
}

/// A missing `url` is taken from the key, a missing `title` from the url.
fn stored_entry(key: &str, value: Value) -> std::result::Result<Host, String> {
    let Value::Object(mut fields) = value else {
        return Err(format!("expected an object, found {}", value));
    };

    let url = match fields.get("url").and_then(Value::as_str) {
        Some(url) => parser::normalize(url),
        None => parser::normalize(key),
    };
    if !parser::is_valid_host_url(&url) {
        return Err(format!("invalid url {:?}", url));
    }

    fields
        .entry("title")
        .or_insert_with(|| Value::String(url.clone()));
    fields.insert("url".to_string(), Value::String(url));

    serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())
}

fn decode_stored(raw: &str) -> std::result::Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}

fn from_legacy_list(items: &[Value]) -> HostMap {
    items
        .iter()
        .filter_map(|item| match item.as_str() {
            Some(url) => Some(parser::normalize(url)),
            None => {
                warn!("Skipping non-string legacy host entry: {}", item);
                None
            }
        })
        .filter(|url| admit(url))
        .map(|url| (url.clone(), Host::new(url)))
        .collect()
}

fn upgrade_single_url(store: &mut dyn KeyValueStore, url: &str) -> Result<HostMap> {
    let url = parser::normalize(url);
    info!("Upgrading single stored host {}", url);
    let mut hosts = HostMap::new();
    hosts.insert(url.clone(), Host::new(url));
    store.set(HOSTS_KEY, &serde_json::to_string(&hosts)?)?;
    Ok(hosts)
}

/// Import the first seed file found, if any.
///
/// Only a missing user-data file moves the search on to the install
/// directory; a present but invalid file ends the search.
pub fn import_seed_file(settings: &RegistrySettings) -> Option<(PathBuf, HostMap)> {
    let path = settings
        .seed_file_candidates()
        .into_iter()
        .find(|path| path.exists())?;

    match read_seed_file(&path) {
        Ok(hosts) => {
            info!("Imported {} hosts from {}", hosts.len(), path.display());
            Some((path, hosts))
        }
        Err(issue) => {
            warn!("{}", issue);
            None
        }
    }
}

/// Read a `{ title: url }` seed file into the live `{ url: host }` shape.
pub fn read_seed_file(path: &Path) -> std::result::Result<HostMap, MigrationIssue> {
    let invalid = |reason: String| MigrationIssue::ImportFileInvalid {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let entries: BTreeMap<String, String> =
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

    Ok(entries
        .into_iter()
        .map(|(title, url)| (title, parser::normalize(&url)))
        .filter(|(_, url)| admit(url))
        .map(|(title, url)| (url.clone(), Host::new(url).with_title(title)))
        .collect())
}

fn admit(url: &str) -> bool {
    let valid = parser::is_valid_host_url(url);
    if !valid {
        warn!("Skipping invalid host url {:?}", url);
    }
    valid
}

fn load_active(store: &mut dyn KeyValueStore, hosts: &HostMap) -> Result<Option<String>> {
    match store.get(ACTIVE_KEY) {
        None => Ok(None),
        Some(url) if url == NONE_SENTINEL => Ok(None),
        Some(url) if hosts.contains_key(&parser::normalize(&url)) => {
            Ok(Some(parser::normalize(&url)))
        }
        Some(url) => {
            debug!("Dropping stale active host {}", url);
            store.remove(ACTIVE_KEY)?;
            Ok(None)
        }
    }
}
