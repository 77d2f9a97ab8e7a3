//! Host records as they are kept in memory and persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All registered hosts keyed by their canonical `url`.
pub type HostMap = BTreeMap<String, Host>;

/// One registered server endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Canonical origin, unique within the registry
    pub url: String,

    /// Display name, defaults to `url`
    pub title: String,

    /// The original string carrying embedded credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Host {
    /// A host without credentials whose title is its url.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            title: url.clone(),
            url,
            auth_url: None,
            username: None,
            password: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_credentials(
        mut self,
        auth_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth_url = Some(auth_url.into());
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}
