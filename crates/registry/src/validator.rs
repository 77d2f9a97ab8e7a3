//! Bounded-time reachability check against a host's info endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::parser::{self, CredentialKind};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

const INFO_PATH: &str = "/api/info";

/// Performs the GET against a host's info endpoint.
#[async_trait]
pub trait InfoProbe: Send + Sync {
    /// Returns the HTTP status code, or a description of why no response
    /// was received.
    async fn get(&self, request: &InfoRequest) -> Result<u16, String>;
}

/// A prepared request to a host's info endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRequest {
    pub url: String,
    pub authorization: Option<String>,
}

impl InfoRequest {
    /// Build the request for `host_url`, turning embedded credentials into
    /// an `Authorization` header and stripping them from the url.
    pub fn for_host(host_url: &str) -> Self {
        let host_url = host_url.trim();

        let (origin, authorization) = match parser::parse_credentials(host_url) {
            Some(creds) => {
                let header = match creds.kind {
                    CredentialKind::FragmentToken => format!("Bearer {}", creds.password),
                    CredentialKind::Userinfo => format!(
                        "Basic {}",
                        STANDARD.encode(format!("{}:{}", creds.username, creds.password))
                    ),
                };
                (creds.url, Some(header))
            }
            None => (parser::normalize(host_url), None),
        };

        Self {
            url: format!("{}{}", origin, INFO_PATH),
            authorization,
        }
    }
}

pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl Default for ReqwestProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InfoProbe for ReqwestProbe {
    async fn get(&self, request: &InfoRequest) -> Result<u16, String> {
        let mut builder = self.client.get(&request.url);

        if let Some(authorization) = &request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = builder.send().await.map_err(|e| e.to_string())?;
        Ok(response.status().as_u16())
    }
}

/// Checks that a host answers its info endpoint successfully.
///
/// No retries and no caching: each call is a single request raced against
/// a timer.
#[derive(Clone)]
pub struct Validator {
    probe: Arc<dyn InfoProbe>,
    timeout: Duration,
}

impl Validator {
    pub fn new(probe: Arc<dyn InfoProbe>) -> Self {
        Self {
            probe,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn validate(&self, host_url: &str) -> Result<(), ValidationError> {
        self.validate_within(host_url, self.timeout).await
    }

    /// Validate with an explicit timeout.
    ///
    /// A response arriving after the timer fired is discarded.
    pub async fn validate_within(
        &self,
        host_url: &str,
        timeout: Duration,
    ) -> Result<(), ValidationError> {
        let request = InfoRequest::for_host(host_url);
        debug!("Validating host via {}", request.url);

        match tokio::time::timeout(timeout, self.probe.get(&request)).await {
            Ok(Ok(status)) if (200..300).contains(&status) => {
                debug!("Host {} answered with {}", host_url, status);
                Ok(())
            }
            Ok(Ok(status)) => {
                warn!("Host {} answered with {}", host_url, status);
                Err(ValidationError::Rejected {
                    url: host_url.to_string(),
                    detail: format!("HTTP {}", status),
                })
            }
            Ok(Err(e)) => {
                warn!("Host {} could not be reached: {}", host_url, e);
                Err(ValidationError::Rejected {
                    url: host_url.to_string(),
                    detail: e,
                })
            }
            Err(_) => {
                warn!("Host {} timed out after {:?}", host_url, timeout);
                Err(ValidationError::Timeout {
                    url: host_url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }
}
