//! Consul KV store implementation

use std::env;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use crate::domain::kv::{KvPair, KvStore};
use crate::domain::volume::namespace::has_dot_segment;
use crate::domain::DomainError;

/// Environment variable holding the Consul `host:port`
pub const CONSUL_ADDRESS_ENV: &str = "CONSUL_ADDRESS";
/// Environment variable holding the ACL token
pub const CONSUL_TOKEN_ENV: &str = "CONSUL_HTTP_TOKEN";
/// Environment variable switching the agent connection to HTTPS
pub const CONSUL_SSL_ENV: &str = "CONSUL_HTTP_SSL";
/// Address of the local Consul agent
pub const DEFAULT_CONSUL_ADDRESS: &str = "localhost:8500";

/// Consul client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConsulConfig {
    /// Agent address in `host:port` form, a full URL is also accepted
    pub address: String,
    /// `http` or `https`, used when `address` carries no scheme
    pub scheme: String,
    /// ACL token sent as `X-Consul-Token`
    pub token: Option<String>,
    /// Datacenter to query instead of the agent's own
    pub datacenter: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONSUL_ADDRESS.to_string(),
            scheme: "http".to_string(),
            token: None,
            datacenter: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ConsulConfig {
    /// Creates a configuration for the given address, empty means the default agent
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: resolve_address(Some(address.into())),
            ..Default::default()
        }
    }

    /// Reads `CONSUL_ADDRESS`, `CONSUL_HTTP_TOKEN` and `CONSUL_HTTP_SSL`
    pub fn from_env() -> Self {
        Self::from_env_values(
            env::var(CONSUL_ADDRESS_ENV).ok(),
            env::var(CONSUL_TOKEN_ENV).ok(),
            env::var(CONSUL_SSL_ENV).ok(),
        )
    }

    fn from_env_values(
        address: Option<String>,
        token: Option<String>,
        ssl: Option<String>,
    ) -> Self {
        let mut config = Self {
            address: resolve_address(address),
            token: token.filter(|t| !t.is_empty()),
            ..Default::default()
        };

        if ssl.as_deref().is_some_and(is_truthy) {
            config.scheme = "https".to_string();
        }

        config
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.datacenter = Some(datacenter.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Agent base URL; fails on addresses that cannot form a URL
    pub fn base_url(&self) -> Result<Url, DomainError> {
        let address = self.address.trim();
        let raw = if address.contains("://") {
            address.to_string()
        } else {
            format!("{}://{}", self.scheme, address)
        };

        let url = Url::parse(&raw).map_err(|e| {
            DomainError::configuration(format!("Invalid Consul address '{}': {}", self.address, e))
        })?;

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(DomainError::configuration(format!(
                "Invalid Consul address '{}': missing host",
                self.address
            )));
        }

        Ok(url)
    }
}

fn resolve_address(address: Option<String>) -> String {
    match address {
        Some(address) if !address.trim().is_empty() => address,
        _ => DEFAULT_CONSUL_ADDRESS.to_string(),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConsulKvEntry {
    key: String,
    value: Option<String>,
}

impl ConsulKvEntry {
    fn into_pair(self) -> Result<KvPair, DomainError> {
        let value = match self.value {
            Some(encoded) => BASE64.decode(encoded.as_bytes()).map_err(|e| {
                DomainError::decoding(format!("Invalid base64 value for key '{}': {}", self.key, e))
            })?,
            None => Vec::new(),
        };

        Ok(KvPair::new(self.key, value))
    }
}

/// Consul KV store over the agent HTTP API
///
/// Construction never touches the network; an unreachable agent surfaces as
/// `StoreUnavailable` on the first call.
#[derive(Clone)]
pub struct ConsulKvStore {
    config: ConsulConfig,
    base_url: Url,
    http_client: reqwest::Client,
}

impl fmt::Debug for ConsulKvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsulKvStore")
            .field("base_url", &self.base_url.as_str())
            .field("datacenter", &self.config.datacenter)
            .field("token", &self.config.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ConsulKvStore {
    /// Builds a client for the configured agent
    pub fn connect(config: ConsulConfig) -> Result<Self, DomainError> {
        let base_url = config.base_url()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to create Consul client: {}", e))
            })?;

        Ok(Self {
            config,
            base_url,
            http_client,
        })
    }

    /// Builds a client from the process environment
    pub fn from_env() -> Result<Self, DomainError> {
        Self::connect(ConsulConfig::from_env())
    }

    pub fn config(&self) -> &ConsulConfig {
        &self.config
    }

    fn kv_url(&self, key: &str) -> Result<Url, DomainError> {
        // URL normalization would fold `.` and `..` segments into another key
        if has_dot_segment(key) {
            return Err(DomainError::validation(format!(
                "Key '{}' contains a '.' or '..' path segment",
                key
            )));
        }

        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| {
                DomainError::configuration(format!("Consul address '{}' cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .push("v1")
            .push("kv")
            .extend(key.split('/'));

        if let Some(datacenter) = &self.config.datacenter {
            url.query_pairs_mut().append_pair("dc", datacenter);
        }

        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http_client.request(method, url);

        match &self.config.token {
            Some(token) => builder.header("X-Consul-Token", token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, key: &str) -> Result<Response, DomainError> {
        builder.send().await.map_err(|e| {
            DomainError::store_unavailable(format!("Consul request for '{}' failed: {}", key, e))
        })
    }

    fn unexpected_status(status: StatusCode, key: &str) -> DomainError {
        DomainError::store_unavailable(format!(
            "Consul returned error status {} for '{}'",
            status, key
        ))
    }

    async fn read_entries(response: Response) -> Result<Vec<KvPair>, DomainError> {
        let entries: Vec<ConsulKvEntry> = response.json().await.map_err(|e| {
            DomainError::store_unavailable(format!("Failed to parse Consul response: {}", e))
        })?;

        entries.into_iter().map(ConsulKvEntry::into_pair).collect()
    }
}

#[async_trait]
impl KvStore for ConsulKvStore {
    async fn get(&self, key: &str) -> Result<Option<KvPair>, DomainError> {
        let url = self.kv_url(key)?;
        let response = self.send(self.request(Method::GET, url), key).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if !status.is_success() => Err(Self::unexpected_status(status, key)),
            _ => Ok(Self::read_entries(response).await?.into_iter().next()),
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
        let url = self.kv_url(key)?;
        let builder = self.request(Method::PUT, url).body(value.to_vec());
        let response = self.send(builder, key).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::unexpected_status(status, key));
        }

        // The agent answers `true` or `false`
        let written: bool = response.json().await.map_err(|e| {
            DomainError::store_unavailable(format!("Failed to parse Consul response: {}", e))
        })?;

        if !written {
            return Err(DomainError::store_unavailable(format!(
                "Consul rejected write for '{}'",
                key
            )));
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let url = self.kv_url(key)?;
        let response = self.send(self.request(Method::DELETE, url), key).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status if !status.is_success() => Err(Self::unexpected_status(status, key)),
            _ => Ok(()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KvPair>, DomainError> {
        let mut url = self.kv_url(prefix)?;
        url.query_pairs_mut().append_pair("recurse", "true");

        let response = self.send(self.request(Method::GET, url), prefix).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if !status.is_success() => Err(Self::unexpected_status(status, prefix)),
            _ => Self::read_entries(response).await,
        }
    }

    fn backend_name(&self) -> &'static str {
        "consul"
    }
}
