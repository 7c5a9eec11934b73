use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::kv::{ConsulConfig, StoreConfig, StoreType, CONSUL_ADDRESS_ENV};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub logging: LoggingConfig,
}

/// Backing store settings; unset Consul fields fall back to the `CONSUL_*` environment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: String,
    pub address: Option<String>,
    pub scheme: Option<String>,
    pub token: Option<String>,
    pub datacenter: Option<String>,
    pub timeout_secs: u64,
    pub operation_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreType::Consul.to_string(),
            address: None,
            scheme: None,
            token: None,
            datacenter: None,
            timeout_secs: 30,
            operation_timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl StoreSettings {
    /// Resolves the store configuration, reading `CONSUL_*` variables for unset fields
    pub fn to_store_config(&self) -> Result<StoreConfig, DomainError> {
        match self.backend.parse::<StoreType>()? {
            StoreType::InMemory => Ok(StoreConfig::InMemory),
            StoreType::Consul => Ok(StoreConfig::Consul(
                self.consul_config(ConsulConfig::from_env()),
            )),
        }
    }

    /// Per-operation deadline for repository calls
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_secs.map(Duration::from_secs)
    }

    fn consul_config(&self, fallback: ConsulConfig) -> ConsulConfig {
        ConsulConfig {
            address: self
                .address
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(fallback.address),
            scheme: self.scheme.clone().unwrap_or(fallback.scheme),
            token: self.token.clone().or(fallback.token),
            datacenter: self.datacenter.clone().or(fallback.datacenter),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl AppConfig {
    /// Layers `config/default`, `config/local`, `RBD__*` variables, then `CONSUL_ADDRESS`
    pub fn load() -> Result<Self, config::ConfigError> {
        let files = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        Self::load_from(
            files,
            config::Environment::with_prefix("RBD").separator("__"),
            env::var(CONSUL_ADDRESS_ENV).ok(),
        )
    }

    fn load_from(
        files: config::ConfigBuilder<config::builder::DefaultState>,
        environment: config::Environment,
        consul_address: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let consul_address = consul_address.filter(|a| !a.trim().is_empty());

        let config = files
            .add_source(environment.try_parsing(true))
            .set_override_option("store.address", consul_address)?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::infrastructure::kv::DEFAULT_CONSUL_ADDRESS;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store.backend, "consul");
        assert_eq!(config.store.timeout_secs, 30);
        assert!(config.store.operation_timeout().is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_file() {
        let config = parse(
            r#"
            [store]
            address = "consul.service:8500"
            operation_timeout_secs = 5

            [logging]
            format = "json"
            "#,
        );

        assert_eq!(config.store.backend, "consul");
        assert_eq!(config.store.address.as_deref(), Some("consul.service:8500"));
        assert_eq!(config.store.operation_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    fn layered(variables: &[(&str, &str)], consul_address: Option<&str>) -> AppConfig {
        let files = config::Config::builder().add_source(config::File::from_str(
            r#"
            [store]
            address = "file:8500"
            timeout_secs = 10
            "#,
            config::FileFormat::Toml,
        ));

        let source: HashMap<String, String> = variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let environment = config::Environment::with_prefix("RBD")
            .separator("__")
            .source(Some(source));

        AppConfig::load_from(files, environment, consul_address.map(str::to_string)).unwrap()
    }

    #[test]
    fn test_load_layering() {
        let config = layered(&[], None);
        assert_eq!(config.store.address.as_deref(), Some("file:8500"));
        assert_eq!(config.store.timeout_secs, 10);

        let config = layered(
            &[("RBD__STORE__ADDRESS", "env:8500"), ("RBD__LOGGING__LEVEL", "debug")],
            None,
        );
        assert_eq!(config.store.address.as_deref(), Some("env:8500"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.store.timeout_secs, 10);

        let config = layered(&[("RBD__STORE__ADDRESS", "env:8500")], Some("consul:8500"));
        assert_eq!(config.store.address.as_deref(), Some("consul:8500"));
    }

    #[test]
    fn test_load_ignores_blank_consul_address() {
        let config = layered(&[("RBD__STORE__ADDRESS", "env:8500")], Some("  "));
        assert_eq!(config.store.address.as_deref(), Some("env:8500"));

        let config = layered(&[], Some(""));
        assert_eq!(config.store.address.as_deref(), Some("file:8500"));
    }

    #[test]
    fn test_consul_config_uses_fallback_for_unset_fields() {
        let settings = StoreSettings {
            datacenter: Some("dc2".to_string()),
            timeout_secs: 3,
            ..Default::default()
        };
        let fallback = ConsulConfig::default().with_token("env-token");

        let consul = settings.consul_config(fallback);
        assert_eq!(consul.address, DEFAULT_CONSUL_ADDRESS);
        assert_eq!(consul.token.as_deref(), Some("env-token"));
        assert_eq!(consul.datacenter.as_deref(), Some("dc2"));
        assert_eq!(consul.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_consul_config_prefers_settings() {
        let settings = StoreSettings {
            address: Some("10.0.0.5:8500".to_string()),
            scheme: Some("https".to_string()),
            ..Default::default()
        };

        let consul = settings.consul_config(ConsulConfig::new("other:8500"));
        assert_eq!(consul.address, "10.0.0.5:8500");
        assert_eq!(consul.scheme, "https");
    }

    #[test]
    fn test_in_memory_backend() {
        let settings = StoreSettings {
            backend: "memory".to_string(),
            ..Default::default()
        };

        let store = settings.to_store_config().unwrap();
        assert_eq!(store.store_type(), StoreType::InMemory);
    }

    #[test]
    fn test_unknown_backend() {
        let settings = StoreSettings {
            backend: "zookeeper".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            settings.to_store_config(),
            Err(DomainError::Configuration { .. })
        ));
    }
}
