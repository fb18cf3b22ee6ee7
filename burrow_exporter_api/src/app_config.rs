use anyhow::{bail, Context};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::info;

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub listen_address: String,
    pub telemetry_path: String,
    pub config_file: PathBuf,
    pub burrow_endpoint: String,
    pub request_timeout_ms: u64,
    pub max_concurrent_requests: usize,
}

impl AppConfig {
    pub fn build() -> Result<Self, anyhow::Error> {
        let builder = Self::defaults()?
            .add_source(config::File::with_name("appsettings").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let config = Self::from_builder(builder)?;

        info!("App config: {config:?}");

        Ok(config)
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, anyhow::Error> {
        let builder = Config::builder()
            .set_default("listen_address", "0.0.0.0:9121")?
            .set_default("telemetry_path", "/metrics")?
            .set_default("config_file", "/config.json")?
            .set_default("burrow_endpoint", "127.0.0.1:8080")?
            .set_default("request_timeout_ms", 10_000)?
            .set_default("max_concurrent_requests", 4)?;

        Ok(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, anyhow::Error> {
        let config = builder.build().context("While building config")?;

        let deserialized_config: AppConfig = config
            .try_deserialize()
            .context("While deserializing config")?;

        deserialized_config
            .validate()
            .context("While validating config")?;

        Ok(deserialized_config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.telemetry_path.starts_with('/') || self.telemetry_path == "/" {
            bail!(
                "Telemetry path must start with '/' and differ from the root page, got '{}'",
                self.telemetry_path
            )
        }
        if self.request_timeout_ms == 0 {
            bail!("Request timeout must be positive")
        }
        if self.telemetry_path.contains(['{', '}'])
            || self
                .telemetry_path
                .split('/')
                .any(|segment| segment.starts_with([':', '*']))
        {
            bail!(
                "Telemetry path must be a literal path without captures, got '{}'",
                self.telemetry_path
            )
        }
        if self.max_concurrent_requests == 0 || self.max_concurrent_requests > Semaphore::MAX_PERMITS {
            bail!(
                "Max concurrent requests must be between 1 and {}, got {}",
                Semaphore::MAX_PERMITS,
                self.max_concurrent_requests
            )
        }
        if self.burrow_endpoint.trim().is_empty() {
            bail!("Burrow endpoint is empty")
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_json(json: &str) -> Result<AppConfig, anyhow::Error> {
        let builder = AppConfig::defaults()?.add_source(config::File::from_str(json, FileFormat::Json));
        AppConfig::from_builder(builder)
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = from_json("{}").unwrap();

        assert_eq!(config.listen_address, "0.0.0.0:9121");
        assert_eq!(config.telemetry_path, "/metrics");
        assert_eq!(config.config_file, PathBuf::from("/config.json"));
        assert_eq!(config.burrow_endpoint, "127.0.0.1:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_concurrent_requests, 4);
    }

    #[test]
    fn overrides_defaults() {
        let config = from_json(
            r#"{"burrow_endpoint": "burrow:8000", "telemetry_path": "/lag", "request_timeout_ms": 250}"#,
        )
        .unwrap();

        assert_eq!(config.burrow_endpoint, "burrow:8000");
        assert_eq!(config.telemetry_path, "/lag");
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(from_json(r#"{"telemetry_path": "metrics"}"#).is_err());
        assert!(from_json(r#"{"telemetry_path": "/"}"#).is_err());
        assert!(from_json(r#"{"request_timeout_ms": 0}"#).is_err());
        assert!(from_json(r#"{"max_concurrent_requests": 0}"#).is_err());
        assert!(from_json(r#"{"burrow_endpoint": " "}"#).is_err());
        assert!(from_json(r#"{"telemetry_path": "/{group}"}"#).is_err());
        assert!(from_json(r#"{"telemetry_path": "/metrics/{"}"#).is_err());
        assert!(from_json(r#"{"telemetry_path": "/:metrics"}"#).is_err());
        assert!(from_json(r#"{"telemetry_path": "/metrics/*rest"}"#).is_err());
    }

    #[test]
    fn rejects_concurrency_above_semaphore_limit() {
        let mut config = from_json("{}").unwrap();

        config.max_concurrent_requests = Semaphore::MAX_PERMITS + 1;
        assert!(config.validate().is_err());

        config.max_concurrent_requests = usize::MAX;
        assert!(config.validate().is_err());

        config.max_concurrent_requests = Semaphore::MAX_PERMITS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn accepts_nested_literal_telemetry_path() {
        let config = from_json(r#"{"telemetry_path": "/burrow/metrics"}"#).unwrap();

        assert_eq!(config.telemetry_path, "/burrow/metrics");
    }
}
