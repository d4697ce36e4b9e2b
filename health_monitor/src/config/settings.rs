use crate::models::Resource;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    /// Resources registered when the server starts.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Shared deadline for collecting every probe result of one check.
    pub timeout_ms: u64,
    /// Delay of the built-in stand-in probes.
    pub probe_latency_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            probe_latency_ms: 3000,
        }
    }
}

impl MonitorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn probe_latency(&self) -> Duration {
        Duration::from_millis(self.probe_latency_ms)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        Self::build(path)
    }

    fn build(path: &Path) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.monitor.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "Monitor timeout must be greater than 0".to_string(),
            ));
        }

        if self.monitor.probe_latency_ms >= self.monitor.timeout_ms {
            tracing::warn!(
                "Stand-in probe latency ({}ms) is not below the check timeout ({}ms); every check will time out",
                self.monitor.probe_latency_ms,
                self.monitor.timeout_ms
            );
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
