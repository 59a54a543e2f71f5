use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Artificial latency before successful document responses.
    pub response_delay: Duration,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: IpAddr::from([0, 0, 0, 0]),
                port: 8000,
                response_delay: Duration::from_millis(1000),
                max_body_bytes: 64 * 1024 * 1024,
            },
            storage: StorageConfig {
                root: PathBuf::from("/data/documents"),
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_string()],
            },
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Reads the process environment on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root) = lookup("STORAGE_PATH") {
            config.storage.root = PathBuf::from(root);
        }
        if let Some(host) = lookup("SERVER_HOST") {
            config.server.host = parse("SERVER_HOST", host)?;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            config.server.port = parse("SERVER_PORT", port)?;
        }
        if let Some(delay) = lookup("RESPONSE_DELAY_MS") {
            config.server.response_delay = Duration::from_millis(parse("RESPONSE_DELAY_MS", delay)?);
        }
        if let Some(limit) = lookup("MAX_BODY_BYTES") {
            config.server.max_body_bytes = parse("MAX_BODY_BYTES", limit)?;
        }
        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_format = match format.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "LOG_FORMAT",
                        value: format,
                        reason: "expected \"text\" or \"json\"".into(),
                    })
                }
            };
        }

        Ok(config)
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
