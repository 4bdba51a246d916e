//! Server configuration loaded from the environment

use serde::Deserialize;

/// HTTP server and logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_HOST` (default: "0.0.0.0")
    /// - `SERVER_PORT` (default: 3000)
    /// - `LOG_LEVEL` (default: "info")
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("log_level", log_level)?
            .add_source(config::Environment::with_prefix("SERVER"))
            .build()?
            .try_deserialize()
    }

    /// Socket address string for the listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("SERVER_HOST");
            std::env::remove_var("SERVER_PORT");
            std::env::remove_var("LOG_LEVEL");
        }
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        clear_env();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_server_config_from_env() {
        clear_env();
        unsafe {
            std::env::set_var("SERVER_HOST", "127.0.0.1");
            std::env::set_var("SERVER_PORT", "8081");
            std::env::set_var("LOG_LEVEL", "debug");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.address(), "127.0.0.1:8081");
        assert_eq!(config.log_level, "debug");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_server_config_rejects_invalid_port() {
        clear_env();
        unsafe {
            std::env::set_var("SERVER_PORT", "eighty");
        }

        assert!(ServerConfig::from_env().is_err());

        clear_env();
    }
}
