//! HTTP server configuration

use serde::Deserialize;

/// Server settings read from the environment
///
/// # Environment Variables
/// - `PORT`: Listen port (default: 5000)
/// - `SECURE_COOKIES`: Mark the session cookie `Secure; SameSite=None` (default: false)
/// - `SESSION_TTL_SECONDS`: Session lifetime (default: 86400, one day)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub secure_cookies: bool,
    pub session_ttl_seconds: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("port", 5000_i64)?
            .set_default("secure_cookies", false)?
            .set_default("session_ttl_seconds", 86_400_i64)?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("SECURE_COOKIES");
            std::env::remove_var("SESSION_TTL_SECONDS");
        }
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        clear_env();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 5000);
        assert!(!config.secure_cookies);
        assert_eq!(config.session_ttl_seconds, 86_400);
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
    }

    #[test]
    #[serial]
    fn test_server_config_from_env() {
        clear_env();
        unsafe {
            std::env::set_var("PORT", "8080");
            std::env::set_var("SECURE_COOKIES", "true");
            std::env::set_var("SESSION_TTL_SECONDS", "3600");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.secure_cookies);
        assert_eq!(config.session_ttl_seconds, 3600);

        clear_env();
    }
}
