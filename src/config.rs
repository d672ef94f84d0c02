use crate::core::{ExporterError, Result};
use std::time::Duration;

/// Default idle window after which a silent worker's activity gauge is reset.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest accepted idle window.
pub const MAX_IDLE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Exporter configuration
///
/// Built with the setter chain below or filled from command-line flags and
/// environment variables by the binary.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Interface the HTTP listener binds to
    pub host: String,

    /// HTTP listener port
    pub port: u16,

    /// Silence after which a worker's activity entry is evicted
    pub idle_timeout: Duration,
}

impl ExporterConfig {
    /// Create a configuration listening on the given port
    pub fn new(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Set the host
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set idle timeout
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Address the server binds to, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ExporterError::Config("host cannot be empty".to_string()));
        }

        if self.host.chars().any(char::is_whitespace) {
            return Err(ExporterError::Config(format!(
                "invalid host '{}'",
                self.host
            )));
        }

        if self.port == 0 {
            return Err(ExporterError::Config("port must be > 0".to_string()));
        }

        if self.idle_timeout.is_zero() {
            return Err(ExporterError::Config(
                "idle_timeout must be > 0".to_string(),
            ));
        }

        if self.idle_timeout > MAX_IDLE_TIMEOUT {
            return Err(ExporterError::Config(format!(
                "idle_timeout must not exceed {}s",
                MAX_IDLE_TIMEOUT.as_secs()
            )));
        }

        Ok(())
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self::new(8000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExporterConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ExporterConfig::new(9100)
            .host("127.0.0.1")
            .idle_timeout(Duration::from_secs(5));

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9100);
        assert_eq!(config.idle_timeout, Duration::from_secs(5));
        assert_eq!(config.bind_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn test_invalid_config() {
        assert!(ExporterConfig::new(0).validate().is_err());
        assert!(ExporterConfig::default().host("").validate().is_err());
        assert!(ExporterConfig::default().host("not a host").validate().is_err());
        assert!(
            ExporterConfig::default()
                .idle_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_idle_timeout_upper_bound() {
        assert!(
            ExporterConfig::default()
                .idle_timeout(MAX_IDLE_TIMEOUT)
                .validate()
                .is_ok()
        );
        assert!(
            ExporterConfig::default()
                .idle_timeout(Duration::from_secs(u64::MAX))
                .validate()
                .is_err()
        );
    }
}
