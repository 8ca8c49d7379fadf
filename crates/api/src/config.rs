//! Application configuration loaded from environment variables.

use messaging::NotificationSettings;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — Postgres store; in-memory store when unset
/// - `TABLE_SERVICE_URL`, `RESTAURANT_SERVICE_URL`,
///   `NOTIFICATION_SERVICE_URL` — remote gateway bases; in-memory
///   gateways when any is unset
/// - `NOTIFY_TO`, `NOTIFY_SUBJECT`, `NOTIFY_BODY` — notification
///   recipient and template
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub table_service_url: Option<String>,
    pub restaurant_service_url: Option<String>,
    pub notification_service_url: Option<String>,
    pub notification: NotificationSettings,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let default_notification = NotificationSettings::default();
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            table_service_url: std::env::var("TABLE_SERVICE_URL").ok(),
            restaurant_service_url: std::env::var("RESTAURANT_SERVICE_URL").ok(),
            notification_service_url: std::env::var("NOTIFICATION_SERVICE_URL").ok(),
            notification: NotificationSettings {
                to: std::env::var("NOTIFY_TO").unwrap_or(default_notification.to),
                subject: std::env::var("NOTIFY_SUBJECT").unwrap_or(default_notification.subject),
                body: std::env::var("NOTIFY_BODY").unwrap_or(default_notification.body),
            },
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when every remote gateway base URL is configured.
    pub fn remote_gateways_configured(&self) -> bool {
        self.table_service_url.is_some()
            && self.restaurant_service_url.is_some()
            && self.notification_service_url.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            table_service_url: None,
            restaurant_service_url: None,
            notification_service_url: None,
            notification: NotificationSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(!config.remote_gateways_configured());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_remote_gateways_need_all_three_urls() {
        let config = Config {
            table_service_url: Some("http://table-service:8082".to_string()),
            restaurant_service_url: Some("http://restaurant-service:8083".to_string()),
            ..Config::default()
        };
        assert!(!config.remote_gateways_configured());
    }
}
