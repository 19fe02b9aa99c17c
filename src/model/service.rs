//! Service definitions and database connection settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a monitored service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ServiceId(pub i64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ServiceId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identity of a database connection config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ConnectionConfigId(pub i64);

impl fmt::Display for ConnectionConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ConnectionConfigId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// The category of probe a service requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckKind {
    Http,
    Database,
    /// Declared by the catalog but not probed yet.
    Kafka,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Http => "HTTP",
            CheckKind::Database => "DATABASE",
            CheckKind::Kafka => "KAFKA",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service to be probed once per cycle.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceDefinition {
    pub id: ServiceId,

    /// Display name used in logs and metrics.
    pub name: String,

    pub check_kind: CheckKind,

    /// Target URL for HTTP checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Connection config referenced by DATABASE checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_config_id: Option<ConnectionConfigId>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ServiceDefinition {
    /// An active HTTP service.
    pub fn http(id: i64, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: ServiceId(id),
            name: name.into(),
            check_kind: CheckKind::Http,
            url: Some(url.into()),
            database_config_id: None,
            is_active: true,
        }
    }

    /// An active DATABASE service pointing at `config_id`.
    pub fn database(id: i64, name: impl Into<String>, config_id: i64) -> Self {
        Self {
            id: ServiceId(id),
            name: name.into(),
            check_kind: CheckKind::Database,
            url: None,
            database_config_id: Some(ConnectionConfigId(config_id)),
            is_active: true,
        }
    }
}

/// Connection settings for a DATABASE target.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub id: ConnectionConfigId,

    #[serde(default)]
    pub name: String,

    /// Driver URL, e.g. `postgres://db:5432/app` or `sqlite::memory:`.
    pub connection_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Scheme to assume when `connection_url` has none (e.g. "postgres").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

impl ConnectionConfig {
    pub fn new(id: i64, connection_url: impl Into<String>) -> Self {
        Self {
            id: ConnectionConfigId(id),
            name: String::new(),
            connection_url: connection_url.into(),
            username: None,
            password: None,
            driver: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

// Keeps the password out of logs.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("connection_url", &self.connection_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("driver", &self.driver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_kind_wire_names() {
        let kind: CheckKind = serde_json::from_str("\"DATABASE\"").unwrap();
        assert_eq!(kind, CheckKind::Database);
        assert_eq!(serde_json::to_string(&CheckKind::Http).unwrap(), "\"HTTP\"");
        assert_eq!(CheckKind::Kafka.to_string(), "KAFKA");
    }

    #[test]
    fn test_service_definition_defaults_to_active() {
        let service: ServiceDefinition = toml::from_str(
            r#"
            id = 7
            name = "billing"
            check_kind = "HTTP"
            url = "http://billing.internal/health"
            "#,
        )
        .unwrap();

        assert!(service.is_active);
        assert_eq!(service.id, ServiceId(7));
        assert!(service.database_config_id.is_none());
    }

    #[test]
    fn test_connection_config_hides_password() {
        let config = ConnectionConfig::new(1, "postgres://db/app").with_credentials("app", "s3cret");

        assert!(!format!("{:?}", config).contains("s3cret"));
        assert!(!serde_json::to_string(&config).unwrap().contains("s3cret"));
    }
}
