use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the server, the notification hub and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub hub: HubSettings,
    pub log: LogSettings,
}

/// Configuration settings for the server.
///
/// Defines the host and port the WebSocket server will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which [`Hub`](crate::domain::Hub) implementation to run.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Journal,
}

/// Configuration settings for the notification hub.
///
/// Zero values for the deadline, retention and entry limit mean "no limit".
#[derive(Debug, Deserialize, Clone)]
pub struct HubSettings {
    pub backend: Backend,
    pub write_timeout_ms: u64,
    pub publish_deadline_ms: Option<u64>,
    pub journal_path: String,
    pub journal_retention_secs: u64,
    pub journal_max_entries: usize,
}

impl HubSettings {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms.max(1))
    }

    pub fn publish_deadline(&self) -> Option<Duration> {
        self.publish_deadline_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn journal_retention(&self) -> Option<Duration> {
        (self.journal_retention_secs > 0).then(|| Duration::from_secs(self.journal_retention_secs))
    }

    pub fn journal_max_entries(&self) -> Option<usize> {
        (self.journal_max_entries > 0).then_some(self.journal_max_entries)
    }
}

/// Logging settings.
#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub hub: Option<PartialHubSettings>,
    pub log: Option<PartialLogSettings>,
}

/// Partial server settings.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Partial hub settings.
#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub backend: Option<Backend>,
    pub write_timeout_ms: Option<u64>,
    pub publish_deadline_ms: Option<u64>,
    pub journal_path: Option<String>,
    pub journal_retention_secs: Option<u64>,
    pub journal_max_entries: Option<usize>,
}

/// Partial logging settings.
#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Settings {
    /// Fills every value missing from `partial` with its default.
    pub fn merge(partial: PartialSettings) -> Self {
        let default = Settings::default();
        let server = partial.server;
        let hub = partial.hub;
        let log = partial.log;

        Settings {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(default.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(default.server.port),
            },
            hub: HubSettings {
                backend: hub
                    .as_ref()
                    .and_then(|h| h.backend)
                    .unwrap_or(default.hub.backend),
                write_timeout_ms: hub
                    .as_ref()
                    .and_then(|h| h.write_timeout_ms)
                    .unwrap_or(default.hub.write_timeout_ms),
                publish_deadline_ms: hub
                    .as_ref()
                    .and_then(|h| h.publish_deadline_ms)
                    .or(default.hub.publish_deadline_ms),
                journal_path: hub
                    .as_ref()
                    .and_then(|h| h.journal_path.clone())
                    .unwrap_or(default.hub.journal_path),
                journal_retention_secs: hub
                    .as_ref()
                    .and_then(|h| h.journal_retention_secs)
                    .unwrap_or(default.hub.journal_retention_secs),
                journal_max_entries: hub
                    .as_ref()
                    .and_then(|h| h.journal_max_entries)
                    .unwrap_or(default.hub.journal_max_entries),
            },
            log: LogSettings {
                level: log
                    .and_then(|l| l.level)
                    .unwrap_or(default.log.level),
            },
        }
    }
}

/// Provides default values for `Settings`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            hub: HubSettings {
                backend: Backend::Memory,
                write_timeout_ms: 5000,
                publish_deadline_ms: None,
                journal_path: "notihub_journal".to_string(),
                journal_retention_secs: 3600,
                journal_max_entries: 10_000,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
