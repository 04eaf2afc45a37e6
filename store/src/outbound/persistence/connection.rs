//! Single-use PostgreSQL sessions built from fixed settings.

use std::time::Duration;

use postgres::{Client, Config, NoTls};
use tracing::error;

use crate::config::DatabaseSettings;

const APPLICATION_NAME: &str = "taxbot-store";

/// Errors that can occur while opening a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The server was unreachable or rejected the credentials.
    #[error("failed to connect to database: {message}")]
    Connect {
        /// Detail reported by the driver.
        message: String,
    },

    /// Connection parameters could not be parsed.
    #[error("invalid database configuration: {message}")]
    Config {
        /// Parser output describing the bad parameter.
        message: String,
    },
}

impl ConnectionError {
    /// Build a [`Self::Connect`] error from driver output.
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Build a [`Self::Config`] error from parser output.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Opens one PostgreSQL session per call. Sessions are never reused.
///
/// The returned [`Client`] belongs to the caller and is closed when dropped.
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    config: Config,
}

impl PostgresConnector {
    /// Build a connector from host, database, credentials and port.
    pub fn new(settings: &DatabaseSettings) -> Self {
        let mut config = Config::new();
        config
            .host(settings.host())
            .dbname(settings.name())
            .user(settings.user())
            .port(settings.port())
            .application_name(APPLICATION_NAME);
        if let Some(password) = settings.password() {
            config.password(password);
        }
        Self { config }
    }

    /// Build a connector from a `postgres://` URL or a key/value string.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Config`] when the string cannot be parsed.
    pub fn from_url(database_url: &str) -> Result<Self, ConnectionError> {
        let config = database_url
            .parse::<Config>()
            .map_err(|err| ConnectionError::config(err.to_string()))?;
        Ok(Self { config })
    }

    /// Bound the time spent establishing each session.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout(timeout);
        self
    }

    /// Open a session, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Connect`] for network, authentication or
    /// server errors.
    pub fn try_acquire(&self) -> Result<Client, ConnectionError> {
        self.config
            .connect(NoTls)
            .map_err(|err| ConnectionError::connect(err.to_string()))
    }

    /// Open a session, logging and swallowing any failure.
    pub fn acquire(&self) -> Option<Client> {
        match self.try_acquire() {
            Ok(client) => Some(client),
            Err(err) => {
                error!(error = %err, "database connection unavailable");
                None
            }
        }
    }
}
