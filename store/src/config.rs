//! Database connection settings loaded via OrthoConfig.

use std::fmt;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_NAME: &str = "taxbot";
const DEFAULT_USER: &str = "postgres";
const DEFAULT_PORT: u16 = 5432;

/// Connection parameters for the bot's PostgreSQL database.
///
/// Values come from `TAXBOT_DB_*` environment variables, configuration files,
/// or command-line style arguments. Missing values fall back to local
/// development defaults; the port always carries a value so an empty
/// environment still loads.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TAXBOT_DB")]
pub struct DatabaseSettings {
    /// Server host name or address.
    pub host: Option<String>,
    /// Database name.
    pub name: Option<String>,
    /// Role used to log in.
    pub user: Option<String>,
    /// Password for `user`, if the server requires one.
    pub password: Option<String>,
    /// Server port.
    #[ortho_config(default = 5432)]
    pub port: u16,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: None,
            name: None,
            user: None,
            password: None,
            port: DEFAULT_PORT,
        }
    }
}

impl DatabaseSettings {
    /// Return the configured host, falling back to `localhost`.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured database name, falling back to `taxbot`.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Return the configured login role, falling back to `postgres`.
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_USER)
    }

    /// Return the configured password, if any.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Return the configured port.
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for database settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> DatabaseSettings {
        DatabaseSettings::load_from_iter([OsString::from("taxbot")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("TAXBOT_DB_HOST", None::<String>),
            ("TAXBOT_DB_NAME", None::<String>),
            ("TAXBOT_DB_USER", None::<String>),
            ("TAXBOT_DB_PASSWORD", None::<String>),
            ("TAXBOT_DB_PORT", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.name(), DEFAULT_NAME);
        assert_eq!(settings.user(), DEFAULT_USER);
        assert_eq!(settings.password(), None);
        assert_eq!(settings.port(), DEFAULT_PORT);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TAXBOT_DB_HOST", Some("db.internal".to_owned())),
            ("TAXBOT_DB_NAME", Some("filings".to_owned())),
            ("TAXBOT_DB_USER", Some("bot".to_owned())),
            ("TAXBOT_DB_PASSWORD", Some("hunter2".to_owned())),
            ("TAXBOT_DB_PORT", Some("6543".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.host(), "db.internal");
        assert_eq!(settings.name(), "filings");
        assert_eq!(settings.user(), "bot");
        assert_eq!(settings.password(), Some("hunter2"));
        assert_eq!(settings.port(), 6543);
    }

    #[rstest]
    fn debug_output_redacts_password() {
        let settings = DatabaseSettings {
            password: Some("hunter2".to_owned()),
            ..DatabaseSettings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn empty_environment_loads_with_default_port() {
        let _guard = lock_env([
            ("TAXBOT_DB_HOST", None::<String>),
            ("TAXBOT_DB_NAME", None::<String>),
            ("TAXBOT_DB_USER", None::<String>),
            ("TAXBOT_DB_PASSWORD", None::<String>),
            ("TAXBOT_DB_PORT", None::<String>),
        ]);

        let settings = DatabaseSettings::load_from_iter([OsString::from("taxbot")])
            .expect("an empty environment still loads");
        assert_eq!(settings.port, DEFAULT_PORT);
        assert!(settings.host.is_none());
    }

    #[rstest]
    fn default_matches_the_loaded_defaults() {
        let settings = DatabaseSettings::default();
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(settings.host(), DEFAULT_HOST);
    }
}
