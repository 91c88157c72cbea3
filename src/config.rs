use std::path::PathBuf;

/// Server configuration loaded from environment variables.
pub struct Config {
    pub port: u16,
    /// Path to the SQLite database file. Defaults to
    /// `~/.promptdeck/promptdeck.db` when unset.
    pub database_path: Option<PathBuf>,
    /// Directory with the static client build, served as the router fallback
    /// when present.
    pub static_dir: Option<PathBuf>,
    pub sentry_dsn: Option<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_raw_values(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("DATABASE_PATH").ok().as_deref(),
            std::env::var("STATIC_DIR").ok().as_deref(),
            std::env::var("SENTRY_DSN").ok().as_deref(),
            std::env::var("ENVIRONMENT").ok().as_deref(),
        )
    }

    /// Build a Config from raw string values (as they would come from env
    /// vars). Used directly in tests to avoid mutating process-global
    /// environment.
    pub fn from_raw_values(
        port: Option<&str>,
        database_path: Option<&str>,
        static_dir: Option<&str>,
        sentry_dsn: Option<&str>,
        environment: Option<&str>,
    ) -> Self {
        let port = port.and_then(|v| v.parse().ok()).unwrap_or(8080);

        let database_path = database_path.filter(|s| !s.is_empty()).map(PathBuf::from);
        let static_dir = static_dir.filter(|s| !s.is_empty()).map(PathBuf::from);
        let sentry_dsn = sentry_dsn.filter(|s| !s.is_empty()).map(String::from);

        let environment = environment
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| "local".to_string());

        Config {
            port,
            database_path,
            static_dir,
            sentry_dsn,
            environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_invalid_port_uses_default() {
        let config = Config::from_raw_values(Some("not-a-number"), None, None, None, None);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_config_valid_port() {
        let config = Config::from_raw_values(Some("3000"), None, None, None, None);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_empty_database_path_is_none() {
        let config = Config::from_raw_values(None, Some(""), None, None, None);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_config_database_path() {
        let config = Config::from_raw_values(None, Some("/tmp/prompts.db"), None, None, None);
        assert_eq!(
            config.database_path.as_deref(),
            Some(std::path::Path::new("/tmp/prompts.db"))
        );
    }

    #[test]
    fn test_config_empty_sentry_dsn_is_none() {
        let config = Config::from_raw_values(None, None, None, Some(""), None);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_config_default_environment() {
        let config = Config::from_raw_values(None, None, None, None, None);
        assert_eq!(config.environment, "local");
    }

    #[test]
    fn test_config_custom_environment() {
        let config = Config::from_raw_values(None, None, None, None, Some("production"));
        assert_eq!(config.environment, "production");
    }
}
