//! Layered configuration.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use photobook_error::{ConfigError, PhotobookError, PhotobookResult};
use photobook_purge::PurgeConfig;
use photobook_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../photobook.toml");

/// Environment prefix; `PHOTOBOOK__PURGE__STAGING_MAX_AGE_SECS` sets
/// `purge.staging_max_age_secs`.
const ENV_PREFIX: &str = "PHOTOBOOK";

/// Connection pool settings. The connection string comes from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct DatabaseConfig {
    /// Maximum pooled connections
    #[serde(default = "default_pool_size")]
    pool_size: u32,
}

fn default_pool_size() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
        }
    }
}

/// Complete service configuration, built once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PhotobookConfig {
    /// Upload storage
    #[serde(default)]
    storage: StorageConfig,

    /// Garbage collection schedules
    #[serde(default)]
    purge: PurgeConfig,

    /// Record store pool
    #[serde(default)]
    database: DatabaseConfig,
}

impl PhotobookConfig {
    /// Configuration from explicit parts.
    pub fn new(storage: StorageConfig, purge: PurgeConfig) -> Self {
        Self {
            storage,
            purge,
            database: DatabaseConfig::default(),
        }
    }

    /// Load configuration from a single file, ignoring defaults and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> PhotobookResult<Self> {
        debug!("Loading configuration from file");
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                PhotobookError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?;
        Self::finish(config)
    }

    /// Load configuration with precedence (later sources override earlier):
    ///
    /// 1. Bundled defaults
    /// 2. `~/.config/photobook/photobook.toml`
    /// 3. `./photobook.toml`
    /// 4. `explicit`, if given (must exist)
    /// 5. `PHOTOBOOK__*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a schedule is invalid.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> PhotobookResult<Self> {
        Self::layered(explicit, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("storage.allowed_content_types")
    }

    fn layered(explicit: Option<&Path>, environment: Environment) -> PhotobookResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/photobook/photobook.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder = builder.add_source(File::with_name("photobook").required(false));

        if let Some(path) = explicit {
            debug!(path = %path.display(), "Adding explicit configuration file");
            builder = builder.add_source(File::from(path));
        }

        let config = builder.add_source(environment).build().map_err(|e| {
            PhotobookError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?;
        Self::finish(config)
    }

    fn finish(config: Config) -> PhotobookResult<Self> {
        let parsed: Self = config.try_deserialize().map_err(|e| {
            PhotobookError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })?;
        parsed.purge.validate()?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PhotobookConfig::environment().source(Some(map))
    }

    #[test]
    fn bundled_defaults_parse() {
        let parsed: PhotobookConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed.storage(), &StorageConfig::default());
        assert_eq!(parsed.purge(), &PurgeConfig::default());
        assert_eq!(*parsed.database().pool_size(), 10);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = PhotobookConfig::layered(
            None,
            env(&[
                ("PHOTOBOOK__STORAGE__UPLOADS_DIR", "/srv/media"),
                ("PHOTOBOOK__PURGE__STAGING_MAX_AGE_SECS", "60"),
            ]),
        )
        .unwrap();

        assert_eq!(config.storage().uploads_dir(), Path::new("/srv/media"));
        assert_eq!(*config.purge().staging_max_age_secs(), 60);
    }

    #[test]
    fn environment_parses_content_type_list() {
        let config = PhotobookConfig::layered(
            None,
            env(&[("PHOTOBOOK__STORAGE__ALLOWED_CONTENT_TYPES", "image/png,image/gif")]),
        )
        .unwrap();

        assert_eq!(
            config.storage().allowed_content_types(),
            &vec!["image/png".to_string(), "image/gif".to_string()]
        );
    }

    #[test]
    fn invalid_cron_in_environment_rejected() {
        let result = PhotobookConfig::layered(
            None,
            env(&[("PHOTOBOOK__PURGE__PHOTOS__EXPRESSION", "whenever")]),
        );
        assert!(result.is_err());
    }
}
