use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::store::StoreConfig;

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub store: StoreSection,
    pub seed: SeedSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("SONG_CATALOG_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SONG_CATALOG")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings
            .try_deserialize()
            .context("invalid configuration")?;

        // The original deployment configured the store through bare
        // MONGODB_* variables; they stay the contractual surface and win
        // over file and prefixed-env settings.
        config.store.apply_env_overrides()?;

        Ok(config)
    }

    /// Resolve the runtime store configuration, validating required settings.
    ///
    /// A missing store host is a startup-fatal error: the process must not
    /// serve requests without a store behind it.
    pub fn store_runtime(&self) -> Result<StoreConfig> {
        match self.store.backend {
            StoreBackendKind::Memory => Ok(StoreConfig::Memory),
            StoreBackendKind::Mongo => {
                let service = match self.store.service.as_deref().map(str::trim) {
                    Some(service) if !service.is_empty() => service,
                    _ => bail!(
                        "missing MongoDB server: set MONGODB_SERVICE or store.service"
                    ),
                };

                Ok(StoreConfig::Mongo {
                    uri: self.store.connection_uri(service),
                    database: self.store.database.clone(),
                    collection: self.store.collection.clone(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: StoreBackendKind,
    pub service: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub database: String,
    pub collection: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Mongo,
            service: None,
            username: None,
            password: None,
            port: None,
            database: "songs".to_string(),
            collection: "songs".to_string(),
        }
    }
}

impl StoreSection {
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(service) = non_empty_env("MONGODB_SERVICE") {
            self.service = Some(service);
        }
        if let Some(username) = non_empty_env("MONGODB_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = non_empty_env("MONGODB_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(port) = non_empty_env("MONGODB_PORT") {
            let port = port
                .parse()
                .with_context(|| format!("MONGODB_PORT must be an integer, got '{port}'"))?;
            self.port = Some(port);
        }

        Ok(())
    }

    /// Connection URI; credentials are embedded only when both parts are set.
    fn connection_uri(&self, service: &str) -> String {
        let host = match self.port {
            Some(port) => format!("{service}:{port}"),
            None => service.to_string(),
        };

        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                format!("mongodb://{username}:{password}@{host}")
            }
            _ => format!("mongodb://{host}"),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SeedSection {
    /// Optional path overriding the bundled dataset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "song_catalog=info,tower_http=info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
