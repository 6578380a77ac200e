//! Configuration loading
//!
//! Database connection settings come from environment variables, optionally
//! read from a .env file first. Generation settings (namespaces, output
//! path, table filter, ordering boosts) live in a plain run-scoped struct
//! constructed per invocation.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, error, trace, warn};

use crate::catalog::TableFilter;
use crate::error::ForgeError;

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    /// Load configuration from environment variables
    ///
    /// Expected variables:
    /// - DB_HOST (default: localhost)
    /// - DB_PORT (default: 5432)
    /// - DB_NAME (required)
    /// - DB_USER (required)
    /// - DB_PASSWORD (required)
    pub fn from_env() -> Result<Self, ForgeError> {
        debug!("Loading database configuration from environment");

        let host = env::var("DB_HOST").unwrap_or_else(|_| {
            trace!("DB_HOST not set, using default");
            "localhost".to_string()
        });

        let port_str = env::var("DB_PORT").unwrap_or_else(|_| {
            trace!("DB_PORT not set, using default");
            "5432".to_string()
        });

        let port = port_str.parse::<u16>().map_err(|e| {
            error!(port = ?port_str, error = ?e, "Invalid DB_PORT value");
            ForgeError::Config("DB_PORT must be a valid port number".to_string())
        })?;

        let database = env::var("DB_NAME").map_err(|_| {
            error!("DB_NAME environment variable is not set");
            ForgeError::Config("DB_NAME environment variable is required".to_string())
        })?;

        let user = env::var("DB_USER").map_err(|_| {
            error!("DB_USER environment variable is not set");
            ForgeError::Config("DB_USER environment variable is required".to_string())
        })?;

        let password = env::var("DB_PASSWORD").map_err(|_| {
            error!("DB_PASSWORD environment variable is not set");
            ForgeError::Config("DB_PASSWORD environment variable is required".to_string())
        })?;

        debug!(host = ?host, port = ?port, database = ?database, user = ?user, "Configuration loaded");

        Ok(Self {
            host,
            port,
            database,
            user,
            password,
        })
    }

    /// Load a .env file and then read configuration from environment
    pub fn load(env_file: &Path) -> Result<Self, ForgeError> {
        if env_file.exists() {
            debug!(path = ?env_file, "Loading environment file");
            dotenvy::from_path(env_file).map_err(|e| {
                error!(path = ?env_file, error = ?e, "Failed to load environment file");
                ForgeError::Config(format!("Failed to load {}: {}", env_file.display(), e))
            })?;
        } else {
            warn!(path = ?env_file, "Environment file not found, using existing environment");
        }

        Self::from_env()
    }

    /// Build a PostgreSQL connection string
    pub fn postgres_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }

    /// Build a connection string with password redacted (for error messages)
    pub fn redacted_connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password=***",
            self.host, self.port, self.database, self.user
        )
    }
}

/// Run-scoped generation settings
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Primary catalog namespace to generate for
    pub namespace: String,
    /// Auxiliary namespaces scanned in the same run
    pub aux_namespaces: Vec<String>,
    /// Project identifier used only to select which catalog to introspect
    pub project: String,
    pub output_path: PathBuf,
    pub filter: TableFilter,
    /// Manual heuristic-ordering boosts, table name to rank delta
    pub boosts: BTreeMap<String, i64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            namespace: "public".to_string(),
            aux_namespaces: vec!["auth".to_string()],
            project: String::new(),
            output_path: PathBuf::from("./generated"),
            filter: TableFilter::default(),
            boosts: BTreeMap::new(),
        }
    }
}
