use std::ops::Deref;

use serde::Deserialize;
use snafu::ResultExt;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use tracing::instrument;
use url::Url;

pub use error::*;

mod error;

/// Storage gateway for the `videos` table.
pub mod videos;

const SETUP: &str = include_str!("../../schema.surrealql");

const IN_MEMORY: &str = "mem://";

/// A connected handle to the database. Cloning it is cheap and shares the underlying connection.
#[derive(Debug, Clone)]
pub struct Backend {
    database: Surreal<Any>,
}

impl Backend {
    /// Connect to the configured endpoint, select the namespace and database and apply the schema.
    #[instrument(skip(config), fields(url = %config.endpoint()))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let database = surrealdb::engine::any::connect(config.endpoint())
            .await
            .context(DatabaseConnectionSnafu {
                url: config.endpoint().to_string(),
                namespace: config.namespace.clone(),
                database: config.database.clone(),
            })?;

        if let Some(credentials) = config.credentials() {
            database
                .signin(credentials)
                .await
                .context(DatabaseConnectionSnafu {
                    url: config.endpoint().to_string(),
                    namespace: config.namespace.clone(),
                    database: config.database.clone(),
                })?;
        }

        database
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .context(DatabaseConnectionSnafu {
                url: config.endpoint().to_string(),
                namespace: config.namespace.clone(),
                database: config.database.clone(),
            })?;

        database
            .query(SETUP)
            .await
            .context(DatabaseSetupSnafu)?
            .check()
            .context(DatabaseSetupSnafu)?;

        tracing::info!(namespace = %config.namespace, database = %config.database, "connected to the database");

        Ok(Self { database })
    }
}

impl Deref for Backend {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Remote endpoint, e.g. `ws://localhost:8000`. Without one the database lives in memory.
    #[serde(rename = "database_url")]
    pub url: Option<Url>,
    #[serde(rename = "database_namespace", default = "default_name")]
    pub namespace: String,
    #[serde(rename = "database_name", default = "default_name")]
    pub database: String,
    #[serde(rename = "database_username")]
    pub username: Option<String>,
    #[serde(rename = "database_password")]
    pub password: Option<String>,
}

impl DatabaseConfig {
    pub fn endpoint(&self) -> &str {
        self.url.as_ref().map_or(IN_MEMORY, Url::as_str)
    }

    fn credentials(&self) -> Option<Root<'_>> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Root { username, password }),
            _ => None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            namespace: default_name(),
            database: default_name(),
            username: None,
            password: None,
        }
    }
}

fn default_name() -> String {
    "videos".to_string()
}

/// A fresh in-memory database with the schema applied.
#[cfg(test)]
pub(crate) async fn memory() -> Backend {
    Backend::connect(&DatabaseConfig::default())
        .await
        .expect("in-memory database should always connect")
}
