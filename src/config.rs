use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use snafu::ResultExt;

use crate::database::DatabaseConfig;
use crate::error::{ApplicationError, ConfigLoadSnafu};

/// Every variable is read with this prefix, e.g. `VIDEOS_HOST_ADDRESS`.
pub const PREFIX: &str = "VIDEOS_";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,
    #[serde(flatten)]
    pub database: DatabaseConfig,
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Config, ApplicationError> {
        envy::prefixed(PREFIX)
            .from_iter::<_, Config>(vars)
            .context(ConfigLoadSnafu)
    }
}

fn default_host() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_log_filter() -> String {
    "info".to_string()
}
