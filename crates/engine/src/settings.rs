//! Store settings. Configuration is read from an optional TOML file and from
//! `POINTSBOOK_*` environment variables, the latter taking precedence.
//!
//! ```toml
//! schema_version = 1
//!
//! [database]
//! sqlite = "points.db"
//! ```
use serde::Deserialize;

use crate::ResultBook;

const ENV_PREFIX: &str = "POINTSBOOK";

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

impl Database {
    /// The location handed to [`Store::open`](crate::Store::open).
    pub fn location(&self) -> &str {
        match self {
            Self::Memory => crate::store::MEMORY,
            Self::Sqlite(path) => path,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    pub database: Database,
    /// Version to migrate to on connect. Defaults to the latest known one.
    pub schema_version: Option<i64>,
}

impl StoreSettings {
    pub fn load(path: Option<&str>) -> ResultBook<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&str>, environment: config::Environment) -> ResultBook<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder = builder.add_source(environment);

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn target_version(&self) -> i64 {
        self.schema_version.unwrap_or(migration::LATEST_VERSION)
    }
}

/// Reads `POINTSBOOK_SCHEMA_VERSION`, and either `POINTSBOOK_DATABASE=memory`
/// or `POINTSBOOK_DATABASE__SQLITE=<path>`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
