use crate::error::{Error, Result};
use crate::provision::{self, ProvisionConfig, ReadinessPolicy};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_URI: &str = "mongodb://localhost:27017";
const DEFAULT_ADMIN_ROLE: &str = "root";
const DEFAULT_COLLECTION: &str = "vectors";

#[derive(Debug)]
pub struct Config {
    pub mongodb: MongoDb,
    pub readiness: Readiness,
}

pub struct MongoDb {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub admin_role: String,
    pub collection: String,
}

impl core::fmt::Debug for MongoDb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MongoDb")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("admin_role", &self.admin_role)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct Readiness {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

/// A missing .env is fine, containers usually inject the variables directly.
/// A .env that exists but does not parse is an error.
fn accept_dotenv(res: dotenvy::Result<PathBuf>) -> Result<()> {
    match res {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::ConfigDotEnv(e.to_string())),
    }
}

impl Config {
    pub fn load_from_env() -> Result<Config> {
        accept_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let required = |name: &'static str| lookup(name).ok_or(Error::ConfigMissingEnv(name));
        let optional = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.into());
        let int = |name: &str, default: u64| -> Result<u64> {
            match lookup(name) {
                Some(v) => v.trim().parse().map_err(|_| Error::ConfigParseInt {
                    var_name: name.to_string(),
                }),
                None => Ok(default),
            }
        };

        let mongodb = MongoDb {
            uri: optional("MONGODB_URI", DEFAULT_URI),
            user: required("MONGODB_USER")?,
            password: required("MONGODB_PASSWORD")?,
            database: required("MONGODB_DATABASE")?,
            admin_role: optional("MONGODB_ADMIN_ROLE", DEFAULT_ADMIN_ROLE),
            collection: optional("MONGODB_COLLECTION", DEFAULT_COLLECTION),
        };

        let max_attempts = int("READY_MAX_ATTEMPTS", 10)?;
        let readiness = Readiness {
            max_attempts: u32::try_from(max_attempts).map_err(|_| Error::ConfigParseInt {
                var_name: "READY_MAX_ATTEMPTS".to_string(),
            })?,
            initial_backoff_ms: int("READY_INITIAL_BACKOFF_MS", 500)?,
            max_backoff_ms: int("READY_MAX_BACKOFF_MS", 5_000)?,
        };

        Ok(Config { mongodb, readiness })
    }

    /// Builds the validated input for `provision::provision`.
    pub fn provision_config(&self) -> provision::Result<ProvisionConfig> {
        let m = &self.mongodb;
        let readiness = ReadinessPolicy {
            max_attempts: self.readiness.max_attempts,
            initial_backoff: Duration::from_millis(self.readiness.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.readiness.max_backoff_ms),
        };
        Ok(
            ProvisionConfig::new(&m.user, &m.password, &m.database)?
                .with_admin_role(&m.admin_role)?
                .with_collection(&m.collection)?
                .with_readiness(readiness),
        )
    }
}

// endregion: --- Test
