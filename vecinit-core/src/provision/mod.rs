// region:   --- Modules

mod error;
mod readiness;

pub use self::error::{Error, Result, Step};
pub use self::readiness::{wait_until_ready, ReadinessPolicy};
pub use crate::store::IndexSpec;

use crate::store::AdminStore;
use tracing::{error, info};

// endregion: --- Modules

const ADMIN_DB: &str = "admin";

pub struct ProvisionConfig {
    user: String,
    password: String,
    database: String,
    admin_role: String,
    collection: String,
    index: IndexSpec,
    readiness: ReadinessPolicy,
}

// Constructors.
impl ProvisionConfig {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Result<Self> {
        Ok(ProvisionConfig {
            user: non_empty("user", user.into())?,
            password: non_empty("password", password.into())?,
            database: non_empty("database", database.into())?,
            admin_role: "root".to_string(),
            collection: "vectors".to_string(),
            index: IndexSpec::default(),
            readiness: ReadinessPolicy::default(),
        })
    }

    pub fn with_admin_role(mut self, role: impl Into<String>) -> Result<Self> {
        self.admin_role = non_empty("admin_role", role.into())?;
        Ok(self)
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Result<Self> {
        self.collection = non_empty("collection", collection.into())?;
        Ok(self)
    }

    pub fn with_readiness(mut self, readiness: ReadinessPolicy) -> Self {
        self.readiness = readiness;
        self
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(Error::MissingField(field))
    } else {
        Ok(value)
    }
}

/// What a `provision` run had to create. All `false` on a re-run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub user_created: bool,
    pub collection_created: bool,
    pub index_created: bool,
}

/// Runs the whole sequence, logging the error before handing it back.
pub async fn provision(store: &impl AdminStore, cfg: &ProvisionConfig) -> Result<Provisioned> {
    info!("{:<12} - starting initialization", "PROVISION");
    run(store, cfg).await.inspect_err(|err| {
        error!("{:<12} - Error during initialization: {err}", "PROVISION");
    })
}

async fn run(store: &impl AdminStore, cfg: &ProvisionConfig) -> Result<Provisioned> {
    wait_until_ready(store, &cfg.readiness).await?;

    let user_created = ensure_admin_user(store, cfg).await?;

    let db = cfg.database.as_str();
    let collection_created = ensure_collection(store, db, &cfg.collection).await?;
    let index_created = ensure_search_index(store, db, &cfg.collection, &cfg.index).await?;

    Ok(Provisioned {
        user_created,
        collection_created,
        index_created,
    })
}

async fn ensure_admin_user(store: &impl AdminStore, cfg: &ProvisionConfig) -> Result<bool> {
    let exists = store
        .user_exists(ADMIN_DB, &cfg.user)
        .await
        .map_err(Error::step(Step::AdminUser))?;
    if exists {
        info!("{:<12} - user {} already exists", "PROVISION", cfg.user);
        return Ok(false);
    }
    store
        .create_user(ADMIN_DB, &cfg.user, &cfg.password, &cfg.admin_role)
        .await
        .map_err(Error::step(Step::AdminUser))?;
    info!(
        "{:<12} - created user {} with role {}",
        "PROVISION", cfg.user, cfg.admin_role
    );
    Ok(true)
}

async fn ensure_collection(store: &impl AdminStore, db: &str, collection: &str) -> Result<bool> {
    let names = store
        .list_collection_names(db)
        .await
        .map_err(Error::step(Step::Collection))?;
    if names.iter().any(|n| n == collection) {
        info!("{:<12} - collection {db}.{collection} already exists", "PROVISION");
        return Ok(false);
    }
    store
        .create_collection(db, collection)
        .await
        .map_err(Error::step(Step::Collection))?;
    info!("{:<12} - created collection {db}.{collection}", "PROVISION");
    Ok(true)
}

async fn ensure_search_index(
    store: &impl AdminStore,
    db: &str,
    collection: &str,
    spec: &IndexSpec,
) -> Result<bool> {
    let existing = store
        .find_search_index(db, collection, spec)
        .await
        .map_err(Error::step(Step::SearchIndex))?;
    match existing {
        Some(existing) if existing == *spec => {
            info!("{:<12} - search index {} already exists", "PROVISION", spec.name);
            Ok(false)
        }
        // Same name, different definition: never redefine silently.
        Some(existing) => Err(Error::IndexConflict {
            name: spec.name.clone(),
            existing,
            wanted: spec.clone(),
        }),
        None => {
            store
                .create_search_index(db, collection, spec)
                .await
                .map_err(Error::step(Step::SearchIndex))?;
            info!("{:<12} - created search index {}", "PROVISION", spec.name);
            Ok(true)
        }
    }
}

// endregion: --- Test
