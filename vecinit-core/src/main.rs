use crate::config::Config;
use crate::error::Result;
use crate::store::MongoStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod provision;
mod store;

#[cfg(test)]
pub mod _dev_utils;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .with_target(false)
        .init();

    let conf = Config::load_from_env()?;
    let prov_conf = conf.provision_config()?;
    let store = MongoStore::connect(&conf.mongodb.uri).await?;

    let out = provision::provision(&store, &prov_conf).await?;

    info!(
        user_created = out.user_created,
        collection_created = out.collection_created,
        index_created = out.index_created,
        "{:<12} - initialization complete",
        "PROVISION"
    );
    Ok(())
}
