// region:   --- Modules

use std::time::Duration;

use super::error::{Error, Result};
use super::{AdminStore, IndexSpec};
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::Client;
use tracing::debug;

// endregion: --- Modules

const APP_NAME: &str = "vecinit";

// Keep individual pings short so the readiness backoff controls the total wait.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct MongoStore {
    client: Client,
}

fn command_err(op: &'static str) -> impl FnOnce(mongodb::error::Error) -> Error {
    move |e| Error::Command {
        op,
        cause: e.to_string(),
    }
}

impl MongoStore {
    /// Builds a client for `uri`. The driver connects lazily, so this does not
    /// require the server to be up yet.
    pub async fn connect(uri: &str) -> Result<Self> {
        let mut opts = ClientOptions::parse(uri)
            .await
            .map_err(|e| Error::Connect(format!("Invalid connection string: {e}")))?;
        opts.app_name = Some(APP_NAME.to_string());
        opts.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(opts)
            .map_err(|e| Error::Connect(format!("Failed to create mongodb client: {e}")))?;
        Ok(MongoStore { client })
    }
}

// region:   --- reply parsing

/// Whether a `usersInfo` reply lists any user.
fn users_found(reply: &Document) -> Result<bool> {
    let users = reply.get_array("users").map_err(|e| Error::MalformedReply {
        op: "usersInfo",
        cause: e.to_string(),
    })?;
    Ok(!users.is_empty())
}

/// Reads one `$listSearchIndexes` entry. `None` when it is not named like `wanted`.
fn search_index_from_reply(index: &Document, wanted: &IndexSpec) -> Result<Option<IndexSpec>> {
    if index.get_str("name").ok() != Some(wanted.name.as_str()) {
        return Ok(None);
    }
    let definition = index
        .get_document("latestDefinition")
        .map_err(|e| Error::MalformedReply {
            op: "$listSearchIndexes",
            cause: e.to_string(),
        })?;
    IndexSpec::from_definition(&wanted.name, &wanted.path, definition).map(Some)
}

// endregion: --- reply parsing

impl AdminStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(command_err("ping"))?;
        Ok(())
    }

    async fn user_exists(&self, db: &str, user: &str) -> Result<bool> {
        let reply = self
            .client
            .database(db)
            .run_command(doc! { "usersInfo": user })
            .await
            .map_err(command_err("usersInfo"))?;
        users_found(&reply)
    }

    async fn create_user(&self, db: &str, user: &str, password: &str, role: &str) -> Result<()> {
        self.client
            .database(db)
            .run_command(doc! {
                "createUser": user,
                "pwd": password,
                "roles": [role],
            })
            .await
            .map_err(command_err("createUser"))?;
        Ok(())
    }

    async fn list_collection_names(&self, db: &str) -> Result<Vec<String>> {
        self.client
            .database(db)
            .list_collection_names()
            .await
            .map_err(command_err("listCollections"))
    }

    async fn create_collection(&self, db: &str, name: &str) -> Result<()> {
        self.client
            .database(db)
            .create_collection(name)
            .await
            .map_err(command_err("create"))
    }

    async fn find_search_index(
        &self,
        db: &str,
        collection: &str,
        wanted: &IndexSpec,
    ) -> Result<Option<IndexSpec>> {
        let coll = self.client.database(db).collection::<Document>(collection);
        let mut cursor = coll
            .aggregate(vec![doc! { "$listSearchIndexes": { "name": wanted.name.as_str() } }])
            .await
            .map_err(command_err("$listSearchIndexes"))?;

        while let Some(index) = cursor
            .try_next()
            .await
            .map_err(command_err("$listSearchIndexes"))?
        {
            if let Some(spec) = search_index_from_reply(&index, wanted)? {
                debug!("found search index {} on {db}.{collection}: {index}", spec.name);
                return Ok(Some(spec));
            }
        }
        Ok(None)
    }

    async fn create_search_index(
        &self,
        db: &str,
        collection: &str,
        spec: &IndexSpec,
    ) -> Result<()> {
        self.client
            .database(db)
            .run_command(doc! {
                "createSearchIndexes": collection,
                "indexes": [
                    {
                        "name": spec.name.as_str(),
                        "type": "vectorSearch",
                        "definition": spec.definition(),
                    }
                ],
            })
            .await
            .map_err(command_err("createSearchIndexes"))?;
        Ok(())
    }
}

// endregion: --- Test
