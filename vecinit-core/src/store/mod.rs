// region:   --- Modules

mod error;
mod index_spec;
mod mongo_store;

pub use self::error::{Error, Result};
pub use self::index_spec::{IndexSpec, Similarity};
pub use self::mongo_store::MongoStore;

// endregion: --- Modules

/// Administrative calls the provisioner issues against a database server.
///
/// `db` always names the scope the call runs in; selecting a scope has no
/// side effect on the server.
pub trait AdminStore {
    async fn ping(&self) -> Result<()>;

    async fn user_exists(&self, db: &str, user: &str) -> Result<bool>;
    async fn create_user(&self, db: &str, user: &str, password: &str, role: &str) -> Result<()>;

    async fn list_collection_names(&self, db: &str) -> Result<Vec<String>>;
    async fn create_collection(&self, db: &str, name: &str) -> Result<()>;

    /// Returns the search index named like `wanted`, if one is defined on the
    /// collection, read at `wanted.path`.
    async fn find_search_index(
        &self,
        db: &str,
        collection: &str,
        wanted: &IndexSpec,
    ) -> Result<Option<IndexSpec>>;
    async fn create_search_index(&self, db: &str, collection: &str, spec: &IndexSpec)
        -> Result<()>;
}
