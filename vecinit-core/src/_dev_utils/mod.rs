use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::store::{AdminStore, Error, IndexSpec, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Ping,
    UserExists,
    CreateUser,
    ListCollections,
    CreateCollection,
    FindSearchIndex,
    CreateSearchIndex,
}

#[derive(Default)]
struct Db {
    // user -> role
    users: BTreeMap<String, String>,
    // collection -> index name -> spec
    collections: BTreeMap<String, BTreeMap<String, IndexSpec>>,
}

#[derive(Default)]
struct State {
    dbs: HashMap<String, Db>,
    calls: HashMap<Op, usize>,
    not_ready_for: u32,
    fail_on: Option<Op>,
}

#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<State>>,
}

// Builders.
impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `n` pings fail.
    pub fn not_ready_for(self, n: u32) -> Self {
        self.state.lock().unwrap().not_ready_for = n;
        self
    }

    /// Every call of `op` fails with a command error.
    pub fn fail_on(self, op: Op) -> Self {
        self.state.lock().unwrap().fail_on = Some(op);
        self
    }

    pub fn with_user(self, db: &str, user: &str, role: &str) -> Self {
        self.db_mut(db, |d| {
            d.users.insert(user.to_string(), role.to_string());
        });
        self
    }

    pub fn with_collection(self, db: &str, name: &str) -> Self {
        self.db_mut(db, |d| {
            d.collections.entry(name.to_string()).or_default();
        });
        self
    }

    pub fn with_index(self, db: &str, collection: &str, spec: IndexSpec) -> Self {
        self.db_mut(db, |d| {
            d.collections
                .entry(collection.to_string())
                .or_default()
                .insert(spec.name.clone(), spec);
        });
        self
    }

    fn db_mut(&self, db: &str, f: impl FnOnce(&mut Db)) {
        let mut state = self.state.lock().unwrap();
        f(state.dbs.entry(db.to_string()).or_default());
    }
}

// Inspection.
impl MemStore {
    pub fn calls(&self, op: Op) -> usize {
        self.state.lock().unwrap().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn pings(&self) -> usize {
        self.calls(Op::Ping)
    }

    pub fn users(&self, db: &str) -> Vec<(String, String)> {
        let state = self.state.lock().unwrap();
        state
            .dbs
            .get(db)
            .map(|d| d.users.iter().map(|(u, r)| (u.clone(), r.clone())).collect())
            .unwrap_or_default()
    }

    pub fn collections(&self, db: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .dbs
            .get(db)
            .map(|d| d.collections.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn index(&self, db: &str, collection: &str, name: &str) -> Option<IndexSpec> {
        let state = self.state.lock().unwrap();
        state.dbs.get(db)?.collections.get(collection)?.get(name).cloned()
    }

    pub fn index_count(&self, db: &str, collection: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .dbs
            .get(db)
            .and_then(|d| d.collections.get(collection))
            .map_or(0, |c| c.len())
    }

    /// Records the call and applies failure injection.
    fn enter(&self, op: Op) -> Result<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(op).or_default() += 1;
        if state.fail_on == Some(op) {
            return Err(Error::Command {
                op: "injected",
                cause: format!("{op:?} not authorized"),
            });
        }
        Ok(state)
    }
}

impl AdminStore for MemStore {
    async fn ping(&self) -> Result<()> {
        let mut state = self.enter(Op::Ping)?;
        if state.not_ready_for > 0 {
            state.not_ready_for -= 1;
            return Err(Error::Connect("connection refused".to_string()));
        }
        Ok(())
    }

    async fn user_exists(&self, db: &str, user: &str) -> Result<bool> {
        let state = self.enter(Op::UserExists)?;
        Ok(state
            .dbs
            .get(db)
            .is_some_and(|d| d.users.contains_key(user)))
    }

    async fn create_user(&self, db: &str, user: &str, _password: &str, role: &str) -> Result<()> {
        let mut state = self.enter(Op::CreateUser)?;
        let d = state.dbs.entry(db.to_string()).or_default();
        if d.users.contains_key(user) {
            return Err(Error::Command {
                op: "createUser",
                cause: format!("User \"{user}@{db}\" already exists"),
            });
        }
        d.users.insert(user.to_string(), role.to_string());
        Ok(())
    }

    async fn list_collection_names(&self, db: &str) -> Result<Vec<String>> {
        let state = self.enter(Op::ListCollections)?;
        Ok(state
            .dbs
            .get(db)
            .map(|d| d.collections.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn create_collection(&self, db: &str, name: &str) -> Result<()> {
        let mut state = self.enter(Op::CreateCollection)?;
        let d = state.dbs.entry(db.to_string()).or_default();
        if d.collections.contains_key(name) {
            return Err(Error::Command {
                op: "create",
                cause: format!("Collection {db}.{name} already exists."),
            });
        }
        d.collections.insert(name.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn find_search_index(
        &self,
        db: &str,
        collection: &str,
        wanted: &IndexSpec,
    ) -> Result<Option<IndexSpec>> {
        let state = self.enter(Op::FindSearchIndex)?;
        Ok(state
            .dbs
            .get(db)
            .and_then(|d| d.collections.get(collection))
            .and_then(|c| c.get(&wanted.name))
            .cloned())
    }

    async fn create_search_index(
        &self,
        db: &str,
        collection: &str,
        spec: &IndexSpec,
    ) -> Result<()> {
        let mut state = self.enter(Op::CreateSearchIndex)?;
        let indexes = state
            .dbs
            .get_mut(db)
            .and_then(|d| d.collections.get_mut(collection))
            .ok_or_else(|| Error::Command {
                op: "createSearchIndexes",
                cause: format!("Collection {db}.{collection} does not exist"),
            })?;
        if indexes.contains_key(&spec.name) {
            return Err(Error::Command {
                op: "createSearchIndexes",
                cause: format!("Duplicate Index: {}", spec.name),
            });
        }
        indexes.insert(spec.name.clone(), spec.clone());
        Ok(())
    }
}
