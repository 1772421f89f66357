//! In-process user store for development and tests.
//!
//! The duplicate check and identifier assignment happen under one write
//! lock, so concurrent inserts for the same email store exactly one user.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, User, UserId};

#[derive(Debug, Default)]
struct Store {
    users: Vec<User>,
    /// Lower-cased address to position in `users`.
    by_email: HashMap<String, usize>,
}

/// `UserRepository` backed by a shared in-memory table.
///
/// Identifiers start at `0` and increase by one per insert. Clones share the
/// same table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    /// Empty store; the first insert receives id `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.store.read().await.users.len()
    }

    /// Whether nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let store = self.store.read().await;
        Ok(store
            .by_email
            .get(email.key())
            .and_then(|&index| store.users.get(index))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut store = self.store.write().await;
        if store.by_email.contains_key(user.email.key()) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let index = store.users.len();
        let raw_id = i64::try_from(index)
            .map_err(|_| UserPersistenceError::query("user id space exhausted"))?;
        let id = UserId::new(raw_id).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let user = user.into_user(id);
        store.by_email.insert(user.email().key().to_owned(), index);
        store.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let store = self.store.read().await;
        Ok(usize::try_from(id.value())
            .ok()
            .and_then(|index| store.users.get(index))
            .cloned())
    }
}
