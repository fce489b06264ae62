use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// Process-local credential store.
///
/// The uniqueness check and the insert happen under one write lock, so
/// concurrent registrations of the same email cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: HashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserSaver for InMemoryUserRepository {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StorageError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let id = UserId(state.last_id + 1);

        match state.users.entry(email.to_string()) {
            Entry::Occupied(_) => Err(StorageError::UserExists(email.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(User {
                    id,
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                });
                state.last_id = id.0;
                Ok(id)
            }
        }
    }
}

#[async_trait]
impl UserProvider for InMemoryUserRepository {
    async fn user(&self, email: &str) -> Result<User, StorageError> {
        self.state
            .read()
            .await
            .users
            .get(email)
            .cloned()
            .ok_or_else(|| StorageError::UserNotFound(email.to_string()))
    }
}
