// crates/laptop-store/src/user.rs
//
// In-memory user table implementing the `UserStore` trait.
// Populated at daemon startup and only read afterwards.

use std::collections::HashMap;
use std::sync::RwLock;

use laptop_core::error::LaptopError;
use laptop_core::traits::UserStore;
use laptop_core::user::User;

use crate::poisoned;

/// In-memory user table keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn save(&self, user: &User) -> Result<(), LaptopError> {
        let mut users = self.users.write().map_err(poisoned)?;

        if users.contains_key(&user.username) {
            return Err(LaptopError::AlreadyExists(format!("user {}", user.username)));
        }

        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    fn find(&self, username: &str) -> Result<Option<User>, LaptopError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(username).cloned())
    }
}
