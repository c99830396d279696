//! In-memory user document store.
//!
//! Every document carries a version that is bumped on each write. Writers do
//! read -> compute -> `replace_if_version`, so two concurrent updates of the
//! same user cannot silently overwrite each other: the loser gets
//! [`StoreError::VersionConflict`] and has to re-read.

use papo_shared::{UserRecord, UserRole};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("User {0} not found")]
    NotFound(String),

    #[error("User {id} changed concurrently (expected version {expected}, found {found})")]
    VersionConflict { id: String, expected: u64, found: u64 },

    #[error("A user is already registered with email {0}")]
    DuplicateEmail(String),
}

/// A user document plus its write version
#[derive(Debug, Clone)]
pub struct Versioned {
    pub version: u64,
    pub user: UserRecord,
}

#[derive(Default)]
pub struct UserStore {
    docs: RwLock<HashMap<String, Versioned>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new document at version 1
    pub async fn insert(&self, user: UserRecord) -> Result<Versioned, StoreError> {
        let mut docs = self.docs.write().await;
        if let Some(email) = &user.email {
            if docs.values().any(|d| d.user.email.as_deref() == Some(email.as_str())) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }
        let doc = Versioned { version: 1, user };
        docs.insert(doc.user.id.clone(), doc.clone());
        Ok(doc)
    }

    pub async fn get(&self, id: &str) -> Option<Versioned> {
        self.docs.read().await.get(id).cloned()
    }

    /// All users, optionally filtered by role, oldest first
    pub async fn list(&self, role: Option<UserRole>) -> Vec<UserRecord> {
        let docs = self.docs.read().await;
        let mut users: Vec<UserRecord> = docs
            .values()
            .filter(|d| role.map_or(true, |r| d.user.role == r))
            .map(|d| d.user.clone())
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        users
    }

    pub async fn count(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Replace `user` only if the stored version is still `expected`.
    /// Returns the new version.
    pub async fn replace_if_version(&self, expected: u64, user: UserRecord) -> Result<u64, StoreError> {
        let mut docs = self.docs.write().await;
        if let Some(email) = &user.email {
            let taken = docs
                .values()
                .any(|d| d.user.id != user.id && d.user.email.as_deref() == Some(email.as_str()));
            if taken {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }

        let doc = docs
            .get_mut(&user.id)
            .ok_or_else(|| StoreError::NotFound(user.id.clone()))?;
        if doc.version != expected {
            return Err(StoreError::VersionConflict {
                id: user.id.clone(),
                expected,
                found: doc.version,
            });
        }
        doc.version += 1;
        doc.user = user;
        Ok(doc.version)
    }

    /// Modify a document in place right now, as another writer would
    #[cfg(test)]
    pub(crate) fn write_now(&self, id: &str, f: impl FnOnce(&mut UserRecord)) {
        let mut docs = self.docs.try_write().expect("store lock is free");
        let doc = docs.get_mut(id).expect("document exists");
        f(&mut doc.user);
        doc.version += 1;
    }
}
