//! In-memory adapters for the record store and user directory ports.
//!
//! The snippet store keeps records behind a single lock, which makes each
//! read-modify-write of one record atomic and serializable against concurrent
//! operations on the same id — the guarantee the domain requires from its
//! record store. Ids are allocated from an atomic counter starting at 1.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use crate::domain::ports::{
    SnippetPersistenceError, SnippetRepository, UserDirectory, UserDirectoryError,
};
use crate::domain::{Snippet, SnippetId, User, UserId};

/// Lock-guarded map of snippet records keyed by id.
#[derive(Debug, Default)]
pub struct InMemorySnippetStore {
    records: RwLock<BTreeMap<i64, Snippet>>,
    next_id: AtomicI64,
}

impl InMemorySnippetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> SnippetPersistenceError {
        SnippetPersistenceError::query("snippet store lock poisoned")
    }
}

#[async_trait]
impl SnippetRepository for InMemorySnippetStore {
    async fn next_id(&self) -> Result<SnippetId, SnippetPersistenceError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(SnippetId::new(id))
    }

    async fn get(&self, id: SnippetId) -> Result<Option<Snippet>, SnippetPersistenceError> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.get(&id.value()).cloned())
    }

    async fn put(&self, snippet: &Snippet) -> Result<(), SnippetPersistenceError> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        records.insert(snippet.id().value(), snippet.clone());
        Ok(())
    }

    async fn delete(&self, id: SnippetId) -> Result<bool, SnippetPersistenceError> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        Ok(records.remove(&id.value()).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Snippet>, SnippetPersistenceError> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        // BTreeMap iteration order is id ascending, i.e. creation order.
        Ok(records.values().cloned().collect())
    }
}

#[derive(Debug, Clone)]
struct SeededUser {
    user: User,
    password: String,
}

/// Seeded, read-only user directory.
///
/// Accounts are provided at bootstrap and never change afterwards; passwords
/// are compared in memory. Account management proper lives outside this
/// service.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: Vec<SeededUser>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a seeded account.
    pub fn with_user(mut self, user: User, password: impl Into<String>) -> Self {
        self.users.push(SeededUser {
            user,
            password: password.into(),
        });
        self
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list(&self) -> Result<Vec<User>, UserDirectoryError> {
        let mut users: Vec<User> = self.users.iter().map(|seed| seed.user.clone()).collect();
        users.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(users)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(self
            .users
            .iter()
            .find(|seed| seed.user.id() == id)
            .map(|seed| seed.user.clone()))
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, UserDirectoryError> {
        Ok(self
            .users
            .iter()
            .find(|seed| seed.user.username().as_ref() == username && seed.password == password)
            .map(|seed| seed.user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SnippetContent, Username};
    use chrono::Utc;
    use rstest::rstest;

    fn snippet(id: i64, owner: &User) -> Snippet {
        Snippet::new(
            SnippetId::new(id),
            Utc::now(),
            SnippetContent {
                title: String::new(),
                code: "x = 1".to_owned(),
                line_numbers: false,
                language: "Python".to_owned(),
                style: "InspiredGitHub".to_owned(),
            },
            owner.clone(),
            "<html/>".to_owned(),
        )
    }

    fn user(name: &str) -> User {
        User::new(UserId::random(), Username::new(name).expect("username"))
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let store = InMemorySnippetStore::new();
        assert_eq!(store.next_id().await.expect("id"), SnippetId::new(1));
        assert_eq!(store.next_id().await.expect("id"), SnippetId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn records_round_trip_and_list_in_id_order() {
        let store = InMemorySnippetStore::new();
        let owner = user("ada");
        store.put(&snippet(2, &owner)).await.expect("put");
        store.put(&snippet(1, &owner)).await.expect("put");

        let listed = store.list_all().await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id(), SnippetId::new(1));
        assert_eq!(listed[1].id(), SnippetId::new(2));

        let fetched = store.get(SnippetId::new(2)).await.expect("get");
        assert_eq!(fetched.as_ref().map(Snippet::id), Some(SnippetId::new(2)));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_whether_the_record_existed() {
        let store = InMemorySnippetStore::new();
        let owner = user("ada");
        store.put(&snippet(1, &owner)).await.expect("put");

        assert!(store.delete(SnippetId::new(1)).await.expect("delete"));
        assert!(!store.delete(SnippetId::new(1)).await.expect("delete"));
        assert!(store.get(SnippetId::new(1)).await.expect("get").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn directory_verifies_credentials_and_lists_by_username() {
        let ada = user("ada");
        let grace = user("grace");
        let directory = InMemoryUserDirectory::new()
            .with_user(grace.clone(), "gr4ce")
            .with_user(ada.clone(), "secret");

        let verified = directory
            .verify_credentials("ada", "secret")
            .await
            .expect("lookup");
        assert_eq!(verified.as_ref(), Some(&ada));

        let rejected = directory
            .verify_credentials("ada", "wrong")
            .await
            .expect("lookup");
        assert!(rejected.is_none());

        let listed = directory.list().await.expect("list");
        assert_eq!(listed, vec![ada.clone(), grace]);

        let found = directory.find_by_id(ada.id()).await.expect("lookup");
        assert_eq!(found, Some(ada));
    }
}
