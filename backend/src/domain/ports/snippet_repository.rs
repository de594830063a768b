//! Driven port for the snippet record store.
//!
//! The store is a key-addressed collaborator: it guarantees that a write or
//! delete of one record is atomic against concurrent operations on the same
//! id. Cross-record ordering is unconstrained.

use async_trait::async_trait;

use crate::domain::{Snippet, SnippetId};

/// Persistence errors raised by snippet store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnippetPersistenceError {
    /// Query or mutation failed during execution.
    #[error("snippet store query failed: {message}")]
    Query { message: String },
}

impl SnippetPersistenceError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Key-addressed snippet record store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Allocate the next store-assigned identifier.
    async fn next_id(&self) -> Result<SnippetId, SnippetPersistenceError>;

    /// Fetch a record by identifier.
    async fn get(&self, id: SnippetId) -> Result<Option<Snippet>, SnippetPersistenceError>;

    /// Insert or replace the record stored under `snippet.id()`.
    async fn put(&self, snippet: &Snippet) -> Result<(), SnippetPersistenceError>;

    /// Remove a record, reporting whether it existed.
    async fn delete(&self, id: SnippetId) -> Result<bool, SnippetPersistenceError>;

    /// All records ordered by id ascending (creation order).
    async fn list_all(&self) -> Result<Vec<Snippet>, SnippetPersistenceError>;
}

/// Fixture store for tests that never touch persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSnippetRepository;

#[async_trait]
impl SnippetRepository for FixtureSnippetRepository {
    async fn next_id(&self) -> Result<SnippetId, SnippetPersistenceError> {
        Ok(SnippetId::new(1))
    }

    async fn get(&self, _id: SnippetId) -> Result<Option<Snippet>, SnippetPersistenceError> {
        Ok(None)
    }

    async fn put(&self, _snippet: &Snippet) -> Result<(), SnippetPersistenceError> {
        Ok(())
    }

    async fn delete(&self, _id: SnippetId) -> Result<bool, SnippetPersistenceError> {
        Ok(false)
    }

    async fn list_all(&self) -> Result<Vec<Snippet>, SnippetPersistenceError> {
        Ok(Vec::new())
    }
}
