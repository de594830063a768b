//! Driving ports for snippet actions.
//!
//! Inbound adapters (HTTP handlers) call these use-case ports without
//! importing outbound persistence concerns. Production backs them with
//! [`crate::domain::SnippetService`]; handler tests use mocks.

use async_trait::async_trait;

use crate::domain::permissions::Caller;
use crate::domain::{Error, Snippet, SnippetDraft, SnippetId};

/// Read-class snippet actions, open to any caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetsQuery: Send + Sync {
    /// All snippets in creation order.
    async fn list(&self) -> Result<Vec<Snippet>, Error>;

    /// A single snippet by id.
    async fn get(&self, id: SnippetId) -> Result<Snippet, Error>;

    /// The cached rendering of a single snippet.
    async fn highlighted(&self, id: SnippetId) -> Result<String, Error>;
}

/// Write-class snippet actions, gated by the permission policies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetsCommand: Send + Sync {
    /// Create a snippet owned by the calling user.
    async fn create(&self, caller: &Caller, draft: SnippetDraft) -> Result<Snippet, Error>;

    /// Overlay the supplied fields onto an existing snippet.
    async fn update(
        &self,
        caller: &Caller,
        id: SnippetId,
        draft: SnippetDraft,
    ) -> Result<Snippet, Error>;

    /// Remove a snippet.
    async fn delete(&self, caller: &Caller, id: SnippetId) -> Result<(), Error>;
}
