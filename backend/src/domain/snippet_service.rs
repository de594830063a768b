//! Snippet use-case service.
//!
//! Implements the driving ports by binding together the record store, the
//! user directory, the permission policies, and the highlight transform. The
//! rendering is recomputed as an explicit step before every store write, so a
//! record at rest can never carry a stale `highlighted` field.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::domain::highlight::HighlightRegistry;
use crate::domain::permissions::{Action, Caller, authenticated_or_read_only, owner_or_read_only};
use crate::domain::ports::{
    SnippetPersistenceError, SnippetRepository, SnippetsCommand, SnippetsQuery, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{Error, Snippet, SnippetDraft, SnippetId, User};

/// Service implementing [`SnippetsQuery`] and [`SnippetsCommand`].
#[derive(Clone)]
pub struct SnippetService<R, D> {
    repo: Arc<R>,
    directory: Arc<D>,
    registry: Arc<HighlightRegistry>,
}

impl<R, D> SnippetService<R, D> {
    /// Create a new service over the given collaborators.
    pub fn new(repo: Arc<R>, directory: Arc<D>, registry: Arc<HighlightRegistry>) -> Self {
        Self {
            repo,
            directory,
            registry,
        }
    }
}

impl<R, D> SnippetService<R, D>
where
    R: SnippetRepository,
    D: UserDirectory,
{
    fn map_store_error(error: SnippetPersistenceError) -> Error {
        Error::internal(format!("snippet store failure: {error}"))
    }

    fn map_directory_error(error: UserDirectoryError) -> Error {
        Error::internal(format!("user directory failure: {error}"))
    }

    fn not_found(id: SnippetId) -> Error {
        Error::not_found(format!("snippet {id} not found"))
    }

    async fn resolve_owner(&self, caller: &Caller) -> Result<User, Error> {
        let id = caller
            .user_id()
            .ok_or_else(|| Error::unauthorized("authentication required"))?;
        self.directory
            .find_by_id(id)
            .await
            .map_err(Self::map_directory_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }

    /// Locate the target record, surfacing not-found before any object-level
    /// permission check can run.
    async fn fetch(&self, id: SnippetId) -> Result<Snippet, Error> {
        self.repo
            .get(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Self::not_found(id))
    }
}

#[async_trait]
impl<R, D> SnippetsQuery for SnippetService<R, D>
where
    R: SnippetRepository,
    D: UserDirectory,
{
    async fn list(&self) -> Result<Vec<Snippet>, Error> {
        self.repo.list_all().await.map_err(Self::map_store_error)
    }

    async fn get(&self, id: SnippetId) -> Result<Snippet, Error> {
        self.fetch(id).await
    }

    async fn highlighted(&self, id: SnippetId) -> Result<String, Error> {
        let snippet = self.fetch(id).await?;
        Ok(snippet.highlighted().to_owned())
    }
}

#[async_trait]
impl<R, D> SnippetsCommand for SnippetService<R, D>
where
    R: SnippetRepository,
    D: UserDirectory,
{
    async fn create(&self, caller: &Caller, draft: SnippetDraft) -> Result<Snippet, Error> {
        authenticated_or_read_only(Action::Create, caller)?;
        let owner = self.resolve_owner(caller).await?;

        let content = draft
            .into_new_content(
                self.registry.default_language(),
                self.registry.default_style(),
            )
            .ok_or_else(|| {
                Error::invalid_request("validation failed")
                    .with_details(json!({ "code": ["code is required"] }))
            })?;
        let highlighted = self.registry.render(&content)?;

        let id = self.repo.next_id().await.map_err(Self::map_store_error)?;
        let snippet = Snippet::new(id, Utc::now(), content, owner, highlighted);
        self.repo
            .put(&snippet)
            .await
            .map_err(Self::map_store_error)?;
        Ok(snippet)
    }

    async fn update(
        &self,
        caller: &Caller,
        id: SnippetId,
        draft: SnippetDraft,
    ) -> Result<Snippet, Error> {
        authenticated_or_read_only(Action::Update, caller)?;
        let existing = self.fetch(id).await?;
        owner_or_read_only(Action::Update, caller, &existing)?;

        let content = draft.overlay(existing.content());
        let highlighted = self.registry.render(&content)?;
        let updated = existing.with_content(content, highlighted);
        self.repo
            .put(&updated)
            .await
            .map_err(Self::map_store_error)?;
        Ok(updated)
    }

    async fn delete(&self, caller: &Caller, id: SnippetId) -> Result<(), Error> {
        authenticated_or_read_only(Action::Delete, caller)?;
        let existing = self.fetch(id).await?;
        owner_or_read_only(Action::Delete, caller, &existing)?;

        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(Self::map_store_error)?;
        if removed { Ok(()) } else { Err(Self::not_found(id)) }
    }
}
