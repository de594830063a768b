//! Driving port for the read-only user listing.

use async_trait::async_trait;

use crate::domain::{Error, SnippetId, User, UserId};

/// A user together with the ids of the snippets they own.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithSnippets {
    pub user: User,
    pub snippet_ids: Vec<SnippetId>,
}

/// Use-case port for listing users and their owned snippets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All known users with their owned snippet ids.
    async fn list_users(&self) -> Result<Vec<UserWithSnippets>, Error>;

    /// A single user with their owned snippet ids.
    async fn get_user(&self, id: &UserId) -> Result<UserWithSnippets, Error>;
}
