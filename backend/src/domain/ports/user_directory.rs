//! Driven port for the user account collaborator.
//!
//! Accounts are managed elsewhere; this port only resolves identities,
//! verifies login credentials, and lists users for the read-only endpoints.

use async_trait::async_trait;

use crate::domain::{User, UserId};

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// Lookup failed during execution.
    #[error("user directory query failed: {message}")]
    Query { message: String },
}

impl UserDirectoryError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Read-only view of the user accounts known to the service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All known users, ordered by username.
    async fn list(&self) -> Result<Vec<User>, UserDirectoryError>;

    /// Resolve a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError>;

    /// Check a username/password pair, returning the matching user.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, UserDirectoryError>;
}

/// Fixture directory for tests that never resolve identities.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn list(&self) -> Result<Vec<User>, UserDirectoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(None)
    }

    async fn verify_credentials(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<Option<User>, UserDirectoryError> {
        Ok(None)
    }
}
