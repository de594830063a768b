//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::HighlightRegistry;
use crate::domain::ports::{SnippetsCommand, SnippetsQuery, UserDirectory, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub snippets: Arc<dyn SnippetsQuery>,
    pub snippets_command: Arc<dyn SnippetsCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub directory: Arc<dyn UserDirectory>,
    pub registry: Arc<HighlightRegistry>,
}

impl HttpState {
    /// Construct state from the port implementations.
    pub fn new(
        snippets: Arc<dyn SnippetsQuery>,
        snippets_command: Arc<dyn SnippetsCommand>,
        users: Arc<dyn UsersQuery>,
        directory: Arc<dyn UserDirectory>,
        registry: Arc<HighlightRegistry>,
    ) -> Self {
        Self {
            snippets,
            snippets_command,
            users,
            directory,
            registry,
        }
    }
}
