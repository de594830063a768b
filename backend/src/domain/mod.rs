//! Domain entities, ports, and services.
//!
//! Purpose: hold the transport-agnostic core — the snippet record, the
//! highlight registry and transform, the permission policies, and the
//! services implementing the driving ports. Inbound and outbound adapters
//! depend on this module, never the other way around.

pub mod error;
pub mod highlight;
pub mod permissions;
pub mod ports;
pub mod snippet;
pub mod snippet_service;
pub mod user;
pub mod users_service;

pub use self::error::{Error, ErrorCode};
pub use self::highlight::{HighlightRegistry, RegistryError};
pub use self::permissions::{Action, Caller};
pub use self::snippet::{Snippet, SnippetContent, SnippetDraft, SnippetId, TITLE_MAX};
pub use self::snippet_service::SnippetService;
pub use self::user::{User, UserId, UserValidationError, Username};
pub use self::users_service::UsersQueryService;
