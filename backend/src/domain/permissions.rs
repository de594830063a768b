//! Permission decisions applied to snippet actions.
//!
//! Two independent policies compose by logical AND. The collection-level
//! check runs before any record is fetched; the object-level check runs after
//! the target is located and before any mutation. A denial at either stage
//! prevents any state change.

use crate::domain::{Error, Snippet, UserId};

/// Actions supported by the snippet resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    Delete,
    Highlight,
}

impl Action {
    /// Write-class actions mutate state; everything else is read-class.
    pub fn is_write(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

/// Caller identity supplied by the transport layer, never ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(UserId),
}

impl Caller {
    /// The authenticated user id, when present.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(id),
        }
    }
}

/// Collection-level policy: read-class actions are open to any caller;
/// write-class actions require an identified caller.
pub fn authenticated_or_read_only(action: Action, caller: &Caller) -> Result<(), Error> {
    if action.is_write() && caller.user_id().is_none() {
        return Err(Error::unauthorized("authentication required"));
    }
    Ok(())
}

/// Object-level policy: write-class actions on a target are allowed only for
/// its owner.
pub fn owner_or_read_only(action: Action, caller: &Caller, target: &Snippet) -> Result<(), Error> {
    if !action.is_write() {
        return Ok(());
    }
    match caller.user_id() {
        Some(id) if id == target.owner().id() => Ok(()),
        _ => Err(Error::forbidden("only the owner may modify this snippet")),
    }
}
