//! Domain ports for the hexagonal boundary.

mod snippet_repository;
mod snippets;
mod user_directory;
mod users_query;

#[cfg(test)]
pub use snippet_repository::MockSnippetRepository;
pub use snippet_repository::{
    FixtureSnippetRepository, SnippetPersistenceError, SnippetRepository,
};
#[cfg(test)]
pub use snippets::{MockSnippetsCommand, MockSnippetsQuery};
pub use snippets::{SnippetsCommand, SnippetsQuery};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{UserWithSnippets, UsersQuery};
