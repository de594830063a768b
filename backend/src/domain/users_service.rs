//! Read-only users query service.
//!
//! Joins the user directory with the snippet store so the listing can expose
//! each user's owned snippets without the HTTP layer touching persistence.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    SnippetPersistenceError, SnippetRepository, UserDirectory, UserDirectoryError, UserWithSnippets,
    UsersQuery,
};
use crate::domain::{Error, SnippetId, User, UserId};

/// Service implementing [`UsersQuery`].
#[derive(Clone)]
pub struct UsersQueryService<D, R> {
    directory: Arc<D>,
    snippets: Arc<R>,
}

impl<D, R> UsersQueryService<D, R> {
    /// Create a new service over the given collaborators.
    pub fn new(directory: Arc<D>, snippets: Arc<R>) -> Self {
        Self {
            directory,
            snippets,
        }
    }
}

impl<D, R> UsersQueryService<D, R>
where
    D: UserDirectory,
    R: SnippetRepository,
{
    fn map_directory_error(error: UserDirectoryError) -> Error {
        Error::internal(format!("user directory failure: {error}"))
    }

    fn map_store_error(error: SnippetPersistenceError) -> Error {
        Error::internal(format!("snippet store failure: {error}"))
    }

    async fn owned_ids(&self, user: &User) -> Result<Vec<SnippetId>, Error> {
        let snippets = self
            .snippets
            .list_all()
            .await
            .map_err(Self::map_store_error)?;
        Ok(snippets
            .iter()
            .filter(|snippet| snippet.owner().id() == user.id())
            .map(|snippet| snippet.id())
            .collect())
    }
}

#[async_trait]
impl<D, R> UsersQuery for UsersQueryService<D, R>
where
    D: UserDirectory,
    R: SnippetRepository,
{
    async fn list_users(&self) -> Result<Vec<UserWithSnippets>, Error> {
        let users = self
            .directory
            .list()
            .await
            .map_err(Self::map_directory_error)?;

        let mut listing = Vec::with_capacity(users.len());
        for user in users {
            let snippet_ids = self.owned_ids(&user).await?;
            listing.push(UserWithSnippets { user, snippet_ids });
        }
        Ok(listing)
    }

    async fn get_user(&self, id: &UserId) -> Result<UserWithSnippets, Error> {
        let user = self
            .directory
            .find_by_id(id)
            .await
            .map_err(Self::map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        let snippet_ids = self.owned_ids(&user).await?;
        Ok(UserWithSnippets { user, snippet_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockSnippetRepository, MockUserDirectory};
    use crate::domain::{Snippet, SnippetContent, Username};
    use chrono::Utc;
    use rstest::rstest;

    fn user(name: &str) -> User {
        User::new(UserId::random(), Username::new(name).expect("username"))
    }

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

    #[rstest]
    #[tokio::test]
    async fn listing_carries_the_owned_snippet_back_relation() {
        let ada = user("ada");
        let grace = user("grace");
        let mut directory = MockUserDirectory::new();
        let users = vec![ada.clone(), grace.clone()];
        directory.expect_list().return_once(move || Ok(users));

        let mut repo = MockSnippetRepository::new();
        let records = vec![snippet(1, &ada), snippet(2, &grace), snippet(3, &ada)];
        repo.expect_list_all()
            .returning(move || Ok(records.clone()));

        let svc = UsersQueryService::new(Arc::new(directory), Arc::new(repo));
        let listing = svc.list_users().await.expect("listing");

        assert_eq!(listing.len(), 2);
        assert_eq!(
            listing[0].snippet_ids,
            vec![SnippetId::new(1), SnippetId::new(3)]
        );
        assert_eq!(listing[1].snippet_ids, vec![SnippetId::new(2)]);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_id().return_once(|_| Ok(None));

        let svc = UsersQueryService::new(
            Arc::new(directory),
            Arc::new(MockSnippetRepository::new()),
        );
        let err = svc.get_user(&UserId::random()).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
