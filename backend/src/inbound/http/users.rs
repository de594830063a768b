//! User and login HTTP handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"admin","password":"password"}
//! POST /api/v1/logout
//! GET  /api/v1/users
//! GET  /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::UserWithSnippets;
use crate::domain::{Error, SnippetId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "password")]
    pub password: String,
}

/// Read-only user projection with the owned-snippet back-relation.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada")]
    pub username: String,
    /// Ids of the snippets this user owns.
    pub snippets: Vec<i64>,
}

impl From<UserWithSnippets> for UserBody {
    fn from(value: UserWithSnippets) -> Self {
        Self {
            id: value.user.id().to_string(),
            username: value.user.username().to_string(),
            snippets: value
                .snippet_ids
                .into_iter()
                .map(SnippetId::value)
                .collect(),
        }
    }
}

fn validate_login(payload: &LoginRequest) -> Result<(), Error> {
    let mut fields = Vec::new();
    if payload.username.trim().is_empty() {
        fields.push(("username", "username must not be empty"));
    }
    if payload.password.is_empty() {
        fields.push(("password", "password must not be empty"));
    }
    if fields.is_empty() {
        return Ok(());
    }
    let details: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .map(|(field, message)| (field.to_owned(), json!([message])))
        .collect();
    Err(Error::invalid_request("validation failed").with_details(json!(details)))
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    validate_login(&payload)?;

    let user = state
        .directory
        .verify_credentials(&payload.username, &payload.password)
        .await
        .map_err(|err| Error::internal(format!("user directory failure: {err}")))?
        .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().finish())
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().finish()
}

/// List known users with their owned snippet ids.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserBody]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserBody>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserBody::from).collect()))
}

/// Retrieve a single user with their owned snippet ids.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserBody),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<web::Json<UserBody>> {
    let raw = id.into_inner();
    let id =
        UserId::new(&raw).map_err(|_| Error::not_found(format!("user {raw} not found")))?;
    let user = state.users.get_user(&id).await?;
    Ok(web::Json(UserBody::from(user)))
}
