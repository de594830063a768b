//! Snippet HTTP handlers.
//!
//! ```text
//! GET    /api/v1/snippets
//! POST   /api/v1/snippets
//! GET    /api/v1/snippets/{id}
//! PUT    /api/v1/snippets/{id}
//! DELETE /api/v1/snippets/{id}
//! GET    /api/v1/snippets/{id}/highlight
//! ```
//!
//! Every action except `highlight` responds with the structured projection;
//! `highlight` always responds with the cached markup as `text/html`,
//! regardless of the caller's `Accept` preference.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{Error, SnippetId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::snippets_dto::{
    SnippetBody, SnippetPayload, ValidationMode, validate_payload,
};
use crate::inbound::http::state::HttpState;

/// List all snippets in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/snippets",
    responses(
        (status = 200, description = "Snippets", body = [SnippetBody]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["snippets"],
    operation_id = "listSnippets",
    security([])
)]
#[get("/snippets")]
pub async fn list_snippets(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<SnippetBody>>> {
    let snippets = state.snippets.list().await?;
    Ok(web::Json(snippets.iter().map(SnippetBody::from).collect()))
}

/// Create a snippet owned by the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/v1/snippets",
    request_body = SnippetPayload,
    responses(
        (status = 201, description = "Snippet created", body = SnippetBody),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Authentication required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["snippets"],
    operation_id = "createSnippet",
    security(("SessionCookie" = []))
)]
#[post("/snippets")]
pub async fn create_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SnippetPayload>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let draft = validate_payload(payload.into_inner(), &state.registry, ValidationMode::Create)?;
    let snippet = state.snippets_command.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(SnippetBody::from(&snippet)))
}

/// Retrieve a single snippet.
#[utoipa::path(
    get,
    path = "/api/v1/snippets/{id}",
    params(("id" = i64, Path, description = "Snippet identifier")),
    responses(
        (status = 200, description = "Snippet", body = SnippetBody),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["snippets"],
    operation_id = "getSnippet",
    security([])
)]
#[get("/snippets/{id}")]
pub async fn get_snippet(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<web::Json<SnippetBody>> {
    let snippet = state.snippets.get(SnippetId::new(id.into_inner())).await?;
    Ok(web::Json(SnippetBody::from(&snippet)))
}

/// Overlay the supplied fields onto an existing snippet; owner only.
#[utoipa::path(
    put,
    path = "/api/v1/snippets/{id}",
    params(("id" = i64, Path, description = "Snippet identifier")),
    request_body = SnippetPayload,
    responses(
        (status = 200, description = "Snippet updated", body = SnippetBody),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Authentication required", body = Error),
        (status = 403, description = "Caller is not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["snippets"],
    operation_id = "updateSnippet",
    security(("SessionCookie" = []))
)]
#[put("/snippets/{id}")]
pub async fn update_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
    payload: web::Json<SnippetPayload>,
) -> ApiResult<web::Json<SnippetBody>> {
    let caller = session.caller()?;
    let draft = validate_payload(payload.into_inner(), &state.registry, ValidationMode::Update)?;
    let snippet = state
        .snippets_command
        .update(&caller, SnippetId::new(id.into_inner()), draft)
        .await?;
    Ok(web::Json(SnippetBody::from(&snippet)))
}

/// Delete a snippet; owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/snippets/{id}",
    params(("id" = i64, Path, description = "Snippet identifier")),
    responses(
        (status = 204, description = "Snippet deleted"),
        (status = 401, description = "Authentication required", body = Error),
        (status = 403, description = "Caller is not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["snippets"],
    operation_id = "deleteSnippet",
    security(("SessionCookie" = []))
)]
#[delete("/snippets/{id}")]
pub async fn delete_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    state
        .snippets_command
        .delete(&caller, SnippetId::new(id.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Return the pre-rendered highlighted markup for a snippet.
///
/// This is a fixed content-type override, not subject to negotiation: the
/// response is always the raw markup, never the structured projection.
#[utoipa::path(
    get,
    path = "/api/v1/snippets/{id}/highlight",
    params(("id" = i64, Path, description = "Snippet identifier")),
    responses(
        (status = 200, description = "Rendered markup", body = String, content_type = "text/html"),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["snippets"],
    operation_id = "highlightSnippet",
    security([])
)]
#[get("/snippets/{id}/highlight")]
pub async fn highlight_snippet(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let html = state
        .snippets
        .highlighted(SnippetId::new(id.into_inner()))
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureUserDirectory, MockSnippetsCommand, MockSnippetsQuery, MockUsersQuery,
    };
    use crate::domain::{
        Error, HighlightRegistry, Snippet, SnippetContent, User, UserId, Username,
    };
    use actix_web::{App, http::StatusCode, test as actix_test};
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Arc;

    fn sample_snippet() -> Snippet {
        Snippet::new(
            SnippetId::new(7),
            Utc::now(),
            SnippetContent {
                title: "example".to_owned(),
                code: "x = 1".to_owned(),
                line_numbers: false,
                language: "Python".to_owned(),
                style: "InspiredGitHub".to_owned(),
            },
            User::new(UserId::random(), Username::new("ada").expect("username")),
            "<!DOCTYPE html>\n<html/>".to_owned(),
        )
    }

    fn state_with(query: MockSnippetsQuery, command: MockSnippetsCommand) -> HttpState {
        HttpState::new(
            Arc::new(query),
            Arc::new(command),
            Arc::new(MockUsersQuery::new()),
            Arc::new(FixtureUserDirectory),
            Arc::new(
                HighlightRegistry::from_defaults("python", "InspiredGitHub")
                    .expect("bundled registry"),
            ),
        )
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(list_snippets)
                    .service(create_snippet)
                    .service(get_snippet)
                    .service(update_snippet)
                    .service(delete_snippet)
                    .service(highlight_snippet),
            )
    }

    #[actix_web::test]
    async fn list_serializes_owner_as_username() {
        let mut query = MockSnippetsQuery::new();
        query
            .expect_list()
            .return_once(|| Ok(vec![sample_snippet()]));

        let app = actix_test::init_service(test_app(state_with(
            query,
            MockSnippetsCommand::new(),
        )))
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/snippets")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(res).await;
        let first = &value.as_array().expect("array")[0];
        assert_eq!(first["owner"], "ada");
        assert_eq!(first["id"], 7);
        assert!(first.get("highlighted").is_none());
    }

    #[actix_web::test]
    async fn highlight_returns_raw_markup() {
        let mut query = MockSnippetsQuery::new();
        query
            .expect_highlighted()
            .return_once(|_| Ok("<!DOCTYPE html>\n<html/>".to_owned()));

        let app = actix_test::init_service(test_app(state_with(
            query,
            MockSnippetsCommand::new(),
        )))
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/snippets/7/highlight")
                .insert_header(("accept", "application/json"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let content_type = res
            .headers()
            .get("content-type")
            .expect("content type")
            .to_str()
            .expect("ascii");
        assert!(content_type.starts_with("text/html"));
        let body = actix_test::read_body(res).await;
        assert_eq!(body, "<!DOCTYPE html>\n<html/>");
    }

    #[actix_web::test]
    async fn create_responds_201() {
        let mut command = MockSnippetsCommand::new();
        command
            .expect_create()
            .return_once(|_, _| Ok(sample_snippet()));

        let app = actix_test::init_service(test_app(state_with(
            MockSnippetsQuery::new(),
            command,
        )))
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/snippets")
                .set_json(serde_json::json!({ "code": "x = 1" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn create_rejects_unknown_language_before_the_service_runs() {
        let mut command = MockSnippetsCommand::new();
        command.expect_create().times(0);

        let app = actix_test::init_service(test_app(state_with(
            MockSnippetsQuery::new(),
            command,
        )))
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/snippets")
                .set_json(serde_json::json!({
                    "code": "x = 1",
                    "language": "not-a-real-lexer"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert!(value["details"].get("language").is_some());
    }

    #[actix_web::test]
    async fn delete_responds_204() {
        let mut command = MockSnippetsCommand::new();
        command.expect_delete().return_once(|_, _| Ok(()));

        let app = actix_test::init_service(test_app(state_with(
            MockSnippetsQuery::new(),
            command,
        )))
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/snippets/7")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let body = actix_test::read_body(res).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn missing_target_maps_to_404() {
        let mut query = MockSnippetsQuery::new();
        query
            .expect_get()
            .return_once(|id| Err(Error::not_found(format!("snippet {id} not found"))));

        let app = actix_test::init_service(test_app(state_with(
            query,
            MockSnippetsCommand::new(),
        )))
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/snippets/404")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
