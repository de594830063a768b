//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API: snippet and user endpoints, health probes, the error envelope,
//! and the session-cookie security scheme. The generated document backs
//! Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::snippets_dto::{SnippetBody, SnippetPayload};
use crate::inbound::http::users::{LoginRequest, UserBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Snippets API",
        description = "Code snippet storage with owner-gated mutation and pre-rendered highlight views."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::snippets::list_snippets,
        crate::inbound::http::snippets::create_snippet,
        crate::inbound::http::snippets::get_snippet,
        crate::inbound::http::snippets::update_snippet,
        crate::inbound::http::snippets::delete_snippet,
        crate::inbound::http::snippets::highlight_snippet,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SnippetBody,
        SnippetPayload,
        UserBody,
        LoginRequest,
        Error,
        ErrorCode,
    ))
)]
pub struct ApiDoc;
