//! Service entry-point: builds the highlight registry, seeds the adapters,
//! and wires the REST endpoints.

use std::env;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::{HighlightRegistry, SnippetService, User, UserId, Username, UsersQueryService};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{InMemorySnippetStore, InMemoryUserDirectory};
use backend::server::{ServerConfig, Settings, create_server};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn seeded_directory(settings: &Settings) -> std::io::Result<InMemoryUserDirectory> {
    let mut directory = InMemoryUserDirectory::new();
    for (username, password) in settings.accounts().map_err(std::io::Error::other)? {
        let username = Username::new(username).map_err(std::io::Error::other)?;
        directory = directory.with_user(User::new(UserId::random(), username), password);
    }
    Ok(directory)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load().map_err(std::io::Error::other)?;

    // An empty or inconsistent registry must prevent startup entirely.
    let registry = Arc::new(
        HighlightRegistry::from_defaults(settings.default_language(), settings.default_style())
            .map_err(std::io::Error::other)?,
    );

    let store = Arc::new(InMemorySnippetStore::new());
    let directory = Arc::new(seeded_directory(&settings)?);
    let snippets = Arc::new(SnippetService::new(
        store.clone(),
        directory.clone(),
        registry.clone(),
    ));
    let users = Arc::new(UsersQueryService::new(directory.clone(), store));

    let state = HttpState::new(
        snippets.clone(),
        snippets,
        users,
        directory,
        registry,
    );

    let config = ServerConfig::new(
        session_key()?,
        settings.cookie_secure,
        SameSite::Lax,
        settings.bind_addr().map_err(std::io::Error::other)?,
        state,
    );

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
