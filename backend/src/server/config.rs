//! Server configuration objects and application settings.

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use std::net::SocketAddr;

use crate::inbound::http::state::HttpState;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LANGUAGE: &str = "python";
const DEFAULT_STYLE: &str = "InspiredGitHub";
const DEFAULT_ACCOUNT: &str = "admin:password";

/// Failures raised while interpreting application settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A seeded account entry is not of the form `username:password`.
    #[error("malformed user entry {entry:?}, expected username:password")]
    MalformedAccount { entry: String },
    /// The bind address cannot be parsed as a socket address.
    #[error("invalid bind address {value:?}")]
    InvalidBindAddr { value: String },
}

/// Configuration values loaded from the environment, config file, or CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SNIPPETS")]
pub struct Settings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Language token applied when a snippet omits `language`.
    pub default_language: Option<String>,
    /// Style token applied when a snippet omits `style`.
    pub default_style: Option<String>,
    /// Seeded accounts as `username:password` entries.
    pub users: Option<Vec<String>>,
    /// Require the `Secure` flag on session cookies.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
}

impl Settings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Return the configured default language token.
    pub fn default_language(&self) -> &str {
        self.default_language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Return the configured default style token.
    pub fn default_style(&self) -> &str {
        self.default_style.as_deref().unwrap_or(DEFAULT_STYLE)
    }

    /// Parse the seeded accounts into username/password pairs.
    pub fn accounts(&self) -> Result<Vec<(String, String)>, SettingsError> {
        let entries = self
            .users
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_ACCOUNT.to_owned()]);
        entries
            .into_iter()
            .map(|entry| {
                entry
                    .split_once(':')
                    .filter(|(username, password)| {
                        !username.is_empty() && !password.is_empty()
                    })
                    .map(|(username, password)| (username.to_owned(), password.to_owned()))
                    .ok_or(SettingsError::MalformedAccount { entry })
            })
            .collect()
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) state: HttpState,
}

impl ServerConfig {
    /// Construct a server configuration from session and binding settings
    /// plus the pre-built handler state.
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        state: HttpState,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            state,
        }
    }

    /// Return the socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> Settings {
        Settings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("SNIPPETS_BIND_ADDR", None::<String>),
            ("SNIPPETS_DEFAULT_LANGUAGE", None::<String>),
            ("SNIPPETS_DEFAULT_STYLE", None::<String>),
            ("SNIPPETS_USERS", None::<String>),
            ("SNIPPETS_COOKIE_SECURE", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("addr"),
            DEFAULT_BIND_ADDR.parse().expect("default addr")
        );
        assert_eq!(settings.default_language(), "python");
        assert_eq!(settings.default_style(), "InspiredGitHub");
        assert!(settings.cookie_secure);
        assert_eq!(
            settings.accounts().expect("accounts"),
            vec![("admin".to_owned(), "password".to_owned())]
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("SNIPPETS_BIND_ADDR", Some("127.0.0.1:9999".to_owned())),
            ("SNIPPETS_DEFAULT_LANGUAGE", Some("rust".to_owned())),
            ("SNIPPETS_DEFAULT_STYLE", Some("base16-ocean.dark".to_owned())),
            ("SNIPPETS_USERS", None::<String>),
            ("SNIPPETS_COOKIE_SECURE", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("addr"),
            "127.0.0.1:9999".parse().expect("addr")
        );
        assert_eq!(settings.default_language(), "rust");
        assert_eq!(settings.default_style(), "base16-ocean.dark");
        assert!(!settings.cookie_secure);
    }

    #[rstest]
    #[case("admin")]
    #[case(":password")]
    #[case("admin:")]
    fn malformed_account_entries_are_rejected(#[case] entry: &str) {
        let settings = Settings {
            bind_addr: None,
            default_language: None,
            default_style: None,
            users: Some(vec![entry.to_owned()]),
            cookie_secure: true,
        };
        assert_eq!(
            settings.accounts().expect_err("malformed"),
            SettingsError::MalformedAccount {
                entry: entry.to_owned()
            }
        );
    }

    #[rstest]
    fn passwords_may_contain_colons() {
        let settings = Settings {
            bind_addr: None,
            default_language: None,
            default_style: None,
            users: Some(vec!["ada:pass:word".to_owned()]),
            cookie_secure: true,
        };
        assert_eq!(
            settings.accounts().expect("accounts"),
            vec![("ada".to_owned(), "pass:word".to_owned())]
        );
    }
}
