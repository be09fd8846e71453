//! Caller identity.
//!
//! Token issuance lives elsewhere; the server only needs to turn a bearer
//! token into a [`PlayerId`].

use std::collections::HashMap;

use axum::http::{HeaderMap, header};
use matchplay::PlayerId;
use tracing::{debug, info, instrument};

/// Resolves a bearer token to the identity of the caller.
pub trait IdentityProvider: Send + Sync {
    /// Returns the caller identity for `token`, `None` if unknown.
    fn identify(&self, token: &str) -> Option<PlayerId>;
}

/// Fixed token-to-user table, usually loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    tokens: HashMap<String, PlayerId>,
}

impl TokenTable {
    /// Builds a table from `(token, user id)` pairs.
    #[instrument(skip(pairs))]
    pub fn new<I, T, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        let tokens: HashMap<String, PlayerId> = pairs
            .into_iter()
            .map(|(token, user)| (token.into(), PlayerId::new(user)))
            .collect();
        info!(count = tokens.len(), "Token table loaded");
        Self { tokens }
    }
}

impl IdentityProvider for TokenTable {
    fn identify(&self, token: &str) -> Option<PlayerId> {
        let found = self.tokens.get(token).cloned();
        if found.is_none() {
            debug!("Unknown bearer token");
        }
        found
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
