use std::{fmt, sync::Arc};

/// Produces a token at call time, `None` for no `Authorization` header.
pub type TokenProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Static credentials handed to the client at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthInfo {
    pub token: String,
    pub user_id: String,
}

impl AuthInfo {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }
}

/// Where the `Authorization` header of a request comes from.
#[derive(Clone, Default)]
#[non_exhaustive]
pub enum AuthSource {
    #[default]
    None,
    Static(String),
    Dynamic(TokenProvider),
}

impl AuthSource {
    /// A callback always wins; a static token only counts when non-empty.
    pub fn new(auth: Option<&AuthInfo>, callback: Option<TokenProvider>) -> Self {
        match (callback, auth) {
            (Some(callback), _) => AuthSource::Dynamic(callback),
            (None, Some(auth)) if !auth.token.is_empty() => AuthSource::Static(auth.token.clone()),
            _ => AuthSource::None,
        }
    }

    /// Resolves the token for one request. Callbacks are invoked every time.
    pub fn resolve(&self) -> Option<String> {
        match self {
            AuthSource::None => None,
            AuthSource::Static(token) => Some(token.clone()),
            AuthSource::Dynamic(callback) => callback(),
        }
    }
}

impl fmt::Debug for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthSource::None => f.write_str("None"),
            AuthSource::Static(_) => f.debug_tuple("Static").field(&"<redacted>").finish(),
            AuthSource::Dynamic(_) => f.debug_tuple("Dynamic").field(&"<callback>").finish(),
        }
    }
}
