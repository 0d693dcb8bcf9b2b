//! HTTP seam of the client.
//!
//! The client only needs one operation from an HTTP stack: post a
//! pre-serialized body with an optional `Authorization` header and hand back
//! the status and body text of the reply. Any non-2xx status is a reply, not
//! an error; `Err` is reserved for exchanges that produced no reply at all.
//!
//! With the `reqwest` feature, [`reqwest::Client`](::reqwest::Client)
//! implements [`RpcHttpClient`].
use std::sync::Arc;

#[cfg(feature = "__reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
mod reqwest;

/// Status and body of an HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait RpcHttpClient: Clone + Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;
    /// Posts `body` to `uri`, setting `Authorization: <auth_header>` when given.
    fn post_envelope(
        &self,
        uri: Arc<str>,
        body: String,
        auth_header: Option<String>,
    ) -> impl Future<Output = Result<HttpReply, Self::Error>> + Send + '_;
}
