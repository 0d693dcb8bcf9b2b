use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Status reported for every failed or rejected HTTP exchange.
///
/// The real HTTP status, when one was received, is kept separately in
/// [`RpcError::ServerError::http_status`].
pub const SERVER_ERROR_STATUS: u16 = 500;

/// Status reported when a successful HTTP reply does not hold a usable envelope.
pub const MALFORMED_RESPONSE_STATUS: u16 = 503;

/// Error placeholder used when the failure reply carries no body at all.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Prefix of the error placeholder used when the failure reply is not JSON.
pub const UNKNOWN_ERROR_PREFIX: &str = "Unknown error - ";

/// The two ways an RPC call can fail.
///
/// Both are terminal: the client never retries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RpcError {
    /// Non-2xx reply, network failure or cancellation.
    #[error("rpc call failed ({status}): {error}")]
    ServerError {
        /// Always [`SERVER_ERROR_STATUS`].
        status: u16,
        /// The `error` member of the reply envelope, or a placeholder string.
        error: Value,
        /// Status line of the HTTP reply, `None` if nothing was received.
        http_status: Option<u16>,
    },
    /// 2xx reply whose body could not be turned into a result.
    #[error("malformed response from {url} ({status}): {error}")]
    MalformedResponse {
        /// Always [`MALFORMED_RESPONSE_STATUS`].
        status: u16,
        #[source]
        error: serde_json::Error,
        url: Arc<str>,
        raw_body: String,
    },
}

impl RpcError {
    pub(crate) fn server(error: Value, http_status: Option<u16>) -> Self {
        RpcError::ServerError {
            status: SERVER_ERROR_STATUS,
            error,
            http_status,
        }
    }

    pub(crate) fn unknown(http_status: Option<u16>) -> Self {
        Self::server(Value::String(UNKNOWN_ERROR.into()), http_status)
    }

    pub(crate) fn malformed(error: serde_json::Error, url: Arc<str>, raw_body: String) -> Self {
        RpcError::MalformedResponse {
            status: MALFORMED_RESPONSE_STATUS,
            error,
            url,
            raw_body,
        }
    }

    /// The status reported to the caller, `500` or `503`.
    pub fn status(&self) -> u16 {
        match self {
            RpcError::ServerError { status, .. } | RpcError::MalformedResponse { status, .. } => {
                *status
            }
        }
    }

    /// The raw body of a malformed reply.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            RpcError::MalformedResponse { raw_body, .. } => Some(raw_body),
            RpcError::ServerError { .. } => None,
        }
    }
}
