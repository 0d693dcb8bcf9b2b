#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![doc = include_str!("../README.md")]

mod error;
pub use error::{
    MALFORMED_RESPONSE_STATUS, RpcError, SERVER_ERROR_STATUS, UNKNOWN_ERROR, UNKNOWN_ERROR_PREFIX,
};

pub mod auth;
pub use auth::{AuthInfo, AuthSource, TokenProvider};

pub mod client;
pub use client::{Callbacks, ClientConfig, MoTranslationClient, RpcCall};

pub mod methods;
pub use methods::{Method, SERVICE_NAME};

/// Request and response envelopes
pub mod model;

pub mod transport;
pub use transport::{HttpReply, RpcHttpClient};

// re-export
pub use serde_json;
