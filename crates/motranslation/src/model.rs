//! Request and response envelopes.
//!
//! The service speaks JSON-RPC 1.1: a request carries the fully qualified
//! method name, a positional parameter list, the protocol version and a
//! random id. A response carries either a `result` list or an `error`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version sent in every request envelope.
pub const JSON_RPC_VERSION: &str = "1.1";

/// Random decimal request id.
///
/// Ids are generated per call and never checked against the reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn random() -> Self {
        Self(rand::random::<u64>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: Cow<'static, str>,
    pub params: Vec<Value>,
    pub version: Cow<'static, str>,
    pub id: RequestId,
}

impl RpcRequest {
    pub fn new(method: impl Into<Cow<'static, str>>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
            version: Cow::Borrowed(JSON_RPC_VERSION),
            id: RequestId::random(),
        }
    }

    /// Serialized request body.
    pub fn to_body(&self) -> String {
        let mut envelope = Map::with_capacity(4);
        envelope.insert("params".into(), Value::Array(self.params.clone()));
        envelope.insert("method".into(), Value::String(self.method.to_string()));
        envelope.insert("version".into(), Value::String(self.version.to_string()));
        envelope.insert("id".into(), Value::String(self.id.0.clone()));
        Value::Object(envelope).to_string()
    }
}

/// Reply envelope.
///
/// Both members are optional on the wire; which one is consulted depends on
/// the HTTP status of the reply, not on which one is present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl RpcResponse {
    /// Reads the envelope members out of a parsed reply body.
    ///
    /// A JSON `null` body is no envelope at all and yields `None`. Any other
    /// non-object value is an envelope with neither member.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(mut members) => Some(Self {
                result: members.remove("result"),
                error: members.remove("error"),
            }),
            _ => Some(Self::default()),
        }
    }

    /// Extracts the value handed to the caller.
    ///
    /// With exactly one expected return value the first element of `result`
    /// is unwrapped, `null` when the list is empty or `result` is not a list.
    /// `None` means `result` is missing or `null` and cannot be indexed.
    /// Otherwise the `result` member is passed through untouched (`null` when
    /// missing).
    pub fn into_returned(self, return_count: usize) -> Option<Value> {
        if return_count == 1 {
            match self.result {
                None | Some(Value::Null) => None,
                Some(Value::Array(mut values)) if !values.is_empty() => Some(values.swap_remove(0)),
                Some(_) => Some(Value::Null),
            }
        } else {
            Some(self.result.unwrap_or(Value::Null))
        }
    }
}
