use std::{
    borrow::Cow,
    fmt,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll},
};

use futures::FutureExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::{AuthInfo, AuthSource, TokenProvider},
    error::{RpcError, UNKNOWN_ERROR_PREFIX},
    methods::Method,
    model::{RpcRequest, RpcResponse},
    transport::{HttpReply, RpcHttpClient},
};

#[derive(Clone)]
pub struct ClientConfig {
    pub url: Arc<str>,
    pub auth: Option<AuthInfo>,
    pub auth_callback: Option<TokenProvider>,
}

impl ClientConfig {
    pub fn with_url(url: impl Into<Arc<str>>) -> Self {
        Self {
            url: url.into(),
            auth: None,
            auth_callback: None,
        }
    }

    pub fn auth(mut self, auth: AuthInfo) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Called before every request; its token overrides [`ClientConfig::auth`].
    pub fn auth_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.auth_callback = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("user_id", &self.auth.as_ref().map(|auth| &auth.user_id))
            .field("auth_callback", &self.auth_callback.is_some())
            .finish()
    }
}

type SuccessCallback = Box<dyn FnOnce(&Value) + Send>;
type ErrorCallback = Box<dyn FnOnce(&RpcError) + Send>;

/// Listeners fired when a call settles, right before its [`RpcCall`] completes.
#[derive(Default)]
pub struct Callbacks {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl Callbacks {
    pub fn on_success(mut self, callback: impl FnOnce(&Value) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(&RpcError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    fn fire(self, result: &Result<Value, RpcError>) {
        match result {
            Ok(value) => {
                if let Some(on_success) = self.on_success {
                    on_success(value)
                }
            }
            Err(error) => {
                if let Some(on_error) = self.on_error {
                    on_error(error)
                }
            }
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// An in-flight RPC call.
///
/// The request is already running on the tokio runtime when this is returned;
/// awaiting it yields the outcome, dropping it leaves the request running.
/// [`RpcCall::cancel`] aborts the HTTP exchange, which then settles as a
/// failure without a reply.
#[derive(Debug)]
pub struct RpcCall {
    handle: JoinHandle<Result<Value, RpcError>>,
    ct: CancellationToken,
}

impl RpcCall {
    pub fn cancel(&self) {
        self.ct.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.ct.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for RpcCall {
    type Output = Result<Value, RpcError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.handle.poll_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Poll::Ready(Err(e)) => {
                tracing::warn!("rpc task terminated: {e}");
                Poll::Ready(Err(RpcError::unknown(None)))
            }
        }
    }
}

/// Client for the `MOTranslation` service.
///
/// Every call is an independent HTTP POST; nothing is retried, cached or
/// ordered between calls.
pub struct MoTranslationClient<C> {
    client: C,
    url: Arc<str>,
    user_id: Option<String>,
    auth: AuthSource,
    deprecation_warning_sent: AtomicBool,
}

impl<C: RpcHttpClient> MoTranslationClient<C> {
    pub fn with_client(client: C, config: ClientConfig) -> Self {
        let ClientConfig {
            url,
            auth,
            auth_callback,
        } = config;
        Self {
            client,
            url,
            auth: AuthSource::new(auth.as_ref(), auth_callback),
            user_id: auth.map(|auth| auth.user_id).filter(|id| !id.is_empty()),
            deprecation_warning_sent: AtomicBool::new(false),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn http_client(&self) -> &C {
        &self.client
    }

    pub fn deprecation_warning_sent(&self) -> bool {
        self.deprecation_warning_sent.load(Ordering::Relaxed)
    }

    /// Logs the `*_async` deprecation notice, once per client.
    pub(crate) fn deprecation_warning(&self) {
        if !self.deprecation_warning_sent.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                "DEPRECATION WARNING: '*_async' method names will be removed in a future \
                 version. Please use the identical methods without the '_async' suffix."
            );
        }
    }

    /// Runs one entry of the method table.
    ///
    /// `params` is sent as is; its length is not checked against
    /// [`Method::arity`].
    pub fn call(&self, method: Method, params: Vec<Value>, callbacks: Callbacks) -> RpcCall {
        self.invoke(method.rpc_name(), params, method.return_count(), callbacks)
    }

    /// Sends `method` with positional `params` and settles on the reply.
    ///
    /// With `return_count == 1` the single element of the reply's `result` is
    /// returned, otherwise the whole `result` list.
    ///
    /// # Panics
    ///
    /// The exchange is spawned with [`tokio::spawn`], so this and every
    /// method wrapper must be called from within a tokio runtime. Once
    /// spawned, every failure is reported through the returned [`RpcCall`].
    pub fn invoke(
        &self,
        method: impl Into<Cow<'static, str>>,
        params: Vec<Value>,
        return_count: usize,
        callbacks: Callbacks,
    ) -> RpcCall {
        let request = RpcRequest::new(method, params);
        let auth_header = self.auth.resolve();
        let client = self.client.clone();
        let url = self.url.clone();
        let ct = CancellationToken::new();
        let task_ct = ct.clone();
        let handle = tokio::spawn(async move {
            tracing::debug!(
                method = &*request.method,
                id = request.id.as_str(),
                "sending rpc request"
            );
            let body = request.to_body();
            let reply = tokio::select! {
                reply = client.post_envelope(url.clone(), body, auth_header) => {
                    match reply {
                        Ok(reply) => Some(reply),
                        Err(e) => {
                            tracing::warn!(method = &*request.method, "rpc transport error: {e}");
                            None
                        }
                    }
                }
                _ = task_ct.cancelled() => {
                    tracing::debug!(method = &*request.method, "rpc request cancelled");
                    None
                }
            };
            let result = decode_reply(&url, return_count, reply);
            tracing::trace!(
                method = &*request.method,
                ok = result.is_ok(),
                "rpc request settled"
            );
            callbacks.fire(&result);
            result
        });
        RpcCall { handle, ct }
    }
}

impl<C: Clone> Clone for MoTranslationClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            url: self.url.clone(),
            user_id: self.user_id.clone(),
            auth: self.auth.clone(),
            // a clone warns on its own
            deprecation_warning_sent: AtomicBool::new(false),
        }
    }
}

impl<C> fmt::Debug for MoTranslationClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoTranslationClient")
            .field("url", &self.url)
            .field("user_id", &self.user_id)
            .field("auth", &self.auth)
            .field(
                "deprecation_warning_sent",
                &self.deprecation_warning_sent.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

/// Maps an HTTP reply, or its absence, to the outcome of a call.
pub(crate) fn decode_reply(
    url: &Arc<str>,
    return_count: usize,
    reply: Option<HttpReply>,
) -> Result<Value, RpcError> {
    let Some(reply) = reply else {
        return Err(RpcError::unknown(None));
    };
    if reply.is_success() {
        let value = match serde_json::from_str::<Value>(&reply.body) {
            Ok(value) => value,
            Err(e) => return Err(RpcError::malformed(e, url.clone(), reply.body)),
        };
        let Some(response) = RpcResponse::from_value(value) else {
            let e = <serde_json::Error as serde::de::Error>::custom("reply body is null");
            return Err(RpcError::malformed(e, url.clone(), reply.body));
        };
        response.into_returned(return_count).ok_or_else(|| {
            let e = <serde_json::Error as serde::de::Error>::custom("result is missing or null");
            RpcError::malformed(e, url.clone(), reply.body)
        })
    } else if reply.body.is_empty() {
        Err(RpcError::unknown(Some(reply.status)))
    } else {
        let error = match serde_json::from_str::<Value>(&reply.body).map(RpcResponse::from_value) {
            Ok(Some(response)) => response.error.unwrap_or(Value::Null),
            Ok(None) | Err(_) => Value::String(format!("{UNKNOWN_ERROR_PREFIX}{}", reply.body)),
        };
        Err(RpcError::server(error, Some(reply.status)))
    }
}
