use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::{HttpReply, RpcHttpClient};
use crate::client::{ClientConfig, MoTranslationClient};

const JSON_MIME_TYPE: &str = "application/json";

impl RpcHttpClient for reqwest::Client {
    type Error = reqwest::Error;

    async fn post_envelope(
        &self,
        uri: Arc<str>,
        body: String,
        auth_header: Option<String>,
    ) -> Result<HttpReply, Self::Error> {
        let mut request = self
            .post(uri.as_ref())
            .header(CONTENT_TYPE, JSON_MIME_TYPE)
            .body(body);
        if let Some(auth_header) = auth_header {
            request = request.header(AUTHORIZATION, auth_header);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}

impl MoTranslationClient<reqwest::Client> {
    /// Client over a default [`reqwest::Client`] talking to `url`, without credentials.
    pub fn from_url(url: impl Into<Arc<str>>) -> Self {
        Self::from_config(ClientConfig::with_url(url))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::default(), config)
    }
}
