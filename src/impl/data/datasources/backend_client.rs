use std::{sync::Arc, time::Duration};

use fractic_server_error::ServerError;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Method, RequestBuilder, Response, Url,
};
use tokio::sync::RwLock;

use crate::{
    config::BackendConfig,
    errors::{BackendRequestFailed, InvalidConfig},
};

/// Access token of the signed-in user, shared between the auth side (which
/// sets it) and the table side (which sends it).
pub type SharedAccessToken = Arc<RwLock<Option<String>>>;

/// HTTP plumbing shared by the table and auth datasources.
pub struct BackendClient {
    http: reqwest::Client,
    config: BackendConfig,
    access_token: SharedAccessToken,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| InvalidConfig::with_debug(&e))?;
        Ok(Self {
            http,
            config,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn access_token(&self) -> SharedAccessToken {
        self.access_token.clone()
    }

    /// Builds `<base url>/<path>`.
    pub fn endpoint(&self, path: &str) -> Result<Url, ServerError> {
        let raw = format!(
            "{}/{}",
            self.config.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| InvalidConfig::with_debug(&e))
    }

    /// Request carrying the API key, authorized as `bearer` if given, else
    /// as the signed-in user, else anonymously.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        bearer: Option<&str>,
    ) -> Result<RequestBuilder, ServerError> {
        let token = match bearer {
            Some(token) => token.to_string(),
            None => self
                .access_token
                .read()
                .await
                .clone()
                .unwrap_or_else(|| self.config.anon_key.clone()),
        };
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.config.anon_key).map_err(|e| InvalidConfig::with_debug(&e))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| InvalidConfig::with_debug(&e))?,
        );
        Ok(self.http.request(method, url).headers(headers))
    }

    /// Sends the request and fails on transport errors and non-2xx statuses.
    pub async fn execute(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<Response, ServerError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendRequestFailed::with_debug(endpoint, &e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendRequestFailed::with_debug(
            endpoint,
            &format!("status {status}: {body}"),
        ))
    }
}
