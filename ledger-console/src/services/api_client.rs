use console_core::error::ApiError;
use console_core::observability::TracedClientExt;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::ApiSettings;
use crate::services::metrics::record_api_call;

/// The single chokepoint for calls to the accounting API.
///
/// One attempt per call: no retries, no timeout. Callers decide whether to
/// try again.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        Ok(Self::with_client(client, &settings.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and decode the JSON body of a 2xx response into `T`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.execute(method, path, body, token).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to decode API response");
            ApiError::Decode(e.to_string())
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>, token).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), token).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), token).await
    }

    /// Like [`request`](Self::request) for calls whose success body is irrelevant.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, body, token).await.map(|_| ())
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, path = %path, "Calling accounting API");

        let mut request = self
            .client
            .traced(method.clone(), &url)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            record_api_call(method.as_str(), "error");
            tracing::error!(method = %method, path = %path, error = %e, "API request failed");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        record_api_call(method.as_str(), status.as_str());
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                "API returned an error status"
            );
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
