use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Transport-level failure from the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` is the server's `{"error": ...}` detail
    /// when one was sent.
    #[error("{message}")]
    Status { code: u16, message: String },
    /// Connection, timeout or decode failure with no HTTP status.
    #[error("Network error: {0}")]
    Network(String),
}

/// API client for communicating with the backend server.
///
/// All entity endpoints share one uniform shape (list / get / create / update
/// / delete on `/<resource>` and `/<resource>/<id>`), so the client is generic
/// over the resource path and speaks untyped JSON; typing happens in the shape
/// mappers.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3001/api";

    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Probe the backend's liveness endpoint.
    pub async fn health(&self) -> Result<Value, ApiError> {
        let url = format!("{}/health", self.base_url);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle(response).await
    }

    /// Fetch the full collection for a resource; the response is a bare array.
    pub async fn list(&self, resource: &str) -> Result<Vec<Value>, ApiError> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body = Self::handle(response).await?;
        match body {
            Value::Array(items) => Ok(items),
            other => Err(ApiError::Network(format!(
                "Expected an array response, got: {}",
                other
            ))),
        }
    }

    /// Fetch a single record by id.
    pub async fn get(&self, resource: &str, id: &str) -> Result<Value, ApiError> {
        let url = format!("{}/{}/{}", self.base_url, resource, id);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle(response).await
    }

    /// POST a write payload; returns the created record.
    pub async fn create(&self, resource: &str, payload: &Value) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle(response).await
    }

    /// PUT a partial write payload; returns the updated record.
    pub async fn update(&self, resource: &str, id: &str, payload: &Value) -> Result<Value, ApiError> {
        let url = format!("{}/{}/{}", self.base_url, resource, id);
        debug!("PUT {}", url);
        let response = self
            .http
            .put(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle(response).await
    }

    /// DELETE a record; returns the confirmation envelope with the echo of the
    /// deleted record.
    pub async fn delete(&self, resource: &str, id: &str) -> Result<Value, ApiError> {
        let url = format!("{}/{}/{}", self.base_url, resource, id);
        debug!("DELETE {}", url);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle(response).await
    }

    async fn handle(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| ApiError::Network(format!("Failed to parse response: {}", e)));
        }

        let code = status.as_u16();
        // Pull the error detail out of the `{"error": ...}` envelope; the
        // detail may be a plain message or structured validation output.
        let message = match response.json::<Value>().await {
            Ok(body) => match body.get("error") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => format!("Request failed with status {}", code),
                Some(other) => other.to_string(),
            },
            Err(_) => format!("Request failed with status {}", code),
        };

        Err(ApiError::Status { code, message })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
