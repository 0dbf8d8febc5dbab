//! Invoicebox HTTP dispatcher.

use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{AccessConfig, ApiConfig};
use crate::error::{check_status, extract_detail, ApiError};

/// Invoicebox API client.
///
/// Holds the validated configuration and sends GET/POST/PUT/DELETE requests
/// with JSON bodies. Every call fails with `NotConfigured` until a
/// configuration has been applied.
#[derive(Debug, Clone)]
pub struct InvoiceboxApi {
    client: Client,
    config: Option<ApiConfig>,
}

impl Default for InvoiceboxApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceboxApi {
    /// Create an unconfigured client.
    #[must_use]
    pub fn new() -> Self {
        Self::with_http_client(Client::new())
    }

    /// Create an unconfigured client on top of an existing HTTP client.
    #[must_use]
    pub fn with_http_client(client: Client) -> Self {
        Self {
            client,
            config: None,
        }
    }

    /// Create a client from an already validated configuration.
    #[must_use]
    pub fn with_config(config: ApiConfig) -> Self {
        let mut api = Self::new();
        api.config = Some(config);
        api
    }

    /// Validate credentials and apply them, replacing any previous
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if `shop_id` or `token` is missing or empty.
    /// The previous configuration is kept in that case.
    pub fn configure(
        &mut self,
        access: AccessConfig,
        use_staging: bool,
        is_test_request: bool,
    ) -> Result<(), ApiError> {
        self.config = Some(ApiConfig::configure(access, use_staging, is_test_request)?);
        Ok(())
    }

    /// Apply an already validated configuration.
    pub fn set_config(&mut self, config: ApiConfig) {
        self.config = Some(config);
    }

    /// Whether a configuration has been applied.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// The active configuration, if any.
    #[must_use]
    pub const fn config(&self) -> Option<&ApiConfig> {
        self.config.as_ref()
    }

    /// Send a GET request with `query` encoded into the URL.
    ///
    /// Anything other than a JSON object is sent without a query string.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is unconfigured, the request fails,
    /// or the server answers with a non-200 status.
    pub async fn get<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Value, ApiError> {
        let config = self.require_config()?;
        let pairs = query_pairs(&serde_json::to_value(query)?);
        self.dispatch(config, Method::GET, path, &pairs, None).await
    }

    /// Send a POST request with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is unconfigured, the request fails,
    /// or the server answers with a non-200 status.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let config = self.require_config()?;
        let body = json_body(body)?;
        self.dispatch(config, Method::POST, path, &[], Some(body)).await
    }

    /// Send a PUT request with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is unconfigured, the request fails,
    /// or the server answers with a non-200 status.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let config = self.require_config()?;
        let body = json_body(body)?;
        self.dispatch(config, Method::PUT, path, &[], Some(body)).await
    }

    /// Send a DELETE request without a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is unconfigured, the request fails,
    /// or the server answers with a non-200 status.
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        let config = self.require_config()?;
        self.dispatch(config, Method::DELETE, path, &[], None).await
    }

    /// [`get`](Self::get) and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Same as `get`, plus `Serialization` if the body does not match `T`.
    pub async fn get_as<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        Ok(serde_json::from_value(self.get(path, query).await?)?)
    }

    /// [`post`](Self::post) and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Same as `post`, plus `Serialization` if the body does not match `T`.
    pub async fn post_as<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Ok(serde_json::from_value(self.post(path, body).await?)?)
    }

    /// [`put`](Self::put) and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Same as `put`, plus `Serialization` if the body does not match `T`.
    pub async fn put_as<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Ok(serde_json::from_value(self.put(path, body).await?)?)
    }

    /// [`delete`](Self::delete) and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Same as `delete`, plus `Serialization` if the body does not match `T`.
    pub async fn delete_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.delete(path).await?)?)
    }

    fn require_config(&self) -> Result<&ApiConfig, ApiError> {
        self.config
            .as_ref()
            .ok_or_else(|| ApiError::NotConfigured("call configure() first".to_string()))
    }

    async fn dispatch(
        &self,
        config: &ApiConfig,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", config.base_url(), path);
        tracing::debug!(method = %method, url = %url, "Sending Invoicebox request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, config.user_agent())
            .bearer_auth(config.token());

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_LENGTH, body.len()).body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let decoded = decode_body(&bytes);

        tracing::debug!(method = %method, url = %url, status, "Invoicebox response received");

        if let Err(err) = check_status(status, extract_detail(&decoded)) {
            tracing::warn!(method = %method, url = %url, status, error = %err, "Invoicebox request failed");
            return Err(err);
        }

        Ok(decoded)
    }
}

/// Decode a response body; empty or non-JSON bodies become `null`.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Response body is not JSON");
        Value::Null
    })
}

/// Serialize a request body. Scalars and `null` are replaced by `{}`.
fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ApiError> {
    let value = match serde_json::to_value(body)? {
        value @ (Value::Object(_) | Value::Array(_)) => value,
        _ => Value::Object(Map::new()),
    };
    Ok(serde_json::to_vec(&value)?)
}

/// Flatten a JSON object into form-encoded query pairs.
///
/// Nested values use bracket keys (`filter[status]`, `ids[0]`), booleans
/// become `1`/`0`, and nulls are dropped.
fn query_pairs(value: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            push_pairs(key.clone(), value, &mut pairs);
        }
    }
    pairs
}

fn push_pairs(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                push_pairs(format!("{key}[{i}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (k, item) in map {
                push_pairs(format!("{key}[{k}]"), item, pairs);
            }
        }
    }
}
