//! HTTP client with a fixed-count retry loop.
//!
//! The [`Client`] type is the main entry point for making HTTP requests.
//! Use [`ClientBuilder`] to configure and create clients.

use crate::{json, retry::Backoff, Error, Method, RequestSpec, Response, Result};
use http::header::USER_AGENT;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Per-attempt timeout used when a request does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of attempts used when a request does not set one.
pub const DEFAULT_RETRIES: usize = 1;

/// Number of attempts used by [`Client::send_json`].
pub const JSON_RETRIES: usize = 2;

/// `User-Agent` sent unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("requester/", env!("CARGO_PKG_VERSION"));

/// An HTTP client that executes [`RequestSpec`]s.
///
/// The client holds the defaults applied to every request (timeout, attempt
/// count, headers) and a shared connection pool. It is cheap to clone and safe
/// to use from many tasks at once.
///
/// # Examples
///
/// ```no_run
/// use requester::{Client, Method, RequestSpec};
/// use serde::Serialize;
/// use std::collections::HashMap;
/// use std::time::Duration;
///
/// #[derive(Serialize)]
/// struct CreateUser {
///     name: String,
/// }
///
/// # async fn example() -> Result<(), requester::Error> {
/// let client = Client::builder()
///     .timeout(Duration::from_secs(30))
///     .user_agent("my-app/1.0")?
///     .build()?;
///
/// // Raw request with up to 3 attempts
/// let body = client
///     .send(RequestSpec::new("https://api.example.com/users/123").retries(3))
///     .await?;
/// println!("Got {} bytes", body.len());
///
/// // JSON request
/// let new_user = CreateUser { name: "Alice".to_string() };
/// let created = client
///     .send_json("https://api.example.com/users", Method::Post, &new_user, HashMap::new())
///     .await?;
/// println!("Created: {}", String::from_utf8_lossy(&created));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    default_headers: HeaderMap,
    timeout: Duration,
    retries: usize,
    json_retries: usize,
    backoff: Backoff,
}

impl Client {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Executes a request and returns the body bytes.
    ///
    /// See [`Client::execute`] for the retry rules.
    pub async fn send(&self, spec: RequestSpec) -> Result<Vec<u8>> {
        self.execute(spec).await.map(|response| response.data)
    }

    /// Executes a request and returns the body along with the status, headers,
    /// latency and attempt count.
    ///
    /// Unset fields of `spec` are defaulted first. Then up to `spec.retries`
    /// attempts are made:
    ///
    /// - a transport failure (connection refused, DNS failure, timeout) is
    ///   retried after the client's [`Backoff`] delay, `500ms * attempt` by default;
    /// - a non-2xx status fails immediately with [`Error::HttpError`];
    /// - a 2xx status returns the body, or [`Error::BodyRead`] if it cannot be read.
    ///
    /// Failing to build the request (invalid URL or header) returns
    /// immediately without any attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] with the last transport error once every
    /// attempt has failed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use requester::{Client, RequestSpec};
    ///
    /// # async fn example() -> Result<(), requester::Error> {
    /// let client = Client::new()?;
    ///
    /// let response = client
    ///     .execute(
    ///         RequestSpec::new("https://api.example.com/search")
    ///             .query_param("q", "rust")
    ///             .retries(3),
    ///     )
    ///     .await?;
    ///
    /// if response.was_retried() {
    ///     println!("Needed {} attempts", response.attempts);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(&self, spec: RequestSpec) -> Result<Response<Vec<u8>>> {
        let spec = spec.with_defaults(self.inner.timeout, self.inner.retries);
        let method = spec.effective_method();
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let request = self.build_request(&spec)?;

            tracing::debug!(
                method = %method,
                url = %request.url(),
                attempt = attempt,
                "Executing HTTP request"
            );

            match self.inner.http_client.execute(request).await {
                Ok(response) => return self.read_response(response, start_time, attempt).await,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt,
                        method = %method,
                        url = %spec.url,
                        "Request failed"
                    );

                    if attempt >= spec.retries {
                        return Err(Error::Transport {
                            attempts: attempt,
                            source: e,
                        });
                    }

                    let delay = self.inner.backoff.delay_after(attempt);
                    tracing::info!(
                        delay_ms = delay.as_millis(),
                        attempt = attempt,
                        "Retrying request after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Builds the outbound request for one attempt.
    fn build_request(&self, spec: &RequestSpec) -> Result<reqwest::Request> {
        let mut url = Url::parse(&spec.url)?;

        if !spec.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &spec.query_params {
                pairs.append_pair(key, value);
            }
        }

        // Request headers overwrite the client's.
        let mut headers = self.inner.default_headers.clone();
        for (name, value) in &spec.headers {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| {
                Error::InvalidRequest(format!("Invalid header name {:?}: {}", name, e))
            })?;
            let value = HeaderValue::try_from(value.as_str()).map_err(|e| {
                Error::InvalidRequest(format!("Invalid header value for {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let mut request = self
            .inner
            .http_client
            .request(spec.effective_method().into(), url)
            .headers(headers)
            .timeout(spec.timeout);

        if !spec.body.is_empty() {
            request = request.body(spec.body.clone());
        }

        request
            .build()
            .map_err(|e| Error::InvalidRequest(e.to_string()))
    }

    /// Turns a received response into the call result.
    ///
    /// The response is consumed on every path, which releases its connection.
    async fn read_response(
        &self,
        response: reqwest::Response,
        start_time: Instant,
        attempts: usize,
    ) -> Result<Response<Vec<u8>>> {
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let raw_response = response.text().await.unwrap_or_default();

            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Client error (4xx)"
                );
            } else if status.is_server_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Server error (5xx)"
                );
            }

            return Err(Error::HttpError {
                status,
                raw_response,
                headers,
            });
        }

        let body = response.bytes().await.map_err(Error::BodyRead)?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            attempts = attempts,
            "Received HTTP response"
        );

        Ok(Response::new(
            body.to_vec(),
            status,
            headers,
            latency,
            attempts,
        ))
    }

    /// Sends `payload` as JSON.
    ///
    /// The payload is serialized, `Content-Type: application/json` replaces any
    /// content type in `headers`, and the request is made with the client's
    /// JSON attempt count ([`JSON_RETRIES`] by default).
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] before any attempt if `payload`
    /// cannot be encoded, otherwise the errors of [`Client::execute`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use requester::{parse_json, Client, Method};
    /// use serde::{Deserialize, Serialize};
    /// use std::collections::HashMap;
    ///
    /// #[derive(Serialize)]
    /// struct Search { query: String }
    ///
    /// #[derive(Deserialize)]
    /// struct Results { items: Vec<String> }
    ///
    /// # async fn example() -> Result<(), requester::Error> {
    /// let client = Client::new()?;
    /// let search = Search { query: "rust".to_string() };
    ///
    /// let body = client
    ///     .send_json("https://api.example.com/search", Method::Post, &search, HashMap::new())
    ///     .await?;
    /// let results: Results = parse_json(&body)?;
    /// println!("Found {} results", results.items.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_json<T>(
        &self,
        url: impl Into<String>,
        method: Method,
        payload: &T,
        headers: HashMap<String, String>,
    ) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let body = json::to_body(payload)?;
        let spec = RequestSpec::new(url)
            .method(method)
            .headers(headers)
            .body(body)
            .retries(self.inner.json_retries)
            .force_json_content_type();

        self.send(spec).await
    }

    /// Makes a single-attempt GET request.
    pub async fn get(
        &self,
        url: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Result<Vec<u8>> {
        self.send_verb(Method::Get, url, Vec::new(), headers).await
    }

    /// Makes a single-attempt POST request with a JSON body.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use requester::Client;
    /// use serde::Serialize;
    /// use std::collections::HashMap;
    ///
    /// #[derive(Serialize)]
    /// struct CreateUser { name: String }
    ///
    /// # async fn example() -> Result<(), requester::Error> {
    /// let client = Client::new()?;
    ///
    /// let request = CreateUser { name: "Alice".to_string() };
    /// let body = client
    ///     .post("https://api.example.com/users", &request, HashMap::new())
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn post<T>(
        &self,
        url: impl Into<String>,
        payload: &T,
        headers: HashMap<String, String>,
    ) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let body = json::to_body(payload)?;
        self.send_verb(Method::Post, url, body, headers).await
    }

    /// Makes a single-attempt PUT request with a JSON body.
    pub async fn put<T>(
        &self,
        url: impl Into<String>,
        payload: &T,
        headers: HashMap<String, String>,
    ) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let body = json::to_body(payload)?;
        self.send_verb(Method::Put, url, body, headers).await
    }

    /// Makes a single-attempt PATCH request with a JSON body.
    pub async fn patch<T>(
        &self,
        url: impl Into<String>,
        payload: &T,
        headers: HashMap<String, String>,
    ) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let body = json::to_body(payload)?;
        self.send_verb(Method::Patch, url, body, headers).await
    }

    /// Makes a single-attempt DELETE request.
    pub async fn delete(
        &self,
        url: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Result<Vec<u8>> {
        self.send_verb(Method::Delete, url, Vec::new(), headers).await
    }

    /// Makes a single-attempt OPTIONS request.
    pub async fn options(
        &self,
        url: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Result<Vec<u8>> {
        self.send_verb(Method::Options, url, Vec::new(), headers).await
    }

    /// Sends a single attempt. Verbs that carry a body send `json_body` as JSON;
    /// for the others it is ignored.
    async fn send_verb(
        &self,
        method: Method,
        url: impl Into<String>,
        json_body: Vec<u8>,
        headers: HashMap<String, String>,
    ) -> Result<Vec<u8>> {
        let mut spec = RequestSpec::new(url)
            .method(method)
            .headers(headers)
            .retries(1);

        if method.has_body() {
            spec = spec.body(json_body).force_json_content_type();
        }

        self.send(spec).await
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use requester::{Backoff, ClientBuilder};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), requester::Error> {
/// let client = ClientBuilder::new()
///     .timeout(Duration::from_secs(30))
///     .retries(3)
///     .backoff(Backoff::linear(Duration::from_millis(250)))
///     .default_header("X-Api-Key", "secret")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    default_headers: HeaderMap,
    timeout: Duration,
    retries: usize,
    json_retries: usize,
    backoff: Backoff,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        Self {
            default_headers,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            json_retries: JSON_RETRIES,
            backoff: Backoff::default(),
        }
    }

    /// Adds a header that will be included in all requests.
    ///
    /// Headers set on a [`RequestSpec`] take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the `User-Agent` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid header value.
    pub fn user_agent(self, user_agent: impl AsRef<str>) -> Result<Self> {
        self.default_header(USER_AGENT, user_agent)
    }

    /// Sets the per-attempt timeout used when a request does not set one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the attempt count used when a request does not set one.
    pub fn retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the attempt count used by [`Client::send_json`].
    pub fn json_retries(mut self, retries: usize) -> Self {
        self.json_retries = retries;
        self
    }

    /// Sets the delay policy between attempts.
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero, an attempt count is zero, or the
    /// HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        if self.timeout.is_zero() {
            return Err(Error::ConfigurationError(
                "Timeout must be greater than zero".to_string(),
            ));
        }
        if self.retries == 0 || self.json_retries == 0 {
            return Err(Error::ConfigurationError(
                "Attempt counts must be at least 1".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                default_headers: self.default_headers,
                timeout: self.timeout,
                retries: self.retries,
                json_retries: self.json_retries,
                backoff: self.backoff,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_zero_timeout() {
        let result = Client::builder().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn test_build_rejects_zero_attempts() {
        assert!(Client::builder().retries(0).build().is_err());
        assert!(Client::builder().json_retries(0).build().is_err());
    }

    #[test]
    fn test_invalid_default_header() {
        let result = Client::builder().default_header("bad header", "value");
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn test_build_request_applies_headers_and_query() {
        let client = Client::builder()
            .default_header("X-Client", "default")
            .unwrap()
            .build()
            .unwrap();

        let spec = RequestSpec::new("http://localhost:8080/items")
            .method(Method::Put)
            .header("X-Client", "override")
            .query_param("page", "2")
            .body(b"payload".to_vec())
            .with_defaults(DEFAULT_TIMEOUT, DEFAULT_RETRIES);

        let request = client.build_request(&spec).unwrap();

        assert_eq!(request.method(), &http::Method::PUT);
        assert_eq!(request.url().as_str(), "http://localhost:8080/items?page=2");
        assert_eq!(request.headers()["x-client"], "override");
        assert_eq!(request.headers()[USER_AGENT], DEFAULT_USER_AGENT);
        assert_eq!(request.timeout(), Some(&DEFAULT_TIMEOUT));
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some(&b"payload"[..])
        );
    }

    #[test]
    fn test_build_request_rejects_invalid_header() {
        let client = Client::new().unwrap();
        let spec = RequestSpec::new("http://localhost/").header("X-Bad", "line\nbreak");

        assert!(matches!(
            client.build_request(&spec),
            Err(Error::InvalidRequest(_))
        ));
    }
}
