//! The description of a single request handed to the executor.

use crate::json::APPLICATION_JSON;
use crate::{Error, Method};
use std::collections::HashMap;
use std::time::Duration;

/// Everything needed to perform one call.
///
/// Unset fields are filled in by the [`Client`](crate::Client) before the first
/// attempt: no method means `GET`, a zero `timeout` means the client timeout
/// (10 seconds by default) and zero `retries` means the client attempt count
/// (1 by default).
///
/// `retries` counts attempts, so `retries(1)` sends the request exactly once.
///
/// # Examples
///
/// ```
/// use requester::{Method, RequestSpec};
/// use std::time::Duration;
///
/// let spec = RequestSpec::new("https://api.example.com/items")
///     .method(Method::Post)
///     .header("Authorization", "Bearer token")
///     .body(br#"{"name":"widget"}"#.to_vec())
///     .timeout(Duration::from_secs(5))
///     .retries(3);
///
/// assert_eq!(spec.retries, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    /// The absolute request URL.
    pub url: String,

    /// The HTTP method, `GET` when `None`.
    pub method: Option<Method>,

    /// Headers applied on top of the client's headers, overwriting them.
    pub headers: HashMap<String, String>,

    /// Query parameters appended to the URL.
    pub query_params: HashMap<String, String>,

    /// The raw request body, may be empty.
    pub body: Vec<u8>,

    /// Per-attempt timeout. `Duration::ZERO` means the client default.
    pub timeout: Duration,

    /// Total number of attempts. `0` means the client default.
    pub retries: usize,
}

impl RequestSpec {
    /// Creates a spec for the given URL with every other field unset.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the HTTP method by name.
    ///
    /// An empty name leaves the method unset, which is sent as `GET`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMethod`] for names outside the supported set.
    pub fn method_name(mut self, name: &str) -> Result<Self, Error> {
        self.method = if name.is_empty() {
            None
        } else {
            Some(name.parse()?)
        };
        Ok(self)
    }

    /// Adds a header, replacing an earlier value under the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds multiple headers.
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Adds a query parameter to the request.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Sets the request body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the total number of attempts.
    pub fn retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Returns the method the request will be sent with.
    pub fn effective_method(&self) -> Method {
        self.method.unwrap_or_default()
    }

    /// Replaces every unset field with the given defaults.
    pub(crate) fn with_defaults(mut self, timeout: Duration, retries: usize) -> Self {
        if self.method.is_none() {
            self.method = Some(Method::Get);
        }
        if self.timeout.is_zero() {
            self.timeout = timeout;
        }
        if self.retries == 0 {
            self.retries = retries.max(1);
        }
        self
    }

    /// Sets `Content-Type: application/json`, dropping any caller value
    /// regardless of the case of its name.
    pub(crate) fn force_json_content_type(mut self) -> Self {
        self.headers
            .retain(|name, _| !name.eq_ignore_ascii_case("content-type"));
        self.headers
            .insert("Content-Type".to_string(), APPLICATION_JSON.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_unset_fields() {
        let spec = RequestSpec::new("http://localhost/").with_defaults(Duration::from_secs(10), 1);

        assert_eq!(spec.method, Some(Method::Get));
        assert_eq!(spec.timeout, Duration::from_secs(10));
        assert_eq!(spec.retries, 1);
    }

    #[test]
    fn test_defaults_keep_set_fields() {
        let spec = RequestSpec::new("http://localhost/")
            .method(Method::Delete)
            .timeout(Duration::from_millis(250))
            .retries(4)
            .with_defaults(Duration::from_secs(10), 1);

        assert_eq!(spec.method, Some(Method::Delete));
        assert_eq!(spec.timeout, Duration::from_millis(250));
        assert_eq!(spec.retries, 4);
    }

    #[test]
    fn test_zero_default_retries_still_attempts_once() {
        let spec = RequestSpec::new("http://localhost/").with_defaults(Duration::from_secs(1), 0);
        assert_eq!(spec.retries, 1);
    }

    #[test]
    fn test_empty_method_name_means_get() {
        let spec = RequestSpec::new("http://localhost/").method_name("").unwrap();
        assert_eq!(spec.method, None);
        assert_eq!(spec.effective_method(), Method::Get);

        let spec = spec.method_name("put").unwrap();
        assert_eq!(spec.effective_method(), Method::Put);

        assert!(matches!(
            RequestSpec::new("http://localhost/").method_name("BREW"),
            Err(Error::UnsupportedMethod(_))
        ));
    }

    #[test]
    fn test_forced_content_type_replaces_any_casing() {
        let spec = RequestSpec::new("http://localhost/")
            .header("content-type", "text/plain")
            .header("CONTENT-TYPE", "text/html")
            .header("X-Trace", "abc")
            .force_json_content_type();

        assert_eq!(spec.headers.len(), 2);
        assert_eq!(
            spec.headers.get("Content-Type").map(String::as_str),
            Some(APPLICATION_JSON)
        );
        assert_eq!(spec.headers.get("X-Trace").map(String::as_str), Some("abc"));
    }
}
