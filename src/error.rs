//! Error types for request execution.
//!
//! Every failure is returned to the caller. The variants separate problems with
//! the request itself, transport failures that survived every attempt, non-2xx
//! responses, body read failures and JSON encode/decode failures.

use http::{HeaderMap, StatusCode};

/// The main error type for request execution.
///
/// # Examples
///
/// ```no_run
/// use requester::{Client, Error, RequestSpec};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new()?;
///
/// match client.send(RequestSpec::new("https://api.example.com/health")).await {
///     Ok(body) => println!("Got {} bytes", body.len()),
///     Err(Error::HttpError { status, raw_response, .. }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(Error::Transport { attempts, source }) => {
///         eprintln!("Gave up after {} attempts: {}", attempts, source);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request could not be constructed, for example because of an invalid
    /// header name or value.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The method is not one of GET, POST, PUT, PATCH, DELETE or OPTIONS.
    #[error("Unsupported method: {0:?}")]
    UnsupportedMethod(String),

    /// Every attempt failed at the transport level (connection refused, DNS
    /// failure, timeout, ...).
    ///
    /// # Fields
    ///
    /// * `attempts` - The number of attempts made
    /// * `source` - The error of the last attempt
    #[error("Transport error after {attempts} attempt(s): {source}")]
    Transport {
        /// The number of attempts made
        attempts: usize,
        /// The error of the last attempt
        #[source]
        source: reqwest::Error,
    },

    /// The server returned a non-2xx HTTP status code.
    ///
    /// These are never retried.
    #[error("HTTP error {status}: {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body, empty if it could not be read
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The response had a success status but its body could not be read.
    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// Failed to serialize a JSON payload.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize a JSON body into the expected type.
    #[error("Failed to deserialize response: {serde_error}")]
    DeserializationFailed {
        /// The raw body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
    },

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// Returns `true` if this error is the kind the executor retries.
    ///
    /// Only transport failures qualify. Status errors, construction errors and
    /// body or JSON failures are terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use requester::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::HttpError {
    ///     status: StatusCode::INTERNAL_SERVER_ERROR,
    ///     raw_response: "Server error".to_string(),
    ///     headers: http::HeaderMap::new(),
    /// };
    ///
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } => true,
            Error::InvalidUrl(_)
            | Error::InvalidRequest(_)
            | Error::UnsupportedMethod(_)
            | Error::HttpError { .. }
            | Error::BodyRead(_)
            | Error::SerializationFailed(_)
            | Error::DeserializationFailed { .. }
            | Error::ConfigurationError(_) => false,
        }
    }

    /// Returns `true` if the last transport failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Transport { source, .. } => source.is_timeout(),
            Error::BodyRead(source) => source.is_timeout(),
            _ => false,
        }
    }

    /// Returns the HTTP status code for `HttpError`, `None` otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the number of attempts made for `Transport` errors.
    pub fn attempts(&self) -> Option<usize> {
        match self {
            Error::Transport { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

/// A specialized `Result` type for request execution.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_not_retryable() {
        for code in [400u16, 404, 429, 500, 503] {
            let err = Error::HttpError {
                status: StatusCode::from_u16(code).unwrap(),
                raw_response: String::new(),
                headers: HeaderMap::new(),
            };
            assert!(!err.is_retryable(), "status {} must not be retried", code);
            assert_eq!(err.status().map(|s| s.as_u16()), Some(code));
        }
    }

    #[test]
    fn test_status_error_message_includes_status() {
        let err = Error::HttpError {
            status: StatusCode::NOT_FOUND,
            raw_response: "missing".to_string(),
            headers: HeaderMap::new(),
        };
        assert_eq!(err.to_string(), "HTTP error 404 Not Found: missing");
        assert_eq!(err.raw_response(), Some("missing"));
    }

    #[test]
    fn test_construction_errors_are_terminal() {
        let err = Error::from(url::Url::parse("not a url").unwrap_err());
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert!(!err.is_retryable());
        assert!(!err.is_timeout());
        assert_eq!(err.attempts(), None);

        assert!(!Error::UnsupportedMethod("TRACE".to_string()).is_retryable());
        assert!(!Error::InvalidRequest("bad header".to_string()).is_retryable());
    }
}
