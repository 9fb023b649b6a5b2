//! JSON encode/decode helpers.
//!
//! These are pure transforms: nothing here touches the network and nothing is
//! retried.

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Content type set by the JSON helpers.
pub const APPLICATION_JSON: &str = "application/json";

/// Serializes a payload into a request body.
///
/// # Errors
///
/// Returns [`Error::SerializationFailed`] if `payload` cannot be encoded.
pub fn to_body<T>(payload: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec(payload).map_err(|e| Error::SerializationFailed(e.to_string()))
}

/// Decodes a JSON body into `T`.
///
/// # Errors
///
/// Returns [`Error::DeserializationFailed`] with the raw body (lossily decoded
/// as UTF-8) and the serde message when decoding fails.
///
/// # Examples
///
/// ```
/// use requester::parse_json;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u64,
/// }
///
/// let user: User = parse_json(br#"{"id": 7}"#).unwrap();
/// assert_eq!(user.id, 7);
///
/// assert!(parse_json::<User>(b"not json").is_err());
/// ```
pub fn parse_json<T>(data: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(data).map_err(|e| {
        tracing::debug!(error = %e, "Failed to deserialize JSON body");
        Error::DeserializationFailed {
            raw_response: String::from_utf8_lossy(data).into_owned(),
            serde_error: e.to_string(),
        }
    })
}
