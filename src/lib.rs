//! # Requester - small HTTP request helpers with retries
//!
//! Requester wraps `reqwest` with a handful of helpers: a request executor with
//! a fixed attempt count and linear backoff, JSON encode/decode helpers and one
//! convenience method per HTTP verb.
//!
//! ## Quick Start
//!
//! ```no_run
//! use requester::{parse_json, Client, Method, RequestSpec};
//! use serde::{Deserialize, Serialize};
//! use std::collections::HashMap;
//! use std::time::Duration;
//!
//! #[derive(Serialize)]
//! struct CreateUser {
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), requester::Error> {
//!     let client = Client::new()?;
//!
//!     // Up to 3 attempts, waiting 500ms then 1s between transport failures
//!     let body = client
//!         .send(
//!             RequestSpec::new("https://api.example.com/users/123")
//!                 .timeout(Duration::from_secs(5))
//!                 .retries(3),
//!         )
//!         .await?;
//!     let user: User = parse_json(&body)?;
//!     println!("User: {}", user.name);
//!
//!     // JSON body, Content-Type set automatically
//!     let new_user = CreateUser { name: "Alice".to_string() };
//!     let body = client
//!         .send_json("https://api.example.com/users", Method::Post, &new_user, HashMap::new())
//!         .await?;
//!     let created: User = parse_json(&body)?;
//!     println!("Created user with ID: {}", created.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Retry Rules
//!
//! - Only transport failures (connection refused, DNS failure, timeout) are retried.
//! - A non-2xx response fails at once with [`Error::HttpError`], whatever the attempt count.
//! - The delay after failed attempt `n` is `n * 500ms`: linear, uncapped, without jitter.
//!
//! ## Defaults
//!
//! | Setting | Default |
//! |---|---|
//! | method | `GET` |
//! | timeout | 10 seconds per attempt |
//! | attempts ([`Client::send`]) | 1 |
//! | attempts ([`Client::send_json`]) | 2 |
//! | attempts (verb helpers) | 1 |

mod client;
mod error;
pub mod json;
mod method;
mod request;
mod response;
pub mod retry;

pub use client::{
    Client, ClientBuilder, DEFAULT_RETRIES, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, JSON_RETRIES,
};
pub use error::{Error, Result};
pub use json::parse_json;
pub use method::Method;
pub use request::RequestSpec;
pub use response::Response;
pub use retry::Backoff;
