//! Example demonstrating raw, JSON and per-verb requests.
//!
//! This example shows how to:
//! - Create a client with a custom configuration
//! - Send a raw request with several attempts
//! - Send a JSON payload and decode the reply
//! - Tell status errors apart from transport errors
//!
//! Run with: `cargo run --example basic_send`

use requester::{parse_json, Backoff, Client, Error, Method, RequestSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("requester=debug,basic_send=info")
        .init();

    let client = Client::builder()
        .timeout(Duration::from_secs(5))
        .backoff(Backoff::linear(Duration::from_millis(250)))
        .user_agent("requester-demo/0.1")?
        .build()?;

    println!("=== Raw Request ===");
    let response = client
        .execute(RequestSpec::new("https://jsonplaceholder.typicode.com/posts/1").retries(3))
        .await?;
    let post: Post = response.json()?;
    println!("Post {}: {}", post.id, post.title);
    println!("Status: {}, attempts: {}", response.status, response.attempts);
    println!("Latency: {:?}", response.latency);
    println!();

    println!("=== JSON Request ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };
    let body = client
        .send_json(
            "https://jsonplaceholder.typicode.com/posts",
            Method::Post,
            &new_post,
            HashMap::new(),
        )
        .await?;
    let created: Post = parse_json(&body)?;
    println!("Created post ID: {}", created.id);
    println!();

    println!("=== Status Error ===");
    match client
        .get("https://jsonplaceholder.typicode.com/posts/999999", HashMap::new())
        .await
    {
        Ok(body) => println!("Unexpected success: {} bytes", body.len()),
        Err(Error::HttpError { status, .. }) => println!("HTTP error, not retried: {}", status),
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Transport Error ===");
    match client
        .send(RequestSpec::new("http://127.0.0.1:9/unreachable").retries(3))
        .await
    {
        Ok(_) => println!("Unexpected success"),
        Err(e) => println!("Gave up after {:?} attempts: {}", e.attempts(), e),
    }

    Ok(())
}
