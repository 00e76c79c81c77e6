//! One-shot HTTP GET against the promotion platform.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::StatsError;

/// Browser-like agent string; the platform rejects requests without one.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; MSIE 10.0; Macintosh; Intel Mac OS X 10_7_3; Trident/6.0)";

/// Issues a single GET to `url` with the fixed `Accept: */*` / `User-Agent`
/// profile and returns the body as text.
///
/// # Errors
///
/// Connection failures, error statuses and body decoding failures all surface
/// as [`StatsError::Fetch`]. Nothing is retried.
#[tracing::instrument(skip_all, fields(url = %url))]
pub async fn fetch_text<C: HttpClient + ?Sized>(
    client: &C,
    url: Url,
    user_agent: &HeaderValue,
) -> Result<String, StatsError> {
    let mut req = reqwest::Request::new(reqwest::Method::GET, url.clone());
    let headers = req.headers_mut();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(USER_AGENT, user_agent.clone());

    let fetch_failed = |source| StatsError::Fetch {
        url: url.to_string(),
        source,
    };

    let resp = client
        .execute(req)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_failed)?;
    let body = resp.text().await.map_err(fetch_failed)?;

    debug!(bytes = body.len(), "Response body received");
    Ok(body)
}
