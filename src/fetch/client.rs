use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for outbound requests; [`super::BasicClient`] in production,
/// fixture-serving implementations in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
