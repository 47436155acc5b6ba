use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

/// Shared signing key for every test in a binary; must be set before the
/// config singleton is first touched.
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub fn init_env() {
    std::env::set_var("JWT_SECRET", TEST_JWT_SECRET);
}

/// Drive the real router in-process and return status + parsed JSON body.
pub async fn send(request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = studyhub_api::app().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    Ok((status, body))
}
