use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for API responses that automatically adds the success envelope
/// `{ "success": true, "message": ..., "data": ... }`. Successful operations
/// always answer 200; failure statuses come from `ApiError`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }

    /// Successful response carrying both a human-readable message and data
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// Successful response with a message only (e.g. after a delete)
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::OK;

        let mut envelope = json!({ "success": true });

        if let Some(message) = self.message {
            envelope["message"] = json!(message);
        }

        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => {
                    envelope["data"] = value;
                }
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (status, Json(envelope)).into_response()
    }
}

/// Convenience result alias for handlers
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn render(resp: ApiResponse<Value>) -> (StatusCode, Value) {
        let response = resp.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn envelope_includes_message_and_data_when_present() {
        let (status, v) =
            render(ApiResponse::with_message("All courses fetched successfully", json!([]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["message"], json!("All courses fetched successfully"));
        assert_eq!(v["data"], json!([]));
    }

    #[tokio::test]
    async fn message_only_envelope_omits_data() {
        let (_, v) = render(ApiResponse::message_only("Course deleted successfully")).await;
        assert_eq!(v["success"], json!(true));
        assert!(v.get("data").is_none());
    }
}
