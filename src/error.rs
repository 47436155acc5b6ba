// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every failure leaving a handler is rendered as the platform envelope
/// `{ "success": false, "message": ..., "error": ... }`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized (no/invalid credential)
    Unauthorized(String),

    // Role mismatch. Renders 401 on the wire, matching the platform's
    // historical behavior, but stays a distinct variant in the taxonomy.
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error, optionally carrying the underlying fault
    // text in the `error` field of the envelope.
    Internal {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Internal { .. } => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Internal { message, .. } => message,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "message": self.message(),
        });

        if let ApiError::Internal {
            detail: Some(detail),
            ..
        } = self
        {
            body["error"] = json!(detail);
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: None,
        }
    }

    pub fn internal_with(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

// Convert lower-layer errors to ApiError
impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        match err {
            crate::database::manager::DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            other => {
                // Log the real error but keep the client message generic
                tracing::error!("Database error: {}", other);
                ApiError::internal_with("Internal server error", other.to_string())
            }
        }
    }
}

impl From<crate::services::course_service::CourseError> for ApiError {
    fn from(err: crate::services::course_service::CourseError) -> Self {
        use crate::services::course_service::CourseError;
        match err {
            e @ (CourseError::InstructorNotFound
            | CourseError::CategoryNotFound
            | CourseError::CourseNotFound
            | CourseError::ProgressNotFound) => ApiError::not_found(e.to_string()),
            e @ (CourseError::CourseMissing(_) | CourseError::MalformedField(_)) => {
                ApiError::bad_request(e.to_string())
            }
            CourseError::Database(db) => ApiError::from(db),
            CourseError::Upload(up) => {
                tracing::error!("Asset upload error: {}", up);
                ApiError::internal_with("Image upload failed", up.to_string())
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status_code(), 400);
        assert_eq!(ApiError::unauthorized("x").status_code(), 401);
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::internal("x").status_code(), 500);
        // Role mismatches surface as 401 on the wire
        assert_eq!(ApiError::forbidden("x").status_code(), 401);
    }

    #[test]
    fn envelope_carries_message_and_optional_detail() {
        let plain = ApiError::not_found("Course not found").to_json();
        assert_eq!(plain["success"], json!(false));
        assert_eq!(plain["message"], json!("Course not found"));
        assert!(plain.get("error").is_none());

        let detailed = ApiError::internal_with("Server error", "pool timed out").to_json();
        assert_eq!(detailed["message"], json!("Server error"));
        assert_eq!(detailed["error"], json!("pool timed out"));
    }
}
