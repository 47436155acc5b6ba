use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use crate::auth::Claims;
use crate::config;
use crate::database::models::user::AccountType;
use crate::error::ApiError;

/// Authenticated user context extracted from the signed credential
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub account_type: AccountType,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            account_type: claims.account_type,
        }
    }
}

/// Access Guard: extracts the credential (cookie, then JSON body field, then
/// Bearer header), validates it, and injects `AuthUser` into the request
/// extensions for downstream handlers.
pub async fn jwt_auth_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let mut token = token_from_cookies(request.headers());

    // The body is only inspected for JSON requests; the buffered bytes are
    // restored onto the request so the handler still sees them.
    if token.is_none() && is_json_request(request.headers()) {
        let (parts, body) = request.into_parts();
        let limit = config::config().api.max_request_size_bytes;
        let bytes = axum::body::to_bytes(body, limit).await.map_err(|_| {
            ApiError::unauthorized("Something went wrong while validating the token")
        })?;
        token = token_from_json_body(&bytes);
        request = Request::from_parts(parts, Body::from(bytes));
    }

    let token = token
        .or_else(|| token_from_bearer(request.headers()))
        .ok_or_else(|| ApiError::unauthorized("Token is missing"))?;

    let claims =
        validate_jwt(&token).map_err(|_| ApiError::unauthorized("Token is invalid"))?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Reusable role gate. Applied after the Access Guard; compares the attached
/// claim's role against the expected one.
pub async fn require_role(
    expected: AccountType,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::internal("User role cannot be verified, please try again"))?;

    if user.account_type != expected {
        let message = match expected {
            AccountType::Student => "This is a protected route for Students only",
            AccountType::Instructor => "This is a protected route for Instructor only",
            AccountType::Admin => "This is a protected route for Admin only",
        };
        return Err(ApiError::forbidden(message));
    }

    Ok(next.run(request).await)
}

pub async fn require_student(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(AccountType::Student, request, next).await
}

pub async fn require_instructor(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(AccountType::Instructor, request, next).await
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(AccountType::Admin, request, next).await
}

/// Extract the `token` cookie, if any.
fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Extract a `token` string field from a buffered JSON body.
fn token_from_json_body(bytes: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    value
        .get("token")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Extract a Bearer token from the Authorization header.
fn token_from_bearer(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn is_json_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}

/// Validate the signed credential and extract its claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn cookie_extraction_finds_token_among_other_cookies() {
        let h = headers(&[("cookie", "session=abc; token=tok-123; theme=dark")]);
        assert_eq!(token_from_cookies(&h).as_deref(), Some("tok-123"));
        assert_eq!(token_from_cookies(&headers(&[("cookie", "session=abc")])), None);
        assert_eq!(token_from_cookies(&headers(&[("cookie", "token=")])), None);
    }

    #[test]
    fn bearer_extraction_requires_prefix() {
        let h = headers(&[("authorization", "Bearer tok-456")]);
        assert_eq!(token_from_bearer(&h).as_deref(), Some("tok-456"));
        let h = headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(token_from_bearer(&h), None);
        let h = headers(&[("authorization", "Bearer ")]);
        assert_eq!(token_from_bearer(&h), None);
    }

    #[test]
    fn body_extraction_reads_token_field() {
        assert_eq!(
            token_from_json_body(br#"{"courseId":"x","token":"tok-789"}"#).as_deref(),
            Some("tok-789")
        );
        assert_eq!(token_from_json_body(br#"{"courseId":"x"}"#), None);
        assert_eq!(token_from_json_body(b"not json"), None);
    }

    #[test]
    fn validate_round_trips_generated_token() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let claims = crate::auth::Claims::new(
            Uuid::new_v4(),
            "student@studyhub.example".into(),
            AccountType::Student,
        );
        let token = crate::auth::generate_jwt(&claims).unwrap();
        let decoded = validate_jwt(&token).unwrap();
        assert_eq!(decoded.user_id, claims.user_id);
        assert_eq!(decoded.account_type, AccountType::Student);
    }

    #[test]
    fn validate_rejects_garbage() {
        std::env::set_var("JWT_SECRET", "test-secret");
        assert!(validate_jwt("not-a-token").is_err());
    }
}
