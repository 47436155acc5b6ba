mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use uuid::Uuid;

use studyhub_api::auth::{generate_jwt, Claims};
use studyhub_api::database::models::user::AccountType;

fn token_for(account_type: AccountType) -> String {
    let claims = Claims::new(
        Uuid::new_v4(),
        "someone@studyhub.example".into(),
        account_type,
    );
    generate_jwt(&claims).expect("signing key is configured")
}

fn expired_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        user_id: Uuid::new_v4(),
        email: "someone@studyhub.example".into(),
        account_type: AccountType::Student,
        // Well past the validation leeway
        exp: now - 7200,
        iat: now - 14400,
    };
    generate_jwt(&claims).expect("signing key is configured")
}

#[tokio::test]
async fn missing_token_in_all_three_locations_is_rejected() -> Result<()> {
    common::init_env();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/course/getFullCourseDetails")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "courseId": null }).to_string()))?;

    let (status, body) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Token is missing"));
    Ok(())
}

#[tokio::test]
async fn garbage_token_from_cookie_is_rejected() -> Result<()> {
    common::init_env();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/course/getFullCourseDetails")
        .header(header::COOKIE, "token=not-a-real-token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "courseId": null }).to_string()))?;

    let (status, body) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Token is invalid"));
    Ok(())
}

#[tokio::test]
async fn garbage_token_from_json_body_is_rejected() -> Result<()> {
    common::init_env();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/course/getFullCourseDetails")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "courseId": null, "token": "not-a-real-token" }).to_string(),
        ))?;

    let (status, body) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Token is invalid"));
    Ok(())
}

#[tokio::test]
async fn garbage_token_from_bearer_header_is_rejected() -> Result<()> {
    common::init_env();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/course/getFullCourseDetails")
        .header(header::AUTHORIZATION, "Bearer not-a-real-token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "courseId": null }).to_string()))?;

    let (status, body) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Token is invalid"));
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> Result<()> {
    common::init_env();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/course/getFullCourseDetails")
        .header(header::AUTHORIZATION, format!("Bearer {}", expired_token()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "courseId": null }).to_string()))?;

    let (status, body) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Token is invalid"));
    Ok(())
}

#[tokio::test]
async fn student_token_cannot_reach_instructor_route() -> Result<()> {
    common::init_env();

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/course/getInstructorCourses")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token_for(AccountType::Student)),
        )
        .body(Body::empty())?;

    let (status, body) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        json!("This is a protected route for Instructor only")
    );
    Ok(())
}

#[tokio::test]
async fn instructor_token_cannot_reach_student_route() -> Result<()> {
    common::init_env();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/course/getProgressPercentage")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token_for(AccountType::Instructor)),
        )
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "courseId": null }).to_string()))?;

    let (status, body) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        json!("This is a protected route for Students only")
    );
    Ok(())
}

#[tokio::test]
async fn cookie_token_satisfies_the_role_gate() -> Result<()> {
    common::init_env();

    // A student credential delivered via cookie passes the guard, then the
    // Instructor gate rejects it: proves the cookie location is honored end
    // to end without needing a live store.
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/course/getInstructorCourses")
        .header(
            header::COOKIE,
            format!("token={}", token_for(AccountType::Student)),
        )
        .body(Body::empty())?;

    let (status, body) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        json!("This is a protected route for Instructor only")
    );
    Ok(())
}
