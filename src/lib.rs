pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router. Lives in the library so the integration
/// tests can drive it in-process.
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Course API
        .merge(course_public_routes())
        .merge(course_protected_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn course_public_routes() -> Router {
    use handlers::public::courses;

    Router::new()
        .route("/api/v1/course/getAllCourses", get(courses::get_all_courses))
        .route(
            "/api/v1/course/getCourseDetails",
            post(courses::get_course_details),
        )
}

fn course_protected_routes() -> Router {
    use handlers::protected::courses;
    use middleware::auth::{jwt_auth_middleware, require_instructor, require_student};

    let instructor_routes = Router::new()
        .route("/api/v1/course/createCourse", post(courses::create_course))
        .route("/api/v1/course/editCourse", post(courses::edit_course))
        .route(
            "/api/v1/course/getInstructorCourses",
            get(courses::get_instructor_courses),
        )
        .route_layer(axum_middleware::from_fn(require_instructor));

    let student_routes = Router::new()
        .route(
            "/api/v1/course/getProgressPercentage",
            post(courses::get_progress_percentage),
        )
        .route_layer(axum_middleware::from_fn(require_student));

    let enrolled_routes = Router::new()
        .route(
            "/api/v1/course/getFullCourseDetails",
            post(courses::get_full_course_details),
        )
        .route("/api/v1/course/deleteCourse", delete(courses::delete_course));

    // The Access Guard wraps every protected route; role gates sit inside it.
    Router::new()
        .merge(instructor_routes)
        .merge(student_routes)
        .merge(enrolled_routes)
        .layer(axum_middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentialed CORS requires explicit origins, methods, and headers.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is UP and Running",
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
