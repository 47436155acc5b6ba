use std::collections::HashMap;
use std::str::FromStr;

use axum::{extract::Multipart, response::Json, Extension};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::Course;
use crate::error::ApiError;
use crate::handlers::CourseIdRequest;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::course_service::{
    parse_string_array, CourseError, CourseService, CourseUpdates, CourseView, FullCourseData,
    ImageFile, NewCourseInput, ProgressOutcome,
};

/// Historical flat response shape of the progress endpoint (not the data
/// envelope the other operations use).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPercentageResponse {
    pub success: bool,
    pub progress_percentage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Text and file parts of a multipart form, collected up front so required
/// fields can be checked as a group.
struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, ImageFile>,
}

async fn collect_multipart(mut multipart: Multipart) -> Result<MultipartForm, ApiError> {
    let mut texts = HashMap::new();
    let mut files = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
                .to_vec();
            files.insert(name, ImageFile { file_name, bytes });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?;
            texts.insert(name, text);
        }
    }

    Ok(MultipartForm { texts, files })
}

fn parse_price(raw: &str) -> Result<Decimal, ApiError> {
    Decimal::from_str(raw.trim()).map_err(|_| ApiError::bad_request("Invalid value in field 'price'"))
}

fn parse_uuid_field(field: &'static str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::bad_request(format!("Invalid value in field '{}'", field)))
}

/// POST /api/v1/course/createCourse - Instructor only
pub async fn create_course(
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Course> {
    let mut form = collect_multipart(multipart).await?;

    let (
        Some(course_name),
        Some(course_description),
        Some(what_you_will_learn),
        Some(price_raw),
        Some(category_raw),
        Some(thumbnail),
    ) = (
        form.texts.remove("courseName"),
        form.texts.remove("courseDescription"),
        form.texts.remove("whatYouWillLearn"),
        form.texts.remove("price"),
        form.texts.remove("category"),
        form.files.remove("thumbnailImage"),
    )
    else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    // Structured fields are parse-checked before anything is persisted.
    let tag = match form.texts.remove("tag") {
        Some(raw) => parse_string_array("tag", &raw)?,
        None => vec![],
    };
    let instructions = match form.texts.remove("instructions") {
        Some(raw) => parse_string_array("instructions", &raw)?,
        None => vec![],
    };

    let input = NewCourseInput {
        course_name,
        course_description,
        what_you_will_learn,
        price: parse_price(&price_raw)?,
        category: parse_uuid_field("category", &category_raw)?,
        tag,
        instructions,
        thumbnail,
    };

    let service = CourseService::new().await?;
    let course = service
        .create_course(user.user_id, input)
        .await
        .map_err(|e| match e {
            CourseError::Database(_) | CourseError::Upload(_) => {
                tracing::error!("Course creation failed: {}", e);
                ApiError::internal_with("Course addition failed", e.to_string())
            }
            other => ApiError::from(other),
        })?;

    Ok(ApiResponse::with_message("Course created successfully", course))
}

/// POST /api/v1/course/editCourse - Instructor only
pub async fn edit_course(
    Extension(_user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<CourseView> {
    let mut form = collect_multipart(multipart).await?;

    let course_id = match form.texts.remove("courseId") {
        Some(raw) => parse_uuid_field("courseId", &raw)?,
        None => return Err(ApiError::bad_request("Course ID is required")),
    };

    let updates = CourseUpdates {
        course_name: form.texts.remove("courseName"),
        course_description: form.texts.remove("courseDescription"),
        what_you_will_learn: form.texts.remove("whatYouWillLearn"),
        price: form
            .texts
            .remove("price")
            .map(|raw| parse_price(&raw))
            .transpose()?,
        tag: form
            .texts
            .remove("tag")
            .map(|raw| parse_string_array("tag", &raw))
            .transpose()?,
        instructions: form
            .texts
            .remove("instructions")
            .map(|raw| parse_string_array("instructions", &raw))
            .transpose()?,
        category: form
            .texts
            .remove("category")
            .map(|raw| parse_uuid_field("category", &raw))
            .transpose()?,
        status: form.texts.remove("status"),
    };

    let thumbnail = form.files.remove("thumbnailImage");

    let service = CourseService::new().await?;
    let updated = service.edit_course(course_id, updates, thumbnail).await?;

    Ok(ApiResponse::with_message("Course updated successfully", updated))
}

/// POST /api/v1/course/getFullCourseDetails - enrolled caller's view
pub async fn get_full_course_details(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CourseIdRequest>,
) -> ApiResult<FullCourseData> {
    let course_id = payload
        .course_id
        .ok_or_else(|| ApiError::bad_request("Course ID is required"))?;

    let service = CourseService::new().await?;
    let data = service
        .get_full_course_details(course_id, user.user_id)
        .await?;

    Ok(ApiResponse::success(data))
}

/// GET /api/v1/course/getInstructorCourses - Instructor only
pub async fn get_instructor_courses(
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Course>> {
    let service = CourseService::new().await?;
    let courses = service.get_instructor_courses(user.user_id).await?;
    Ok(ApiResponse::success(courses))
}

/// DELETE /api/v1/course/deleteCourse
pub async fn delete_course(
    Extension(_user): Extension<AuthUser>,
    Json(payload): Json<CourseIdRequest>,
) -> ApiResult<()> {
    let course_id = payload
        .course_id
        .ok_or_else(|| ApiError::bad_request("Course ID is required"))?;

    let service = CourseService::new().await?;
    service.delete_course(course_id).await?;

    Ok(ApiResponse::message_only("Course deleted successfully"))
}

/// POST /api/v1/course/getProgressPercentage - Student only
pub async fn get_progress_percentage(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CourseIdRequest>,
) -> Result<Json<ProgressPercentageResponse>, ApiError> {
    let course_id = payload
        .course_id
        .ok_or_else(|| ApiError::bad_request("Course ID is required"))?;

    let service = CourseService::new().await?;
    let outcome = service
        .get_progress_percentage(course_id, user.user_id)
        .await?;

    let response = match outcome {
        // An empty course is still a success, there is just nothing to track.
        ProgressOutcome::NoVideos => ProgressPercentageResponse {
            success: true,
            progress_percentage: 0,
            message: Some("No videos to track progress".to_string()),
        },
        ProgressOutcome::Percentage(progress_percentage) => ProgressPercentageResponse {
            success: true,
            progress_percentage,
            message: None,
        },
    };

    Ok(Json(response))
}
