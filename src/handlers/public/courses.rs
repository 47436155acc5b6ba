use axum::response::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::handlers::CourseIdRequest;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::course_service::{CourseService, CourseSummaryView, CourseView};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailsData {
    pub course_details: CourseView,
}

/// GET /api/v1/course/getAllCourses - public listing, restricted projection
pub async fn get_all_courses() -> ApiResult<Vec<CourseSummaryView>> {
    let service = CourseService::new().await?;
    let courses = service.get_all_courses().await?;
    Ok(ApiResponse::with_message(
        "All courses fetched successfully",
        courses,
    ))
}

/// POST /api/v1/course/getCourseDetails - public course page payload
pub async fn get_course_details(
    Json(payload): Json<CourseIdRequest>,
) -> ApiResult<CourseDetailsData> {
    let course_id = payload
        .course_id
        .ok_or_else(|| ApiError::bad_request("Course ID is required"))?;

    let service = CourseService::new().await?;
    let course_details = service.get_course_details(course_id).await?;

    Ok(ApiResponse::success(CourseDetailsData { course_details }))
}
