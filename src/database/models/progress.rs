use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per (course, user) progress record from the `course_progress` table.
///
/// Created by the media-completion flow elsewhere; this service only reads
/// it. The percentage is always derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub total_videos: i32,
    pub completed_videos: Vec<Uuid>,
}
