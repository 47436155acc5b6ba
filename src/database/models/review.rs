use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Rating/review record from the `rating_and_reviews` table. Submission is
/// handled by the review flow; course reads only expand these inline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RatingAndReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub rating: i32,
    pub review: String,
}
