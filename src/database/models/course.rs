use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Course record from the `courses` table.
///
/// `course_content` is the ordered list of Section references; its order is
/// the canonical display order of the content tree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub course_name: String,
    pub course_description: String,
    pub instructor: Uuid,
    pub what_you_will_learn: String,
    pub price: Decimal,
    pub tag: Vec<String>,
    pub category: Uuid,
    pub instructions: Vec<String>,
    pub status: String,
    pub course_content: Vec<Uuid>,
    pub students_enrolled: Vec<Uuid>,
    pub ratings_and_reviews: Vec<Uuid>,
    pub thumbnail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Restricted projection used by the public course listing: name, price,
/// thumbnail, instructor reference, rating references, enrollment list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: Uuid,
    pub course_name: String,
    pub price: Decimal,
    pub thumbnail: String,
    pub instructor: Uuid,
    pub ratings_and_reviews: Vec<Uuid>,
    pub students_enrolled: Vec<Uuid>,
}
