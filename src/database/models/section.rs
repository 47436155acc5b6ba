use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Content section from the `sections` table. `sub_sections` is ordered;
/// deleting a section cascades to every sub-section it references.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub section_name: String,
    pub sub_sections: Vec<Uuid>,
}

/// Media entry from the `sub_sections` table. `time_duration` arrives from
/// the media pipeline as text and needs best-effort numeric parsing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubSection {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub time_duration: Option<String>,
}
