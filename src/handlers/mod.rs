// Two-tier handler layout: public endpoints need no credential; protected
// endpoints sit behind the Access Guard (and per-route role gates).
pub mod protected;
pub mod public;

use serde::Deserialize;
use uuid::Uuid;

/// Shared request payload for operations addressed by course id. The id is
/// optional so its absence can be reported with the platform message rather
/// than a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseIdRequest {
    pub course_id: Option<Uuid>,
}
