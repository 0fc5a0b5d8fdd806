use serde::Deserialize;
use time::OffsetDateTime;

fn default_status() -> String {
    "Pending".to_string()
}

/// Body for task creation. Identifier, owner, start time and status are
/// server-set and never read from the request.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub allotted_to: String,
    #[serde(default)]
    pub done_by: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
}

/// Body for task update. Mutable fields are replaced wholesale; the
/// identifier and owner always come from the path and the authenticated
/// user, regardless of the body.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: String,
    pub allotted_to: String,
    #[serde(default)]
    pub done_by: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
}
