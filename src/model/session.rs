use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One refresh-token session. Rows are written at login and rotation,
/// revoked at logout, and purged once expired.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Session {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub user_id: u64,

    #[schema(example = "2024-03-08T12:00:00Z", value_type = String, format = "date-time")]
    pub expires_at: DateTime<Utc>,

    #[schema(example = "2024-03-01T12:00:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
