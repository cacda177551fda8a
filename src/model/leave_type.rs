use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave::LeaveType;

/// Per-type annual allowance, read-only to the leave logic. Inactive types
/// are hidden from balances and rejected on application.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveTypeConfig {
    #[schema(example = "ANNUAL")]
    pub code: LeaveType,

    #[schema(example = "Annual Leave")]
    pub display_name: String,

    /// Allowed applications per calendar year.
    #[schema(example = 15)]
    pub default_annual_balance: i32,

    pub is_active: bool,
}
