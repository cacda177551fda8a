use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "09:02:11", value_type = String)]
    pub check_in: NaiveTime,

    #[schema(example = "17:31:40", value_type = String, nullable = true)]
    pub check_out: Option<NaiveTime>,
}
