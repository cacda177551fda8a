use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of leave types; `leave_types` rows configure their annual
/// balances.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::Display,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveType {
    Sick,
    Casual,
    Annual,
    Maternity,
    Paternity,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::Display,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// Records in these states hold their dates: they block overlapping
    /// applications and consume annual balance.
    pub fn counts_against_balance(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }

    /// PENDING is the only state with outgoing transitions: an approver may
    /// approve or reject, the owner may cancel.
    pub fn can_transition_to(self, next: LeaveStatus) -> bool {
        self == LeaveStatus::Pending
            && matches!(
                next,
                LeaveStatus::Approved | LeaveStatus::Rejected | LeaveStatus::Cancelled
            )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "ANNUAL")]
    pub leave_type: LeaveType,

    #[schema(example = "2024-03-10", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    /// Inclusive; a one-day leave has `end_date == start_date`.
    #[schema(example = "2024-03-12", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "PENDING")]
    pub status: LeaveStatus,

    #[schema(example = "family event", nullable = true)]
    pub reason: Option<String>,

    #[schema(example = "2024-03-01T00:00:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_and_approved_hold_dates() {
        assert!(LeaveStatus::Pending.counts_against_balance());
        assert!(LeaveStatus::Approved.counts_against_balance());
        assert!(!LeaveStatus::Rejected.counts_against_balance());
        assert!(!LeaveStatus::Cancelled.counts_against_balance());
    }

    #[test]
    fn pending_is_the_only_non_terminal_state() {
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Approved));
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Rejected));
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Cancelled));

        for terminal in [
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            assert!(!terminal.can_transition_to(LeaveStatus::Pending));
            assert!(!terminal.can_transition_to(LeaveStatus::Approved));
            assert!(!terminal.can_transition_to(LeaveStatus::Cancelled));
        }
    }
}
