//! Leave overlap validation and per-type annual balances.
//!
//! Both functions are pure: callers fetch the employee's records and the
//! leave-type configuration, and the persistence layer re-verifies the
//! overlap check at write time (see `api::leave::apply_leave`).

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::HrmsError;
use crate::model::leave::{LeaveRecord, LeaveType};
use crate::model::leave_type::LeaveTypeConfig;

/// Validates a candidate leave application against an employee's existing
/// records.
///
/// Dates are inclusive on both ends, so requests sharing a boundary day
/// conflict. Only PENDING and APPROVED records hold their dates; rejected
/// and cancelled ones are free to be re-booked over.
///
/// `existing` must contain records of a single employee.
pub fn validate_new_leave(
    start_date: NaiveDate,
    end_date: NaiveDate,
    existing: &[LeaveRecord],
) -> Result<(), HrmsError> {
    if end_date < start_date {
        return Err(HrmsError::InvalidRange);
    }

    let conflict = existing.iter().any(|record| {
        record.status.counts_against_balance()
            && record.start_date <= end_date
            && record.end_date >= start_date
    });

    if conflict {
        return Err(HrmsError::Overlap);
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveBalance {
    #[schema(example = "ANNUAL")]
    pub leave_type: LeaveType,

    #[schema(example = 15)]
    pub total: i32,

    #[schema(example = 2)]
    pub used: i32,

    /// May go negative when over-applied; informational, not clamped.
    #[schema(example = 13)]
    pub available: i32,
}

/// Computes per-type balances for one employee and calendar year.
///
/// `used` counts applications, not day spans: a record is consumed when its
/// start date falls inside the year and it is PENDING or APPROVED. Inactive
/// leave types are omitted.
pub fn compute_balance(
    year: i32,
    configs: &[LeaveTypeConfig],
    records: &[LeaveRecord],
) -> Vec<LeaveBalance> {
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();

    configs
        .iter()
        .filter(|config| config.is_active)
        .map(|config| {
            let used = records
                .iter()
                .filter(|record| {
                    record.leave_type == config.code
                        && record.status.counts_against_balance()
                        && record.start_date >= year_start
                        && record.start_date <= year_end
                })
                .count() as i32;

            LeaveBalance {
                leave_type: config.code,
                total: config.default_annual_balance,
                used,
                available: config.default_annual_balance - used,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave::LeaveStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(
        leave_type: LeaveType,
        start: NaiveDate,
        end: NaiveDate,
        status: LeaveStatus,
    ) -> LeaveRecord {
        LeaveRecord {
            id: 1,
            employee_id: 1000,
            leave_type,
            start_date: start,
            end_date: end,
            status,
            reason: None,
            created_at: None,
        }
    }

    #[test]
    fn rejects_end_before_start() {
        let err = validate_new_leave(date(2024, 3, 12), date(2024, 3, 10), &[]).unwrap_err();
        assert!(matches!(err, HrmsError::InvalidRange));
    }

    #[test]
    fn shared_boundary_day_is_an_overlap() {
        let existing = vec![record(
            LeaveType::Annual,
            date(2024, 3, 10),
            date(2024, 3, 12),
            LeaveStatus::Approved,
        )];

        let err =
            validate_new_leave(date(2024, 3, 12), date(2024, 3, 14), &existing).unwrap_err();
        assert!(matches!(err, HrmsError::Overlap));
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let existing = vec![record(
            LeaveType::Annual,
            date(2024, 3, 10),
            date(2024, 3, 12),
            LeaveStatus::Pending,
        )];

        assert!(validate_new_leave(date(2024, 3, 13), date(2024, 3, 14), &existing).is_ok());
    }

    #[test]
    fn candidate_contained_inside_existing_overlaps() {
        let existing = vec![record(
            LeaveType::Sick,
            date(2024, 5, 1),
            date(2024, 5, 20),
            LeaveStatus::Approved,
        )];

        let err = validate_new_leave(date(2024, 5, 5), date(2024, 5, 6), &existing).unwrap_err();
        assert!(matches!(err, HrmsError::Overlap));
    }

    #[test]
    fn rejected_and_cancelled_records_release_their_dates() {
        let existing = vec![
            record(
                LeaveType::Annual,
                date(2024, 3, 10),
                date(2024, 3, 12),
                LeaveStatus::Rejected,
            ),
            record(
                LeaveType::Annual,
                date(2024, 3, 11),
                date(2024, 3, 13),
                LeaveStatus::Cancelled,
            ),
        ];

        assert!(validate_new_leave(date(2024, 3, 10), date(2024, 3, 12), &existing).is_ok());
    }

    fn annual_config(balance: i32) -> LeaveTypeConfig {
        LeaveTypeConfig {
            code: LeaveType::Annual,
            display_name: "Annual Leave".into(),
            default_annual_balance: balance,
            is_active: true,
        }
    }

    #[test]
    fn balance_counts_applications_not_days() {
        let configs = vec![annual_config(12)];
        // Two approved applications, one spanning five days.
        let records = vec![
            record(
                LeaveType::Annual,
                date(2024, 2, 5),
                date(2024, 2, 9),
                LeaveStatus::Approved,
            ),
            record(
                LeaveType::Annual,
                date(2024, 6, 3),
                date(2024, 6, 3),
                LeaveStatus::Approved,
            ),
        ];

        let balances = compute_balance(2024, &configs, &records);
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].total, 12);
        assert_eq!(balances[0].used, 2);
        assert_eq!(balances[0].available, 10);
    }

    #[test]
    fn balance_ignores_other_years_and_released_records() {
        let configs = vec![annual_config(12)];
        let records = vec![
            record(
                LeaveType::Annual,
                date(2023, 12, 28),
                date(2024, 1, 2),
                LeaveStatus::Approved,
            ),
            record(
                LeaveType::Annual,
                date(2024, 3, 1),
                date(2024, 3, 2),
                LeaveStatus::Rejected,
            ),
        ];

        // The first starts in 2023, the second was rejected.
        let balances = compute_balance(2024, &configs, &records);
        assert_eq!(balances[0].used, 0);
        assert_eq!(balances[0].available, 12);
    }

    #[test]
    fn over_applied_balance_goes_negative() {
        let configs = vec![LeaveTypeConfig {
            code: LeaveType::Maternity,
            display_name: "Maternity Leave".into(),
            default_annual_balance: 1,
            is_active: true,
        }];
        let records = vec![
            record(
                LeaveType::Maternity,
                date(2024, 1, 10),
                date(2024, 2, 10),
                LeaveStatus::Approved,
            ),
            record(
                LeaveType::Maternity,
                date(2024, 9, 1),
                date(2024, 10, 1),
                LeaveStatus::Pending,
            ),
        ];

        let balances = compute_balance(2024, &configs, &records);
        assert_eq!(balances[0].available, -1);
    }

    #[test]
    fn inactive_types_are_omitted() {
        let configs = vec![LeaveTypeConfig {
            code: LeaveType::Casual,
            display_name: "Casual Leave".into(),
            default_annual_balance: 12,
            is_active: false,
        }];

        assert!(compute_balance(2024, &configs, &[]).is_empty());
    }
}
