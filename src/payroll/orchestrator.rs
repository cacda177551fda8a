//! Idempotent per-period payroll generation.
//!
//! One run walks the tenant's salaried employees, prices each one with the
//! calculator, and persists exactly one row per (employee, month, year). The
//! unique key on that triple is the authoritative guard; the pre-insert
//! existence check is an optimization. One employee's failure never aborts
//! the rest of the batch.

use chrono::Utc;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::error::HrmsError;
use crate::model::employee::Employee;
use crate::model::leave::{LeaveRecord, LeaveStatus};
use crate::model::payroll::{PayPeriod, PayrollRecord};
use crate::payroll::calculator::{self, PayBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    MissingBankDetails,
    InvalidSalary,
    StorageError,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SkippedEmployee {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "MISSING_BANK_DETAILS")]
    pub reason: SkipReason,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PayrollRunOutcome {
    pub created: Vec<PayrollRecord>,
    pub skipped: Vec<SkippedEmployee>,
}

/// Per-employee outcome, decided before touching storage.
#[derive(Debug, PartialEq)]
pub enum EmployeeDecision {
    /// Reported in the run outcome.
    Skip(SkipReason),
    /// Already generated for this period; skipped silently.
    AlreadyPaid,
    Pay(PayBreakdown),
}

/// Sums the days of APPROVED leave falling inside the period, clipping each
/// record at the period edges. Both record and period bounds are inclusive.
///
/// No paid/unpaid distinction is made here: every approved leave in range
/// reduces pay.
pub fn unpaid_days_in_period(leaves: &[LeaveRecord], period: &PayPeriod) -> u32 {
    let period_start = period.first_day();
    let period_end = period.last_day();

    leaves
        .iter()
        .filter(|leave| leave.status == LeaveStatus::Approved)
        .filter_map(|leave| {
            let start = leave.start_date.max(period_start);
            let end = leave.end_date.min(period_end);
            if end < start {
                return None;
            }
            Some((end - start).num_days() as u32 + 1)
        })
        .sum()
}

/// Decides one candidate's outcome from pre-fetched state: disbursement
/// details first, then the period existence check, then pricing.
pub fn decide_employee(
    employee: &Employee,
    already_paid: bool,
    unpaid_days: u32,
) -> EmployeeDecision {
    if !employee.bank_details_complete() {
        return EmployeeDecision::Skip(SkipReason::MissingBankDetails);
    }

    if already_paid {
        return EmployeeDecision::AlreadyPaid;
    }

    // Candidates are selected with a non-null salary, but the stored value
    // can still be zero or negative; the calculator is the arbiter.
    let Some(salary) = employee.basic_salary else {
        return EmployeeDecision::Skip(SkipReason::InvalidSalary);
    };

    match calculator::calculate(salary, unpaid_days) {
        Ok(breakdown) => EmployeeDecision::Pay(breakdown),
        Err(_) => EmployeeDecision::Skip(SkipReason::InvalidSalary),
    }
}

async fn fetch_candidates(
    pool: &MySqlPool,
    company_id: u64,
    employee_ids: Option<&[u64]>,
) -> Result<Vec<Employee>, HrmsError> {
    let mut sql = String::from(
        "SELECT id, employee_code, first_name, last_name, email, company_id, \
                basic_salary, bank_name, account_number, routing_code, hire_date, status \
         FROM employees \
         WHERE company_id = ? AND basic_salary IS NOT NULL",
    );

    if let Some(ids) = employee_ids {
        // an explicit empty set intersects to nothing
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        sql.push_str(&format!(" AND id IN ({})", placeholders));
    }

    let mut query = sqlx::query_as::<_, Employee>(&sql).bind(company_id);
    if let Some(ids) = employee_ids {
        for id in ids {
            query = query.bind(*id);
        }
    }

    Ok(query.fetch_all(pool).await?)
}

async fn fetch_approved_leaves(
    pool: &MySqlPool,
    employee_id: u64,
    period: &PayPeriod,
) -> Result<Vec<LeaveRecord>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRecord>(
        r#"
        SELECT id, employee_id, leave_type, start_date, end_date, status, reason, created_at
        FROM leave_records
        WHERE employee_id = ?
          AND status = 'APPROVED'
          AND start_date <= ?
          AND end_date >= ?
        "#,
    )
    .bind(employee_id)
    .bind(period.last_day())
    .bind(period.first_day())
    .fetch_all(pool)
    .await
}

/// Generates payroll for one (month, year) and tenant.
///
/// Fails as a whole only when no candidate has a salary set
/// (`NoEligibleEmployees`) or when every candidate lacks complete
/// disbursement details (`NoBankDetails`). Everything else is aggregated
/// into the outcome.
pub async fn run(
    pool: &MySqlPool,
    period: &PayPeriod,
    company_id: u64,
    employee_ids: Option<&[u64]>,
) -> Result<PayrollRunOutcome, HrmsError> {
    let candidates = fetch_candidates(pool, company_id, employee_ids).await?;

    if candidates.is_empty() {
        return Err(HrmsError::NoEligibleEmployees);
    }
    if candidates.iter().all(|e| !e.bank_details_complete()) {
        return Err(HrmsError::NoBankDetails);
    }

    let month = period.month_code();
    let year = period.year();

    let mut created = Vec::new();
    let mut skipped = Vec::new();

    for employee in &candidates {
        let already_paid = match sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payroll_records WHERE employee_id = ? AND month = ? AND year = ?",
        )
        .bind(employee.id)
        .bind(&month)
        .bind(year)
        .fetch_one(pool)
        .await
        {
            Ok(count) => count > 0,
            Err(e) => {
                warn!(error = %e, employee_id = employee.id, "payroll existence check failed");
                skipped.push(SkippedEmployee {
                    employee_id: employee.id,
                    reason: SkipReason::StorageError,
                });
                continue;
            }
        };

        let unpaid_days = if already_paid {
            0
        } else {
            match fetch_approved_leaves(pool, employee.id, period).await {
                Ok(leaves) => unpaid_days_in_period(&leaves, period),
                Err(e) => {
                    warn!(error = %e, employee_id = employee.id, "leave lookup failed");
                    skipped.push(SkippedEmployee {
                        employee_id: employee.id,
                        reason: SkipReason::StorageError,
                    });
                    continue;
                }
            }
        };

        let breakdown = match decide_employee(employee, already_paid, unpaid_days) {
            EmployeeDecision::Pay(breakdown) => breakdown,
            EmployeeDecision::AlreadyPaid => {
                debug!(employee_id = employee.id, month = %month, year, "already paid, skipping");
                continue;
            }
            EmployeeDecision::Skip(reason) => {
                warn!(employee_id = employee.id, reason = %reason, "employee skipped");
                skipped.push(SkippedEmployee {
                    employee_id: employee.id,
                    reason,
                });
                continue;
            }
        };

        let insert = sqlx::query(
            r#"
            INSERT INTO payroll_records
                (employee_id, month, year, basic_salary, gross_pay,
                 pf_deduction, tax_deduction, other_deductions, net_pay)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee.id)
        .bind(&month)
        .bind(year)
        .bind(breakdown.gross)
        .bind(breakdown.gross)
        .bind(breakdown.pf)
        .bind(breakdown.tax)
        .bind(breakdown.unpaid_leave_deduction)
        .bind(breakdown.net_pay)
        .execute(pool)
        .await;

        match insert {
            Ok(result) => {
                created.push(PayrollRecord {
                    id: result.last_insert_id(),
                    employee_id: employee.id,
                    month: month.clone(),
                    year: year as i16,
                    basic_salary: breakdown.gross,
                    gross_pay: breakdown.gross,
                    pf_deduction: breakdown.pf,
                    tax_deduction: breakdown.tax,
                    other_deductions: breakdown.unpaid_leave_deduction,
                    net_pay: breakdown.net_pay,
                    generated_at: Some(Utc::now()),
                });
            }
            // Lost a race with a concurrent run; the period row exists now,
            // which is exactly the idempotent outcome.
            Err(e) if HrmsError::is_unique_violation(&e) => {
                debug!(employee_id = employee.id, month = %month, year, "duplicate insert, skipping");
            }
            Err(e) => {
                warn!(error = %e, employee_id = employee.id, "payroll insert failed");
                skipped.push(SkippedEmployee {
                    employee_id: employee.id,
                    reason: SkipReason::StorageError,
                });
            }
        }
    }

    Ok(PayrollRunOutcome { created, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave::LeaveType;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn leave(start: NaiveDate, end: NaiveDate, status: LeaveStatus) -> LeaveRecord {
        LeaveRecord {
            id: 1,
            employee_id: 1000,
            leave_type: LeaveType::Annual,
            start_date: start,
            end_date: end,
            status,
            reason: None,
            created_at: None,
        }
    }

    fn employee(salary: Option<f64>, with_bank: bool) -> Employee {
        let bank = |v: &str| with_bank.then(|| v.to_string());
        Employee {
            id: 1001,
            employee_code: "EMP-1001".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@company.com".into(),
            company_id: 1,
            basic_salary: salary,
            bank_name: bank("First National"),
            account_number: bank("0123456789"),
            routing_code: bank("FN-004"),
            hire_date: date(2023, 1, 1),
            status: "active".into(),
        }
    }

    #[test]
    fn leave_days_are_clipped_at_period_edges() {
        let period = PayPeriod::new("03", 2024).unwrap();
        let leaves = vec![leave(
            date(2024, 2, 25),
            date(2024, 3, 5),
            LeaveStatus::Approved,
        )];

        // Only March 1..=5 counts.
        assert_eq!(unpaid_days_in_period(&leaves, &period), 5);
    }

    #[test]
    fn leave_days_sum_across_records() {
        let period = PayPeriod::new("03", 2024).unwrap();
        let leaves = vec![
            leave(date(2024, 3, 10), date(2024, 3, 12), LeaveStatus::Approved),
            leave(date(2024, 3, 28), date(2024, 4, 3), LeaveStatus::Approved),
        ];

        // 3 days + 4 clipped days.
        assert_eq!(unpaid_days_in_period(&leaves, &period), 7);
    }

    #[test]
    fn pending_and_out_of_range_leaves_do_not_count() {
        let period = PayPeriod::new("03", 2024).unwrap();
        let leaves = vec![
            leave(date(2024, 3, 10), date(2024, 3, 12), LeaveStatus::Pending),
            leave(date(2024, 4, 1), date(2024, 4, 2), LeaveStatus::Approved),
        ];

        assert_eq!(unpaid_days_in_period(&leaves, &period), 0);
    }

    #[test]
    fn missing_bank_details_skip_wins_over_everything() {
        let decision = decide_employee(&employee(Some(60000.0), false), true, 0);
        assert_eq!(
            decision,
            EmployeeDecision::Skip(SkipReason::MissingBankDetails)
        );
    }

    #[test]
    fn already_paid_is_a_silent_skip() {
        let decision = decide_employee(&employee(Some(60000.0), true), true, 0);
        assert_eq!(decision, EmployeeDecision::AlreadyPaid);
    }

    #[test]
    fn zero_salary_is_an_invalid_salary_skip() {
        let decision = decide_employee(&employee(Some(0.0), true), false, 0);
        assert_eq!(decision, EmployeeDecision::Skip(SkipReason::InvalidSalary));
    }

    #[test]
    fn payable_employee_gets_a_breakdown() {
        let EmployeeDecision::Pay(breakdown) =
            decide_employee(&employee(Some(60000.0), true), false, 5)
        else {
            panic!("expected a pay decision");
        };
        assert_eq!(breakdown.net_pay, 42600.0);
    }

    #[test]
    fn skip_reasons_serialize_as_screaming_snake() {
        let json = serde_json::to_string(&SkipReason::MissingBankDetails).unwrap();
        assert_eq!(json, "\"MISSING_BANK_DETAILS\"");
    }
}
