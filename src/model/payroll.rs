use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HrmsError;

/// One payroll cycle, identified by a month code ("01".."12") and a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriod {
    month: u32,
    year: i32,
}

impl PayPeriod {
    pub fn new(month: &str, year: i32) -> Result<Self, HrmsError> {
        let parsed: u32 = month
            .parse()
            .map_err(|_| HrmsError::InvalidInput(format!("invalid month code: {month:?}")))?;
        if !(1..=12).contains(&parsed) {
            return Err(HrmsError::InvalidInput(format!(
                "month code must be 01..12, got {month:?}"
            )));
        }
        if !(1970..=2100).contains(&year) {
            return Err(HrmsError::InvalidInput(format!("year out of range: {year}")));
        }
        Ok(PayPeriod {
            month: parsed,
            year,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-padded month code as stored in `payroll_records.month`.
    pub fn month_code(&self) -> String {
        format!("{:02}", self.month)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    pub fn last_day(&self) -> NaiveDate {
        let next_month_start = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next_month_start.unwrap().pred_opt().unwrap()
    }
}

/// Immutable once created: one row per (employee, month, year), enforced by
/// `uq_payroll_period`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "03")]
    pub month: String,

    #[schema(example = 2024)]
    pub year: i16,

    /// Salary snapshot at generation time.
    #[schema(example = 60000.0)]
    pub basic_salary: f64,

    #[schema(example = 60000.0)]
    pub gross_pay: f64,

    #[schema(example = 7200.0)]
    pub pf_deduction: f64,

    #[schema(example = 200.0)]
    pub tax_deduction: f64,

    /// Unpaid-leave proration.
    #[schema(example = 0.0)]
    pub other_deductions: f64,

    #[schema(example = 52600.0)]
    pub net_pay: f64,

    #[schema(example = "2024-04-01T00:00:00Z", value_type = String, format = "date-time")]
    pub generated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_codes_are_zero_padded() {
        let period = PayPeriod::new("3", 2024).unwrap();
        assert_eq!(period.month_code(), "03");
        let period = PayPeriod::new("11", 2024).unwrap();
        assert_eq!(period.month_code(), "11");
    }

    #[test]
    fn rejects_bad_month_codes() {
        assert!(PayPeriod::new("00", 2024).is_err());
        assert!(PayPeriod::new("13", 2024).is_err());
        assert!(PayPeriod::new("march", 2024).is_err());
        assert!(PayPeriod::new("03", 1800).is_err());
    }

    #[test]
    fn period_bounds_cover_the_whole_month() {
        let feb = PayPeriod::new("02", 2024).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = PayPeriod::new("12", 2023).unwrap();
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }
}
