//! Gross/deduction/net computation for one employee and one period.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::HrmsError;

/// Provident-fund withholding rate.
pub const PF_RATE: f64 = 0.12;

/// Flat tax withholding per period.
pub const FLAT_TAX: f64 = 200.0;

/// Proration divisor; every month is treated as 30 days.
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayBreakdown {
    #[schema(example = 60000.0)]
    pub gross: f64,

    #[schema(example = 7200.0)]
    pub pf: f64,

    #[schema(example = 200.0)]
    pub tax: f64,

    #[schema(example = 0.0)]
    pub unpaid_leave_deduction: f64,

    #[schema(example = 7400.0)]
    pub deductions: f64,

    #[schema(example = 52600.0)]
    pub net_pay: f64,
}

/// Computes the pay breakdown from a basic salary and a count of unpaid
/// leave days. Deterministic, no side effects.
///
/// Net pay is floored at zero: if deductions exceed gross, the shortfall is
/// absorbed, not carried forward.
pub fn calculate(basic_salary: f64, unpaid_leave_days: u32) -> Result<PayBreakdown, HrmsError> {
    if !basic_salary.is_finite() || basic_salary <= 0.0 {
        return Err(HrmsError::InvalidInput(format!(
            "basic salary must be a positive number, got {basic_salary}"
        )));
    }

    let gross = basic_salary;
    let pf = (gross * PF_RATE).round();
    let tax = FLAT_TAX;
    let unpaid_leave_deduction = (gross / DAYS_PER_MONTH * f64::from(unpaid_leave_days)).round();
    let deductions = pf + tax + unpaid_leave_deduction;
    let net_pay = (gross - deductions).max(0.0);

    Ok(PayBreakdown {
        gross,
        pf,
        tax,
        unpaid_leave_deduction,
        deductions,
        net_pay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn breakdown_without_unpaid_leave() {
        let pay = calculate(60000.0, 0).unwrap();
        assert_eq!(pay.gross, 60000.0);
        assert_eq!(pay.pf, 7200.0);
        assert_eq!(pay.tax, 200.0);
        assert_eq!(pay.unpaid_leave_deduction, 0.0);
        assert_eq!(pay.deductions, 7400.0);
        assert_eq!(pay.net_pay, 52600.0);
    }

    #[test]
    fn breakdown_with_five_unpaid_days() {
        let pay = calculate(60000.0, 5).unwrap();
        assert_eq!(pay.unpaid_leave_deduction, 10000.0);
        assert_eq!(pay.deductions, 17400.0);
        assert_eq!(pay.net_pay, 42600.0);
    }

    #[test]
    fn deductions_round_to_whole_units() {
        let pay = calculate(1234.0, 1).unwrap();
        assert_eq!(pay.pf, 148.0); // 148.08 rounds down
        assert_eq!(pay.unpaid_leave_deduction, 41.0); // 41.13 rounds down
    }

    #[test]
    fn net_pay_clamps_to_zero() {
        // 30 unpaid days wipe out the whole month and then some.
        let pay = calculate(1000.0, 30).unwrap();
        assert!(pay.deductions > pay.gross);
        assert_eq!(pay.net_pay, 0.0);
    }

    #[test]
    fn rejects_non_positive_salary() {
        assert!(matches!(
            calculate(0.0, 0),
            Err(HrmsError::InvalidInput(_))
        ));
        assert!(matches!(
            calculate(-500.0, 2),
            Err(HrmsError::InvalidInput(_))
        ));
        assert!(matches!(
            calculate(f64::NAN, 0),
            Err(HrmsError::InvalidInput(_))
        ));
    }

    proptest! {
        #[test]
        fn net_pay_stays_within_bounds(
            salary in 0.01f64..10_000_000.0,
            days in 0u32..62,
        ) {
            let pay = calculate(salary, days).unwrap();
            prop_assert!(pay.net_pay >= 0.0);
            prop_assert!(pay.net_pay <= pay.gross);
        }
    }
}
