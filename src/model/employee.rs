use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@company.com",
        "company_id": 1,
        "basic_salary": 60000.0,
        "bank_name": "First National",
        "account_number": "0123456789",
        "routing_code": "FN-004",
        "hire_date": "2024-01-01",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = 1)]
    pub company_id: u64,

    /// Employees without a basic salary are excluded from payroll runs.
    #[schema(example = 60000.0, nullable = true)]
    pub basic_salary: Option<f64>,

    #[schema(example = "First National", nullable = true)]
    pub bank_name: Option<String>,

    #[schema(example = "0123456789", nullable = true)]
    pub account_number: Option<String>,

    #[schema(example = "FN-004", nullable = true)]
    pub routing_code: Option<String>,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,
}

impl Employee {
    /// All three disbursement fields must be present and non-blank; a
    /// partial set counts as incomplete and the employee is skipped by
    /// payroll generation.
    pub fn bank_details_complete(&self) -> bool {
        fn filled(field: &Option<String>) -> bool {
            field.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        filled(&self.bank_name) && filled(&self.account_number) && filled(&self.routing_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(bank: Option<&str>, account: Option<&str>, routing: Option<&str>) -> Employee {
        Employee {
            id: 1,
            employee_code: "EMP-001".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john@company.com".into(),
            company_id: 1,
            basic_salary: Some(60000.0),
            bank_name: bank.map(str::to_string),
            account_number: account.map(str::to_string),
            routing_code: routing.map(str::to_string),
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: "active".into(),
        }
    }

    #[test]
    fn complete_details_accepted() {
        assert!(employee(Some("First National"), Some("0123456789"), Some("FN-004"))
            .bank_details_complete());
    }

    #[test]
    fn partial_details_are_incomplete() {
        assert!(!employee(Some("First National"), None, Some("FN-004")).bank_details_complete());
        assert!(!employee(None, None, None).bank_details_complete());
    }

    #[test]
    fn blank_fields_count_as_missing() {
        assert!(!employee(Some("First National"), Some("  "), Some("FN-004"))
            .bank_details_complete());
        assert!(!employee(Some(""), Some("0123456789"), Some("FN-004")).bank_details_complete());
    }
}
