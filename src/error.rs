use actix_web::{HttpResponse, http::StatusCode};
use thiserror::Error;

/// Domain errors surfaced by the leave and payroll logic.
///
/// Validation and overlap failures are expected outcomes and map to client
/// errors; storage failures are logged and returned opaque.
#[derive(Debug, Error)]
pub enum HrmsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("end date must not be before start date")]
    InvalidRange,

    #[error("leave dates overlap an existing pending or approved request")]
    Overlap,

    #[error("record already exists")]
    Duplicate,

    #[error("no employees eligible for payroll in this period")]
    NoEligibleEmployees,

    #[error("no eligible employee has complete disbursement details")]
    NoBankDetails,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl HrmsError {
    /// True when a sqlx error is a uniqueness violation (SQLSTATE 23000),
    /// e.g. a concurrent payroll insert losing the race on
    /// (employee, month, year).
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23000"),
            _ => false,
        }
    }
}

impl actix_web::ResponseError for HrmsError {
    fn status_code(&self) -> StatusCode {
        match self {
            HrmsError::InvalidInput(_) | HrmsError::InvalidRange => StatusCode::BAD_REQUEST,
            HrmsError::Overlap | HrmsError::Duplicate => StatusCode::CONFLICT,
            HrmsError::NoEligibleEmployees | HrmsError::NoBankDetails => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            HrmsError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            HrmsError::Storage(e) => {
                tracing::error!(error = %e, "storage error");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": message
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn invalid_input_displays_message() {
        let err = HrmsError::InvalidInput("basic salary must be a positive number".into());
        assert_eq!(
            err.to_string(),
            "invalid input: basic salary must be a positive number"
        );
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            HrmsError::InvalidRange.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(HrmsError::Overlap.status_code(), StatusCode::CONFLICT);
        assert_eq!(HrmsError::Duplicate.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            HrmsError::NoEligibleEmployees.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            HrmsError::NoBankDetails.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn storage_errors_stay_opaque() {
        let err = HrmsError::Storage(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn row_not_found_is_not_a_unique_violation() {
        assert!(!HrmsError::is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
