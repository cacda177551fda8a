use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "jane.doe")]
    pub username: String,

    #[schema(example = "s3cret")]
    pub password: String,

    /// 1=ADMIN, 2=HR_OFFICER, 3=PAYROLL_OFFICER, 4=MANAGER, 5=EMPLOYEE
    #[schema(example = 5)]
    pub role_id: u8,

    #[schema(example = 1000, nullable = true)]
    pub employee_id: Option<u64>,

    #[schema(example = 1, nullable = true)]
    pub company_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "jane.doe")]
    pub username: String,

    #[schema(example = "s3cret")]
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub role_id: u8,
    pub employee_id: Option<u64>,
    pub company_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8,
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,

    /// Tenant scope; operations on employees/payroll are bounded by it
    pub company_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
