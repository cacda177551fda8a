use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::{AuthUser, Capability};
use crate::model::payroll::{PayPeriod, PayrollRecord};
use crate::payroll::orchestrator::{self, PayrollRunOutcome};

#[derive(Deserialize, ToSchema)]
pub struct GeneratePayroll {
    /// Month code "01".."12"
    #[schema(example = "03")]
    pub month: String,

    #[schema(example = 2026)]
    pub year: i32,

    /// Restrict the run to these employees; omit for the whole tenant
    #[schema(example = json!([1001, 1002]), nullable = true)]
    pub employee_ids: Option<Vec<u64>>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,

    /// Month code "01".."12"; only applied together with `year`
    #[schema(example = "03")]
    pub month: Option<String>,

    #[schema(example = 2026)]
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

const PAYROLL_COLUMNS: &str = "id, employee_id, month, year, basic_salary, gross_pay, \
     pf_deduction, tax_deduction, other_deductions, net_pay, generated_at";

/// Runs payroll generation for one period. Re-running the same period is
/// safe: existing rows are skipped, nothing is updated.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/generate",
    request_body = GeneratePayroll,
    responses(
        (status = 200, description = "Run outcome", body = PayrollRunOutcome),
        (status = 400, description = "Bad period"),
        (status = 422, description = "No eligible employees, or none with disbursement details"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<GeneratePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require(Capability::GeneratePayroll)?;
    let company_id = auth.company_id_required()?;

    let period = PayPeriod::new(&payload.month, payload.year)?;

    let outcome = orchestrator::run(
        pool.get_ref(),
        &period,
        company_id,
        payload.employee_ids.as_deref(),
    )
    .await?;

    info!(
        company_id,
        month = %period.month_code(),
        year = period.year(),
        created = outcome.created.len(),
        skipped = outcome.skipped.len(),
        "Payroll run finished"
    );

    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, body = PayrollRecord),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require(Capability::ViewPayroll)?;

    let payroll_id = path.into_inner();

    let sql = format!(
        "SELECT {} FROM payroll_records WHERE id = ?",
        PAYROLL_COLUMNS
    );

    let payroll = sqlx::query_as::<_, PayrollRecord>(&sql)
        .bind(payroll_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, payroll_id, "Failed to fetch payroll record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match payroll {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll record not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require(Capability::ViewPayroll)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let period = match (query.month.as_deref(), query.year) {
        (Some(month), Some(year)) => Some(PayPeriod::new(month, year)?),
        _ => None,
    };

    let mut where_sql = String::from(" WHERE 1=1");
    if query.employee_id.is_some() {
        where_sql.push_str(" AND employee_id = ?");
    }
    if period.is_some() {
        where_sql.push_str(" AND month = ? AND year = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM payroll_records{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(emp_id) = query.employee_id {
        count_q = count_q.bind(emp_id);
    }
    if let Some(p) = &period {
        count_q = count_q.bind(p.month_code()).bind(p.year());
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count payroll records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT {} FROM payroll_records{} ORDER BY year DESC, month DESC LIMIT ? OFFSET ?",
        PAYROLL_COLUMNS, where_sql
    );

    let mut data_q = sqlx::query_as::<_, PayrollRecord>(&data_sql);
    if let Some(emp_id) = query.employee_id {
        data_q = data_q.bind(emp_id);
    }
    if let Some(p) = &period {
        data_q = data_q.bind(p.month_code()).bind(p.year());
    }

    let data = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch payroll list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}
