use crate::auth::auth::{AuthUser, Capability};
use crate::error::HrmsError;
use crate::leave::accountant;
use crate::model::leave::{LeaveRecord, LeaveStatus, LeaveType};
use crate::model::leave_type::LeaveTypeConfig;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = "ANNUAL")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "family event", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Filter by leave status
    #[schema(example = "PENDING")]
    pub status: Option<LeaveStatus>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BalanceQuery {
    /// Calendar year; defaults to the current one
    #[schema(example = 2026)]
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    pub balances: Vec<accountant::LeaveBalance>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

const LEAVE_COLUMNS: &str =
    "id, employee_id, leave_type, start_date, end_date, status, reason, created_at";

async fn fetch_active_records(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Vec<LeaveRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM leave_records \
         WHERE employee_id = ? AND status IN ('PENDING', 'APPROVED')",
        LEAVE_COLUMNS
    );

    sqlx::query_as::<_, LeaveRecord>(&sql)
        .bind(employee_id)
        .fetch_all(pool)
        .await
}

/* =========================
Apply for leave
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = ApplyLeave,
        description = "Leave application payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave application submitted", body = LeaveRecord),
        (status = 400, description = "Bad dates or inactive leave type"),
        (status = 409, description = "Dates overlap an existing request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn apply_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id_required()?;

    let config = sqlx::query_as::<_, LeaveTypeConfig>(
        "SELECT code, display_name, default_annual_balance, is_active \
         FROM leave_types WHERE code = ?",
    )
    .bind(payload.leave_type)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(HrmsError::Storage)?;

    if !config.is_some_and(|c| c.is_active) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Leave type is not available"
        })));
    }

    let existing = fetch_active_records(pool.get_ref(), employee_id)
        .await
        .map_err(HrmsError::Storage)?;

    accountant::validate_new_leave(payload.start_date, payload.end_date, &existing)?;

    // Re-verify the overlap at write time: the insert only lands if no
    // PENDING/APPROVED record still conflicts, so two concurrent
    // applications cannot both pass the check above.
    let result = sqlx::query(
        r#"
        INSERT INTO leave_records (employee_id, leave_type, start_date, end_date, reason)
        SELECT ?, ?, ?, ?, ?
        FROM DUAL
        WHERE NOT EXISTS (
            SELECT 1 FROM leave_records
            WHERE employee_id = ?
              AND status IN ('PENDING', 'APPROVED')
              AND start_date <= ?
              AND end_date >= ?
        )
        "#,
    )
    .bind(employee_id)
    .bind(payload.leave_type)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&payload.reason)
    .bind(employee_id)
    .bind(payload.end_date)
    .bind(payload.start_date)
    .execute(pool.get_ref())
    .await
    .map_err(HrmsError::Storage)?;

    if result.rows_affected() == 0 {
        return Err(HrmsError::Overlap.into());
    }

    let sql = format!("SELECT {} FROM leave_records WHERE id = ?", LEAVE_COLUMNS);
    let created = sqlx::query_as::<_, LeaveRecord>(&sql)
        .bind(result.last_insert_id())
        .fetch_one(pool.get_ref())
        .await
        .map_err(HrmsError::Storage)?;

    Ok(HttpResponse::Created().json(created))
}

/* =========================
Approve / reject (HR, manager)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to approve")
    ),
    responses(
        (status = 200, description = "Leave approved"),
        (status = 400, description = "Leave application not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require(Capability::DecideLeave)?;
    transition_pending(pool.get_ref(), path.into_inner(), None, LeaveStatus::Approved).await
}

#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected"),
        (status = 400, description = "Leave application not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require(Capability::DecideLeave)?;
    transition_pending(pool.get_ref(), path.into_inner(), None, LeaveStatus::Rejected).await
}

/// Cancel own application (owner only, PENDING only)
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled"),
        (status = 400, description = "Leave application not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id_required()?;
    transition_pending(
        pool.get_ref(),
        path.into_inner(),
        Some(employee_id),
        LeaveStatus::Cancelled,
    )
    .await
}

/// PENDING is the only state these transitions leave; the status guard in
/// the WHERE clause makes concurrent decisions settle on a single winner.
async fn transition_pending(
    pool: &MySqlPool,
    leave_id: u64,
    owner: Option<u64>,
    next: LeaveStatus,
) -> actix_web::Result<HttpResponse> {
    debug_assert!(LeaveStatus::Pending.can_transition_to(next));

    let mut sql = String::from("UPDATE leave_records SET status = ? WHERE id = ? AND status = 'PENDING'");
    if owner.is_some() {
        sql.push_str(" AND employee_id = ?");
    }

    let mut query = sqlx::query(&sql).bind(next).bind(leave_id);
    if let Some(owner_id) = owner {
        query = query.bind(owner_id);
    }

    let result = query.execute(pool).await.map_err(|e| {
        tracing::error!(error = %e, leave_id, status = %next, "Leave transition failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Leave application not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Leave {}", next.to_string().to_lowercase())
    })))
}

/* =========================
Lookups
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to fetch")
    ),
    responses(
        (status = 200, description = "Leave application found", body = LeaveRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave application not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require(Capability::ViewLeave)?;

    let leave_id = path.into_inner();

    let sql = format!("SELECT {} FROM leave_records WHERE id = ?", LEAVE_COLUMNS);
    let leave = sqlx::query_as::<_, LeaveRecord>(&sql)
        .bind(leave_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave application");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match leave {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave application not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // HR/managers browse freely; employees see their own records only.
    let scope_employee = match auth.require(Capability::ViewLeave) {
        Ok(()) => query.employee_id,
        Err(_) => Some(auth.employee_id_required()?),
    };

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let status_str = query.status.map(|s| s.to_string());

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = scope_employee {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = status_str.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM leave_records{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave applications");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        "SELECT {} FROM leave_records{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
        LEAVE_COLUMNS, where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/leave/types",
    responses(
        (status = 200, description = "Configured leave types", body = [LeaveTypeConfig]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let configs = sqlx::query_as::<_, LeaveTypeConfig>(
        "SELECT code, display_name, default_annual_balance, is_active \
         FROM leave_types WHERE is_active = TRUE",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch leave types");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(configs))
}

/* =========================
Balance
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee whose balance to compute"),
        BalanceQuery
    ),
    responses(
        (status = 200, description = "Per-type balances for the year", body = BalanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    // self-service or an authorized viewer
    if auth.employee_id != Some(employee_id) {
        auth.require(Capability::ViewLeave)?;
    }

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    if !(1970..=2100).contains(&year) {
        return Err(HrmsError::InvalidInput(format!("year out of range: {year}")).into());
    }

    let configs = sqlx::query_as::<_, LeaveTypeConfig>(
        "SELECT code, display_name, default_annual_balance, is_active \
         FROM leave_types WHERE is_active = TRUE",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(HrmsError::Storage)?;

    let records = fetch_active_records(pool.get_ref(), employee_id)
        .await
        .map_err(HrmsError::Storage)?;

    let balances = accountant::compute_balance(year, &configs, &records);

    Ok(HttpResponse::Ok().json(BalanceResponse {
        employee_id,
        year,
        balances,
    }))
}
