use actix_web::{HttpResponse, Responder, web};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::{AuthUser, Capability};
use crate::utils::screenshot_cache;

#[derive(Deserialize, ToSchema)]
pub struct UploadScreenshot {
    /// Base64-encoded image bytes
    #[schema(example = "iVBORw0KGgo...")]
    pub image_base64: String,
}

#[derive(Serialize, ToSchema)]
pub struct ScreenshotResponse {
    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05T10:15:00Z", value_type = String, format = "date-time")]
    pub captured_at: chrono::DateTime<chrono::Utc>,

    #[schema(example = "iVBORw0KGgo...")]
    pub image_base64: String,
}

/// The monitoring agent pushes the latest capture for the authenticated
/// employee. Nothing is persisted; stale captures expire from the cache.
#[utoipa::path(
    post,
    path = "/api/v1/monitoring/screenshots",
    request_body = UploadScreenshot,
    responses(
        (status = 200, description = "Capture stored"),
        (status = 400, description = "Payload is not valid base64"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Monitoring"
)]
pub async fn upload_screenshot(
    auth: AuthUser,
    payload: web::Json<UploadScreenshot>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id_required()?;

    if payload.image_base64.is_empty()
        || BASE64.decode(payload.image_base64.as_bytes()).is_err()
    {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "image_base64 must be non-empty base64"
        })));
    }

    let capture = screenshot_cache::store(employee_id, payload.into_inner().image_base64).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Capture stored",
        "captured_at": capture.captured_at
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/monitoring/screenshots/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee to inspect")
    ),
    responses(
        (status = 200, description = "Latest capture", body = ScreenshotResponse),
        (status = 404, description = "No recent capture"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Monitoring"
)]
pub async fn latest_screenshot(
    auth: AuthUser,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require(Capability::ViewScreenshots)?;

    let employee_id = path.into_inner();

    match screenshot_cache::latest(employee_id).await {
        Some(capture) => Ok(HttpResponse::Ok().json(ScreenshotResponse {
            employee_id,
            captured_at: capture.captured_at,
            image_base64: capture.image_base64,
        })),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "No recent capture for this employee"
        }))),
    }
}
