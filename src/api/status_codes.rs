//! Status catalog API handler.

use actix_web::{HttpResponse, get, web};

use crate::db::{self, DbPool};
use crate::error::AppResult;
use crate::models::status::{StatusCodeListResponse, StatusCodeResponse};

/// Configure status code routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_status_codes);
}

/// List the seeded status catalog.
///
/// GET /api/v1/status-codes
#[utoipa::path(
    get,
    path = "/api/v1/status-codes",
    tag = "Status Codes",
    responses(
        (status = 200, description = "The status catalog", body = StatusCodeListResponse)
    )
)]
#[get("/status-codes")]
pub async fn list_status_codes(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let status_codes = db::status_codes::list_all(pool.connection()).await?;

    Ok(HttpResponse::Ok().json(StatusCodeListResponse {
        status_codes: status_codes
            .into_iter()
            .map(StatusCodeResponse::from)
            .collect(),
    }))
}
