use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Health check endpoint
///
/// Returns the current status and timestamp once the store has answered a ping;
/// 503 when it has not.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    if let Err(e) = state.users.ping().await {
        log::error!("Health check failed: {}", e);
        return Err(AppError::ServiceUnavailable("Store unavailable".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    })))
}
