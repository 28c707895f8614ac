pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error, web};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers the auth and task routes. Everything under `/tasks` sits behind `AuthMiddleware`.
///
/// Extractor failures are rendered through `AppError` so every error body is `{message}`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
            _ => "Invalid request body".to_string(),
        };
        AppError::ValidationError(message).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid query: {}", err)).into()
    }))
    // Malformed ids cannot name an owned task.
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Task not found".into()).into()),
    )
    .service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            // Before `/{id}` so "stats" is not taken for an id.
            .service(tasks::get_task_stats)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::update_task_status)
            .service(tasks::delete_task),
    );
}
