use axum::response::{IntoResponse, Response};
use console_core::error::AppError;

pub async fn metrics() -> Response {
    match crate::services::metrics::get_metrics() {
        Ok(body) => body.into_response(),
        Err(e) => AppError::InternalError(anyhow::Error::new(e)).into_response(),
    }
}
