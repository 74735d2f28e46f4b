use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use console_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use console_core::observability::REQUEST_ID_HEADER;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    accounts::accounts_page,
    app::{dashboard, health_check},
    auth::{login_handler, login_page, logout_handler, register_handler, register_page},
    entities::{create_entity_handler, entities_page},
    ledgers::{chart_of_accounts_handler, create_ledger_handler, ledgers_page},
    metrics::metrics,
    profile::{change_password_handler, profile_page, update_profile_handler},
    selection::{select_entity, select_ledger},
    statements::{
        export_statement, pdf_statement, print_statement, statement_page, statements_index,
    },
    transactions::{create_transaction_handler, transactions_page},
};
use crate::middleware::{metrics::metrics_middleware, session::session_middleware};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Every page sees the restored session; health, metrics and assets do not.
    let pages = Router::new()
        .route("/", get(dashboard))
        .route("/login", get(login_page).post(login_handler))
        .route("/register", get(register_page).post(register_handler))
        .route("/logout", post(logout_handler))
        .route("/profile", get(profile_page).post(update_profile_handler))
        .route("/profile/password", post(change_password_handler))
        .route("/entities", get(entities_page).post(create_entity_handler))
        .route("/selection/entity", post(select_entity))
        .route("/selection/ledger", post(select_ledger))
        .route("/ledgers", get(ledgers_page).post(create_ledger_handler))
        .route("/ledgers/chart-of-accounts", post(chart_of_accounts_handler))
        .route("/accounts", get(accounts_page))
        .route(
            "/transactions",
            get(transactions_page).post(create_transaction_handler),
        )
        .route("/statements", get(statements_index))
        .route("/statements/:kind", get(statement_page))
        .route("/statements/:kind/export", get(export_statement))
        .route("/statements/:kind/print", get(print_statement))
        .route("/statements/:kind/pdf", get(pdf_statement))
        .route_layer(from_fn_with_state(state.clone(), session_middleware));

    Router::new()
        .merge(pages)
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .route_layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
