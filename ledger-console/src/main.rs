use dotenvy::dotenv;
use console_core::observability::init_tracing;
use ledger_console::config::get_configuration;
use ledger_console::services::api_client::ApiClient;
use ledger_console::services::metrics::init_metrics;
use ledger_console::startup::build_router;
use ledger_console::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "ledger-console",
        &configuration.server.log_level,
        configuration.server.otlp_endpoint.as_deref(),
    );

    init_metrics().map_err(|e| anyhow::anyhow!("Failed to register metrics: {}", e))?;

    let client = ApiClient::new(&configuration.api)
        .map_err(|e| anyhow::anyhow!("Failed to build API client: {}", e))?;
    info!(base_url = %client.base_url(), "Accounting API client ready");

    let state = AppState::with_client(client, configuration.session.clone());
    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting ledger-console on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
