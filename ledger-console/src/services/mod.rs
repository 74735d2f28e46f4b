pub mod accounting;
pub mod api_client;
pub mod auth_client;
pub mod metrics;
