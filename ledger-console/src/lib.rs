pub mod auth;
pub mod config;
pub mod export;
pub mod format;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod resources;
pub mod selection;
pub mod services;
pub mod startup;
pub mod storage;
pub mod table;

use auth::AuthApi;
use axum_extra::extract::CookieJar;
use config::SessionSettings;
use resources::Remote;
use services::{accounting::AccountingApi, api_client::ApiClient};
use std::sync::Arc;
use storage::CookieStorage;

/// Shared application state: the accounting and auth APIs plus session policy.
#[derive(Clone)]
pub struct AppState {
    pub accounting: Arc<dyn AccountingApi>,
    pub auth: Arc<dyn AuthApi>,
    pub session: SessionSettings,
}

impl AppState {
    pub fn new(
        accounting: Arc<dyn AccountingApi>,
        auth: Arc<dyn AuthApi>,
        session: SessionSettings,
    ) -> Self {
        Self {
            accounting,
            auth,
            session,
        }
    }

    /// Both APIs served by one client.
    pub fn with_client(client: ApiClient, session: SessionSettings) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, session)
    }

    pub fn remote(&self, token: Option<String>) -> Remote {
        Remote::new(self.accounting.clone(), token)
    }

    pub fn storage(&self, jar: CookieJar) -> CookieStorage {
        CookieStorage::new(jar, self.session.secure_cookies)
    }
}
