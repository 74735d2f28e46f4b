use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP/gRPC collector; span export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Root of the accounting API; endpoint paths are appended verbatim.
    pub base_url: String,
    /// Development APIs commonly run on self-signed certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

impl SessionSettings {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.token_ttl_days)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            token_ttl_days: default_token_ttl_days(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

fn default_token_ttl_days() -> i64 {
    7
}

fn default_secure_cookies() -> bool {
    true
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let directory = console_core::config::configuration_directory("ledger-console");
    console_core::config::load(&directory)
}
