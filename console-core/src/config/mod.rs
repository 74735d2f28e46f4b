use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Resolve the configuration directory of a workspace member.
///
/// Binaries may be started from the workspace root or from the crate directory.
pub fn configuration_directory(crate_name: &str) -> PathBuf {
    let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if base_path.ends_with(crate_name) {
        base_path.join("config")
    } else {
        base_path.join(crate_name).join("config")
    }
}

/// Load `base.yaml` from `directory`, overlaid with `APP_*` environment variables.
///
/// Nested keys use a double underscore, e.g. `APP_API__BASE_URL`.
pub fn load<T: DeserializeOwned>(directory: &Path) -> Result<T, ConfigError> {
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .add_source(File::from(directory.join("base.yaml")).required(true))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<T>()
}
