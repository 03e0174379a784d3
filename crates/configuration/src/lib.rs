use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, KeyEncoding, LoggingSettings, SigningSettings, WEB_CLIENT_KEY};

/// The file looked for in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of the environment variables that override file values,
/// e.g. `WALLASIGN__SIGNING__KEY`.
pub const ENV_PREFIX: &str = "WALLASIGN";

/// Loads the application configuration.
///
/// Reads `config.toml` from the working directory if it exists, then applies
/// `WALLASIGN__*` environment variables on top. A missing file is not an error:
/// every section has defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    build_config(Path::new(DEFAULT_CONFIG_FILE), false, environment())
}

/// Loads the application configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    build_config(path, true, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

fn build_config(
    path: &Path,
    required: bool,
    env: config::Environment,
) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(required))
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.signing.key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "signing.key must not be empty".to_string(),
        ));
    }
    Ok(())
}
