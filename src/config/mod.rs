mod settings;

use std::path::Path;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{Backend, HubSettings, LogSettings, ServerSettings, Settings};

/// Prefix of the environment variables read by [`load_config`], e.g.
/// `NOTIHUB__HUB__BACKEND=journal`.
pub const ENV_PREFIX: &str = "NOTIHUB";

/// Loads the configuration from `config/default` (any supported format,
/// optional) and environment variables, merged over the defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    build(File::with_name("config/default").required(false))
}

/// Same as [`load_config`] but reads the given file instead of `config/default`.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    build(File::from(path).required(false))
}

fn build<S>(file: S) -> Result<Settings, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::merge(partial))
}
