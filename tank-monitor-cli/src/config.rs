use anyhow::Context;
use log::{debug, info};
use std::path::Path;
use tank_level::MonitorConfig;

/// Loads a TOML tank configuration, or the two tank default when no file is given.
pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<MonitorConfig> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Invalid configuration in {}", path.display()))
        }
        None => {
            info!("No configuration given, using the default fresh and grey tanks");
            Ok(MonitorConfig::fresh_and_grey()?)
        }
    }
}
