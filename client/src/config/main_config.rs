use common::config::Validate;
use common::games::candy::EngineSettings;
use serde::{Deserialize, Serialize};

use super::{ConfigManager, FileContentProvider, ProgressConfig, YamlSerializer};

pub const CONFIG_FILE: &str = "candy_client_config.yaml";

const MIN_TICK_INTERVAL_MS: u64 = 50;
const MAX_TICK_INTERVAL_MS: u64 = 10_000;

pub fn get_config_manager(path: &str) -> ConfigManager<FileContentProvider, Config, YamlSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSettings,
    pub progress: ProgressConfig,
    pub tick_interval_ms: u64,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.engine.validate()?;
        self.progress.validate()?;
        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            return Err(format!(
                "tick_interval_ms must be between {} and {}, got {}",
                MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS, self.tick_interval_ms
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            progress: ProgressConfig::default(),
            tick_interval_ms: 1000,
        }
    }
}
