use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use super::{ContentProvider, FileContentProvider, Serializer, Validate, YamlSerializer};

/// Loads, validates and caches a typed config from a [`ContentProvider`].
pub struct ConfigManager<TProvider, TConfig, TSerializer = YamlSerializer>
where
    TProvider: ContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TSerializer: Serializer<TConfig>,
{
    serializer: TSerializer,
    provider: TProvider,
    config: Mutex<Option<TConfig>>,
}

impl<TConfig> ConfigManager<FileContentProvider, TConfig, YamlSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: &str) -> Self {
        Self::new(FileContentProvider::new(file_path), YamlSerializer::new())
    }
}

impl<TProvider, TConfig, TSerializer> ConfigManager<TProvider, TConfig, TSerializer>
where
    TProvider: ContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TSerializer: Serializer<TConfig>,
{
    pub fn new(provider: TProvider, serializer: TSerializer) -> Self {
        Self {
            serializer,
            provider,
            config: Mutex::new(None),
        }
    }

    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config lock poisoned".to_string())?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(content) = self.provider.read_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.serializer.deserialize(&content)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized = self.serializer.serialize(config)?;
        self.provider.write_content(&serialized)?;

        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config lock poisoned".to_string())?;
        *current = Some(config.clone());
        Ok(())
    }

    /// Like [`Self::get_config`], but a broken config is logged and replaced
    /// by the defaults.
    pub fn get_config_or_default(&self) -> TConfig {
        match self.get_config() {
            Ok(config) => config,
            Err(e) => {
                crate::warn!("{}; falling back to default config", e);
                TConfig::default()
            }
        }
    }
}
