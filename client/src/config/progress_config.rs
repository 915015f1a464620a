use common::config::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProgressConfig {
    pub save: bool,
    pub location: String,
}

impl Validate for ProgressConfig {
    fn validate(&self) -> Result<(), String> {
        if self.save && self.location.is_empty() {
            return Err("progress location must not be empty when saving is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            save: true,
            location: "candy_progress.yaml".to_string(),
        }
    }
}
