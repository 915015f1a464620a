mod main_config;
mod progress_config;

pub(crate) use common::config::{ConfigManager, FileContentProvider, YamlSerializer};

pub use main_config::{CONFIG_FILE, Config, get_config_manager};
pub use progress_config::ProgressConfig;
