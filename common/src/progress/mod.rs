mod key_value_store;
mod store;

pub use key_value_store::{FileProgressStore, KeyValueStore, MemoryProgressStore};
pub use store::{ProgressStore, StoreError};

pub const LAST_SCORE_KEY: &str = "last_score";
pub const CURRENT_LEVEL_KEY: &str = "current_level";
