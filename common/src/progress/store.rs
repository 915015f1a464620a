#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Serialize(String),
    InvalidValue { key: String, value: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Progress store IO error: {}", e),
            StoreError::Serialize(e) => write!(f, "Progress store format error: {}", e),
            StoreError::InvalidValue { key, value } => {
                write!(f, "Stored value for '{}' is not an integer: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// String key/value persistence for player progress. Values are stored as
/// text; the integer helpers do the encoding.
pub trait ProgressStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn read_int(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };
        value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| StoreError::InvalidValue {
                key: key.to_string(),
                value,
            })
    }

    fn write_int(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.set(key, &value.to_string())
    }
}
