use std::collections::BTreeMap;
use std::path::PathBuf;

use super::store::{ProgressStore, StoreError};
use crate::config::{
    ContentProvider, FileContentProvider, MemoryContentProvider, Serializer, YamlSerializer,
};

/// A flat YAML map of string values kept behind a [`ContentProvider`].
/// Every write rewrites the whole map.
pub struct KeyValueStore<TProvider: ContentProvider> {
    provider: TProvider,
    serializer: YamlSerializer,
}

pub type FileProgressStore = KeyValueStore<FileContentProvider>;
pub type MemoryProgressStore = KeyValueStore<MemoryContentProvider>;

impl KeyValueStore<FileContentProvider> {
    pub fn from_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentProvider::new(file_path))
    }
}

impl KeyValueStore<MemoryContentProvider> {
    pub fn in_memory() -> Self {
        Self::new(MemoryContentProvider::new())
    }
}

impl<TProvider: ContentProvider> KeyValueStore<TProvider> {
    pub fn new(provider: TProvider) -> Self {
        Self {
            provider,
            serializer: YamlSerializer::new(),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = self.provider.read_content().map_err(StoreError::Io)?;
        match content {
            Some(content) if !content.trim().is_empty() => self
                .serializer
                .deserialize(&content)
                .map_err(StoreError::Serialize),
            _ => Ok(BTreeMap::new()),
        }
    }
}

impl<TProvider: ContentProvider> ProgressStore for KeyValueStore<TProvider> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        let content = self
            .serializer
            .serialize(&values)
            .map_err(StoreError::Serialize)?;
        self.provider.write_content(&content).map_err(StoreError::Io)
    }
}
