/// In-memory preference store
/// Used when no hosted store is configured, and in tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use currency_core::StoredPreference;

use super::{PreferenceStore, StoreError};

#[derive(Clone, Default)]
pub struct InMemoryPreferenceStore {
    preferences: Arc<RwLock<HashMap<String, StoredPreference>>>, // user_id -> preference
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        match self.preferences.read() {
            Ok(db) => db.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, user_id: &str) -> Result<Option<StoredPreference>, StoreError> {
        let db = self
            .preferences
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(db.get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, preference: &StoredPreference) -> Result<(), StoreError> {
        let mut db = self
            .preferences
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        db.insert(user_id.to_string(), preference.clone());
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<(), StoreError> {
        let mut db = self
            .preferences
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        db.remove(user_id);
        Ok(())
    }
}
