//! Stored currency preferences
//! The profile store is external; every backend sits behind `PreferenceStore`.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use currency_core::StoredPreference;

use crate::config::ServerConfig;

pub use memory::InMemoryPreferenceStore;
pub use rest::RestPreferenceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference store request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("preference store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("preference store lock poisoned: {0}")]
    Lock(String),
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<StoredPreference>, StoreError>;
    async fn put(&self, user_id: &str, preference: &StoredPreference) -> Result<(), StoreError>;
    async fn clear(&self, user_id: &str) -> Result<(), StoreError>;
}

/// Pick the backend named by the config
pub fn build_store(config: &ServerConfig) -> Result<Arc<dyn PreferenceStore>, StoreError> {
    match config.preference_store_url.as_deref() {
        Some(url) => {
            let store = RestPreferenceStore::new(
                url,
                &config.preference_store_table,
                config.preference_store_key.clone(),
                config.store_timeout,
            )?;
            tracing::info!("[STORE] Using hosted preference store at {}", url);
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("[STORE] PREFERENCE_STORE_URL not set, keeping preferences in memory");
            Ok(Arc::new(InMemoryPreferenceStore::new()))
        }
    }
}

/// Fetch a user's stored preference for resolution.
/// A store failure counts as "no stored preference" and is recorded as a warning.
pub async fn load_stored_preference(
    store: &dyn PreferenceStore,
    user_id: &str,
    warnings: &mut Vec<String>,
) -> Option<StoredPreference> {
    match store.get(user_id).await {
        Ok(preference) => preference,
        Err(e) => {
            tracing::warn!("[STORE] Lookup failed for user {}: {}", user_id, e);
            warnings.push(format!("stored preference unavailable: {}", e));
            None
        }
    }
}
