/// Hosted preference store over a PostgREST-compatible API
///
/// Table columns: user_id (unique), currency, country, source.
/// - GET    /<table>?user_id=eq.<id>&select=currency,country,source
/// - POST   /<table>?on_conflict=user_id  (upsert)
/// - DELETE /<table>?user_id=eq.<id>

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use currency_core::StoredPreference;

use super::{PreferenceStore, StoreError};

#[derive(Clone)]
pub struct RestPreferenceStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct PreferenceRow<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    preference: &'a StoredPreference,
}

impl RestPreferenceStore {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), table),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn user_filter_url(&self, user_id: &str) -> String {
        format!("{}?user_id=eq.{}", self.endpoint, urlencoding::encode(user_id))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status, body })
    }
}

#[async_trait]
impl PreferenceStore for RestPreferenceStore {
    async fn get(&self, user_id: &str) -> Result<Option<StoredPreference>, StoreError> {
        let url = format!("{}&select=currency,country,source", self.user_filter_url(user_id));
        let response = self.authorized(self.client.get(&url)).send().await?;
        let rows: Vec<StoredPreference> = Self::check(response).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn put(&self, user_id: &str, preference: &StoredPreference) -> Result<(), StoreError> {
        let url = format!("{}?on_conflict=user_id", self.endpoint);
        let row = PreferenceRow { user_id, preference };
        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row])
            .send()
            .await?;
        Self::check(response).await?;
        tracing::info!("[STORE] Upserted preference for user {}", user_id);
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.delete(self.user_filter_url(user_id)))
            .send()
            .await?;
        Self::check(response).await?;
        tracing::info!("[STORE] Cleared preference for user {}", user_id);
        Ok(())
    }
}
