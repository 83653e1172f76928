/// Cached currency context client
/// Keeps one context for a short while. A stale value is served immediately
/// while a background refresh replaces it; the latest write always wins.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use currency_core::CurrencyContext;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// What the cache holds at a given instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Fresh(CurrencyContext),
    Stale(CurrencyContext),
    Empty,
}

struct CachedContext {
    context: CurrencyContext,
    stored_at: Instant,
}

/// Single-slot TTL cache
///
/// Every write and every clear bumps `generation`, so a fetch that started
/// before either can tell its answer is outdated.
pub struct ContextCache {
    ttl: Duration,
    slot: Option<CachedContext>,
    generation: u64,
}

impl ContextCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: None,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn lookup_at(&self, now: Instant) -> CacheLookup {
        match &self.slot {
            None => CacheLookup::Empty,
            Some(cached) if now.saturating_duration_since(cached.stored_at) < self.ttl => {
                CacheLookup::Fresh(cached.context.clone())
            }
            Some(cached) => CacheLookup::Stale(cached.context.clone()),
        }
    }

    pub fn store_at(&mut self, context: CurrencyContext, now: Instant) {
        self.slot = Some(CachedContext {
            context,
            stored_at: now,
        });
        self.generation += 1;
    }

    /// Store only if nothing was written or cleared since `generation` was read
    pub fn store_if_current(
        &mut self,
        context: CurrencyContext,
        generation: u64,
        now: Instant,
    ) -> bool {
        if self.generation != generation {
            return false;
        }
        self.store_at(context, now);
        true
    }

    pub fn clear(&mut self) {
        self.slot = None;
        self.generation += 1;
    }
}

/// Fetches `/api/currency/context` and caches the answer
#[derive(Clone)]
pub struct CurrencyClient {
    http: reqwest::Client,
    base_url: String,
    user_id: Option<(String, String)>, // (header, value)
    cache: Arc<RwLock<ContextCache>>,
    refreshing: Arc<AtomicBool>,
}

impl CurrencyClient {
    pub fn new(base_url: &str, ttl: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: None,
            cache: Arc::new(RwLock::new(ContextCache::new(ttl))),
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send the user id with every fetch so stored overrides apply
    pub fn with_user(mut self, header: &str, user_id: &str) -> Self {
        self.user_id = Some((header.to_string(), user_id.to_string()));
        self
    }

    /// Current context: cached if possible, never an error
    pub async fn context(&self) -> CurrencyContext {
        let lookup = self.cache.read().await.lookup_at(Instant::now());
        match lookup {
            CacheLookup::Fresh(ctx) => ctx,
            CacheLookup::Stale(ctx) => {
                self.spawn_refresh();
                ctx
            }
            CacheLookup::Empty => match self.refresh().await {
                Ok(ctx) => ctx,
                Err(e) => {
                    tracing::warn!("[CLIENT] Currency context fetch failed, using default: {}", e);
                    CurrencyContext::default_context()
                }
            },
        }
    }

    /// Fetch now and overwrite the cache, unless the cache changed mid-fetch
    pub async fn refresh(&self) -> Result<CurrencyContext> {
        let generation = self.cache.read().await.generation();
        let ctx = self.fetch().await?;
        let stored = self
            .cache
            .write()
            .await
            .store_if_current(ctx.clone(), generation, Instant::now());
        if !stored {
            tracing::debug!("[CLIENT] Dropping context fetched before the cache changed");
        }
        Ok(ctx)
    }

    /// Forget the cached value, e.g. after the user changes their preference
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
    }

    async fn fetch(&self) -> Result<CurrencyContext> {
        let url = format!("{}/api/currency/context", self.base_url);
        let mut request = self.http.get(&url);
        if let Some((header, value)) = &self.user_id {
            request = request.header(header.as_str(), value.as_str());
        }
        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Network error: {}", e))?;
        if !response.status().is_success() {
            return Err(anyhow!("Server returned {}", response.status()));
        }
        response
            .json::<CurrencyContext>()
            .await
            .map_err(|e| anyhow!("Failed to parse context: {}", e))
    }

    fn spawn_refresh(&self) {
        if self.refreshing.swap(true, Ordering::AcqRel) {
            return;
        }
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.refresh().await {
                tracing::warn!("[CLIENT] Background refresh failed: {}", e);
            }
            client.refreshing.store(false, Ordering::Release);
        });
    }
}
