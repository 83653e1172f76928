/// Travel planner currency service
/// Exposes the router, store backends and client for reuse by the binary and tests

pub mod client;
pub mod config;
pub mod headers;
pub mod routes;
pub mod store;

pub use client::{CacheLookup, ContextCache, CurrencyClient};
pub use config::ServerConfig;
pub use routes::{build_router, ApiError, AppState};
pub use store::{
    build_store, InMemoryPreferenceStore, PreferenceStore, RestPreferenceStore, StoreError,
};
