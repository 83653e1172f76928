//! Currency context resolution for the travel planner
//! Static code tables, validation and the precedence pipeline shared by the
//! HTTP server and its clients.

pub mod context;
pub mod resolver;
pub mod tables;
pub mod validate;

pub use context::{CurrencyContext, CurrencySource, StoredPreference};
pub use resolver::{
    resolve_context, resolve_with_timestamp, LegacyCurrencyDescriptor, RequestSignals, Resolution,
    ResolutionInput,
};
pub use tables::{CurrencyMeta, DEFAULT_COUNTRY, DEFAULT_CURRENCY};
pub use validate::{normalize_country_code, normalize_currency_code, CodeError};
