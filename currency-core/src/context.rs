/// Currency context value objects
/// A `CurrencyContext` is built fresh for every resolution and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tables::{name_for, symbol_for, DEFAULT_COUNTRY, DEFAULT_CURRENCY};
use crate::validate::{normalize_country_code, normalize_currency_code, CodeError};

/// Which precedence tier produced a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencySource {
    UserOverride,
    Geo,
    Default,
}

impl CurrencySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencySource::UserOverride => "user_override",
            CurrencySource::Geo => "geo",
            CurrencySource::Default => "default",
        }
    }
}

impl std::fmt::Display for CurrencySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical currency context returned to consumers.
/// Deserialized contexts are re-validated and take symbol/name from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ContextRecord")]
pub struct CurrencyContext {
    currency: String,
    country: String,
    source: CurrencySource,
    symbol: String,
    name: String,
    resolved_at: DateTime<Utc>,
}

impl CurrencyContext {
    /// Build a context stamped with the current time.
    /// `currency` and `country` must already be normalized.
    pub fn new(currency: &str, country: &str, source: CurrencySource) -> Self {
        Self::with_timestamp(currency, country, source, Utc::now())
    }

    pub fn with_timestamp(
        currency: &str,
        country: &str,
        source: CurrencySource,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            currency: currency.to_string(),
            country: country.to_string(),
            source,
            symbol: symbol_for(currency).to_string(),
            name: name_for(currency).to_string(),
            resolved_at,
        }
    }

    /// USD / US with `default` provenance
    pub fn default_context() -> Self {
        Self::new(DEFAULT_CURRENCY, DEFAULT_COUNTRY, CurrencySource::Default)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn source(&self) -> CurrencySource {
        self.source
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    /// Equality on everything except `resolved_at`
    pub fn same_resolution(&self, other: &CurrencyContext) -> bool {
        self.currency == other.currency
            && self.country == other.country
            && self.source == other.source
            && self.symbol == other.symbol
            && self.name == other.name
    }

    /// The preference record to persist for this context
    pub fn to_preference(&self) -> StoredPreference {
        StoredPreference {
            currency: self.currency.clone(),
            country: self.country.clone(),
            source: self.source,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextRecord {
    currency: String,
    country: String,
    source: CurrencySource,
    resolved_at: DateTime<Utc>,
}

impl TryFrom<ContextRecord> for CurrencyContext {
    type Error = CodeError;

    fn try_from(record: ContextRecord) -> Result<Self, Self::Error> {
        let currency = normalize_currency_code(&record.currency)?;
        let country = normalize_country_code(&record.country)?;
        Ok(Self::with_timestamp(&currency, &country, record.source, record.resolved_at))
    }
}

/// Per-user preference as kept in the profile store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPreference {
    pub currency: String,
    pub country: String,
    pub source: CurrencySource,
}

impl StoredPreference {
    pub fn is_override(&self) -> bool {
        self.source == CurrencySource::UserOverride
    }
}
