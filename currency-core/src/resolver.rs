/// Currency context resolution
///
/// Candidate signals are tried in a fixed order, first valid one wins:
/// 1. explicit `currency` in the request body
/// 2. legacy `currencyContext` descriptor in the request body
/// 3. stored preference, only when it was itself a user override
/// 4. geo country from the trusted edge header
/// 5. USD / US
///
/// Rejected inputs are recorded as warnings. Resolution never fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{CurrencyContext, CurrencySource, StoredPreference};
use crate::tables::{country_currency, currency_metadata, DEFAULT_COUNTRY, DEFAULT_CURRENCY};
use crate::validate::{normalize_country_code, normalize_currency_code};

/// Inline currency descriptor sent by older clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCurrencyDescriptor {
    pub code: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Currency fields a client may put in a request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSignals {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub currency_context: Option<LegacyCurrencyDescriptor>,
}

/// Everything resolution is allowed to look at
#[derive(Debug, Clone, Default)]
pub struct ResolutionInput {
    pub request: RequestSignals,
    pub stored: Option<StoredPreference>,
    /// Raw value of the trusted geo header
    pub geo_country: Option<String>,
}

impl ResolutionInput {
    pub fn from_geo(geo_country: Option<String>) -> Self {
        Self {
            geo_country,
            ..Default::default()
        }
    }
}

/// A resolved context plus the warnings collected on the way
#[derive(Debug, Clone)]
pub struct Resolution {
    pub context: CurrencyContext,
    pub warnings: Vec<String>,
}

/// Currency picked by a tier, before the country is settled
struct TierHit {
    currency: String,
    source: CurrencySource,
    /// Country candidates in the order this tier trusts them
    countries: Vec<CountryCandidate>,
}

#[derive(Clone, Copy)]
enum CountryCandidate {
    Request,
    Stored,
    Geo,
}

type Tier = fn(&ResolutionInput, &mut Vec<String>) -> Option<TierHit>;

const TIERS: &[Tier] = &[
    request_currency_tier,
    legacy_descriptor_tier,
    stored_override_tier,
    geo_tier,
];

/// Resolve a context stamped with the current time
pub fn resolve_context(input: &ResolutionInput) -> Resolution {
    resolve_with_timestamp(input, Utc::now())
}

pub fn resolve_with_timestamp(input: &ResolutionInput, resolved_at: DateTime<Utc>) -> Resolution {
    let mut warnings = Vec::new();

    for tier in TIERS {
        if let Some(hit) = tier(input, &mut warnings) {
            let country = settle_country(input, &hit.countries, &mut warnings);
            if !hit.countries.iter().any(|c| matches!(c, CountryCandidate::Request)) {
                note_unused_request_country(input, &country, &mut warnings);
            }
            let context =
                CurrencyContext::with_timestamp(&hit.currency, &country, hit.source, resolved_at);
            return Resolution { context, warnings };
        }
    }

    note_unused_request_country(input, DEFAULT_COUNTRY, &mut warnings);
    Resolution {
        context: CurrencyContext::with_timestamp(
            DEFAULT_CURRENCY,
            DEFAULT_COUNTRY,
            CurrencySource::Default,
            resolved_at,
        ),
        warnings,
    }
}

fn request_currency_tier(input: &ResolutionInput, warnings: &mut Vec<String>) -> Option<TierHit> {
    let raw = input.request.currency.as_deref()?;
    match normalize_currency_code(raw) {
        Ok(currency) => Some(TierHit {
            currency,
            source: CurrencySource::UserOverride,
            countries: vec![CountryCandidate::Request, CountryCandidate::Geo],
        }),
        Err(e) => {
            warnings.push(format!("request currency ignored: {}", e));
            None
        }
    }
}

fn legacy_descriptor_tier(input: &ResolutionInput, warnings: &mut Vec<String>) -> Option<TierHit> {
    let descriptor = input.request.currency_context.as_ref()?;
    warnings.push("currencyContext is deprecated, send currency and country instead".to_string());

    let currency = match normalize_currency_code(&descriptor.code) {
        Ok(currency) => currency,
        Err(e) => {
            warnings.push(format!("legacy currencyContext ignored: {}", e));
            return None;
        }
    };

    // symbol/name always come from the table
    if let Some(meta) = currency_metadata(&currency) {
        if descriptor.symbol.as_deref().is_some_and(|s| s != meta.symbol) {
            warnings.push(format!("legacy symbol override for {} ignored", currency));
        }
        if descriptor.name.as_deref().is_some_and(|n| n != meta.name) {
            warnings.push(format!("legacy name override for {} ignored", currency));
        }
    }

    Some(TierHit {
        currency,
        source: CurrencySource::UserOverride,
        countries: vec![CountryCandidate::Request, CountryCandidate::Geo],
    })
}

fn stored_override_tier(input: &ResolutionInput, warnings: &mut Vec<String>) -> Option<TierHit> {
    let stored = input.stored.as_ref()?;
    if !stored.is_override() {
        warnings.push(format!(
            "stored preference with source '{}' is not an override, skipped",
            stored.source
        ));
        return None;
    }
    match normalize_currency_code(&stored.currency) {
        Ok(currency) => Some(TierHit {
            currency,
            source: CurrencySource::UserOverride,
            countries: vec![
                CountryCandidate::Stored,
                CountryCandidate::Request,
                CountryCandidate::Geo,
            ],
        }),
        Err(e) => {
            warnings.push(format!("stored preference ignored: {}", e));
            None
        }
    }
}

fn geo_tier(input: &ResolutionInput, warnings: &mut Vec<String>) -> Option<TierHit> {
    let raw = input.geo_country.as_deref()?;
    let country = match normalize_country_code(raw) {
        Ok(country) => country,
        Err(e) => {
            warnings.push(format!("geo country ignored: {}", e));
            return None;
        }
    };
    let currency = country_currency(&country)?;
    Some(TierHit {
        currency: currency.to_string(),
        source: CurrencySource::Geo,
        countries: vec![CountryCandidate::Geo],
    })
}

/// First valid country among the candidates, else the default country
fn settle_country(
    input: &ResolutionInput,
    candidates: &[CountryCandidate],
    warnings: &mut Vec<String>,
) -> String {
    for candidate in candidates {
        let (label, raw) = match candidate {
            CountryCandidate::Request => ("request country", input.request.country.as_deref()),
            CountryCandidate::Stored => (
                "stored country",
                input.stored.as_ref().map(|s| s.country.as_str()),
            ),
            CountryCandidate::Geo => ("geo country", input.geo_country.as_deref()),
        };
        let Some(raw) = raw else { continue };
        match normalize_country_code(raw) {
            Ok(country) => return country,
            Err(e) => warnings.push(format!("{} ignored: {}", label, e)),
        }
    }
    DEFAULT_COUNTRY.to_string()
}

/// A request country only counts alongside an explicit currency
fn note_unused_request_country(input: &ResolutionInput, settled: &str, warnings: &mut Vec<String>) {
    let Some(raw) = input.request.country.as_deref() else { return };
    if normalize_country_code(raw).is_ok_and(|country| country == settled) {
        return;
    }
    warnings.push(format!(
        "request country '{}' ignored: no explicit currency, country is {}",
        raw.trim(),
        settled
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-05-10T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn empty_input_is_default() {
        let r = resolve_with_timestamp(&ResolutionInput::default(), at());
        assert_eq!(r.context.currency(), "USD");
        assert_eq!(r.context.country(), "US");
        assert_eq!(r.context.source(), CurrencySource::Default);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn request_country_falls_back_to_geo() {
        let input = ResolutionInput {
            request: RequestSignals {
                currency: Some("jpy".to_string()),
                country: Some("ZZ".to_string()),
                currency_context: None,
            },
            stored: None,
            geo_country: Some("FR".to_string()),
        };
        let r = resolve_with_timestamp(&input, at());
        assert_eq!(r.context.currency(), "JPY");
        assert_eq!(r.context.country(), "FR");
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].starts_with("request country ignored"));
    }

    #[test]
    fn request_country_without_currency_is_reported() {
        let input = ResolutionInput {
            request: RequestSignals {
                country: Some("FR".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let r = resolve_with_timestamp(&input, at());
        assert_eq!(r.context.currency(), "USD");
        assert_eq!(r.context.country(), "US");
        assert_eq!(r.context.source(), CurrencySource::Default);
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].starts_with("request country 'FR' ignored"));
    }

    #[test]
    fn request_country_under_geo_tier_is_reported_unless_it_matches() {
        let input = ResolutionInput {
            request: RequestSignals {
                country: Some("FR".to_string()),
                ..Default::default()
            },
            stored: None,
            geo_country: Some("DE".to_string()),
        };
        let r = resolve_with_timestamp(&input, at());
        assert_eq!(r.context.country(), "DE");
        assert_eq!(r.context.source(), CurrencySource::Geo);
        assert!(r.warnings[0].contains("country is DE"));

        let same = ResolutionInput {
            request: RequestSignals {
                country: Some("de".to_string()),
                ..Default::default()
            },
            stored: None,
            geo_country: Some("DE".to_string()),
        };
        assert!(resolve_with_timestamp(&same, at()).warnings.is_empty());
    }

    #[test]
    fn legacy_descriptor_warns_and_keeps_table_symbol() {
        let input = ResolutionInput {
            request: RequestSignals {
                currency: None,
                country: None,
                currency_context: Some(LegacyCurrencyDescriptor {
                    code: "gbp".to_string(),
                    symbol: Some("GBP!".to_string()),
                    name: None,
                }),
            },
            stored: None,
            geo_country: None,
        };
        let r = resolve_with_timestamp(&input, at());
        assert_eq!(r.context.currency(), "GBP");
        assert_eq!(r.context.symbol(), "£");
        assert_eq!(r.context.source(), CurrencySource::UserOverride);
        assert!(r.warnings.iter().any(|w| w.contains("deprecated")));
        assert!(r.warnings.iter().any(|w| w.contains("symbol override")));
    }

    #[test]
    fn geo_header_with_unknown_country_is_default() {
        let r = resolve_with_timestamp(&ResolutionInput::from_geo(Some("XX".to_string())), at());
        assert_eq!(r.context.source(), CurrencySource::Default);
        assert_eq!(r.context.country(), "US");
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn invalid_stored_override_falls_through_to_geo() {
        let input = ResolutionInput {
            request: RequestSignals::default(),
            stored: Some(StoredPreference {
                currency: "DOGE".to_string(),
                country: "US".to_string(),
                source: CurrencySource::UserOverride,
            }),
            geo_country: Some("JP".to_string()),
        };
        let r = resolve_with_timestamp(&input, at());
        assert_eq!(r.context.currency(), "JPY");
        assert_eq!(r.context.source(), CurrencySource::Geo);
        assert!(r.warnings[0].starts_with("stored preference ignored"));
    }
}
