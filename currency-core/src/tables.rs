/// Static currency and country tables
/// Single source of truth for code validation and symbol/name lookup.
/// Built once on first access and never mutated afterwards.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Fallback glyph when a currency has no metadata entry
pub const FALLBACK_SYMBOL: &str = "$";

/// Fallback label when a currency has no metadata entry
pub const FALLBACK_NAME: &str = "Unknown Currency";

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_COUNTRY: &str = "US";

/// Display metadata for one currency code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyMeta {
    pub symbol: &'static str,
    pub name: &'static str,
}

// (code, symbol, name)
const CURRENCIES: &[(&str, &str, &str)] = &[
    ("USD", "$", "US Dollar"),
    ("EUR", "€", "Euro"),
    ("GBP", "£", "British Pound"),
    ("JPY", "¥", "Japanese Yen"),
    ("CNY", "¥", "Chinese Yuan"),
    ("CAD", "C$", "Canadian Dollar"),
    ("AUD", "A$", "Australian Dollar"),
    ("NZD", "NZ$", "New Zealand Dollar"),
    ("CHF", "CHF", "Swiss Franc"),
    ("SEK", "kr", "Swedish Krona"),
    ("NOK", "kr", "Norwegian Krone"),
    ("DKK", "kr", "Danish Krone"),
    ("ISK", "kr", "Icelandic Krona"),
    ("PLN", "zł", "Polish Zloty"),
    ("CZK", "Kč", "Czech Koruna"),
    ("HUF", "Ft", "Hungarian Forint"),
    ("RON", "lei", "Romanian Leu"),
    ("BGN", "лв", "Bulgarian Lev"),
    ("TRY", "₺", "Turkish Lira"),
    ("INR", "₹", "Indian Rupee"),
    ("KRW", "₩", "South Korean Won"),
    ("SGD", "S$", "Singapore Dollar"),
    ("HKD", "HK$", "Hong Kong Dollar"),
    ("TWD", "NT$", "New Taiwan Dollar"),
    ("THB", "฿", "Thai Baht"),
    ("MYR", "RM", "Malaysian Ringgit"),
    ("IDR", "Rp", "Indonesian Rupiah"),
    ("PHP", "₱", "Philippine Peso"),
    ("VND", "₫", "Vietnamese Dong"),
    ("MXN", "MX$", "Mexican Peso"),
    ("BRL", "R$", "Brazilian Real"),
    ("ARS", "AR$", "Argentine Peso"),
    ("CLP", "CL$", "Chilean Peso"),
    ("COP", "CO$", "Colombian Peso"),
    ("PEN", "S/", "Peruvian Sol"),
    ("ZAR", "R", "South African Rand"),
    ("EGP", "E£", "Egyptian Pound"),
    ("MAD", "DH", "Moroccan Dirham"),
    ("KES", "KSh", "Kenyan Shilling"),
    ("NGN", "₦", "Nigerian Naira"),
    ("AED", "AED", "UAE Dirham"),
    ("SAR", "SAR", "Saudi Riyal"),
    ("QAR", "QAR", "Qatari Riyal"),
    ("ILS", "₪", "Israeli New Shekel"),
];

// (country, currency)
const COUNTRIES: &[(&str, &str)] = &[
    ("US", "USD"),
    ("PR", "USD"),
    ("EC", "USD"),
    ("GB", "GBP"),
    ("IE", "EUR"),
    ("DE", "EUR"),
    ("FR", "EUR"),
    ("ES", "EUR"),
    ("IT", "EUR"),
    ("PT", "EUR"),
    ("NL", "EUR"),
    ("BE", "EUR"),
    ("LU", "EUR"),
    ("AT", "EUR"),
    ("FI", "EUR"),
    ("GR", "EUR"),
    ("SK", "EUR"),
    ("SI", "EUR"),
    ("EE", "EUR"),
    ("LV", "EUR"),
    ("LT", "EUR"),
    ("HR", "EUR"),
    ("MT", "EUR"),
    ("CY", "EUR"),
    ("MC", "EUR"),
    ("JP", "JPY"),
    ("CN", "CNY"),
    ("CA", "CAD"),
    ("AU", "AUD"),
    ("NZ", "NZD"),
    ("CH", "CHF"),
    ("LI", "CHF"),
    ("SE", "SEK"),
    ("NO", "NOK"),
    ("DK", "DKK"),
    ("IS", "ISK"),
    ("PL", "PLN"),
    ("CZ", "CZK"),
    ("HU", "HUF"),
    ("RO", "RON"),
    ("BG", "BGN"),
    ("TR", "TRY"),
    ("IN", "INR"),
    ("KR", "KRW"),
    ("SG", "SGD"),
    ("HK", "HKD"),
    ("TW", "TWD"),
    ("TH", "THB"),
    ("MY", "MYR"),
    ("ID", "IDR"),
    ("PH", "PHP"),
    ("VN", "VND"),
    ("MX", "MXN"),
    ("BR", "BRL"),
    ("AR", "ARS"),
    ("CL", "CLP"),
    ("CO", "COP"),
    ("PE", "PEN"),
    ("ZA", "ZAR"),
    ("EG", "EGP"),
    ("MA", "MAD"),
    ("KE", "KES"),
    ("NG", "NGN"),
    ("AE", "AED"),
    ("SA", "SAR"),
    ("QA", "QAR"),
    ("IL", "ILS"),
];

static CURRENCY_TABLE: Lazy<HashMap<&'static str, CurrencyMeta>> = Lazy::new(|| {
    CURRENCIES
        .iter()
        .map(|&(code, symbol, name)| (code, CurrencyMeta { symbol, name }))
        .collect()
});

static COUNTRY_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COUNTRIES.iter().copied().collect());

/// Metadata for an uppercase currency code
pub fn currency_metadata(code: &str) -> Option<CurrencyMeta> {
    CURRENCY_TABLE.get(code).copied()
}

/// Default currency of an uppercase country code
pub fn country_currency(country: &str) -> Option<&'static str> {
    COUNTRY_TABLE.get(country).copied()
}

pub fn is_supported_currency(code: &str) -> bool {
    CURRENCY_TABLE.contains_key(code)
}

pub fn is_supported_country(country: &str) -> bool {
    COUNTRY_TABLE.contains_key(country)
}

pub fn symbol_for(code: &str) -> &'static str {
    currency_metadata(code).map(|m| m.symbol).unwrap_or(FALLBACK_SYMBOL)
}

pub fn name_for(code: &str) -> &'static str {
    currency_metadata(code).map(|m| m.name).unwrap_or(FALLBACK_NAME)
}

/// All supported currency codes, in table order
pub fn supported_currencies() -> Vec<&'static str> {
    CURRENCIES.iter().map(|&(code, _, _)| code).collect()
}

/// All supported country codes, in table order
pub fn supported_countries() -> Vec<&'static str> {
    COUNTRIES.iter().map(|&(country, _)| country).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_country_maps_to_known_currency() {
        for (country, currency) in COUNTRIES {
            assert!(
                is_supported_currency(currency),
                "{} maps to {} which has no metadata",
                country,
                currency
            );
        }
    }

    #[test]
    fn codes_are_well_formed_and_unique() {
        assert_eq!(CURRENCY_TABLE.len(), CURRENCIES.len());
        assert_eq!(COUNTRY_TABLE.len(), COUNTRIES.len());
        for code in supported_currencies() {
            assert_eq!(code.len(), 3);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()));
        }
        for country in supported_countries() {
            assert_eq!(country.len(), 2);
            assert!(country.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn defaults_are_in_tables() {
        assert_eq!(country_currency(DEFAULT_COUNTRY), Some(DEFAULT_CURRENCY));
        assert_eq!(symbol_for(DEFAULT_CURRENCY), "$");
        assert_eq!(name_for(DEFAULT_CURRENCY), "US Dollar");
    }

    #[test]
    fn unmapped_currency_falls_back() {
        assert_eq!(symbol_for("XYZ"), FALLBACK_SYMBOL);
        assert_eq!(name_for("XYZ"), FALLBACK_NAME);
    }
}
