/// Currency and country code validation
/// Input is trimmed and uppercased before the table lookup.

use thiserror::Error;

use crate::tables::{is_supported_country, is_supported_currency};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("invalid currency code '{0}': expected 3 letters")]
    MalformedCurrency(String),
    #[error("unsupported currency code '{0}'")]
    UnknownCurrency(String),
    #[error("invalid country code '{0}': expected 2 letters")]
    MalformedCountry(String),
    #[error("unsupported country code '{0}'")]
    UnknownCountry(String),
}

fn is_alpha_of_len(code: &str, len: usize) -> bool {
    code.len() == len && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Normalize a raw currency code into its canonical uppercase form
pub fn normalize_currency_code(raw: &str) -> Result<String, CodeError> {
    let code = raw.trim().to_ascii_uppercase();
    if !is_alpha_of_len(&code, 3) {
        return Err(CodeError::MalformedCurrency(raw.to_string()));
    }
    if !is_supported_currency(&code) {
        return Err(CodeError::UnknownCurrency(code));
    }
    Ok(code)
}

/// Normalize a raw country code into its canonical uppercase form
pub fn normalize_country_code(raw: &str) -> Result<String, CodeError> {
    let code = raw.trim().to_ascii_uppercase();
    if !is_alpha_of_len(&code, 2) {
        return Err(CodeError::MalformedCountry(raw.to_string()));
    }
    if !is_supported_country(&code) {
        return Err(CodeError::UnknownCountry(code));
    }
    Ok(code)
}
