/// Currency context response headers
/// Symbol and name are percent-encoded since header values must stay ASCII.
/// The full context also travels as a base64 JSON blob.

use anyhow::{anyhow, Result};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use currency_core::CurrencyContext;

pub const CURRENCY_HEADER: &str = "x-currency";
pub const COUNTRY_HEADER: &str = "x-country";
pub const SOURCE_HEADER: &str = "x-currency-source";
pub const SYMBOL_HEADER: &str = "x-currency-symbol";
pub const NAME_HEADER: &str = "x-currency-name";
pub const CONTEXT_HEADER: &str = "x-currency-context";

/// Base64 JSON encoding of a context
pub fn encode_context_header(ctx: &CurrencyContext) -> Result<String> {
    let json = serde_json::to_vec(ctx)?;
    Ok(STANDARD.encode(json))
}

/// Inverse of `encode_context_header`; codes are re-validated on the way in
pub fn decode_context_header(value: &str) -> Result<CurrencyContext> {
    let bytes = STANDARD
        .decode(value.trim())
        .map_err(|e| anyhow!("context header is not base64: {}", e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| anyhow!("context header is not a valid context: {}", e))
}

/// Mirror a context onto a header map
pub fn apply_context_headers(headers: &mut HeaderMap, ctx: &CurrencyContext) {
    let symbol = urlencoding::encode(ctx.symbol()).into_owned();
    let name = urlencoding::encode(ctx.name()).into_owned();
    let mut pairs = vec![
        (CURRENCY_HEADER, ctx.currency().to_string()),
        (COUNTRY_HEADER, ctx.country().to_string()),
        (SOURCE_HEADER, ctx.source().as_str().to_string()),
        (SYMBOL_HEADER, symbol),
        (NAME_HEADER, name),
    ];
    match encode_context_header(ctx) {
        Ok(blob) => pairs.push((CONTEXT_HEADER, blob)),
        Err(e) => tracing::warn!("[HEADERS] Could not encode context blob: {}", e),
    }

    for (name, value) in pairs {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(name), value);
            }
            Err(e) => tracing::warn!("[HEADERS] Skipping {}: {}", name, e),
        }
    }
}
