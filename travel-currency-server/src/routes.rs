/// HTTP routes for currency context resolution and preference management
///
/// - GET    /health
/// - GET    /api/currency/context      resolve from headers + stored preference
/// - POST   /api/currency/context      same, plus request body signals
/// - GET    /api/currency/supported    currency and country tables
/// - PUT    /api/currency/preference   persist an explicit override
/// - DELETE /api/currency/preference   drop the override, re-resolve from geo

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Json},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use currency_core::tables::{
    country_currency, currency_metadata, supported_countries, supported_currencies,
};
use currency_core::{
    normalize_country_code, normalize_currency_code, resolve_context, CurrencyContext,
    CurrencySource, LegacyCurrencyDescriptor, RequestSignals, ResolutionInput, DEFAULT_COUNTRY,
};

use crate::config::ServerConfig;
use crate::headers::apply_context_headers;
use crate::store::{load_stored_preference, PreferenceStore, StoreError};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn PreferenceStore>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    fn header<'a>(&self, headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn geo_country(&self, headers: &HeaderMap) -> Option<String> {
        self.header(headers, &self.config.geo_header).map(str::to_string)
    }

    fn user_id(&self, headers: &HeaderMap) -> Option<String> {
        self.header(headers, &self.config.user_id_header).map(str::to_string)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("currency preference update failed: {0}")]
    Persist(StoreError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Preference update body
#[derive(Debug, Deserialize)]
pub struct UpdatePreferenceRequest {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct SupportedCurrency {
    code: &'static str,
    symbol: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct SupportedCountry {
    code: &'static str,
    currency: &'static str,
}

#[derive(Debug, Serialize)]
struct SupportedResponse {
    currencies: Vec<SupportedCurrency>,
    countries: Vec<SupportedCountry>,
}

/// Context as JSON body with mirrored headers
fn context_response(ctx: &CurrencyContext) -> Response {
    let mut headers = HeaderMap::new();
    apply_context_headers(&mut headers, ctx);
    (StatusCode::OK, headers, Json(ctx.clone())).into_response()
}

/// Run resolution for one request; never fails
async fn resolve_for_request(
    state: &AppState,
    headers: &HeaderMap,
    request: RequestSignals,
    mut warnings: Vec<String>,
) -> CurrencyContext {
    let request_id = uuid::Uuid::new_v4();
    let user_id = state.user_id(headers);

    let stored = match &user_id {
        Some(uid) => load_stored_preference(state.store.as_ref(), uid, &mut warnings).await,
        None => None,
    };

    let input = ResolutionInput {
        request,
        stored,
        geo_country: state.geo_country(headers),
    };
    let resolution = resolve_context(&input);
    warnings.extend(resolution.warnings);

    for warning in &warnings {
        tracing::warn!("[RESOLVE] request_id={} {}", request_id, warning);
    }
    tracing::info!(
        "[RESOLVE] request_id={} user={} currency={} country={} source={}",
        request_id,
        user_id.as_deref().unwrap_or("anonymous"),
        resolution.context.currency(),
        resolution.context.country(),
        resolution.context.source()
    );

    resolution.context
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_context(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    let ctx = resolve_for_request(&state, &headers, RequestSignals::default(), Vec::new()).await;
    context_response(&ctx)
}

/// Body is optional; an unreadable body is a warning, not an error
async fn post_context(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut warnings = Vec::new();
    let request = signals_from_body(&body, &mut warnings);
    let ctx = resolve_for_request(&state, &headers, request, warnings).await;
    context_response(&ctx)
}

/// Read each body field on its own so one bad field does not drop the others
fn signals_from_body(body: &[u8], warnings: &mut Vec<String>) -> RequestSignals {
    if body.iter().all(u8::is_ascii_whitespace) {
        return RequestSignals::default();
    }
    let fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            warnings.push(format!("request body ignored: expected a JSON object, got {}", other));
            return RequestSignals::default();
        }
        Err(e) => {
            warnings.push(format!("request body ignored: {}", e));
            return RequestSignals::default();
        }
    };

    let currency_context = match fields.get("currencyContext") {
        None | Some(Value::Null) => None,
        Some(raw) => match serde_json::from_value::<LegacyCurrencyDescriptor>(raw.clone()) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                warnings.push(format!("body field 'currencyContext' ignored: {}", e));
                None
            }
        },
    };

    RequestSignals {
        currency: string_field(&fields, "currency", warnings),
        country: string_field(&fields, "country", warnings),
        currency_context,
    }
}

fn string_field(
    fields: &Map<String, Value>,
    name: &str,
    warnings: &mut Vec<String>,
) -> Option<String> {
    match fields.get(name)? {
        Value::String(value) => Some(value.clone()),
        Value::Null => None,
        other => {
            warnings.push(format!(
                "body field '{}' ignored: expected a string, got {}",
                name, other
            ));
            None
        }
    }
}

async fn supported() -> Json<SupportedResponse> {
    let currencies = supported_currencies()
        .into_iter()
        .filter_map(|code| {
            currency_metadata(code).map(|meta| SupportedCurrency {
                code,
                symbol: meta.symbol,
                name: meta.name,
            })
        })
        .collect();
    let countries = supported_countries()
        .into_iter()
        .filter_map(|code| {
            country_currency(code).map(|currency| SupportedCountry { code, currency })
        })
        .collect();
    Json(SupportedResponse { currencies, countries })
}

async fn update_preference(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UpdatePreferenceRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let user_id = state.user_id(&headers).ok_or(ApiError::Unauthorized)?;
    let Json(req) =
        payload.map_err(|e| ApiError::BadRequest(format!("invalid request body: {}", e)))?;

    let raw_currency = req
        .currency
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Missing required field: 'currency'".to_string()))?;
    let currency =
        normalize_currency_code(raw_currency).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let country = match req.country.as_deref() {
        Some(raw) => {
            normalize_country_code(raw).map_err(|e| ApiError::BadRequest(e.to_string()))?
        }
        None => state
            .geo_country(&headers)
            .and_then(|geo| normalize_country_code(&geo).ok())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
    };

    let ctx = CurrencyContext::new(&currency, &country, CurrencySource::UserOverride);
    state
        .store
        .put(&user_id, &ctx.to_preference())
        .await
        .map_err(|e| {
            tracing::error!("[PREFERENCE] Save failed for user {}: {}", user_id, e);
            ApiError::Persist(e)
        })?;

    tracing::info!(
        "[PREFERENCE] user={} set override currency={} country={}",
        user_id,
        ctx.currency(),
        ctx.country()
    );
    Ok(context_response(&ctx))
}

async fn reset_preference(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let user_id = state.user_id(&headers).ok_or(ApiError::Unauthorized)?;

    state.store.clear(&user_id).await.map_err(|e| {
        tracing::error!("[PREFERENCE] Reset failed for user {}: {}", user_id, e);
        ApiError::Persist(e)
    })?;

    let resolution = resolve_context(&ResolutionInput::from_geo(state.geo_country(&headers)));
    for warning in &resolution.warnings {
        tracing::warn!("[PREFERENCE] user={} {}", user_id, warning);
    }
    tracing::info!(
        "[PREFERENCE] user={} reset override, now currency={} source={}",
        user_id,
        resolution.context.currency(),
        resolution.context.source()
    );
    Ok(context_response(&resolution.context))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/currency/context", get(get_context).post(post_context))
        .route("/api/currency/supported", get(supported))
        .route(
            "/api/currency/preference",
            axum::routing::put(update_preference).delete(reset_preference),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
