use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use serde_json::{Value, json};

use super::response::{ApiError, LatestRegulationResponse};
use super::state::AppState;

const CNPJ_PARAM: &str = "cnpj";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Serves both GET and POST. A string `cnpj` in a JSON body wins over the query.
///
/// The query is read as raw pairs, so a repeated `cnpj` never rejects the
/// request; the first value is used. An unreadable query counts as absent.
pub async fn latest_regulation(
    State(state): State<AppState>,
    query: Option<Query<Vec<(String, String)>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LatestRegulationResponse>, ApiError> {
    let content_type: Option<&str> = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let raw: Option<String> = cnpj_from_body(content_type, &body)
        .or_else(|| query.and_then(|Query(pairs)| cnpj_from_query(pairs)));

    let resolved = state.resolver.resolve(raw.as_deref()).await?;

    Ok(Json(LatestRegulationResponse::from_resolved(resolved, &state.download_dir)))
}

/// First `cnpj` value in the query string.
pub fn cnpj_from_query(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find(|(name, _)| name == CNPJ_PARAM)
        .map(|(_, value)| value)
}

/// Only JSON bodies are read. Bodies that are not JSON objects, or whose
/// `cnpj` is not a string, count as absent.
pub fn cnpj_from_body(content_type: Option<&str>, body: &[u8]) -> Option<String> {
    if body.is_empty() || !content_type.is_some_and(is_json) {
        return None;
    }
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get(CNPJ_PARAM) {
        Some(Value::String(cnpj)) => Some(cnpj.clone()),
        _ => None,
    }
}

/// `application/json` and `application/*+json`, parameters ignored.
fn is_json(content_type: &str) -> bool {
    let essence: String = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
