//! # Responses
//!
//! Maps resolution outcomes to status codes and JSON bodies. Internal detail
//! of unexpected failures is logged, never returned.

use std::path::Path;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cvm_proxy_common::error::ResolveError;
use cvm_proxy_common::models::ResolvedRegulation;
use cvm_proxy_core::file_store;
use serde::Serialize;
use tracing::error;

pub const RATE_LIMIT_EXCEEDED: &str = "rate_limit_exceeded";

#[derive(Debug)]
pub enum ApiError {
    Resolve(ResolveError),
    RateLimited { retry_after_secs: u64 },
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    /// Upstream HTTP status, when the upstream answered at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(rename = "retryAfterSeconds", skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl ErrorBody {
    fn code(error: &'static str) -> Self {
        Self {
            error,
            status: None,
            retry_after_seconds: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, ErrorBody) = match self {
            Self::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody {
                    retry_after_seconds: Some(retry_after_secs),
                    ..ErrorBody::code(RATE_LIMIT_EXCEEDED)
                },
            ),
            Self::Resolve(err) => {
                let code: &'static str = err.code();
                match err {
                    ResolveError::InvalidInput(_) => (StatusCode::BAD_REQUEST, ErrorBody::code(code)),
                    ResolveError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorBody::code(code)),
                    ResolveError::Upstream(upstream) => (
                        StatusCode::BAD_GATEWAY,
                        ErrorBody {
                            status: upstream.status,
                            ..ErrorBody::code(code)
                        },
                    ),
                    ResolveError::Unexpected(source) => {
                        error!(error = ?source, "unexpected error");
                        (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::code(code))
                    }
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestRegulationResponse {
    pub cnpj: String,
    pub registro_fundo_id: i64,
    pub regulamento_id: i64,
    pub data_inicio_vigencia: Option<String>,
    pub file_name: String,
    pub file_path: String,
}

impl LatestRegulationResponse {
    pub fn from_resolved(resolved: ResolvedRegulation, download_dir: &Path) -> Self {
        Self {
            file_path: file_store::display_path(download_dir, &resolved.stored),
            cnpj: resolved.cnpj.as_str().to_string(),
            registro_fundo_id: resolved.registration_id,
            regulamento_id: resolved.document_id,
            data_inicio_vigencia: resolved.effective_date,
            file_name: resolved.stored.file_name,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
