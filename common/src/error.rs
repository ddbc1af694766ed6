//! # Error Taxonomy
//!
//! Every way a resolution run can end other than success.

use std::fmt;

use thiserror::Error;

/// A failed call to the upstream registry.
///
/// `status` is absent when no HTTP response was received (connect failure, timeout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("CVM request to {url} failed: {reason}")]
pub struct UpstreamError {
    pub url: String,
    pub status: Option<u16>,
    pub body: Option<String>,
    pub reason: String,
}

impl UpstreamError {
    pub fn status(url: impl Into<String>, status: u16, body: String) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            body: Some(body),
            reason: format!("status {status}"),
        }
    }

    /// A success response whose body could not be decoded.
    pub fn payload(url: impl Into<String>, status: u16, body: String, reason: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            body: Some(body),
            reason: format!("undecodable payload: {reason}"),
        }
    }

    pub fn transport(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            status: None,
            body: None,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputKind {
    /// No identifier was supplied.
    Missing,
    /// The identifier does not have 14 digits after normalization.
    WrongLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    /// The search returned no registration for the identifier.
    Summary,
    /// The registration detail came back without a usable id.
    Registration,
    /// No regulation document (or none with a file name) exists.
    Document,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid identifier: {0:?}")]
    InvalidInput(InvalidInputKind),
    #[error("not found: {0:?}")]
    NotFound(NotFoundKind),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ResolveError {
    /// Stable machine-readable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(InvalidInputKind::Missing) => "cnpj_required",
            Self::InvalidInput(InvalidInputKind::WrongLength) => "cnpj_invalid",
            Self::NotFound(NotFoundKind::Summary) => "fundo_not_found",
            Self::NotFound(NotFoundKind::Registration) => "registro_incomplete",
            Self::NotFound(NotFoundKind::Document) => "regulamento_not_found",
            Self::Upstream(_) => "cvm_request_failed",
            Self::Unexpected(_) => "internal_error",
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
