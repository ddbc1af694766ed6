//! # Registry Models
//!
//! Records returned by the CVM fund registry, plus the values the resolution
//! pipeline hands back to its callers.
//!
//! Field names follow Rust conventions; `serde` renames map them onto the
//! registry's Portuguese wire names. Missing and `null` fields both decode to `None`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cnpj::Cnpj;

/// The registry sends `numeroRegistro` either as a JSON number or as a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistryNumber {
    Numeric(u64),
    Text(String),
}

/// One candidate registration returned by the search endpoint.
///
/// A single CNPJ may match several summaries (re-registrations, related entries).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistrationSummary {
    pub id: i64,
    #[serde(default, rename = "numeroRegistro", skip_serializing_if = "Option::is_none")]
    pub registry_number: Option<RegistryNumber>,
    #[serde(default, rename = "dataRegistro", skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<String>,
    #[serde(default, rename = "codigoCVM", skip_serializing_if = "Option::is_none")]
    pub cvm_code: Option<i64>,
}

/// The fully resolved fund registration.
///
/// Its `id` keys the document listing and the download. Other fields the
/// registry sends are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDetail {
    #[serde(default)]
    pub id: Option<i64>,
}

/// One version of a fund's regulation document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationDocument {
    pub id: i64,
    #[serde(default, rename = "dataInicioVigencia", skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<String>,
    #[serde(default, rename = "nomeArquivoRegulamento", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, rename = "ativo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl RegulationDocument {
    pub fn has_effective_date(&self) -> bool {
        self.effective_from.as_deref().is_some_and(|d| !d.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.active == Some(true)
    }

    /// The file name to request from the download endpoint, if any.
    pub fn downloadable_name(&self) -> Option<&str> {
        self.file_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Raw download payload. Lives only for the duration of one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub bytes: Vec<u8>,
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
}

/// Where a persisted artifact ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Absolute path of the written file.
    pub file_path: PathBuf,
    /// Sanitized file name actually used on disk.
    pub file_name: String,
    /// `<cnpj>/<file_name>`, relative to the download directory.
    pub relative_path: PathBuf,
}

/// Successful outcome of one resolution run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRegulation {
    pub cnpj: Cnpj,
    pub registration_id: i64,
    pub document_id: i64,
    pub effective_date: Option<String>,
    pub stored: StoredFile,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
