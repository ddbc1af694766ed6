//! # Regulation Resolution Service
//!
//! Implements the "latest regulation for a CNPJ" use case.
//!
//! Turns a raw, possibly punctuated identifier into one persisted regulation
//! document by chaining four registry calls. Each call depends on an id produced
//! by the previous one, so they run strictly in sequence. The first failure ends
//! the run; no partial result is returned.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use cvm_proxy_common::cnpj::Cnpj;
use cvm_proxy_common::error::{InvalidInputKind, NotFoundKind, ResolveError, UpstreamError};
use cvm_proxy_common::models::{DownloadedArtifact, ResolvedRegulation, StoredFile};
use cvm_proxy_common::registry::FundRegistry;
use cvm_proxy_common::storage::ArtifactStore;
use cvm_proxy_protocols::content_disposition;

use crate::selection::{pick_latest_document, pick_registration_summary};

/// The registry call an upstream failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    FetchRegistration,
    ListDocuments,
    Download,
}

/// Application Service for regulation lookups.
///
/// Orchestrates the run by:
/// 1. normalizing and validating the identifier.
/// 2. searching registrations and picking one.
/// 3. fetching the registration and listing its regulation documents.
/// 4. picking the current document, downloading and persisting it.
pub struct ResolutionService {
    registry: Arc<dyn FundRegistry>,
    store: Arc<dyn ArtifactStore>,
}

impl ResolutionService {
    pub fn new(registry: Arc<dyn FundRegistry>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { registry, store }
    }

    /// Resolves `raw` (as typed by the user) to its current regulation document.
    ///
    /// `None` and the empty string are reported as a missing identifier; anything
    /// that does not normalize to 14 digits as a malformed one. Both are rejected
    /// before the registry is contacted.
    pub async fn resolve(&self, raw: Option<&str>) -> Result<ResolvedRegulation, ResolveError> {
        let raw: &str = raw
            .filter(|value| !value.is_empty())
            .ok_or(ResolveError::InvalidInput(InvalidInputKind::Missing))?;

        let cnpj: Cnpj = Cnpj::normalize(raw);
        if !cnpj.is_valid_length() {
            return Err(ResolveError::InvalidInput(InvalidInputKind::WrongLength));
        }

        self.run(cnpj).await
    }

    #[instrument(name = "resolve", skip_all, fields(cnpj = %cnpj))]
    async fn run(&self, cnpj: Cnpj) -> Result<ResolvedRegulation, ResolveError> {
        let summaries = self
            .registry
            .search_by_cnpj(&cnpj)
            .await
            .map_err(|e| upstream_failure(Stage::Search, e))?;
        let summary = pick_registration_summary(&summaries)
            .ok_or(ResolveError::NotFound(NotFoundKind::Summary))?;
        debug!(candidates = summaries.len(), summary_id = summary.id, "registration selected");

        let registration = self
            .registry
            .fetch_registration(summary.id)
            .await
            .map_err(|e| upstream_failure(Stage::FetchRegistration, e))?;
        let registration_id: i64 = registration
            .id
            .ok_or(ResolveError::NotFound(NotFoundKind::Registration))?;
        debug!(registration_id, "registration fetched");

        let documents = self
            .registry
            .list_documents(registration_id)
            .await
            .map_err(|e| upstream_failure(Stage::ListDocuments, e))?;
        let document = pick_latest_document(&documents)
            .ok_or(ResolveError::NotFound(NotFoundKind::Document))?;
        let requested_name: &str = document
            .downloadable_name()
            .ok_or(ResolveError::NotFound(NotFoundKind::Document))?;
        debug!(candidates = documents.len(), document_id = document.id, "document selected");

        let artifact: DownloadedArtifact = self
            .registry
            .download_document(registration_id, requested_name)
            .await
            .map_err(|e| upstream_failure(Stage::Download, e))?;
        debug!(bytes = artifact.bytes.len(), "document downloaded");

        let file_name: String = resolve_file_name(&artifact, requested_name);
        let stored: StoredFile = self
            .store
            .persist(&artifact, &cnpj, &file_name)
            .await
            .map_err(ResolveError::Unexpected)?;

        info!(
            registration_id,
            document_id = document.id,
            file_path = %stored.file_path.display(),
            "regulation downloaded"
        );

        Ok(ResolvedRegulation {
            cnpj,
            registration_id,
            document_id: document.id,
            effective_date: document.effective_from.clone(),
            stored,
        })
    }
}

/// Final file name: the `Content-Disposition` name when present, else the document's own.
pub fn resolve_file_name(artifact: &DownloadedArtifact, document_name: &str) -> String {
    content_disposition::extract_file_name(artifact.content_disposition.as_deref())
        .unwrap_or_else(|| document_name.to_string())
}

fn upstream_failure(stage: Stage, err: UpstreamError) -> ResolveError {
    warn!(?stage, status = ?err.status, url = %err.url, body = ?err.body, "cvm request failed");
    ResolveError::Upstream(err)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
