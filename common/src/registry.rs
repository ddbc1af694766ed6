//! # Fund Registry Port
//!
//! The four upstream calls the resolution pipeline depends on. Implemented over
//! HTTP by `cvm_proxy_protocols::cvm::CvmClient` and by in-memory fakes in tests.

use async_trait::async_trait;

use crate::cnpj::Cnpj;
use crate::error::UpstreamError;
use crate::models::{DownloadedArtifact, RegistrationDetail, RegistrationSummary, RegulationDocument};

#[async_trait]
pub trait FundRegistry: Send + Sync {
    /// Registrations matching a normalized identifier. May be empty.
    async fn search_by_cnpj(&self, cnpj: &Cnpj) -> Result<Vec<RegistrationSummary>, UpstreamError>;

    async fn fetch_registration(&self, summary_id: i64) -> Result<RegistrationDetail, UpstreamError>;

    /// Every regulation version on file for a registration. May be empty.
    async fn list_documents(&self, registration_id: i64) -> Result<Vec<RegulationDocument>, UpstreamError>;

    async fn download_document(
        &self,
        registration_id: i64,
        file_name: &str,
    ) -> Result<DownloadedArtifact, UpstreamError>;
}
