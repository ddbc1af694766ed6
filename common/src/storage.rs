use async_trait::async_trait;

use crate::cnpj::Cnpj;
use crate::models::{DownloadedArtifact, StoredFile};

/// Defines the contract for writing a downloaded artifact somewhere durable.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Writes `artifact` under a location namespaced by `cnpj`.
    ///
    /// # Arguments
    /// * `file_name` - Requested name. Implementations sanitize it before use.
    ///
    /// # Returns
    /// * `StoredFile` - The final name and location actually written.
    async fn persist(
        &self,
        artifact: &DownloadedArtifact,
        cnpj: &Cnpj,
        file_name: &str,
    ) -> anyhow::Result<StoredFile>;
}
