//! Local disk implementation of [`ArtifactStore`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

use cvm_proxy_common::cnpj::Cnpj;
use cvm_proxy_common::models::{DownloadedArtifact, StoredFile};
use cvm_proxy_common::storage::ArtifactStore;

/// Name used when sanitizing leaves nothing usable.
pub const FALLBACK_FILE_NAME: &str = "regulamento.pdf";

pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Path shown to clients: `<last component of root>/<cnpj>/<file>`.
///
/// Keeps the server's absolute layout out of responses.
pub fn display_path(root: &Path, stored: &StoredFile) -> String {
    let root_name: PathBuf = root.file_name().map(PathBuf::from).unwrap_or_default();
    root_name.join(&stored.relative_path).to_string_lossy().into_owned()
}

#[async_trait]
impl ArtifactStore for LocalFileStore {
    async fn persist(
        &self,
        artifact: &DownloadedArtifact,
        cnpj: &Cnpj,
        file_name: &str,
    ) -> anyhow::Result<StoredFile> {
        let safe_name: String = sanitize_file_name(file_name);
        let safe_cnpj: Cnpj = Cnpj::normalize(cnpj.as_str());
        let target_dir: PathBuf = self.root.join(safe_cnpj.as_str());

        tokio::fs::create_dir_all(&target_dir)
            .await
            .with_context(|| format!("creating {}", target_dir.display()))?;

        let file_path: PathBuf = target_dir.join(&safe_name);
        tokio::fs::write(&file_path, &artifact.bytes)
            .await
            .with_context(|| format!("writing {}", file_path.display()))?;

        debug!(path = %file_path.display(), bytes = artifact.bytes.len(), "artifact written");

        Ok(StoredFile {
            file_path,
            relative_path: Path::new(safe_cnpj.as_str()).join(&safe_name),
            file_name: safe_name,
        })
    }
}

/// Reduces `name` to its last path component over `[A-Za-z0-9._-]`.
///
/// Any other character becomes `_`. Results that are empty or made only of dots
/// are replaced by [`FALLBACK_FILE_NAME`].
pub fn sanitize_file_name(name: &str) -> String {
    let base: &str = name
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
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
