use std::sync::Arc;

use anyhow::Context;
use cvm_proxy_common::config::Config;
use cvm_proxy_common::models::ResolvedRegulation;
use cvm_proxy_core::file_store::LocalFileStore;
use cvm_proxy_core::resolution::ResolutionService;
use cvm_proxy_protocols::cvm::CvmClient;

use crate::server::response::LatestRegulationResponse;

/// Runs one resolution without a server and prints the success payload.
pub async fn fetch(cnpj: &str, cfg: &Config) -> anyhow::Result<()> {
    let registry: CvmClient = CvmClient::new(&cfg.cvm_base_url, &cfg.user_agent, cfg.upstream_timeout)?;
    let store: LocalFileStore = LocalFileStore::new(cfg.download_dir.clone());
    let service: ResolutionService = ResolutionService::new(Arc::new(registry), Arc::new(store));

    let resolved: ResolvedRegulation = match service.resolve(Some(cnpj)).await {
        Ok(resolved) => resolved,
        Err(err) => return Err(anyhow::anyhow!("{}: {}", err.code(), err)),
    };

    let payload: LatestRegulationResponse = LatestRegulationResponse::from_resolved(resolved, &cfg.download_dir);
    let rendered: String = serde_json::to_string_pretty(&payload).context("failed to render result")?;
    println!("{rendered}");

    Ok(())
}
