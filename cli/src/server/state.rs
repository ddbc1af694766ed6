use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cvm_proxy_common::clock::Clock;
use cvm_proxy_common::config::Config;
use cvm_proxy_core::clock::SystemClock;
use cvm_proxy_core::file_store::LocalFileStore;
use cvm_proxy_core::rate_limit::RateLimiter;
use cvm_proxy_core::resolution::ResolutionService;
use cvm_proxy_protocols::cvm::CvmClient;

/// Shared handles for every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ResolutionService>,
    pub limiter: Arc<RateLimiter>,
    pub clock: Arc<dyn Clock>,
    pub trust_proxy: bool,
    /// Used to render `filePath` relative to the download directory's name.
    pub download_dir: PathBuf,
}

impl AppState {
    /// Wires the production adapters: the CVM HTTP client, the local disk store
    /// and the system clock.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let registry: CvmClient = CvmClient::new(&cfg.cvm_base_url, &cfg.user_agent, cfg.upstream_timeout)
            .context("failed to build CVM client")?;
        let store: LocalFileStore = LocalFileStore::new(cfg.download_dir.clone());

        Ok(Self {
            resolver: Arc::new(ResolutionService::new(Arc::new(registry), Arc::new(store))),
            limiter: Arc::new(RateLimiter::new(cfg.rate_limit_window, cfg.rate_limit_max)),
            clock: Arc::new(SystemClock),
            trust_proxy: cfg.trust_proxy,
            download_dir: cfg.download_dir.clone(),
        })
    }
}
