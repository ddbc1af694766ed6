pub mod fetch;
pub mod serve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use cvm_proxy_common::config::{self, Config, DEFAULT_CVM_BASE_URL, LogFormat};

#[derive(Parser)]
#[command(name = "cvm-proxy")]
#[command(about = "Fetches the current regulation of a CVM investment fund.", version)]
pub struct CommandLine {
    #[command(flatten)]
    pub settings: Settings,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "s")]
    Serve,
    /// Resolve and download the current regulation of one fund
    #[command(alias = "f")]
    Fetch { cnpj: String },
}

/// Every setting can come from a flag or from its environment variable.
#[derive(Args, Debug)]
pub struct Settings {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000, global = true)]
    pub port: u16,
    /// Root URL of the CVM fundosweb API
    #[arg(long, env = "CVM_BASE_URL", default_value = DEFAULT_CVM_BASE_URL, global = true)]
    pub cvm_base_url: String,
    /// Where regulations are written [default: ./downloads]
    #[arg(long, env = "DOWNLOAD_DIR", global = true)]
    pub download_dir: Option<PathBuf>,
    /// Static assets served at / [default: ./public]
    #[arg(long, env = "PUBLIC_DIR", global = true)]
    pub public_dir: Option<PathBuf>,
    /// Rate limit window length in milliseconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_MS", default_value_t = 60_000, global = true)]
    pub rate_limit_window_ms: u64,
    /// Requests allowed per client per window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = 10, global = true)]
    pub rate_limit_max: u32,
    /// Key clients by X-Forwarded-For (true/false, 1/0, yes/no)
    #[arg(long, env = "TRUST_PROXY", default_value = "false", value_parser = config::parse_flag, action = ArgAction::Set, global = true)]
    pub trust_proxy: bool,
    /// User-Agent sent to CVM
    #[arg(long, env = "USER_AGENT", global = true)]
    pub user_agent: Option<String>,
    /// Timeout for each CVM call in milliseconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_MS", default_value_t = 30_000, global = true)]
    pub upstream_timeout_ms: u64,
    /// Log output: pretty or json
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: LogFormat,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Settings {
    pub fn into_config(self) -> Config {
        let defaults: Config = Config::default();
        Config {
            port: self.port,
            cvm_base_url: self.cvm_base_url,
            download_dir: self.download_dir.unwrap_or(defaults.download_dir),
            public_dir: self.public_dir.unwrap_or(defaults.public_dir),
            rate_limit_window: Duration::from_millis(self.rate_limit_window_ms),
            rate_limit_max: self.rate_limit_max,
            trust_proxy: self.trust_proxy,
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            upstream_timeout: Duration::from_millis(self.upstream_timeout_ms),
            log_format: self.log_format,
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
