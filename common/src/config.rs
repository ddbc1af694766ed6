use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CVM_BASE_URL: &str = "https://web.cvm.gov.br/app/fundosweb";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, one symbol-prefixed line per event.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

pub struct Config {
    pub port: u16,
    /// Root of the CVM "fundosweb" API. Treated as a directory.
    pub cvm_base_url: String,
    /// Downloads land in `<download_dir>/<cnpj>/<file>`.
    pub download_dir: PathBuf,
    pub public_dir: PathBuf,
    pub rate_limit_window: Duration,
    pub rate_limit_max: u32,
    /// Key clients by the first `X-Forwarded-For` entry instead of the socket address.
    ///
    /// Only enable behind a proxy that overwrites the header.
    pub trust_proxy: bool,
    pub user_agent: String,
    /// Upper bound for every single upstream call.
    pub upstream_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        let cwd: PathBuf = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            port: 3000,
            cvm_base_url: DEFAULT_CVM_BASE_URL.to_string(),
            download_dir: cwd.join("downloads"),
            public_dir: cwd.join("public"),
            rate_limit_window: Duration::from_millis(60_000),
            rate_limit_max: 10,
            trust_proxy: false,
            user_agent: default_user_agent(),
            upstream_timeout: Duration::from_millis(30_000),
            log_format: LogFormat::Pretty,
        }
    }
}

pub fn default_user_agent() -> String {
    format!("cvm-proxy/{}", env!("CARGO_PKG_VERSION"))
}

/// Parses the boolean spellings accepted in environment variables.
///
/// Accepts `true`/`1`/`yes` and `false`/`0`/`no`, case-insensitively.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!("expected true/false, 1/0 or yes/no, got {other:?}")),
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
