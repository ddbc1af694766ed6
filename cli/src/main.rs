use cvm_proxy_cli::commands::{CommandLine, Commands, fetch, serve};
use cvm_proxy_cli::terminal::logging;
use cvm_proxy_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.settings.into_config();

    logging::init_logging(cfg.log_format);

    match commands.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::serve(cfg).await,
        Commands::Fetch { cnpj } => fetch::fetch(&cnpj, &cfg).await,
    }
}
