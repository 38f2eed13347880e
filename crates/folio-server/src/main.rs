use clap::Parser;
use folio_server::cli::{self, Cli, Commands};
use folio_server::{serve, FolioConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = FolioConfig::load_or_default(&cli.config)?;
            let addr = args.http_addr.unwrap_or(config.server.http_addr);
            serve::run(config, &cli.content_root, addr).await
        }
        Commands::Context => {
            let config = FolioConfig::load_or_default(&cli.config)?;
            cli::content::context(&config, &cli.content_root)
        }
        Commands::Documents(args) => {
            let config = FolioConfig::load_or_default(&cli.config)?;
            cli::content::documents(args, &config, &cli.content_root).await
        }
        Commands::Ask(args) => cli::ask::ask(args, &cli.server).await,
        Commands::Chat => cli::ask::chat(&cli.server).await,
        Commands::Config(cmd) => cli::config_cmd::run(cmd, &cli.config),
    }
}
