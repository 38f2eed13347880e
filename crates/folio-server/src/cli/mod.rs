pub mod ask;
pub mod config_cmd;
pub mod content;

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about = "Research chat backend for a personal portfolio")]
pub struct Cli {
    /// Path to folio.toml
    #[arg(long, global = true, env = "FOLIO_CONFIG", default_value = "folio.toml")]
    pub config: PathBuf,

    /// Directory that relative content paths resolve against
    #[arg(long, global = true, env = "FOLIO_CONTENT_ROOT", default_value = ".")]
    pub content_root: PathBuf,

    /// Folio server address for client commands
    #[arg(
        long,
        global = true,
        env = "FOLIO_SERVER",
        default_value = "http://localhost:3000"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the assembled research context
    Context,
    /// List the aggregated content documents
    Documents(DocumentsArgs),
    /// Ask a running server one question
    Ask(AskArgs),
    /// Interactive chat against a running server
    Chat,
    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// HTTP listen address (overrides config file)
    #[arg(long, env = "FOLIO_HTTP_ADDR")]
    pub http_addr: Option<SocketAddr>,
}

#[derive(Args, Debug)]
pub struct DocumentsArgs {
    /// Only show one category: project, publication, blog-post, general-info
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Validate,
    Show,
}
