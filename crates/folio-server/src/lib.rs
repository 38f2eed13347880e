pub mod cli;
pub mod completion;
pub mod config;
pub mod http;
pub mod serve;

pub use completion::{CompletionError, CompletionProvider, CompletionSettings, OpenAiClient};
pub use config::FolioConfig;
pub use http::{create_router, AppState};
