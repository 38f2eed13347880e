pub mod types;
pub mod error;
pub mod loader;
pub mod context;
pub mod prompt;
pub mod chat;
pub mod session;

pub use error::{FolioError, Result};
pub use types::*;
pub use loader::{ContentLoader, ContentSources, SiteInfo};
pub use context::{build_research_context, NO_CONTENT};
pub use prompt::{build_messages, system_prompt};
pub use chat::{ChatMessage, ChatRequest, ChatResponse, ErrorBody, Role};
pub use session::{ChatSession, ConversationMessage, SessionState};
