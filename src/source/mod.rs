//! Chat source abstraction
//!
//! The session controller only sees this interface; the concrete
//! provider client (YouTube) lives behind it and is swappable.

use async_trait::async_trait;
use std::time::Duration;

pub mod youtube;

pub use youtube::YouTubeSource;

/// Errors from the chat provider.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The stream id is unknown or the stream has no active chat.
    #[error("no active live chat for stream: {0}")]
    NotFound(String),

    /// Transport or provider failure.
    #[error("chat source unavailable: {0}")]
    Unavailable(String),
}

/// One chat message as returned by the provider.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Opaque, provider-stable author id. Used as the voter identity.
    pub voter_id: String,
    pub display_name: String,
    pub text: String,
}

/// One page of chat messages.
#[derive(Debug, Clone, Default)]
pub struct ChatPage {
    /// Messages in provider order.
    pub messages: Vec<ChatMessage>,
    /// Cursor for the next page.
    pub next_token: Option<String>,
    /// Provider-suggested wait before the next fetch.
    pub polling_interval: Duration,
}

/// A paged live-chat message source.
#[async_trait]
pub trait ChatSource: Send + Sync {
    /// Look up the chat handle for a stream.
    async fn resolve_stream(&self, stream_id: &str) -> Result<String, SourceError>;

    /// Fetch the next page of messages. `page_token` is the continuation
    /// token from the previous page, or `None` for the first fetch.
    async fn fetch_page(
        &self,
        chat_handle: &str,
        page_token: Option<&str>,
    ) -> Result<ChatPage, SourceError>;
}
