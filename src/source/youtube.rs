//! YouTube Live Streaming API client
//!
//! Thin reqwest client for the two endpoints the poll needs: video
//! lookup (to find the active live chat id) and live chat message pages.
//! API key auth only; the OAuth flow is out of scope.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{ChatMessage, ChatPage, ChatSource, SourceError};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Page size for liveChatMessages.list.
const MAX_RESULTS: u32 = 2000;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube Data API v3 chat source.
pub struct YouTubeSource {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeSource {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
        })
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }
}

#[async_trait]
impl ChatSource for YouTubeSource {
    async fn resolve_stream(&self, stream_id: &str) -> Result<String, SourceError> {
        let url = format!("{}/videos", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "liveStreamingDetails"),
                ("id", stream_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "videos.list returned HTTP {}",
                response.status()
            )));
        }

        let body: VideoListResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        body.items
            .into_iter()
            .next()
            .and_then(|item| item.live_streaming_details)
            .and_then(|details| details.active_live_chat_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SourceError::NotFound(stream_id.to_string()))
    }

    async fn fetch_page(
        &self,
        chat_handle: &str,
        page_token: Option<&str>,
    ) -> Result<ChatPage, SourceError> {
        let url = format!("{}/liveChat/messages", self.base_url);
        let max_results = MAX_RESULTS.to_string();
        let mut query = vec![
            ("liveChatId", chat_handle),
            ("part", "snippet,authorDetails"),
            ("maxResults", max_results.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "liveChatMessages.list returned HTTP {}",
                response.status()
            )));
        }

        let body: MessageListResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        tracing::debug!(
            messages = body.items.len(),
            interval_ms = body.polling_interval_millis,
            "fetched chat page"
        );
        Ok(page_from_response(body))
    }
}

/// Map an API response to the provider-neutral page type. Items without
/// author details or message text (deleted messages, non-text events)
/// are skipped.
fn page_from_response(body: MessageListResponse) -> ChatPage {
    let messages = body
        .items
        .into_iter()
        .filter_map(|item| {
            let author = item.author_details?;
            let snippet = item.snippet?;
            let text = snippet
                .text_message_details
                .and_then(|d| d.message_text)
                .or(snippet.display_message)?;
            Some(ChatMessage {
                voter_id: author.channel_id,
                display_name: author.display_name.unwrap_or_default(),
                text,
            })
        })
        .collect();

    ChatPage {
        messages,
        next_token: body.next_page_token,
        polling_interval: Duration::from_millis(body.polling_interval_millis),
    }
}

// ---------------------------------------------------------------------------
// API response models
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveStreamingDetails {
    active_live_chat_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    #[serde(default)]
    items: Vec<MessageItem>,
    next_page_token: Option<String>,
    #[serde(default)]
    polling_interval_millis: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageItem {
    snippet: Option<MessageSnippet>,
    author_details: Option<AuthorDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageSnippet {
    text_message_details: Option<TextMessageDetails>,
    display_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextMessageDetails {
    message_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorDetails {
    channel_id: String,
    display_name: Option<String>,
}
