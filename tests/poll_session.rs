//! End-to-end session tests against the public API, with a scripted
//! chat source standing in for the provider.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use chatvote::interrupt::InterruptWatcher;
use chatvote::poll::choices::ChoiceSet;
use chatvote::poll::session::{CloseReason, PollSession, SessionOptions, SessionState};
use chatvote::report::NullObserver;
use chatvote::source::{ChatMessage, ChatPage, ChatSource, SourceError};

struct ScriptedSource {
    pages: Mutex<VecDeque<ChatPage>>,
}

impl ScriptedSource {
    fn new(pages: Vec<ChatPage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
        }
    }
}

#[async_trait]
impl ChatSource for ScriptedSource {
    async fn resolve_stream(&self, stream_id: &str) -> Result<String, SourceError> {
        Ok(format!("chat-{stream_id}"))
    }

    async fn fetch_page(
        &self,
        _chat_handle: &str,
        _page_token: Option<&str>,
    ) -> Result<ChatPage, SourceError> {
        Ok(self.pages.lock().pop_front().unwrap_or_default())
    }
}

fn message(voter: &str, text: &str) -> ChatMessage {
    ChatMessage {
        voter_id: voter.to_string(),
        display_name: voter.to_string(),
        text: text.to_string(),
    }
}

fn options(labels: &[&str], voting_secs: u64) -> SessionOptions {
    SessionOptions {
        stream_id: "stream".to_string(),
        voting_duration: Duration::from_secs(voting_secs),
        countdown: Duration::ZERO,
        ballots_per_voter: 1,
        choices: ChoiceSet::new(labels.iter().copied()),
    }
}

#[tokio::test(start_paused = true)]
async fn full_session_reports_tied_winners() {
    let source = ScriptedSource::new(vec![ChatPage {
        messages: vec![
            message("voter1", "A"),
            message("voter2", "2"),
            message("voter1", "B"),
            message("voter3", "no match"),
        ],
        next_token: Some("tok".to_string()),
        polling_interval: Duration::from_millis(5000),
    }]);

    let mut session = PollSession::new(options(&["A", "B"], 10), source);
    let result = session
        .run(CancellationToken::new(), &NullObserver)
        .await
        .unwrap();

    assert_eq!(result.close_reason, CloseReason::Timeout);
    assert_eq!(result.results.total_ballots, 2);
    let winners: Vec<&str> = result
        .results
        .winners
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(winners, vec!["A", "B"]);
    assert_eq!(session.state(), SessionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn keypress_interrupts_running_session() {
    let (mut tx, rx) = tokio::io::duplex(8);
    let watcher = InterruptWatcher::spawn(rx);
    let token = watcher.token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        use tokio::io::AsyncWriteExt;
        let _ = tx.write_all(b"\n").await;
    });

    let source = ScriptedSource::new(Vec::new());
    let mut session = PollSession::new(options(&["A", "B"], 120), source);
    let result = session.run(token, &NullObserver).await.unwrap();

    assert_eq!(result.close_reason, CloseReason::Interrupted);
    assert_eq!(session.close_reason(), Some(CloseReason::Interrupted));
    watcher.shutdown();
}
