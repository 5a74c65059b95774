//! Poll Session Controller
//!
//! The state machine driving one poll: countdown, the voting fetch loop
//! raced against the deadline and the operator stop signal, and the
//! final tally at close.

use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use super::choices::ChoiceSet;
use super::tally::{BallotTally, TallyResults};
use crate::report::SessionObserver;
use crate::source::{ChatMessage, ChatSource, SourceError};

/// Lower bound on the wait between page fetches. The provider's
/// suggested interval can be shorter than is useful.
pub const POLL_INTERVAL_FLOOR: Duration = Duration::from_secs(5);

/// Why the voting window closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The voting deadline elapsed.
    Timeout,
    /// The operator requested an early stop.
    Interrupted,
}

/// Session lifecycle. Transitions are one-directional; Closed is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Countdown,
    Voting,
    Closed,
}

/// Fatal session failures. Rejected ballots and unmatched messages are
/// not errors; they are silent no-ops.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The stream handle lookup failed before the countdown; there is no
    /// session to run.
    #[error("stream lookup failed: {0}")]
    Lookup(#[source] SourceError),

    /// A mid-session page fetch failed. The session aborts; a bounded,
    /// predictable voting window is preferred over retrying against an
    /// unreachable provider.
    #[error("chat fetch failed: {0}")]
    Fetch(#[source] SourceError),
}

/// Validated inputs for one session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub stream_id: String,
    pub voting_duration: Duration,
    pub countdown: Duration,
    pub ballots_per_voter: u32,
    pub choices: ChoiceSet,
}

/// Final outcome handed to the observer and returned to the caller.
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub results: TallyResults,
    pub close_reason: CloseReason,
}

/// One poll session. Created per invocation and discarded after the
/// result is reported; the tally is owned here and mutated only by the
/// fetch loop.
pub struct PollSession<S> {
    options: SessionOptions,
    source: S,
    state: SessionState,
    tally: BallotTally,
    close_reason: Option<CloseReason>,
}

impl<S: ChatSource> PollSession<S> {
    pub fn new(options: SessionOptions, source: S) -> Self {
        let tally = BallotTally::new(options.ballots_per_voter);
        Self {
            options,
            source,
            state: SessionState::Idle,
            tally,
            close_reason: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    /// Run the session to completion: resolve the chat handle, count
    /// down, drive the fetch loop until the deadline elapses or `stop`
    /// fires, then compute the result.
    ///
    /// A fetch in flight when either close event occurs still completes
    /// and its messages are applied; no new fetch is issued afterwards.
    pub async fn run(
        &mut self,
        stop: CancellationToken,
        observer: &dyn SessionObserver,
    ) -> Result<SessionResult, SessionError> {
        let chat = self
            .source
            .resolve_stream(&self.options.stream_id)
            .await
            .map_err(SessionError::Lookup)?;

        self.state = SessionState::Countdown;
        observer.countdown_started(self.options.countdown, &self.options.choices);
        if !self.options.countdown.is_zero() {
            time::sleep(self.options.countdown).await;
        }

        self.state = SessionState::Voting;
        // Set exactly once; never moves afterwards.
        let deadline = Instant::now() + self.options.voting_duration;
        observer.voting_started(self.options.voting_duration);
        tracing::info!(
            stream = %self.options.stream_id,
            duration_secs = self.options.voting_duration.as_secs(),
            "voting window open"
        );

        let mut token: Option<String> = None;
        let reason = loop {
            let page = self
                .source
                .fetch_page(&chat, token.as_deref())
                .await
                .map_err(SessionError::Fetch)?;
            for message in &page.messages {
                self.apply(message, observer);
            }
            token = page.next_token;

            let wait = effective_wait(page.polling_interval);
            observer.cycle_waiting(deadline.saturating_duration_since(Instant::now()), wait);
            tokio::select! {
                biased;
                _ = time::sleep_until(deadline) => break CloseReason::Timeout,
                _ = stop.cancelled() => break CloseReason::Interrupted,
                _ = time::sleep(wait) => {}
            }
        };

        self.state = SessionState::Closed;
        self.close_reason = Some(reason);
        tracing::info!(
            reason = ?reason,
            total_ballots = self.tally.total_ballots(),
            "voting window closed"
        );

        let result = SessionResult {
            results: self.tally.results(&self.options.choices),
            close_reason: reason,
        };
        observer.session_closed(&result);
        Ok(result)
    }

    /// Feed one chat message through ballot eligibility and choice
    /// resolution. Exhausted voters skip resolution entirely.
    fn apply(&mut self, message: &ChatMessage, observer: &dyn SessionObserver) {
        if self.tally.is_exhausted(&message.voter_id) {
            return;
        }
        let Some(choice) = self.options.choices.resolve(&message.text) else {
            return;
        };
        if self.tally.cast_ballot(choice.ordinal, &message.voter_id) {
            tracing::debug!(voter = %message.voter_id, choice = %choice, "ballot accepted");
            observer.ballot_accepted(choice, message);
        }
    }
}

/// Wait between fetches: the provider's suggestion bounded below by the
/// floor, rounded up to whole seconds. Waiting less than the provider's
/// minimum risks provider-side throttling.
fn effective_wait(suggested: Duration) -> Duration {
    let wait = suggested.max(POLL_INTERVAL_FLOOR);
    Duration::from_secs(wait.as_millis().div_ceil(1000) as u64)
}
