//! Session observers
//!
//! Console rendering of the poll lifecycle, behind a trait so the
//! session controller stays display-agnostic.

use std::time::Duration;

use crate::poll::choices::{Choice, ChoiceSet};
use crate::poll::session::{CloseReason, SessionResult};
use crate::source::ChatMessage;

/// Hooks fired by the session controller as the poll progresses. All
/// hooks default to no-ops so observers implement only what they render.
pub trait SessionObserver: Send + Sync {
    fn countdown_started(&self, _wait: Duration, _choices: &ChoiceSet) {}
    fn voting_started(&self, _duration: Duration) {}
    /// Fired before each between-fetch wait.
    fn cycle_waiting(&self, _remaining: Duration, _wait: Duration) {}
    fn ballot_accepted(&self, _choice: &Choice, _message: &ChatMessage) {}
    fn session_closed(&self, _result: &SessionResult) {}
}

/// Observer that ignores everything.
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// Renders the poll lifecycle to stdout.
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn countdown_started(&self, wait: Duration, choices: &ChoiceSet) {
        println!("start voting in {} seconds...", wait.as_secs());
        println!("to stop the vote early, press the enter key");
        for choice in choices.iter() {
            println!("{}", choice);
        }
        println!();
    }

    fn voting_started(&self, _duration: Duration) {
        println!("vote start!");
        println!("--------------------");
    }

    fn cycle_waiting(&self, remaining: Duration, wait: Duration) {
        println!("time remaining {} sec", remaining.as_secs());
        println!("delay {} sec...", wait.as_secs());
    }

    fn ballot_accepted(&self, choice: &Choice, message: &ChatMessage) {
        println!(
            "vote {} {}(&{}) text:\"{}\"",
            choice, message.display_name, message.voter_id, message.text
        );
    }

    fn session_closed(&self, result: &SessionResult) {
        println!("--------------------");
        println!("vote end!");
        if result.close_reason == CloseReason::Interrupted {
            println!("vote stopped by operator");
        }
        println!();
        println!("total vote {}", result.results.total_ballots);
        println!("--------------------");
        for (choice, count) in &result.results.counts {
            println!("{} vote {}", choice, count);
        }
        println!("--------------------");
        println!("winning vote {}", result.results.winning_count);
        for choice in &result.results.winners {
            println!("{}", choice);
        }
        println!();
    }
}
