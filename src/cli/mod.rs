//! CLI definition and the top-level run handler.
//!
//! Uses clap derive. Validation errors (missing id, zero voting time)
//! exit with a usage error before any session state exists; fatal
//! session errors bubble up to `main` and exit non-zero.

use clap::Parser;
use std::time::Duration;

use crate::interrupt::InterruptWatcher;
use crate::logging;
use crate::poll::choices::ChoiceSet;
use crate::poll::session::{PollSession, SessionOptions};
use crate::report::ConsoleObserver;
use crate::source::YouTubeSource;

/// Run a timed audience poll over a YouTube live chat.
#[derive(Parser, Debug)]
#[command(
    name = "chatvote",
    version = env!("CARGO_PKG_VERSION"),
    about = "Run a timed audience poll over a YouTube live chat"
)]
pub struct Cli {
    /// YouTube video id of the live stream.
    #[arg(long = "id", value_name = "VIDEO_ID")]
    pub stream_id: String,

    /// Voting window length in seconds.
    #[arg(
        short = 't',
        long = "voting-time",
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub voting_time: u64,

    /// Wait before voting opens, in seconds.
    #[arg(short = 's', long = "start-wait", value_name = "SECS", default_value_t = 0)]
    pub start_wait: u64,

    /// How many ballots each voter may cast.
    #[arg(
        long,
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub ballots_per_voter: u32,

    /// YouTube Data API key.
    #[arg(long, env = "CHATVOTE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Log filter (e.g. "info", "chatvote=debug").
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long)]
    pub json_logs: bool,

    /// Choice labels, in order; ordinals 1..N are assigned from the
    /// order given. Defaults to the two-option set "1" "2".
    #[arg(value_name = "CHOICE")]
    pub choices: Vec<String>,
}

impl Cli {
    /// Validated session inputs from the parsed flags.
    pub fn session_options(&self) -> SessionOptions {
        let choices = if self.choices.is_empty() {
            ChoiceSet::default_pair()
        } else {
            ChoiceSet::new(self.choices.iter().cloned())
        };
        SessionOptions {
            stream_id: self.stream_id.clone(),
            voting_duration: Duration::from_secs(self.voting_time),
            countdown: Duration::from_secs(self.start_wait),
            ballots_per_voter: self.ballots_per_voter,
            choices,
        }
    }
}

/// Top-level handler: build the source, run one session, surface fatal
/// errors to the caller.
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&cli.log_level, cli.json_logs);

    let source = YouTubeSource::new(cli.api_key.as_str())?;
    let mut session = PollSession::new(cli.session_options(), source);

    let watcher = InterruptWatcher::spawn_stdin();
    let result = session.run(watcher.token(), &ConsoleObserver).await;
    watcher.shutdown();
    result?;
    Ok(())
}
