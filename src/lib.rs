//! chatvote library
//!
//! Runs a timed audience poll over a live chat stream: opens a voting
//! window, pages through new chat messages, interprets each message as a
//! ballot for one of a fixed set of choices, deduplicates ballots per
//! voter, and reports a tie-aware tally when the window closes -- by
//! timeout or by an operator stop signal.

pub mod cli;
pub mod interrupt;
pub mod logging;
pub mod poll;
pub mod report;
pub mod source;
