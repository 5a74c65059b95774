//! Poll core
//!
//! The choice set, the ballot tally, and the session controller that
//! drives one poll from countdown to close.

pub mod choices;
pub mod session;
pub mod tally;
