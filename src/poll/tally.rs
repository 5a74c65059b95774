//! Ballot Tally
//!
//! Per-voter and per-choice vote accounting with a configurable
//! ballots-per-voter cap. Owned exclusively by the session controller;
//! mutated only through [`BallotTally::cast_ballot`].

use std::collections::HashMap;

use super::choices::{Choice, ChoiceSet};

/// Mutable vote accounting for one session.
#[derive(Debug)]
pub struct BallotTally {
    /// Ballots cast so far, per voter id.
    voter_ballots: HashMap<String, u32>,
    /// Votes received so far, per choice ordinal.
    choice_votes: HashMap<u32, u32>,
    total_ballots: u32,
    max_ballots_per_voter: u32,
}

impl BallotTally {
    pub fn new(max_ballots_per_voter: u32) -> Self {
        Self {
            voter_ballots: HashMap::new(),
            choice_votes: HashMap::new(),
            total_ballots: 0,
            max_ballots_per_voter,
        }
    }

    /// Whether a voter has used up their ballot allowance.
    pub fn is_exhausted(&self, voter: &str) -> bool {
        self.voter_ballots.get(voter).copied().unwrap_or(0) >= self.max_ballots_per_voter
    }

    /// Record one ballot for a choice. Returns false without mutation
    /// when the voter is exhausted; casting past the cap never errors.
    pub fn cast_ballot(&mut self, ordinal: u32, voter: &str) -> bool {
        if self.is_exhausted(voter) {
            return false;
        }
        *self.voter_ballots.entry(voter.to_string()).or_insert(0) += 1;
        *self.choice_votes.entry(ordinal).or_insert(0) += 1;
        self.total_ballots += 1;
        true
    }

    pub fn total_ballots(&self) -> u32 {
        self.total_ballots
    }

    /// Current vote count for a choice ordinal (zero if never voted).
    pub fn votes_for(&self, ordinal: u32) -> u32 {
        self.choice_votes.get(&ordinal).copied().unwrap_or(0)
    }

    /// Compute final counts and the winner subset.
    ///
    /// Winners are every choice whose count equals the session maximum,
    /// in configured order. With zero ballots cast every choice ties at
    /// zero, so the winner set is the full configured list.
    pub fn results(&self, choices: &ChoiceSet) -> TallyResults {
        let counts: Vec<(Choice, u32)> = choices
            .iter()
            .map(|c| (c.clone(), self.votes_for(c.ordinal)))
            .collect();
        let winning_count = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
        let winners = counts
            .iter()
            .filter(|(_, n)| *n == winning_count)
            .map(|(c, _)| c.clone())
            .collect();
        TallyResults {
            counts,
            total_ballots: self.total_ballots,
            winners,
            winning_count,
        }
    }
}

/// Final counts, in configured choice order.
#[derive(Debug, Clone)]
pub struct TallyResults {
    /// Per-choice vote counts, one entry per configured choice.
    pub counts: Vec<(Choice, u32)>,
    pub total_ballots: u32,
    /// Choices sharing the maximum count, in configured order.
    pub winners: Vec<Choice>,
    pub winning_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_ballot_counts() {
        let mut tally = BallotTally::new(1);
        assert!(tally.cast_ballot(1, "voter-a"));
        assert!(tally.cast_ballot(2, "voter-b"));
        assert_eq!(tally.total_ballots(), 2);
        assert_eq!(tally.votes_for(1), 1);
        assert_eq!(tally.votes_for(2), 1);
    }

    #[test]
    fn test_cap_invariant_single_ballot() {
        let mut tally = BallotTally::new(1);
        assert!(tally.cast_ballot(1, "voter-a"));
        // Every further cast from the same voter is a silent no-op.
        for _ in 0..10 {
            assert!(!tally.cast_ballot(2, "voter-a"));
        }
        assert_eq!(tally.total_ballots(), 1);
        assert_eq!(tally.votes_for(1), 1);
        assert_eq!(tally.votes_for(2), 0);
        assert!(tally.is_exhausted("voter-a"));
        assert!(!tally.is_exhausted("voter-b"));
    }

    #[test]
    fn test_cap_invariant_multiple_ballots() {
        let mut tally = BallotTally::new(3);
        assert!(tally.cast_ballot(1, "voter-a"));
        assert!(tally.cast_ballot(2, "voter-a"));
        assert!(tally.cast_ballot(1, "voter-a"));
        assert!(!tally.cast_ballot(2, "voter-a"));
        assert_eq!(tally.total_ballots(), 3);
    }

    #[test]
    fn test_conservation() {
        let mut tally = BallotTally::new(2);
        let casts = [
            (1, "a"),
            (2, "b"),
            (1, "a"),
            (1, "a"), // rejected, exhausted
            (3, "c"),
            (2, "b"),
        ];
        for (ordinal, voter) in casts {
            tally.cast_ballot(ordinal, voter);
        }
        let choice_sum: u32 = tally.choice_votes.values().sum();
        let voter_sum: u32 = tally.voter_ballots.values().sum();
        assert_eq!(choice_sum, tally.total_ballots());
        assert_eq!(voter_sum, tally.total_ballots());
        assert_eq!(tally.total_ballots(), 5);
    }

    #[test]
    fn test_results_in_configured_order_zero_filled() {
        let choices = ChoiceSet::new(["Red", "Blue", "Green"]);
        let mut tally = BallotTally::new(1);
        tally.cast_ballot(2, "a");
        let results = tally.results(&choices);
        let counts: Vec<(u32, u32)> = results
            .counts
            .iter()
            .map(|(c, n)| (c.ordinal, *n))
            .collect();
        assert_eq!(counts, vec![(1, 0), (2, 1), (3, 0)]);
    }

    #[test]
    fn test_tie_reported_in_configured_order() {
        let choices = ChoiceSet::new(["Red", "Blue", "Green"]);
        let mut tally = BallotTally::new(1);
        for voter in ["a", "b", "c"] {
            tally.cast_ballot(1, voter);
        }
        for voter in ["d", "e", "f"] {
            tally.cast_ballot(3, voter);
        }
        let results = tally.results(&choices);
        assert_eq!(results.winning_count, 3);
        let winners: Vec<&str> = results.winners.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(winners, vec!["Red", "Green"]);
    }

    #[test]
    fn test_zero_ballots_every_choice_wins() {
        let choices = ChoiceSet::new(["Red", "Blue"]);
        let tally = BallotTally::new(1);
        let results = tally.results(&choices);
        assert_eq!(results.total_ballots, 0);
        assert_eq!(results.winning_count, 0);
        assert_eq!(results.winners.len(), 2);
    }

    #[test]
    fn test_single_winner() {
        let choices = ChoiceSet::new(["Red", "Blue"]);
        let mut tally = BallotTally::new(1);
        tally.cast_ballot(2, "a");
        tally.cast_ballot(2, "b");
        tally.cast_ballot(1, "c");
        let results = tally.results(&choices);
        assert_eq!(results.winning_count, 2);
        assert_eq!(results.winners.len(), 1);
        assert_eq!(results.winners[0].label, "Blue");
    }
}
