//! Tally evaluation: quorum and majority.

use crate::ledger::Support;
use agora_types::VotingPower;
use serde::{Deserialize, Serialize};

/// Running vote totals for one proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub for_votes: VotingPower,
    pub against_votes: VotingPower,
    pub abstain_votes: VotingPower,
}

impl Tally {
    /// Add `weight` to the bucket for `support`.
    ///
    /// Saturates instead of wrapping: a saturated bucket can only
    /// under-report, never flip an outcome by wrapping to a small value.
    pub fn record(&mut self, support: Support, weight: VotingPower) {
        let bucket = match support {
            Support::For => &mut self.for_votes,
            Support::Against => &mut self.against_votes,
            Support::Abstain => &mut self.abstain_votes,
        };
        *bucket = bucket.saturating_add(weight);
    }

    /// Votes that count toward quorum: for + abstain.
    pub fn participation(&self) -> VotingPower {
        self.for_votes.saturating_add(self.abstain_votes)
    }

    pub fn total(&self) -> VotingPower {
        self.participation().saturating_add(self.against_votes)
    }
}

/// Outcome of a closed voting window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TallyOutcome {
    Succeeded,
    Defeated,
}

/// Pure pass/fail decision over a tally and a quorum threshold.
pub struct TallyEvaluator;

impl TallyEvaluator {
    /// `for + abstain ≥ quorum`. Against votes never count toward quorum.
    pub fn quorum_reached(tally: &Tally, quorum: VotingPower) -> bool {
        tally.participation() >= quorum
    }

    /// Strict majority: `for > against`. A tie is a loss.
    pub fn vote_succeeded(tally: &Tally) -> bool {
        tally.for_votes > tally.against_votes
    }

    pub fn evaluate(tally: &Tally, quorum: VotingPower) -> TallyOutcome {
        if Self::quorum_reached(tally, quorum) && Self::vote_succeeded(tally) {
            TallyOutcome::Succeeded
        } else {
            TallyOutcome::Defeated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(for_votes: u128, against: u128, abstain: u128) -> Tally {
        Tally {
            for_votes: VotingPower::new(for_votes),
            against_votes: VotingPower::new(against),
            abstain_votes: VotingPower::new(abstain),
        }
    }

    #[test]
    fn below_quorum_is_defeated_despite_majority() {
        let t = tally(1_200_000, 0, 0);
        assert_eq!(
            TallyEvaluator::evaluate(&t, VotingPower::new(4_000_000)),
            TallyOutcome::Defeated
        );
    }

    #[test]
    fn abstain_counts_toward_quorum_only() {
        let t = tally(3, 2, 10);
        assert!(TallyEvaluator::quorum_reached(&t, VotingPower::new(13)));
        assert_eq!(TallyEvaluator::evaluate(&t, VotingPower::new(13)), TallyOutcome::Succeeded);
        // Abstain does not break a tie.
        let tied = tally(5, 5, 100);
        assert_eq!(TallyEvaluator::evaluate(&tied, VotingPower::new(1)), TallyOutcome::Defeated);
    }

    #[test]
    fn against_votes_do_not_reach_quorum() {
        let t = tally(1, 0, 0);
        let heavy_against = tally(1, 1_000, 0);
        assert!(!TallyEvaluator::quorum_reached(&heavy_against, VotingPower::new(2)));
        assert!(!TallyEvaluator::quorum_reached(&t, VotingPower::new(2)));
    }

    #[test]
    fn zero_quorum_needs_only_majority() {
        assert_eq!(TallyEvaluator::evaluate(&tally(1, 0, 0), VotingPower::ZERO), TallyOutcome::Succeeded);
        assert_eq!(TallyEvaluator::evaluate(&Tally::default(), VotingPower::ZERO), TallyOutcome::Defeated);
    }

    #[test]
    fn record_saturates() {
        let mut t = tally(u128::MAX - 1, 0, 0);
        t.record(Support::For, VotingPower::new(5));
        assert_eq!(t.for_votes.raw(), u128::MAX);
        assert_eq!(t.total().raw(), u128::MAX);
    }
}
